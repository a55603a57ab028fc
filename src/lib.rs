//! tasklet - a tiny to-do list with due-minute reminders
//!
//! Tasks live in one JSON file. The `tl` binary opens a terminal UI when run
//! without arguments and offers one-shot commands otherwise.
//!
//! # Module Organization
//!
//! - `model`: task records and configuration types
//! - `ops`: list mutations, input validation, the reminder scanner, check, search
//! - `io`: data file, config, recovery log, UI state and file watching
//! - `store`: `TaskStore`, the collection bound to its file
//! - `cli`: clap commands and handlers
//! - `tui`: the ratatui front-end

pub mod cli;
pub mod io;
pub mod model;
pub mod ops;
pub mod store;
pub mod tui;
pub mod util;

pub use store::TaskStore;
