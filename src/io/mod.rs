pub mod config_io;
pub mod recovery;
pub mod state;
pub mod task_io;
pub mod watcher;
