pub mod check;
pub mod reminder;
pub mod search;
pub mod task_ops;
