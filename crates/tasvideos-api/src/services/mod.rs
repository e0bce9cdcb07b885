pub mod user_tasks;

pub use user_tasks::UserTasks;
