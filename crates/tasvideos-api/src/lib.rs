pub mod controllers;
pub mod migrations;
pub mod models;
pub mod openapi;
pub mod services;

pub use controllers::PublicationsModule;
pub use services::UserTasks;
