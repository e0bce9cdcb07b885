pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod logging;
pub mod module;
pub mod openapi;
pub mod prelude;
pub mod query;
pub mod response;
pub mod routing;
pub mod state;
pub mod testing;

pub use app::App;
pub use config::Config;
pub use error::ApiError;
pub use module::ApiModule;
pub use response::ApiResponse;
pub use state::AppState;
pub use testing::{TestApp, TestClient, TestResponse};
