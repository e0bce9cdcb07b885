//! The `ApiModule` trait: each feature area (publications, users, ...)
//! registers its own routes, migrations and OpenAPI fragment, and the
//! `App` composes them at startup via `App::mount_module()`.
//!
//! ```rust,ignore
//! use tasvideos_core::prelude::*;
//!
//! pub struct GamesModule;
//!
//! #[async_trait]
//! impl ApiModule for GamesModule {
//!     fn name(&self) -> &str { "games" }
//!
//!     fn routes(&self) -> Router<AppState> {
//!         Router::new().route("/api/v1/games", get(list_games))
//!     }
//! }
//! ```

use async_trait::async_trait;
use axum::Router;
use sea_orm::DatabaseConnection;

use crate::error::ApiError;
use crate::state::AppState;

/// A composable feature module.
#[async_trait]
pub trait ApiModule: Send + Sync {
    /// A unique name identifying this module, used for logging.
    fn name(&self) -> &str;

    /// The router containing this module's routes, merged into the
    /// application router when mounted.
    fn routes(&self) -> Router<AppState>;

    /// Apply pending schema migrations owned by this module.
    async fn migrate(&self, _db: &DatabaseConnection) -> Result<(), ApiError> {
        Ok(())
    }

    /// Revert the last `steps` migrations owned by this module.
    async fn rollback(&self, _db: &DatabaseConnection, _steps: u32) -> Result<(), ApiError> {
        Ok(())
    }

    /// OpenAPI document for this module's endpoints, merged into `/api-docs`.
    fn openapi_spec(&self) -> Option<utoipa::openapi::OpenApi> {
        None
    }
}
