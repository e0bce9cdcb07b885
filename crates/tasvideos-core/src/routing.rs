use axum::Router;
use axum::routing::get;
use serde::Serialize;

use crate::response::ApiResponse;
use crate::state::AppState;

/// Build core application routes (excluding module-provided routes).
///
/// Module routes are registered via `App::mount_module()` and merged
/// separately.
pub fn build_routes(docs_path: String) -> Router<AppState> {
    Router::new().route("/", get(move || index(docs_path.clone())))
}

#[derive(Serialize)]
struct Index {
    name: &'static str,
    version: &'static str,
    docs: String,
    status: &'static str,
}

async fn index(docs: String) -> ApiResponse<Index> {
    ApiResponse::success(Index {
        name: "TASVideos API",
        version: env!("CARGO_PKG_VERSION"),
        docs,
        status: "running",
    })
}
