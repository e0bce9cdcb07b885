//! TASVideos core prelude: the types a module needs, in one import.
//!
//! ```rust,ignore
//! use tasvideos_core::prelude::*;
//! ```

// ── Core types ─────────────────────────────────────────────────
pub use crate::ApiError;
pub use crate::ApiModule;
pub use crate::ApiResponse;
pub use crate::App;
pub use crate::AppState;
pub use crate::Config;
pub use crate::error::FieldError;

// ── Extractors & query helpers ─────────────────────────────────
pub use crate::extractors::{Pagination, Path, ValidatedQuery};
pub use crate::query::{FieldSelection, SortDirection, SortDirective, validate_sort};

// ── Logging ────────────────────────────────────────────────────
pub use crate::logging::{init_logging, init_logging_json, init_logging_with_format};

// ── Router & async trait ───────────────────────────────────────
pub use async_trait::async_trait;
pub use axum::Router;
pub use axum::extract::State;
pub use axum::routing::get;

// ── Serde (almost every handler needs these) ───────────────────
pub use serde::{Deserialize, Serialize};
