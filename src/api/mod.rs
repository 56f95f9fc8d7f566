//! Query service HTTP surface.
//!
//! Two read-only collections (`/patients`, `/medications`) plus a health
//! check. Cross-origin requests are always allowed and every request is
//! access-logged. `api_router()` returns a `Router` that can be mounted
//! on any axum server instance; `server` owns the listener lifecycle.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use router::api_router;
pub use server::{start_api_server, ApiServer, ServerError};
pub use types::ApiContext;
