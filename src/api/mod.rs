//! HTTP surface: pages and the JSON API.
//!
//! `app_router()` returns a `Router` that can be mounted on any axum server;
//! `start_server_on()` binds it and runs it in the background.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::app_router;
pub use server::{start_server_on, ApiServer};
pub use types::ApiContext;
