//! HTTP API over the schedule service.
//!
//! Routes are nested under `/api/`. Every response passes through the
//! access log and carries `Cache-Control: no-store`.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{ApiServer, ServerError};
pub use types::ApiContext;
