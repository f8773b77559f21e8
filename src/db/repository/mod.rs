//! Repository layer: entity-scoped database operations.
//!
//! Free functions over a borrowed `Connection`; `SqliteStore` wires them
//! to the schedule core's traits.

mod dose_status;
mod prescription;

pub use dose_status::*;
pub use prescription::*;
