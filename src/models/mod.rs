pub mod dose;
pub mod enums;
pub mod prescription;
pub mod schedule;

pub use dose::*;
pub use prescription::*;
pub use schedule::*;
