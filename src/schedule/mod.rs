//! Dose schedule generation and adherence tracking.
//!
//! Data flows prescription → generator → (adherence lookup) → aggregator.
//! Status updates go straight to the `AdherenceStore` and never trigger
//! regeneration.

pub mod aggregator;
pub mod error;
pub mod generator;
pub mod identity;
pub mod slots;
pub mod tracker;
pub mod traits;

pub use error::ScheduleError;
pub use identity::{identify, DoseId};
pub use traits::{AdherenceStore, PrescriptionRepository};
