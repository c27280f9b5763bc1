//! pb-core: stable foundation for the paint-batch plant simulator.
//!
//! Contains:
//! - error (shared error types)
//! - numeric (float guards + the shared liters epsilon)

pub mod error;
pub mod numeric;

// Re-exports: nice ergonomics for downstream crates
pub use error::{PbError, PbResult};
pub use numeric::*;
