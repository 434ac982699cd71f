pub mod error;
pub mod input;
pub mod time_value;
pub mod types;

#[cfg(feature = "land_data")]
pub mod land_data;

pub mod property;

#[cfg(feature = "valuation")]
pub mod valuation;

#[cfg(feature = "credit")]
pub mod credit;

#[cfg(feature = "projection")]
pub mod projection;

#[cfg(feature = "simulation")]
pub mod simulation;

pub use error::PropertySimError;
pub use types::*;

/// Standard result type for all property-sim operations
pub type PropertySimResult<T> = Result<T, PropertySimError>;
