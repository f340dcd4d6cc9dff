pub mod error;
pub mod filter;
pub mod store;
pub mod types;

#[cfg(feature = "metrics")]
pub mod metrics;

#[cfg(feature = "trends")]
pub mod trends;

#[cfg(feature = "churn")]
pub mod churn;

#[cfg(feature = "dashboard")]
pub mod dashboard;

pub use error::SegmentationError;
pub use types::*;

/// Standard result type for all segmentation operations
pub type SegmentationResult<T> = Result<T, SegmentationError>;
