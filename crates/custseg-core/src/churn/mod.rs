pub mod segment_churn;

pub use segment_churn::{churn_by_segment, SegmentChurn};
