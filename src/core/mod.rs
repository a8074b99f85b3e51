//! Snow classification and pipeline orchestration

pub mod ndsi;
pub mod pipeline;

// Re-export main types
pub use ndsi::{ndsi, NdsiClassifier, SnowMask, DEFAULT_NDSI_THRESHOLD};
pub use pipeline::{PipelineState, SnowDetectionParams, SnowDetector, SnowSummary};
