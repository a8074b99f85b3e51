//! snowline: NDSI snow cover detection for multispectral imagery
//!
//! Reads the green and shortwave-infrared bands of a georeferenced raster,
//! classifies every pixel with the Normalized Difference Snow Index and writes a
//! false-color GeoTIFF (blue = snow, red = non-snow) on the input grid.

pub mod types;
pub mod io;
pub mod core;

// Re-export main types and functions for easier access
pub use crate::types::{
    BandGrid, BandRoles, GeoReference, GeoTransform, SnowClass, SnowError, SnowResult,
};

pub use crate::io::{BandLoader, GeoTiffWriter, LoadedBands};
pub use crate::core::{
    NdsiClassifier, PipelineState, SnowDetectionParams, SnowDetector, SnowMask, SnowSummary,
};
