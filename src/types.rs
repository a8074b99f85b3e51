use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Real-valued reflectance sample
pub type BandValue = f32;

/// 2D band grid (rows x columns)
pub type BandGrid = Array2<BandValue>;

/// 2D 8-bit output channel (rows x columns)
pub type ChannelGrid = Array2<u8>;

/// Affine transform used by GDAL when the dataset carries none
pub const DEFAULT_GEO_TRANSFORM: [f64; 6] = [0.0, 1.0, 0.0, 0.0, 0.0, 1.0];

/// Geospatial transformation parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    pub top_left_x: f64,
    pub pixel_width: f64,
    pub rotation_x: f64,
    pub top_left_y: f64,
    pub rotation_y: f64,
    pub pixel_height: f64,
}

impl GeoTransform {
    /// Build from GDAL coefficient ordering
    pub fn from_gdal(coefficients: [f64; 6]) -> Self {
        Self {
            top_left_x: coefficients[0],
            pixel_width: coefficients[1],
            rotation_x: coefficients[2],
            top_left_y: coefficients[3],
            rotation_y: coefficients[4],
            pixel_height: coefficients[5],
        }
    }

    /// Coefficients in GDAL ordering
    pub fn to_gdal(&self) -> [f64; 6] {
        [
            self.top_left_x,
            self.pixel_width,
            self.rotation_x,
            self.top_left_y,
            self.rotation_y,
            self.pixel_height,
        ]
    }
}

impl Default for GeoTransform {
    fn default() -> Self {
        Self::from_gdal(DEFAULT_GEO_TRANSFORM)
    }
}

/// Georeferencing copied from the input raster onto the output raster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoReference {
    pub geo_transform: GeoTransform,
    /// Projection definition, kept verbatim (usually WKT)
    pub projection: String,
}

/// Mapping of spectral roles to 1-based band indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandRoles {
    /// Green band (Sentinel-2 B3)
    pub green: usize,
    /// Shortwave infrared band (Sentinel-2 B11)
    pub swir: usize,
}

impl Default for BandRoles {
    fn default() -> Self {
        Self { green: 3, swir: 11 }
    }
}

impl BandRoles {
    /// Minimum band count a dataset needs to provide both roles
    pub fn required_band_count(&self) -> usize {
        self.green.max(self.swir)
    }

    pub fn validate(&self) -> SnowResult<()> {
        if self.green == 0 || self.swir == 0 {
            return Err(SnowError::InvalidParameter(format!(
                "Band indices are 1-based, got green={} swir={}",
                self.green, self.swir
            )));
        }
        Ok(())
    }
}

/// Per-pixel classification outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SnowClass {
    NonSnow,
    Snow,
}

impl SnowClass {
    /// Channel values (red, green, blue) of the false-color rendering
    pub fn channel_values(self) -> [u8; 3] {
        match self {
            SnowClass::NonSnow => [255, 0, 0],
            SnowClass::Snow => [0, 0, 255],
        }
    }
}

/// Error types for snow detection
#[derive(Debug, thiserror::Error)]
pub enum SnowError {
    #[error("Cannot open input dataset {}: {source}", .path.display())]
    CannotOpenDataset {
        path: PathBuf,
        #[source]
        source: gdal::errors::GdalError,
    },

    #[error("Insufficient bands: dataset has {available}, at least {required} required")]
    InsufficientBands { available: usize, required: usize },

    #[error("Band {band} is {actual:?} (width x height), expected {expected:?}")]
    BandSizeMismatch {
        band: usize,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("{driver} driver not available: {source}")]
    OutputDriverUnavailable {
        driver: String,
        #[source]
        source: gdal::errors::GdalError,
    },

    #[error("Cannot create output dataset {}: {source}", .path.display())]
    CannotCreateOutput {
        path: PathBuf,
        #[source]
        source: gdal::errors::GdalError,
    },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("GDAL error: {0}")]
    Gdal(#[from] gdal::errors::GdalError),
}

/// Result type for snow detection operations
pub type SnowResult<T> = Result<T, SnowError>;
