use crate::core::ndsi::{NdsiClassifier, DEFAULT_NDSI_THRESHOLD};
use crate::io::band_loader::BandLoader;
use crate::io::geotiff_writer::{GeoTiffWriter, DEFAULT_OUTPUT_DRIVER};
use crate::types::{BandRoles, SnowError, SnowResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Snow detection parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnowDetectionParams {
    /// Band roles in the input raster
    pub bands: BandRoles,
    /// NDSI threshold (exclusive)
    pub threshold: f32,
    /// GDAL driver for the output raster
    pub output_driver: String,
}

impl Default for SnowDetectionParams {
    fn default() -> Self {
        Self {
            bands: BandRoles::default(),          // Sentinel-2 B3 / B11
            threshold: DEFAULT_NDSI_THRESHOLD,
            output_driver: DEFAULT_OUTPUT_DRIVER.to_string(),
        }
    }
}

impl SnowDetectionParams {
    pub fn validate(&self) -> SnowResult<()> {
        self.bands.validate()?;
        if !self.threshold.is_finite() {
            return Err(SnowError::InvalidParameter(format!(
                "NDSI threshold must be finite, got {}",
                self.threshold
            )));
        }
        if self.output_driver.trim().is_empty() {
            return Err(SnowError::InvalidParameter(
                "Output driver name is empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Pipeline progress of one detector invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Loading,
    Loaded,
    LoadFailed,
    Classifying,
    Written,
    WriteFailed,
}

impl PipelineState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PipelineState::LoadFailed | PipelineState::Written | PipelineState::WriteFailed
        )
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnowSummary {
    pub width: usize,
    pub height: usize,
    pub snow_pixels: usize,
}

impl SnowSummary {
    pub fn total_pixels(&self) -> usize {
        self.width * self.height
    }

    pub fn snow_fraction(&self) -> f64 {
        match self.total_pixels() {
            0 => 0.0,
            total => self.snow_pixels as f64 / total as f64,
        }
    }
}

/// Snow cover detector: load bands, classify by NDSI, write false-color raster
pub struct SnowDetector {
    input_path: PathBuf,
    output_path: PathBuf,
    params: SnowDetectionParams,
    state: PipelineState,
}

impl SnowDetector {
    /// Create a detector with default parameters
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(input_path: P, output_path: Q) -> Self {
        Self::with_params(input_path, output_path, SnowDetectionParams::default())
    }

    /// Create a detector with custom parameters
    pub fn with_params<P: AsRef<Path>, Q: AsRef<Path>>(
        input_path: P,
        output_path: Q,
        params: SnowDetectionParams,
    ) -> Self {
        Self {
            input_path: input_path.as_ref().to_path_buf(),
            output_path: output_path.as_ref().to_path_buf(),
            params,
            state: PipelineState::Idle,
        }
    }

    pub fn params(&self) -> &SnowDetectionParams {
        &self.params
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Run the whole pipeline once.
    ///
    /// Every call starts again from `Idle`; a failure leaves the detector in
    /// `LoadFailed` or `WriteFailed`.
    pub fn process(&mut self) -> SnowResult<SnowSummary> {
        self.state = PipelineState::Idle;
        log::info!(
            "Snow detection: {} -> {}",
            self.input_path.display(),
            self.output_path.display()
        );
        log::debug!("Parameters: {:?}", self.params);

        self.state = PipelineState::Loading;
        let loaded = match self
            .params
            .validate()
            .and_then(|_| BandLoader::new(self.params.bands).load_path(&self.input_path))
        {
            Ok(loaded) => loaded,
            Err(e) => {
                log::error!("Error loading data: {}", e);
                self.state = PipelineState::LoadFailed;
                return Err(e);
            }
        };
        self.state = PipelineState::Loaded;

        self.state = PipelineState::Classifying;
        let written = NdsiClassifier::new(self.params.threshold)
            .classify(&loaded.green, &loaded.swir)
            .and_then(|mask| {
                GeoTiffWriter::new(self.params.output_driver.as_str())
                    .write(&mask, &loaded.georef, &self.output_path)?;
                Ok(mask)
            });

        match written {
            Ok(mask) => {
                self.state = PipelineState::Written;
                let summary = SnowSummary {
                    width: loaded.width,
                    height: loaded.height,
                    snow_pixels: mask.snow_pixel_count(),
                };
                log::info!(
                    "Snow cover: {} of {} pixels ({:.2}%)",
                    summary.snow_pixels,
                    summary.total_pixels(),
                    summary.snow_fraction() * 100.0
                );
                Ok(summary)
            }
            Err(e) => {
                log::error!("Error writing output: {}", e);
                self.state = PipelineState::WriteFailed;
                Err(e)
            }
        }
    }
}
