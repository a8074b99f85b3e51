use crate::types::{BandGrid, BandValue, ChannelGrid, SnowClass, SnowError, SnowResult};
use ndarray::{Array2, Zip};

/// NDSI above which a pixel is considered snow
pub const DEFAULT_NDSI_THRESHOLD: f32 = 0.4;

/// Normalized Difference Snow Index for a single pixel.
///
/// `(green - swir) / (green + swir)`, with a zero denominator mapped to 0.0.
/// The result is not clamped.
#[inline]
pub fn ndsi(green: BandValue, swir: BandValue) -> f32 {
    let denom = green + swir;
    if denom == 0.0 {
        0.0
    } else {
        (green - swir) / denom
    }
}

/// Classified snow cover, one class per pixel
#[derive(Debug, Clone, PartialEq)]
pub struct SnowMask {
    classes: Array2<SnowClass>,
}

impl SnowMask {
    pub fn new(classes: Array2<SnowClass>) -> Self {
        Self { classes }
    }

    pub fn classes(&self) -> &Array2<SnowClass> {
        &self.classes
    }

    /// (height, width)
    pub fn dim(&self) -> (usize, usize) {
        self.classes.dim()
    }

    /// Red channel: 255 where the pixel is not snow
    pub fn non_snow_plane(&self) -> ChannelGrid {
        self.classes.mapv(|class| class.channel_values()[0])
    }

    /// Green channel, always zero
    pub fn zero_plane(&self) -> ChannelGrid {
        Array2::zeros(self.classes.dim())
    }

    /// Blue channel: 255 where the pixel is snow
    pub fn snow_plane(&self) -> ChannelGrid {
        self.classes.mapv(|class| class.channel_values()[2])
    }

    pub fn snow_pixel_count(&self) -> usize {
        self.classes.iter().filter(|&&c| c == SnowClass::Snow).count()
    }

    /// Fraction of snow pixels in [0, 1]; 0 for an empty mask
    pub fn snow_fraction(&self) -> f64 {
        let total = self.classes.len();
        if total == 0 {
            return 0.0;
        }
        self.snow_pixel_count() as f64 / total as f64
    }
}

/// Threshold classifier on the NDSI of a green/SWIR band pair
#[derive(Debug, Clone, Copy)]
pub struct NdsiClassifier {
    threshold: f32,
}

impl Default for NdsiClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_NDSI_THRESHOLD)
    }
}

impl NdsiClassifier {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Strict comparison: an index equal to the threshold is not snow, nor is NaN.
    #[inline]
    pub fn classify_index(&self, index: f32) -> SnowClass {
        if index > self.threshold {
            SnowClass::Snow
        } else {
            SnowClass::NonSnow
        }
    }

    #[inline]
    pub fn classify_pixel(&self, green: BandValue, swir: BandValue) -> SnowClass {
        self.classify_index(ndsi(green, swir))
    }

    /// Classify every pixel of a green/SWIR band pair
    pub fn classify(&self, green: &BandGrid, swir: &BandGrid) -> SnowResult<SnowMask> {
        if green.dim() != swir.dim() {
            return Err(SnowError::Processing(format!(
                "Green band shape {:?} does not match SWIR band shape {:?}",
                green.dim(),
                swir.dim()
            )));
        }

        log::info!("Classifying snow cover (NDSI > {})", self.threshold);
        log::debug!("Band shape: {:?}", green.dim());

        #[cfg(feature = "parallel")]
        let classes = Zip::from(green)
            .and(swir)
            .par_map_collect(|&g, &s| self.classify_pixel(g, s));

        #[cfg(not(feature = "parallel"))]
        let classes = Zip::from(green)
            .and(swir)
            .map_collect(|&g, &s| self.classify_pixel(g, s));

        let mask = SnowMask::new(classes);
        log::info!(
            "Classified {} snow pixels ({:.2}%)",
            mask.snow_pixel_count(),
            mask.snow_fraction() * 100.0
        );
        Ok(mask)
    }
}
