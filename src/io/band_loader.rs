use crate::types::{
    BandGrid, BandRoles, GeoReference, GeoTransform, SnowError, SnowResult,
};
use gdal::Dataset;
use ndarray::Array2;
use std::path::Path;

/// Green and SWIR bands of one scene, with the scene georeferencing
#[derive(Debug, Clone)]
pub struct LoadedBands {
    pub green: BandGrid,
    pub swir: BandGrid,
    pub width: usize,
    pub height: usize,
    pub georef: GeoReference,
}

/// Reads the two NDSI bands out of a multispectral raster
pub struct BandLoader {
    roles: BandRoles,
}

impl Default for BandLoader {
    fn default() -> Self {
        Self::new(BandRoles::default())
    }
}

impl BandLoader {
    pub fn new(roles: BandRoles) -> Self {
        Self { roles }
    }

    pub fn roles(&self) -> &BandRoles {
        &self.roles
    }

    /// Open a raster dataset for reading
    pub fn open<P: AsRef<Path>>(path: P) -> SnowResult<Dataset> {
        let path = path.as_ref();
        log::info!("Opening input raster: {}", path.display());

        Dataset::open(path).map_err(|source| SnowError::CannotOpenDataset {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Open `path`, load the bands and close the dataset again
    pub fn load_path<P: AsRef<Path>>(&self, path: P) -> SnowResult<LoadedBands> {
        let dataset = Self::open(path)?;
        let loaded = self.load(&dataset)?;
        drop(dataset);
        Ok(loaded)
    }

    /// Load green and SWIR bands plus georeferencing from an open dataset.
    ///
    /// The green band defines the raster size; the SWIR band must match it.
    pub fn load(&self, dataset: &Dataset) -> SnowResult<LoadedBands> {
        self.roles.validate()?;

        let available = dataset.raster_count().max(0) as usize;
        let required = self.roles.required_band_count();
        log::debug!("Dataset has {} bands, {} required", available, required);
        if available < required {
            return Err(SnowError::InsufficientBands { available, required });
        }

        let geo_transform = match dataset.geo_transform() {
            Ok(coefficients) => GeoTransform::from_gdal(coefficients),
            Err(e) => {
                log::warn!("No geotransform on input ({}), using identity transform", e);
                GeoTransform::default()
            }
        };
        let projection = dataset.projection();
        log::debug!("Input geotransform: {:?}", geo_transform);
        if projection.is_empty() {
            log::warn!("Input raster has no projection");
        }

        let green_band = dataset.rasterband(self.roles.green as isize)?;
        let (width, height) = green_band.size();
        log::debug!("Raster size: {}x{}", width, height);

        let swir_band = dataset.rasterband(self.roles.swir as isize)?;
        if swir_band.size() != (width, height) {
            return Err(SnowError::BandSizeMismatch {
                band: self.roles.swir,
                expected: (width, height),
                actual: swir_band.size(),
            });
        }

        let green = Self::read_grid(&green_band, width, height)?;
        let swir = Self::read_grid(&swir_band, width, height)?;
        log::info!(
            "Loaded green (band {}) and SWIR (band {}) at {}x{}",
            self.roles.green,
            self.roles.swir,
            width,
            height
        );

        Ok(LoadedBands {
            green,
            swir,
            width,
            height,
            georef: GeoReference {
                geo_transform,
                projection,
            },
        })
    }

    fn read_grid(
        band: &gdal::raster::RasterBand,
        width: usize,
        height: usize,
    ) -> SnowResult<BandGrid> {
        let buffer = band.read_as::<f32>((0, 0), (width, height), (width, height), None)?;

        Array2::from_shape_vec((height, width), buffer.data)
            .map_err(|e| SnowError::Processing(format!("Failed to reshape band data: {}", e)))
    }
}
