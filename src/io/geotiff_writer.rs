use crate::core::ndsi::SnowMask;
use crate::types::{ChannelGrid, GeoReference, SnowError, SnowResult};
use gdal::raster::Buffer;
use gdal::{Dataset, DriverManager};
use std::path::Path;

/// GDAL driver used for the classified output
pub const DEFAULT_OUTPUT_DRIVER: &str = "GTiff";

/// Writes a snow mask as a 3-band false-color raster (red = non-snow, blue = snow)
pub struct GeoTiffWriter {
    driver_name: String,
}

impl Default for GeoTiffWriter {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_DRIVER)
    }
}

impl GeoTiffWriter {
    pub fn new(driver_name: impl Into<String>) -> Self {
        Self {
            driver_name: driver_name.into(),
        }
    }

    pub fn driver_name(&self) -> &str {
        &self.driver_name
    }

    /// Create the output raster and write all three channels.
    ///
    /// The dataset is closed before returning, so the file is complete on success.
    pub fn write<P: AsRef<Path>>(
        &self,
        mask: &SnowMask,
        georef: &GeoReference,
        output_path: P,
    ) -> SnowResult<()> {
        let output_path = output_path.as_ref();
        log::info!("Writing classified raster: {}", output_path.display());

        let driver = DriverManager::get_driver_by_name(&self.driver_name).map_err(|source| {
            SnowError::OutputDriverUnavailable {
                driver: self.driver_name.clone(),
                source,
            }
        })?;

        let (height, width) = mask.dim();
        let mut dataset = driver
            .create_with_band_type::<u8, _>(output_path, width as isize, height as isize, 3)
            .map_err(|source| SnowError::CannotCreateOutput {
                path: output_path.to_path_buf(),
                source,
            })?;

        dataset.set_geo_transform(&georef.geo_transform.to_gdal())?;
        if !georef.projection.is_empty() {
            dataset.set_projection(&georef.projection)?;
        }

        Self::write_channel(&dataset, 1, &mask.non_snow_plane())?;
        Self::write_channel(&dataset, 2, &mask.zero_plane())?;
        Self::write_channel(&dataset, 3, &mask.snow_plane())?;

        drop(dataset);
        log::info!(
            "Output written: {} (Blue=Snow, Red=Non-snow)",
            output_path.display()
        );
        Ok(())
    }

    fn write_channel(dataset: &Dataset, index: isize, channel: &ChannelGrid) -> SnowResult<()> {
        let (height, width) = channel.dim();
        let mut rasterband = dataset.rasterband(index)?;
        let flat_data: Vec<u8> = channel.iter().cloned().collect();
        let buffer = Buffer::new((width, height), flat_data);
        rasterband.write((0, 0), (width, height), &buffer)?;
        Ok(())
    }
}
