//! I/O modules for reading multispectral bands and writing classified rasters

pub mod band_loader;
pub mod geotiff_writer;

pub use band_loader::{BandLoader, LoadedBands};
pub use geotiff_writer::{GeoTiffWriter, DEFAULT_OUTPUT_DRIVER};
