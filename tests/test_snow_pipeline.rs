use gdal::raster::Buffer;
use gdal::spatial_ref::SpatialRef;
use gdal::{Dataset, DriverManager};
use snowline::{
    BandRoles, PipelineState, SnowDetectionParams, SnowDetector, SnowError,
};
use std::path::{Path, PathBuf};

const GEO_TRANSFORM: [f64; 6] = [500000.0, 10.0, 0.0, 4600000.0, 0.0, -10.0];

/// Write a Float32 GeoTIFF where `fill(band, pixel)` gives each sample
fn write_scene<F>(path: &Path, width: usize, height: usize, bands: usize, fill: F)
where
    F: Fn(usize, usize) -> f32,
{
    let driver = DriverManager::get_driver_by_name("GTiff").expect("GTiff driver");
    let mut dataset = driver
        .create_with_band_type::<f32, _>(path, width as isize, height as isize, bands as isize)
        .expect("Failed to create test scene");

    dataset.set_geo_transform(&GEO_TRANSFORM).unwrap();
    let wkt = SpatialRef::from_epsg(32633).unwrap().to_wkt().unwrap();
    dataset.set_projection(&wkt).unwrap();

    for band in 1..=bands {
        let data: Vec<f32> = (0..width * height).map(|i| fill(band, i)).collect();
        let mut rasterband = dataset.rasterband(band as isize).unwrap();
        rasterband
            .write((0, 0), (width, height), &Buffer::new((width, height), data))
            .unwrap();
    }
}

fn read_u8_band(dataset: &Dataset, index: isize) -> Vec<u8> {
    let (width, height) = dataset.raster_size();
    dataset
        .rasterband(index)
        .unwrap()
        .read_as::<u8>((0, 0), (width, height), (width, height), None)
        .unwrap()
        .data
}

fn scratch(dir: &tempfile::TempDir, name: &str) -> PathBuf {
    dir.path().join(name)
}

#[test]
fn test_two_pixel_scene() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir().unwrap();
    let input = scratch(&dir, "scene.tif");
    let output = scratch(&dir, "snow.tif");

    // Band 3 = green [0.5, 0.2], band 11 = SWIR [0.1, 0.2], others noise
    write_scene(&input, 2, 1, 11, |band, pixel| match (band, pixel) {
        (3, 0) => 0.5,
        (3, _) => 0.2,
        (11, 0) => 0.1,
        (11, _) => 0.2,
        _ => 9.0,
    });

    let mut detector = SnowDetector::new(&input, &output);
    let summary = detector.process().expect("Pipeline failed");

    assert_eq!(detector.state(), PipelineState::Written);
    assert_eq!((summary.width, summary.height), (2, 1));
    assert_eq!(summary.snow_pixels, 1);

    let result = Dataset::open(&output).unwrap();
    assert_eq!(result.raster_count(), 3);
    assert_eq!(read_u8_band(&result, 1), vec![0, 255]);
    assert_eq!(read_u8_band(&result, 2), vec![0, 0]);
    assert_eq!(read_u8_band(&result, 3), vec![255, 0]);
}

#[test]
fn test_georeferencing_is_preserved() {
    let dir = tempfile::tempdir().unwrap();
    let input = scratch(&dir, "scene.tif");
    let output = scratch(&dir, "snow.tif");

    write_scene(&input, 7, 5, 11, |band, pixel| (band * 10 + pixel % 7) as f32 / 100.0);

    SnowDetector::new(&input, &output).process().unwrap();

    let source = Dataset::open(&input).unwrap();
    let result = Dataset::open(&output).unwrap();

    assert_eq!(result.raster_size(), source.raster_size());
    assert_eq!(result.geo_transform().unwrap(), GEO_TRANSFORM);
    assert_eq!(result.geo_transform().unwrap(), source.geo_transform().unwrap());

    let source_srs = SpatialRef::from_wkt(&source.projection()).unwrap();
    let result_srs = SpatialRef::from_wkt(&result.projection()).unwrap();
    assert!(source_srs == result_srs);
}

#[test]
fn test_output_planes_are_exclusive_and_repeatable() {
    let dir = tempfile::tempdir().unwrap();
    let input = scratch(&dir, "scene.tif");
    let output = scratch(&dir, "snow.tif");

    write_scene(&input, 9, 6, 11, |band, pixel| match band {
        3 => (pixel % 5) as f32 * 0.2,
        11 => (pixel % 3) as f32 * 0.1,
        _ => 0.0,
    });

    let mut detector = SnowDetector::new(&input, &output);
    detector.process().unwrap();
    let first = {
        let result = Dataset::open(&output).unwrap();
        (1..=3).map(|i| read_u8_band(&result, i)).collect::<Vec<_>>()
    };

    detector.process().unwrap();
    let second = {
        let result = Dataset::open(&output).unwrap();
        (1..=3).map(|i| read_u8_band(&result, i)).collect::<Vec<_>>()
    };

    assert_eq!(first, second);
    for pixel in 0..first[0].len() {
        let (red, green, blue) = (first[0][pixel], first[1][pixel], first[2][pixel]);
        assert_eq!(green, 0);
        assert!((red == 255 && blue == 0) || (red == 0 && blue == 255));
    }
}

#[test]
fn test_insufficient_bands_creates_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = scratch(&dir, "five_bands.tif");
    let output = scratch(&dir, "snow.tif");

    write_scene(&input, 4, 4, 5, |_, _| 0.3);

    let mut detector = SnowDetector::new(&input, &output);
    match detector.process() {
        Err(SnowError::InsufficientBands { available, required }) => {
            assert_eq!(available, 5);
            assert_eq!(required, 11);
        }
        other => panic!("Expected InsufficientBands, got {:?}", other),
    }
    assert_eq!(detector.state(), PipelineState::LoadFailed);
    assert!(!output.exists());
}

#[test]
fn test_custom_band_roles() {
    let dir = tempfile::tempdir().unwrap();
    let input = scratch(&dir, "landsat_like.tif");
    let output = scratch(&dir, "snow.tif");

    // Green on band 1, SWIR on band 2: NDSI 0.8 and -0.5
    write_scene(&input, 2, 1, 2, |band, pixel| match (band, pixel) {
        (1, 0) => 0.9,
        (2, 0) => 0.1,
        (1, _) => 0.1,
        _ => 0.3,
    });

    let params = SnowDetectionParams {
        bands: BandRoles { green: 1, swir: 2 },
        ..Default::default()
    };
    let summary = SnowDetector::with_params(&input, &output, params)
        .process()
        .unwrap();
    assert_eq!(summary.snow_pixels, 1);

    let result = Dataset::open(&output).unwrap();
    assert_eq!(read_u8_band(&result, 3), vec![255, 0]);
}

#[test]
fn test_unwritable_output_is_write_failure() {
    let dir = tempfile::tempdir().unwrap();
    let input = scratch(&dir, "scene.tif");
    let output = dir.path().join("no_such_dir").join("snow.tif");

    write_scene(&input, 2, 2, 11, |_, _| 0.5);

    let mut detector = SnowDetector::new(&input, &output);
    let result = detector.process();
    assert!(matches!(result, Err(SnowError::CannotCreateOutput { .. })));
    assert_eq!(detector.state(), PipelineState::WriteFailed);
}

#[test]
fn test_unavailable_driver_is_write_failure() {
    let dir = tempfile::tempdir().unwrap();
    let input = scratch(&dir, "scene.tif");
    let output = scratch(&dir, "snow.tif");

    write_scene(&input, 2, 2, 11, |_, _| 0.5);

    let params = SnowDetectionParams {
        output_driver: "NotARealDriver".to_string(),
        ..Default::default()
    };
    let mut detector = SnowDetector::with_params(&input, &output, params);
    let result = detector.process();
    assert!(matches!(result, Err(SnowError::OutputDriverUnavailable { .. })));
    assert_eq!(detector.state(), PipelineState::WriteFailed);
    assert!(!output.exists());
}
