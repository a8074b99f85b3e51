use anyhow::Context;
use clap::Parser;
use snowline::{BandRoles, SnowDetectionParams, SnowDetector};

#[derive(Parser)]
#[command(name = "snowline", about = "Detect snow cover in multispectral imagery using NDSI")]
struct Args {
    /// Input multispectral raster
    #[arg(short, long, default_value = "input_sentinel2.tif")]
    input: String,

    /// Output 3-band false-color raster
    #[arg(short, long, default_value = "snow_only_colored.tif")]
    output: String,

    /// 1-based index of the green band
    #[arg(long, default_value_t = 3)]
    green_band: usize,

    /// 1-based index of the shortwave infrared band
    #[arg(long, default_value_t = 11)]
    swir_band: usize,

    /// NDSI threshold above which a pixel is snow
    #[arg(long, default_value_t = 0.4)]
    threshold: f32,

    /// GDAL driver for the output raster
    #[arg(long, default_value = "GTiff")]
    driver: String,

    /// Worker threads for classification
    #[arg(long)]
    jobs: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if let Some(jobs) = args.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    let params = SnowDetectionParams {
        bands: BandRoles {
            green: args.green_band,
            swir: args.swir_band,
        },
        threshold: args.threshold,
        output_driver: args.driver,
    };

    let mut detector = SnowDetector::with_params(&args.input, &args.output, params);
    let summary = detector
        .process()
        .with_context(|| format!("Snow detection failed for {}", args.input))?;

    log::info!(
        "Program completed successfully: {:.2}% snow cover",
        summary.snow_fraction() * 100.0
    );
    Ok(())
}
