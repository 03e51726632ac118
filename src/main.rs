use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, bail};
use image_augment_rs::augment_pipeline::{
    AugmentConfig, AugmentRng, ImagePipeline, PreviewCompression, StageTimings, TiffPreviewWriter,
    Timer, seeded_rng,
};
use image_augment_rs::logger;
use tracing::{error, info};

const USAGE: &str = "usage: image_augment_rs <config.json> <seed> <input>...";

fn preview_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{stem}.augmented.tiff"))
}

fn augment_one(
    pipeline: &ImagePipeline,
    preview: &TiffPreviewWriter,
    input: &Path,
    rng: &mut AugmentRng,
) -> anyhow::Result<()> {
    let mut timings = StageTimings::new();

    let timer = Timer::start("read");
    let data = std::fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    timings.record(timer);

    let timer = Timer::start("augment");
    let (params, media) = pipeline.augment(&data, rng)?;
    timings.record(timer);

    let timer = Timer::start("layout");
    let mut buffer = vec![0u8; pipeline.required_len(&media)];
    let bytes_written = pipeline.write_layout(&media, &mut buffer)?;
    timings.record(timer);

    let timer = Timer::start("preview");
    let output = preview_path(input);
    preview
        .write_file(&media, &output)
        .with_context(|| format!("writing {}", output.display()))?;
    timings.record(timer);

    info!(
        input = %input.display(),
        output = %output.display(),
        frames = media.len(),
        bytes_written,
        crop_box = ?params.crop_box,
        angle = params.angle,
        flip = params.flip,
        "Augmented"
    );
    timings.log_summary();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    logger::init();

    let mut args = std::env::args().skip(1);
    let (Some(config_path), Some(seed)) = (args.next(), args.next()) else {
        bail!(USAGE);
    };
    let inputs: Vec<PathBuf> = args.map(PathBuf::from).collect();
    if inputs.is_empty() {
        bail!(USAGE);
    }

    let seed: u64 = seed
        .parse()
        .with_context(|| format!("invalid seed {seed:?}"))?;
    let json = std::fs::read_to_string(&config_path)
        .with_context(|| format!("reading config {config_path}"))?;
    let config = Arc::new(AugmentConfig::from_json(&json)?);

    info!(
        width = config.width(),
        height = config.height(),
        channels = config.channels(),
        channel_major = config.channel_major(),
        "Augmentation pipeline initialized"
    );

    let pipeline = ImagePipeline::new(Arc::clone(&config));
    let preview = TiffPreviewWriter::new(PreviewCompression::Deflate);
    let mut rng = seeded_rng(seed);

    let mut failed = 0usize;
    for input in &inputs {
        if let Err(e) = augment_one(&pipeline, &preview, input, &mut rng) {
            error!(input = %input.display(), "Augmentation failed: {e:#}");
            failed += 1;
        }
    }

    info!(processed = inputs.len() - failed, failed, "Done");
    Ok(())
}
