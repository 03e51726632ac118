use std::path::Path;
use std::sync::Arc;

use rand::Rng;
use tracing::{info, info_span, instrument, warn};

use crate::augment_pipeline::{
    common::error::Result,
    config::AugmentConfig,
    decode::{AutoDecoder, MediaDecoder},
    layout::{ChannelLayoutWriter, LayoutWriter},
    params::{ImageParamSampler, ParamSampler},
    stages::timing::{StageTimings, Timer},
    transform::{ImageTransformer, MediaTransformer},
};

/// Result of running one item through the whole pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedItem<P, M> {
    pub params: P,
    pub media: M,
    pub bytes_written: usize,
}

/// Decode, sample, transform and lay out one item at a time.
///
/// The pipeline holds no per-item state and no random engine, so one instance can be
/// shared by any number of workers as long as each brings its own engine.
pub struct AugmentPipeline<D, S, T, L> {
    decoder: D,
    sampler: S,
    transformer: T,
    writer: L,
    config: Arc<AugmentConfig>,
}

/// The pipeline over the crate's own image stages.
pub type ImagePipeline =
    AugmentPipeline<AutoDecoder, ImageParamSampler, ImageTransformer, ChannelLayoutWriter>;

impl ImagePipeline {
    pub fn new(config: Arc<AugmentConfig>) -> Self {
        Self {
            decoder: AutoDecoder::from_config(&config),
            sampler: ImageParamSampler::new(Arc::clone(&config)),
            transformer: ImageTransformer::new(),
            writer: ChannelLayoutWriter::from_config(&config),
            config,
        }
    }
}

impl<D, S, T, L> AugmentPipeline<D, S, T, L>
where
    D: MediaDecoder,
    S: ParamSampler<Media = D::Media>,
    T: MediaTransformer<Media = D::Media, Params = S::Params>,
    L: LayoutWriter<Media = D::Media>,
{
    pub fn with_custom(
        decoder: D,
        sampler: S,
        transformer: T,
        writer: L,
        config: Arc<AugmentConfig>,
    ) -> Self {
        Self {
            decoder,
            sampler,
            transformer,
            writer,
            config,
        }
    }

    /// Decodes `data` and applies one freshly sampled set of parameters to it.
    #[instrument(skip_all, fields(input_size = data.len()))]
    pub fn augment<R: Rng + ?Sized>(
        &self,
        data: &[u8],
        rng: &mut R,
    ) -> Result<(S::Params, D::Media)> {
        self.run_augment(data, rng, &mut StageTimings::new())
    }

    /// Writes already transformed media into `output`.
    pub fn write_layout(&self, media: &D::Media, output: &mut [u8]) -> Result<usize> {
        self.run_layout(media, output, &mut StageTimings::new())
    }

    /// Runs the full pipeline for one item, writing the laid-out result into `output`.
    #[instrument(skip_all, fields(input_size = data.len()))]
    pub fn process<R: Rng + ?Sized>(
        &self,
        data: &[u8],
        rng: &mut R,
        output: &mut [u8],
    ) -> Result<ProcessedItem<S::Params, D::Media>> {
        self.run_item(data, rng, output, &mut StageTimings::new())
    }

    /// Like [`process`](Self::process), additionally reporting the time spent per step.
    #[instrument(skip_all, fields(input_size = data.len()))]
    pub fn process_with_timings<R: Rng + ?Sized>(
        &self,
        data: &[u8],
        rng: &mut R,
        output: &mut [u8],
    ) -> Result<(ProcessedItem<S::Params, D::Media>, StageTimings)> {
        let mut timings = StageTimings::new();
        let item = self.run_item(data, rng, output, &mut timings)?;
        Ok((item, timings))
    }

    fn run_item<R: Rng + ?Sized>(
        &self,
        data: &[u8],
        rng: &mut R,
        output: &mut [u8],
        timings: &mut StageTimings,
    ) -> Result<ProcessedItem<S::Params, D::Media>> {
        let result = self
            .run_augment(data, rng, timings)
            .and_then(|(params, media)| {
                let bytes_written = self.run_layout(&media, output, timings)?;
                Ok(ProcessedItem {
                    params,
                    media,
                    bytes_written,
                })
            });

        match &result {
            Ok(item) => info!(bytes_written = item.bytes_written, "Augmentation complete"),
            Err(e) => warn!(error = %e, "Item rejected"),
        }
        result
    }

    fn run_augment<R: Rng + ?Sized>(
        &self,
        data: &[u8],
        rng: &mut R,
        timings: &mut StageTimings,
    ) -> Result<(S::Params, D::Media)> {
        let media = {
            let _span = info_span!("decode").entered();
            let timer = Timer::start("decode");
            let media = self.decoder.decode(data)?;
            timings.record(timer);
            media
        };

        let params = {
            let _span = info_span!("sample").entered();
            let timer = Timer::start("sample");
            let params = self.sampler.sample(&media, rng);
            timings.record(timer);
            params
        };

        let media = {
            let _span = info_span!("transform").entered();
            let timer = Timer::start("transform");
            let media = self.transformer.transform(&params, media)?;
            timings.record(timer);
            media
        };

        Ok((params, media))
    }

    fn run_layout(
        &self,
        media: &D::Media,
        output: &mut [u8],
        timings: &mut StageTimings,
    ) -> Result<usize> {
        let _span = info_span!("layout", available = output.len()).entered();
        let timer = Timer::start("layout");
        let bytes_written = self.writer.write(media, output)?;
        timings.record(timer);
        Ok(bytes_written)
    }

    #[instrument(skip_all, fields(input = %input_path.as_ref().display()))]
    pub fn process_file<P: AsRef<Path>, R: Rng + ?Sized>(
        &self,
        input_path: P,
        rng: &mut R,
        output: &mut [u8],
    ) -> Result<ProcessedItem<S::Params, D::Media>> {
        let data = {
            let _span = info_span!("read_input_file").entered();
            std::fs::read(input_path.as_ref())?
        };

        self.process(&data, rng, output)
    }

    /// Bytes needed to lay out `media`.
    pub fn required_len(&self, media: &D::Media) -> usize {
        self.writer.required_len(media)
    }

    pub fn config(&self) -> &AugmentConfig {
        &self.config
    }
}
