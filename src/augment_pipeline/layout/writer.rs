use crate::augment_pipeline::common::error::Result;

pub trait LayoutWriter {
    type Media;

    /// Bytes `write` needs for `media`.
    fn required_len(&self, media: &Self::Media) -> usize;

    /// Writes `media` into the front of `output` and returns the number of bytes written.
    fn write(&self, media: &Self::Media, output: &mut [u8]) -> Result<usize>;
}
