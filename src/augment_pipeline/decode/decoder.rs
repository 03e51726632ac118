use crate::augment_pipeline::common::error::Result;

/// Decodes one encoded item into its in-memory media representation.
pub trait MediaDecoder {
    type Media;

    fn decode(&self, data: &[u8]) -> Result<Self::Media>;
}
