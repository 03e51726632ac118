//! Output layout module
//!
//! Serializes transformed media into a caller-provided byte buffer.

mod channel_writer;
mod writer;

pub use channel_writer::ChannelLayoutWriter;
pub use writer::LayoutWriter;
