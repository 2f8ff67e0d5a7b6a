pub mod encoder;

pub use crate::encoder::{EncodeError, EncoderSettings, TagData, TagEncoder};
