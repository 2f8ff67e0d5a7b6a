use swf::CharacterId;

/// A DefineBitsJPEG2 tag: a complete JPEG stream with its own tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefineBits {
    pub id: CharacterId,
    pub jpeg_data: Vec<u8>,
    pub width: u16,
    pub height: u16,
}

/// A DefineBitsLossless2 tag in the 32-bit format. `data` holds
/// premultiplied `[a, r, g, b]` quadruples, row by row, uncompressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefineBitsLossless {
    pub id: CharacterId,
    pub width: u16,
    pub height: u16,
    pub data: Vec<u8>,
}
