use image::codecs::jpeg::JpegDecoder;
use image::ImageDecoder;
use std::io::Cursor;

/// Reads `(width, height)` from the frame header of a JPEG stream. Returns
/// `None` when the stream does not decode as a JPEG or is larger than a
/// bitmap tag can describe.
pub fn dimensions(jpeg: &[u8]) -> Option<(u16, u16)> {
    let (width, height) = JpegDecoder::new(Cursor::new(jpeg)).ok()?.dimensions();
    Some((u16::try_from(width).ok()?, u16::try_from(height).ok()?))
}
