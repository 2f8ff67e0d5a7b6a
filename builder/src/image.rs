use crate::graphics::GraphicsState;
use crate::jpeg;
use crate::path::Path;
use crate::shape::{DefineShapeBuilder, ShapeBuilder};
use crate::sprite::SpriteBuilder;
use log::debug;
use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;
use tags::image::{DefineBits, DefineBitsLossless};
use tags::matrix;
use tags::shape::{FillStyle, Shape, ShapeVersion};
use tags::sprite::DefineSprite;
use tags::twips::TWIPS_PER_PIXEL;
use tags::{CharacterId, Dictionary, Matrix, Tag};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Error reading image '{location}': {message}")]
    Read { location: String, message: String },
    #[error("'{location}' is not a valid JPEG stream")]
    InvalidJpeg { location: String },
    #[error("Expected {expected} pixels for a {width}x{height} image, found {found}")]
    Dimensions {
        width: u32,
        height: u32,
        expected: usize,
        found: usize,
    },
    #[error("Unsupported image type: {0}")]
    Unsupported(String),
    #[error("Error decoding image: {0}")]
    Decode(#[from] image::ImageError),
}

/// An image resource that has to be released once it has been read.
pub trait ImageSource {
    /// Where the image came from, for error messages.
    fn location(&self) -> &str;

    fn read_data(&mut self) -> io::Result<Vec<u8>>;

    fn dispose(&mut self);
}

/// Disposes the wrapped source when dropped, on every exit path.
struct DisposeGuard<'a, S: ImageSource + ?Sized>(&'a mut S);

impl<'a, S: ImageSource + ?Sized> Drop for DisposeGuard<'a, S> {
    fn drop(&mut self) {
        self.0.dispose();
    }
}

/// An image file on disk, opened lazily.
pub struct FileImageSource {
    path: PathBuf,
    location: String,
    file: Option<File>,
}

impl FileImageSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            location: path.display().to_string(),
            path,
            file: None,
        }
    }
}

impl ImageSource for FileImageSource {
    fn location(&self) -> &str {
        &self.location
    }

    fn read_data(&mut self) -> io::Result<Vec<u8>> {
        let mut file = match self.file.take() {
            Some(file) => file,
            None => File::open(&self.path)?,
        };
        let mut data = Vec::new();
        let read = file.read_to_end(&mut data);
        self.file = Some(file);
        read?;
        Ok(data)
    }

    fn dispose(&mut self) {
        self.file = None;
    }
}

/// The image formats an embedded bitmap can come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Gif,
    Jpeg,
}

impl ImageKind {
    /// Guesses the kind from a file name's extension.
    pub fn guess(path: &std::path::Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "png" => Some(ImageKind::Png),
            "gif" => Some(ImageKind::Gif),
            "jpg" | "jpeg" => Some(ImageKind::Jpeg),
            _ => None,
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ImageKind::Png => "image/png",
            ImageKind::Gif => "image/gif",
            ImageKind::Jpeg => "image/jpeg",
        }
    }

    /// PNG and GIF images are stored as lossless bitmaps.
    pub fn is_lossless(self) -> bool {
        self != ImageKind::Jpeg
    }
}

/// How a bitmap fills a shape larger than itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillMode {
    Repeat,
    #[default]
    Clip,
    Scale,
}

/// Builds a DefineBitsJPEG2 tag from a JPEG image. The source is disposed
/// whether or not reading succeeds.
pub fn build_bits<S: ImageSource + ?Sized>(
    id: CharacterId,
    source: &mut S,
) -> Result<DefineBits, ImageError> {
    let mut guard = DisposeGuard(source);
    let location = guard.0.location().to_string();
    let jpeg_data = guard.0.read_data().map_err(|err| ImageError::Read {
        location: location.clone(),
        message: err.to_string(),
    })?;
    let (width, height) =
        jpeg::dimensions(&jpeg_data).ok_or(ImageError::InvalidJpeg { location })?;
    debug!("JPEG image {}: {}x{}, {} bytes", id, width, height, jpeg_data.len());
    Ok(DefineBits {
        id,
        jpeg_data,
        width,
        height,
    })
}

/// Premultiplies one `0xAARRGGBB` pixel into `[a, r, g, b]`. Color under
/// zero alpha is always written as zero.
pub fn premultiply(argb: u32) -> [u8; 4] {
    let alpha = (argb >> 24) & 0xFF;
    if alpha == 0 {
        return [0, 0, 0, 0];
    }
    let channel = |shift: u32| (((argb >> shift) & 0xFF) * alpha / 255) as u8;
    [alpha as u8, channel(16), channel(8), channel(0)]
}

/// Builds a DefineBitsLossless2 tag from ARGB pixels in row order.
pub fn build_lossless(
    id: CharacterId,
    argb: &[u32],
    width: u16,
    height: u16,
) -> Result<DefineBitsLossless, ImageError> {
    let expected = usize::from(width) * usize::from(height);
    if argb.len() != expected {
        return Err(ImageError::Dimensions {
            width: width.into(),
            height: height.into(),
            expected,
            found: argb.len(),
        });
    }
    let data = argb.iter().flat_map(|&pixel| premultiply(pixel)).collect();
    Ok(DefineBitsLossless {
        id,
        width,
        height,
        data,
    })
}

/// Decodes a PNG or GIF image into ARGB pixels.
pub fn decode_argb(bytes: &[u8]) -> Result<(Vec<u32>, u16, u16), ImageError> {
    let image = image::load_from_memory(bytes)?.to_rgba8();
    let (width, height) = image.dimensions();
    let (width, height) = match (u16::try_from(width), u16::try_from(height)) {
        (Ok(w), Ok(h)) => (w, h),
        _ => {
            return Err(ImageError::Unsupported(format!(
                "{}x{} is larger than a bitmap tag can hold",
                width, height
            )))
        }
    };
    let pixels = image
        .pixels()
        .map(|p| u32::from_be_bytes([p[3], p[0], p[1], p[2]]))
        .collect();
    Ok((pixels, width, height))
}

/// Reads and converts any supported image file into its bitmap tag.
pub fn build_image<S: ImageSource + ?Sized>(
    id: CharacterId,
    kind: ImageKind,
    source: &mut S,
) -> Result<Tag, ImageError> {
    if !kind.is_lossless() {
        return Ok(Tag::DefineBits(build_bits(id, source)?));
    }
    let mut guard = DisposeGuard(source);
    let location = guard.0.location().to_string();
    let bytes = guard.0.read_data().map_err(|err| ImageError::Read {
        location: location.clone(),
        message: err.to_string(),
    })?;
    let (pixels, width, height) = decode_argb(&bytes).map_err(|err| match err {
        ImageError::Decode(err) => ImageError::Read {
            location,
            message: err.to_string(),
        },
        other => other,
    })?;
    Ok(Tag::DefineBitsLossless(build_lossless(id, &pixels, width, height)?))
}

/// Builds a DefineShape4 filled with a bitmap, sized `width` by `height`
/// pixels. `bitmap_size` is the bitmap's own size in pixels.
pub fn build_image_shape(
    id: CharacterId,
    bitmap_id: CharacterId,
    bitmap_size: (u16, u16),
    width: f64,
    height: f64,
    mode: FillMode,
) -> Shape {
    let mut matrix = matrix::bitmap();
    if mode == FillMode::Scale && bitmap_size.0 > 0 && bitmap_size.1 > 0 {
        matrix = matrix::scale(
            width * TWIPS_PER_PIXEL / f64::from(bitmap_size.0),
            height * TWIPS_PER_PIXEL / f64::from(bitmap_size.1),
        );
    }
    let fill = FillStyle::Bitmap {
        id: bitmap_id,
        matrix,
        is_smoothed: true,
        is_repeating: mode == FillMode::Repeat,
    };
    let mut builder = ShapeBuilder::new();
    builder.set_fill(Some(fill));
    builder.process(&Path::rectangle(0.0, 0.0, width, height));
    let state = GraphicsState::default().with_version(ShapeVersion::DefineShape4);
    DefineShapeBuilder::from_builder(id, &state, builder)
}

/// Wraps a JPEG image into a one frame sprite: the bitmap, a shape filled
/// with it and the placement of that shape.
pub fn build_sprite<S: ImageSource + ?Sized>(
    ids: &mut Dictionary,
    name: &str,
    source: &mut S,
) -> Result<DefineSprite, ImageError> {
    let bits = build_bits(ids.allocate(), source)?;
    let shape = build_image_shape(
        ids.allocate(),
        bits.id,
        (bits.width, bits.height),
        f64::from(bits.width),
        f64::from(bits.height),
        FillMode::Clip,
    );
    let mut sprite = SpriteBuilder::new();
    let (shape_id, bounds) = (shape.id, shape.shape_bounds.clone());
    sprite.define(Tag::DefineBits(bits));
    sprite.define(Tag::DefineShape(Box::new(shape)));
    sprite.place(shape_id, &bounds, Some(Matrix::IDENTITY), Some(name));
    Ok(sprite.build(ids.allocate()))
}
