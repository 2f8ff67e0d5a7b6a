pub mod font;
pub mod graphics;
pub mod image;
mod jpeg;
pub mod path;
pub mod shape;
pub mod sprite;
pub mod text;

pub use crate::font::{FontBuilder, FontConfig, FontError};
pub use crate::graphics::{GraphicsState, Stroke};
pub use crate::image::ImageError;
pub use crate::path::{Path, PathError};
pub use crate::shape::{DefineShapeBuilder, ShapeBuilder};
pub use crate::sprite::SpriteBuilder;
pub use crate::text::{EditTextBuilder, TextBuilder};
