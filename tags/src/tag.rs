use crate::font::{DefineFont, FontVersion};
use crate::image::{DefineBits, DefineBitsLossless};
use crate::shape::Shape;
use crate::sprite::{DefineSprite, PlaceObject};
use crate::text::{DefineEditText, DefineText, TextVersion};
use swf::{CharacterId, TagCode};

/// A finished tag. Built once by a builder and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    DefineShape(Box<Shape>),
    DefineBits(DefineBits),
    DefineBitsLossless(DefineBitsLossless),
    DefineFont(Box<DefineFont>),
    DefineText(DefineText),
    DefineEditText(Box<DefineEditText>),
    PlaceObject(Box<PlaceObject>),
    DefineSprite(DefineSprite),
    ShowFrame,
}

impl Tag {
    /// The code of the record this tag is written as. A font's zone and
    /// license records are written separately after it.
    pub fn code(&self) -> TagCode {
        match self {
            Tag::DefineShape(shape) => match shape.version {
                1 => TagCode::DefineShape,
                2 => TagCode::DefineShape2,
                3 => TagCode::DefineShape3,
                _ => TagCode::DefineShape4,
            },
            Tag::DefineBits(_) => TagCode::DefineBitsJpeg2,
            Tag::DefineBitsLossless(_) => TagCode::DefineBitsLossless2,
            Tag::DefineFont(font) => match font.version {
                FontVersion::DefineFont2 => TagCode::DefineFont2,
                FontVersion::DefineFont3 => TagCode::DefineFont3,
            },
            Tag::DefineText(text) => match text.version {
                TextVersion::DefineText => TagCode::DefineText,
                TextVersion::DefineText2 => TagCode::DefineText2,
            },
            Tag::DefineEditText(_) => TagCode::DefineEditText,
            Tag::PlaceObject(_) => TagCode::PlaceObject2,
            Tag::DefineSprite(_) => TagCode::DefineSprite,
            Tag::ShowFrame => TagCode::ShowFrame,
        }
    }

    /// The character id this tag defines, if any.
    pub fn character_id(&self) -> Option<CharacterId> {
        match self {
            Tag::DefineShape(shape) => Some(shape.id),
            Tag::DefineBits(bits) => Some(bits.id),
            Tag::DefineBitsLossless(bits) => Some(bits.id),
            Tag::DefineFont(font) => Some(font.id),
            Tag::DefineText(text) => Some(text.id),
            Tag::DefineEditText(text) => Some(text.id),
            Tag::DefineSprite(sprite) => Some(sprite.id),
            Tag::PlaceObject(_) | Tag::ShowFrame => None,
        }
    }

    /// Definition tags may not appear inside a sprite's timeline.
    pub fn is_definition(&self) -> bool {
        self.character_id().is_some()
    }
}
