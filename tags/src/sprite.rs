use crate::tag::Tag;
use swf::{CharacterId, Matrix};

/// A PlaceObject2 tag.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceObject {
    pub depth: u16,
    pub character_id: Option<CharacterId>,
    pub matrix: Option<Matrix>,
    pub name: Option<String>,
}

impl PlaceObject {
    pub fn new(character_id: CharacterId, depth: u16) -> Self {
        Self {
            depth,
            character_id: Some(character_id),
            matrix: None,
            name: None,
        }
    }
}

/// A movie clip: its own timeline of control tags. Definition tags kept in
/// `tags` are written to the enclosing movie ahead of the sprite.
#[derive(Debug, Clone, PartialEq)]
pub struct DefineSprite {
    pub id: CharacterId,
    pub frame_count: u16,
    pub tags: Vec<Tag>,
}
