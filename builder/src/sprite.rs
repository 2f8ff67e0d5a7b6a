use tags::sprite::{DefineSprite, PlaceObject};
use tags::{rect, CharacterId, Matrix, RectExt, Rectangle, Tag};

/// Collects definitions and placements for a one frame sprite.
#[derive(Debug, Default)]
pub struct SpriteBuilder {
    tags: Vec<Tag>,
    depth: u16,
    bounds: Option<Rectangle>,
}

impl SpriteBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a definition the sprite's placements refer to.
    pub fn define(&mut self, tag: Tag) {
        self.tags.push(tag);
    }

    /// Places a character on the next free depth, starting at 1.
    /// `bounds` are the character's own bounds, moved by the matrix
    /// translation before they are added to the sprite's bounds.
    pub fn place(
        &mut self,
        character_id: CharacterId,
        bounds: &Rectangle,
        matrix: Option<Matrix>,
        name: Option<&str>,
    ) -> u16 {
        self.depth += 1;
        let placed = match &matrix {
            Some(matrix) => bounds.translate(matrix.tx.get(), matrix.ty.get()),
            None => bounds.clone(),
        };
        match self.bounds.as_mut() {
            Some(bounds) => bounds.union(&placed),
            None => self.bounds = Some(placed),
        }
        self.tags.push(Tag::PlaceObject(Box::new(PlaceObject {
            depth: self.depth,
            character_id: Some(character_id),
            matrix,
            name: name.map(str::to_string),
        })));
        self.depth
    }

    /// Union of everything placed so far.
    pub fn bounds(&self) -> Rectangle {
        self.bounds.clone().unwrap_or_else(|| rect(0, 0, 0, 0))
    }

    pub fn build(mut self, id: CharacterId) -> DefineSprite {
        self.tags.push(Tag::ShowFrame);
        DefineSprite {
            id,
            frame_count: 1,
            tags: self.tags,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tags::matrix::translate;

    #[test]
    fn depths_increase_and_bounds_follow_placements() {
        let mut sprite = SpriteBuilder::new();
        assert!(sprite.bounds().is_zero());
        assert_eq!(sprite.place(1, &rect(0, 100, 0, 50), None, None), 1);
        assert_eq!(sprite.place(2, &rect(0, 100, 0, 50), Some(translate(200, -20)), None), 2);
        assert_eq!(sprite.bounds(), rect(0, 300, -20, 50));

        let built = sprite.build(3);
        assert_eq!(built.frame_count, 1);
        assert_eq!(built.tags.len(), 3);
        assert_eq!(built.tags.last(), Some(&Tag::ShowFrame));
    }
}
