pub mod color;
pub mod font;
pub mod image;
pub mod matrix;
pub mod shape;
pub mod sprite;
pub mod tag;
pub mod text;
pub mod twips;

pub use crate::tag::Tag;
pub use crate::twips::{rect, to_twips, RectExt};
pub use swf::{CharacterId, Color, Fixed16, Matrix, Rectangle, TagCode, Twips};

/// Hands out character ids for the tags of one movie.
/// Ids start at 1; 0 is never a valid character.
#[derive(Debug, Clone)]
pub struct Dictionary {
    next_id: CharacterId,
}

impl Dictionary {
    pub fn new() -> Self {
        Self { next_id: 1 }
    }

    /// Allocates the next free character id.
    pub fn allocate(&mut self) -> CharacterId {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Number of ids handed out so far.
    pub fn len(&self) -> usize {
        usize::from(self.next_id) - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::Dictionary;

    #[test]
    fn dictionary_ids_start_at_one() {
        let mut dict = Dictionary::new();
        assert!(dict.is_empty());
        assert_eq!(dict.allocate(), 1);
        assert_eq!(dict.allocate(), 2);
        assert_eq!(dict.len(), 2);
    }
}
