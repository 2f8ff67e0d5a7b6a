pub use swf::{FillStyle, LineStyle, Shape, ShapeFlag, ShapeRecord, ShapeStyles, StyleChangeData};
use swf::Twips;

/// A style change that changes nothing. Style indices are 1-based, 0
/// clears the style.
pub fn no_change() -> StyleChangeData {
    StyleChangeData {
        move_to: None,
        fill_style_0: None,
        fill_style_1: None,
        line_style: None,
        new_styles: None,
    }
}

pub fn style_change(data: StyleChangeData) -> ShapeRecord {
    ShapeRecord::StyleChange(Box::new(data))
}

/// A style change record that only moves the pen to an absolute position.
pub fn move_to(x: i32, y: i32) -> ShapeRecord {
    style_change(StyleChangeData {
        move_to: Some((Twips::new(x), Twips::new(y))),
        ..no_change()
    })
}

pub fn straight(delta_x: i32, delta_y: i32) -> ShapeRecord {
    ShapeRecord::StraightEdge {
        delta_x: Twips::new(delta_x),
        delta_y: Twips::new(delta_y),
    }
}

pub fn curved(control_delta_x: i32, control_delta_y: i32, anchor_delta_x: i32, anchor_delta_y: i32) -> ShapeRecord {
    ShapeRecord::CurvedEdge {
        control_delta_x: Twips::new(control_delta_x),
        control_delta_y: Twips::new(control_delta_y),
        anchor_delta_x: Twips::new(anchor_delta_x),
        anchor_delta_y: Twips::new(anchor_delta_y),
    }
}

pub fn is_edge(record: &ShapeRecord) -> bool {
    !matches!(record, ShapeRecord::StyleChange(_))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeVersion {
    DefineShape,
    DefineShape2,
    DefineShape3,
    DefineShape4,
}

impl ShapeVersion {
    /// The number stored in `Shape::version`.
    pub fn number(self) -> u8 {
        match self {
            ShapeVersion::DefineShape => 1,
            ShapeVersion::DefineShape2 => 2,
            ShapeVersion::DefineShape3 => 3,
            ShapeVersion::DefineShape4 => 4,
        }
    }

    /// DefineShape3 and later store colors with alpha.
    pub fn has_alpha(self) -> bool {
        matches!(self, ShapeVersion::DefineShape3 | ShapeVersion::DefineShape4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn record_helpers() {
        assert!(is_edge(&straight(1, 0)));
        assert!(is_edge(&curved(1, 1, 1, -1)));
        assert!(!is_edge(&move_to(0, 0)));
        match move_to(20, -40) {
            ShapeRecord::StyleChange(data) => {
                assert_eq!(data.move_to, Some((Twips::new(20), Twips::new(-40))));
                assert_eq!(data.line_style, None);
            }
            _ => panic!("expected a style change"),
        }
        assert_eq!(ShapeVersion::DefineShape4.number(), 4);
        assert!(!ShapeVersion::DefineShape2.has_alpha());
    }
}
