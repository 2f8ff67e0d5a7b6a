use tags::color::BLACK;
use tags::shape::{FillStyle, LineStyle, ShapeVersion};
use tags::{to_twips, Color, Twips};

/// Stroke settings. The width is in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub width: f64,
    pub color: Color,
}

impl Stroke {
    pub fn new(width: f64, color: Color) -> Self {
        Self { width, color }
    }

    /// Round caps and joins; widths beyond a line style's 16 bits saturate.
    pub fn line_style(&self) -> LineStyle {
        let width = to_twips(self.width).clamp(0, i32::from(u16::MAX));
        LineStyle::new()
            .with_width(Twips::new(width))
            .with_color(self.color)
    }
}

impl Default for Stroke {
    fn default() -> Self {
        Self::new(1.0, BLACK)
    }
}

/// The paint state a path is drawn with.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphicsState {
    pub paint: FillStyle,
    pub stroke: Stroke,
    pub version: ShapeVersion,
}

impl GraphicsState {
    pub fn new(paint: FillStyle, stroke: Stroke) -> Self {
        Self {
            paint,
            stroke,
            ..Default::default()
        }
    }

    pub fn with_version(mut self, version: ShapeVersion) -> Self {
        self.version = version;
        self
    }
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            paint: FillStyle::Color(BLACK),
            stroke: Stroke::default(),
            version: ShapeVersion::DefineShape3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn stroke_widths_saturate() {
        assert_eq!(Stroke::new(2.5, BLACK).line_style().width(), Twips::new(50));
        assert_eq!(Stroke::new(1.0e6, BLACK).line_style().width(), Twips::new(65535));
        assert_eq!(Stroke::new(-1.0, BLACK).line_style().width(), Twips::new(0));
    }
}
