pub mod parser;

pub use parser::PathError;

/// One drawing command of a path, with absolute coordinates in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    MoveTo {
        x: f64,
        y: f64,
    },
    LineTo {
        x: f64,
        y: f64,
    },
    QuadTo {
        cx: f64,
        cy: f64,
        x: f64,
        y: f64,
    },
    CubicTo {
        c1x: f64,
        c1y: f64,
        c2x: f64,
        c2y: f64,
        x: f64,
        y: f64,
    },
    Close,
}

/// A vector path made of one or more subpaths.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single straight line.
    pub fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        let mut path = Self::new();
        path.move_to(x1, y1);
        path.line_to(x2, y2);
        path
    }

    /// An axis aligned rectangle, drawn clockwise from its top left corner.
    pub fn rectangle(x: f64, y: f64, width: f64, height: f64) -> Self {
        let mut path = Self::new();
        path.move_to(x, y);
        path.line_to(x + width, y);
        path.line_to(x + width, y + height);
        path.line_to(x, y + height);
        path.line_to(x, y);
        path
    }

    /// Parses SVG style path data.
    pub fn parse(data: &str) -> Result<Self, PathError> {
        parser::parse(data)
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.segments.push(Segment::MoveTo { x, y });
    }

    pub fn line_to(&mut self, x: f64, y: f64) {
        self.segments.push(Segment::LineTo { x, y });
    }

    pub fn quad_to(&mut self, cx: f64, cy: f64, x: f64, y: f64) {
        self.segments.push(Segment::QuadTo { cx, cy, x, y });
    }

    pub fn cubic_to(&mut self, c1x: f64, c1y: f64, c2x: f64, c2y: f64, x: f64, y: f64) {
        self.segments.push(Segment::CubicTo {
            c1x,
            c1y,
            c2x,
            c2y,
            x,
            y,
        });
    }

    pub fn close(&mut self) {
        self.segments.push(Segment::Close);
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Appends every segment of `other`.
    pub fn extend(&mut self, other: &Path) {
        self.segments.extend_from_slice(&other.segments);
    }
}
