use crate::graphics::GraphicsState;
use crate::path::{Path, Segment};
use tags::shape::{
    curved, no_change, straight, style_change, FillStyle, LineStyle, Shape, ShapeFlag, ShapeRecord,
    ShapeStyles, StyleChangeData,
};
use tags::twips::{rect, rect_from_point, TWIPS_PER_PIXEL};
use tags::{CharacterId, RectExt, Rectangle, Twips};

/// Longest straight edge written in one record, in twips.
const MAX_EDGE_SIZE: i32 = 65535;

/// Distance under which a subpath counts as closed, in path units.
const EPSILON: f64 = 0.00001;

/// Which side of an edge the current fill is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillSide {
    /// `fill_style_0`
    Left,
    /// `fill_style_1`
    Right,
}

/// The style tables and records of a shape that has no id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledShape {
    pub styles: ShapeStyles,
    pub records: Vec<ShapeRecord>,
}

/// Turns paths into a shape record stream.
///
/// Coordinates are converted from path units with `scale` (20 for pixels
/// to twips) and rounded half away from zero. Deltas are always taken
/// between rounded absolute positions so no error accumulates.
pub struct ShapeBuilder {
    scale: f64,
    fill_side: FillSide,
    fill_styles: Vec<FillStyle>,
    line_styles: Vec<LineStyle>,
    fill: u32,
    line: u32,
    emitted_fill: u32,
    emitted_line: u32,
    records: Vec<ShapeRecord>,
    pen: (i32, i32),
    current: (f64, f64),
    start: (f64, f64),
    in_subpath: bool,
}

impl Default for ShapeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// 1-based index of `style` in `styles`, appending it when it is new.
fn style_index<T: PartialEq>(styles: &mut Vec<T>, style: T) -> u32 {
    let index = match styles.iter().position(|existing| *existing == style) {
        Some(index) => index,
        None => {
            styles.push(style);
            styles.len() - 1
        }
    };
    index as u32 + 1
}

impl ShapeBuilder {
    pub fn new() -> Self {
        Self::with_scale(TWIPS_PER_PIXEL, FillSide::Left)
    }

    pub fn with_scale(scale: f64, fill_side: FillSide) -> Self {
        Self {
            scale,
            fill_side,
            fill_styles: Vec::new(),
            line_styles: Vec::new(),
            fill: 0,
            line: 0,
            emitted_fill: 0,
            emitted_line: 0,
            records: Vec::new(),
            pen: (0, 0),
            current: (0.0, 0.0),
            start: (0.0, 0.0),
            in_subpath: false,
        }
    }

    /// A builder for font glyphs: outlines are filled with the implicit
    /// style 1 on the right side and no line style is ever set.
    pub fn glyph(scale: f64) -> Self {
        let mut builder = Self::with_scale(scale, FillSide::Right);
        builder.fill = 1;
        builder
    }

    /// Sets the fill used by the following subpaths. Equal styles share
    /// one entry in the style table.
    pub fn set_fill(&mut self, fill: Option<FillStyle>) {
        self.fill = match fill {
            Some(fill) => style_index(&mut self.fill_styles, fill),
            None => 0,
        };
    }

    pub fn set_line(&mut self, line: Option<LineStyle>) {
        self.line = match line {
            Some(line) => style_index(&mut self.line_styles, line),
            None => 0,
        };
    }

    pub fn records(&self) -> &[ShapeRecord] {
        &self.records
    }

    pub fn process(&mut self, path: &Path) {
        for segment in path.segments() {
            match *segment {
                Segment::MoveTo { x, y } => {
                    self.close_implicitly();
                    self.move_to(x, y);
                }
                Segment::LineTo { x, y } => {
                    self.ensure_subpath();
                    self.straight_to(x, y);
                }
                Segment::QuadTo { cx, cy, x, y } => {
                    self.ensure_subpath();
                    self.curve_to(cx, cy, x, y);
                }
                Segment::CubicTo {
                    c1x,
                    c1y,
                    c2x,
                    c2y,
                    x,
                    y,
                } => {
                    self.ensure_subpath();
                    let quads = cubic_to_quadratic(self.current, (c1x, c1y), (c2x, c2y), (x, y));
                    for (cx, cy, ax, ay) in quads {
                        self.curve_to(cx, cy, ax, ay);
                    }
                }
                Segment::Close => {
                    if self.in_subpath {
                        let (x, y) = self.start;
                        self.straight_to(x, y);
                    }
                }
            }
        }
        self.close_implicitly();
    }

    /// Appends another path into the same record stream.
    pub fn join(&mut self, path: &Path) {
        self.process(path);
    }

    pub fn build(self) -> (StyledShape, Rectangle) {
        let bounds = shape_bounds(&self.records, &self.line_styles);
        let shape = StyledShape {
            styles: ShapeStyles {
                fill_styles: self.fill_styles,
                line_styles: self.line_styles,
            },
            records: self.records,
        };
        (shape, bounds)
    }

    /// The bare record stream, as stored in a font's glyph table.
    pub fn into_records(self) -> Vec<ShapeRecord> {
        self.records
    }

    fn to_units(&self, value: f64) -> i32 {
        (value * self.scale).round() as i32
    }

    fn ensure_subpath(&mut self) {
        if !self.in_subpath {
            let (x, y) = self.current;
            self.move_to(x, y);
        }
    }

    fn move_to(&mut self, x: f64, y: f64) {
        let to = (self.to_units(x), self.to_units(y));
        let mut data = StyleChangeData {
            move_to: Some((Twips::new(to.0), Twips::new(to.1))),
            ..no_change()
        };
        self.apply_styles(&mut data);
        self.records.push(style_change(data));
        self.pen = to;
        self.current = (x, y);
        self.start = (x, y);
        self.in_subpath = true;
    }

    fn apply_styles(&mut self, data: &mut StyleChangeData) {
        if self.fill != self.emitted_fill {
            match self.fill_side {
                FillSide::Left => data.fill_style_0 = Some(self.fill),
                FillSide::Right => data.fill_style_1 = Some(self.fill),
            }
            self.emitted_fill = self.fill;
        }
        if self.line != self.emitted_line {
            data.line_style = Some(self.line);
            self.emitted_line = self.line;
        }
    }

    /// A filled subpath left open is closed with a straight edge. When the
    /// shape is also stroked that edge is drawn without a line style.
    fn close_implicitly(&mut self) {
        if !self.in_subpath || self.fill == 0 {
            return;
        }
        let (sx, sy) = self.start;
        let (cx, cy) = self.current;
        if (cx - sx).abs() <= EPSILON && (cy - sy).abs() <= EPSILON {
            return;
        }
        if self.line != 0 {
            self.records.push(style_change(StyleChangeData {
                line_style: Some(0),
                ..no_change()
            }));
            self.emitted_line = 0;
        }
        self.straight_to(sx, sy);
    }

    fn straight_to(&mut self, x: f64, y: f64) {
        let to = (self.to_units(x), self.to_units(y));
        let dx = to.0.saturating_sub(self.pen.0);
        let dy = to.1.saturating_sub(self.pen.1);
        self.current = (x, y);
        if dx == 0 && dy == 0 {
            return;
        }
        self.records.extend(straight_edges(dx, dy));
        self.pen = to;
    }

    fn curve_to(&mut self, cx: f64, cy: f64, x: f64, y: f64) {
        let control = (self.to_units(cx), self.to_units(cy));
        let anchor = (self.to_units(x), self.to_units(y));
        self.records.push(curved(
            control.0.saturating_sub(self.pen.0),
            control.1.saturating_sub(self.pen.1),
            anchor.0.saturating_sub(control.0),
            anchor.1.saturating_sub(control.1),
        ));
        self.pen = anchor;
        self.current = (x, y);
    }
}

/// Splits a straight edge whose dominant axis is longer than a record can
/// hold into equal pieces. The last piece absorbs the remainder.
fn straight_edges(dx: i32, dy: i32) -> Vec<ShapeRecord> {
    let longest = dx.saturating_abs().max(dy.saturating_abs());
    if longest <= MAX_EDGE_SIZE {
        return vec![straight(dx, dy)];
    }
    let count = longest / MAX_EDGE_SIZE + 1;
    let (step_x, step_y) = (dx / count, dy / count);
    let mut edges = vec![straight(step_x, step_y); count as usize - 1];
    edges.push(straight(dx - step_x * (count - 1), dy - step_y * (count - 1)));
    edges
}

/// Approximates a cubic Bézier curve with four quadratic curves, returned
/// as `(control_x, control_y, anchor_x, anchor_y)` in path units.
pub fn cubic_to_quadratic(
    start: (f64, f64),
    control1: (f64, f64),
    control2: (f64, f64),
    anchor: (f64, f64),
) -> [(f64, f64, f64, f64); 4] {
    let lerp = |a: (f64, f64), b: (f64, f64), t: f64| (a.0 + (b.0 - a.0) * t, a.1 + (b.1 - a.1) * t);
    let mid = |a: (f64, f64), b: (f64, f64)| ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0);

    let pa = lerp(start, control1, 3.0 / 4.0);
    let pb = lerp(anchor, control2, 3.0 / 4.0);
    let dx = (anchor.0 - start.0) / 16.0;
    let dy = (anchor.1 - start.1) / 16.0;

    let c1 = lerp(start, control1, 3.0 / 8.0);
    let c2 = lerp(pa, pb, 3.0 / 8.0);
    let c2 = (c2.0 - dx, c2.1 - dy);
    let c3 = lerp(pb, pa, 3.0 / 8.0);
    let c3 = (c3.0 + dx, c3.1 + dy);
    let c4 = lerp(anchor, control2, 3.0 / 8.0);

    let a1 = mid(c1, c2);
    let a2 = mid(pa, pb);
    let a3 = mid(c3, c4);

    [
        (c1.0, c1.1, a1.0, a1.1),
        (c2.0, c2.1, a2.0, a2.1),
        (c3.0, c3.1, a3.0, a3.1),
        (c4.0, c4.1, anchor.0, anchor.1),
    ]
}

/// Computes the bounds of a record stream in twips.
///
/// Replays the records keeping the pen position: the first move sets all
/// four extremes and every later pen position can only grow the box. When
/// line styles are present the box grows by half the widest stroke, which
/// is never taken as less than one pixel.
pub fn shape_bounds(records: &[ShapeRecord], line_styles: &[LineStyle]) -> Rectangle {
    let mut bounds: Option<Rectangle> = None;
    let (mut x, mut y) = (0i32, 0i32);
    for record in records {
        match record {
            ShapeRecord::StyleChange(data) => match data.move_to {
                Some((move_x, move_y)) => {
                    x = move_x.get();
                    y = move_y.get();
                }
                None => continue,
            },
            ShapeRecord::StraightEdge { delta_x, delta_y } => {
                if bounds.is_none() {
                    bounds = Some(rect_from_point(x, y));
                }
                x = x.saturating_add(delta_x.get());
                y = y.saturating_add(delta_y.get());
            }
            ShapeRecord::CurvedEdge {
                control_delta_x,
                control_delta_y,
                anchor_delta_x,
                anchor_delta_y,
            } => {
                if bounds.is_none() {
                    bounds = Some(rect_from_point(x, y));
                }
                x = x.saturating_add(control_delta_x.get()).saturating_add(anchor_delta_x.get());
                y = y.saturating_add(control_delta_y.get()).saturating_add(anchor_delta_y.get());
            }
        }
        match bounds.as_mut() {
            Some(bounds) => bounds.extend(x, y),
            None => bounds = Some(rect_from_point(x, y)),
        }
    }

    let bounds = bounds.unwrap_or_else(|| rect(0, 0, 0, 0));
    match line_styles.iter().map(|style| style.width().get()).max() {
        Some(width) => {
            let width = width.max(TWIPS_PER_PIXEL as i32);
            bounds.inflate((f64::from(width) * 0.5).round() as i32)
        }
        None => bounds,
    }
}

/// Builds DefineShape tags from a path and the paint state.
pub struct DefineShapeBuilder;

impl DefineShapeBuilder {
    /// Draws `path` with the state's paint when `fill` is set and with its
    /// stroke when `stroke` is set.
    pub fn build(
        id: CharacterId,
        path: &Path,
        state: &GraphicsState,
        stroke: bool,
        fill: bool,
    ) -> Shape {
        let mut builder = ShapeBuilder::new();
        if fill {
            builder.set_fill(Some(state.paint.clone()));
        }
        if stroke {
            builder.set_line(Some(state.stroke.line_style()));
        }
        builder.process(path);
        Self::from_builder(id, state, builder)
    }

    /// Finishes a shape that was composed from several paths.
    pub fn from_builder(id: CharacterId, state: &GraphicsState, builder: ShapeBuilder) -> Shape {
        let (shape, bounds) = builder.build();
        let edge_bounds = shape_bounds(&shape.records, &[]);
        let flags = if shape.styles.line_styles.is_empty() {
            ShapeFlag::empty()
        } else {
            ShapeFlag::HAS_SCALING_STROKES
        };
        Shape {
            version: state.version.number(),
            id,
            shape_bounds: bounds,
            edge_bounds,
            flags,
            styles: shape.styles,
            shape: shape.records,
        }
    }
}
