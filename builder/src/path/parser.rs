use super::Path;
use svgtypes::{PathParser, PathSegment};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathError {
    #[error("Invalid path data: {0}")]
    Syntax(String),
    #[error("Invalid path data: must start with a move command")]
    MissingMove,
    #[error("Invalid path data: arcs are not supported")]
    Arc,
}

/// Parses SVG/FXG path data into absolute path segments.
///
/// Commands may repeat implicitly, so `M 0 0 10 0 10 10` is a move followed
/// by two lines. Smooth curves (`T`, `S`) reflect the previous control
/// point when they follow a curve of the same kind.
pub fn parse(data: &str) -> Result<Path, PathError> {
    let mut path = Path::new();
    let mut current = (0.0, 0.0);
    let mut start = (0.0, 0.0);
    // Last control points, cleared by any segment of another kind.
    let mut quad_control: Option<(f64, f64)> = None;
    let mut cubic_control: Option<(f64, f64)> = None;

    for segment in PathParser::from(data) {
        let segment = segment.map_err(|err| PathError::Syntax(err.to_string()))?;
        if path.is_empty() && !matches!(segment, PathSegment::MoveTo { .. }) {
            return Err(PathError::MissingMove);
        }
        let (next_quad, next_cubic) = match segment {
            PathSegment::MoveTo { abs, x, y } => {
                current = point(abs, current, x, y);
                start = current;
                path.move_to(current.0, current.1);
                (None, None)
            }
            PathSegment::LineTo { abs, x, y } => {
                current = point(abs, current, x, y);
                path.line_to(current.0, current.1);
                (None, None)
            }
            PathSegment::HorizontalLineTo { abs, x } => {
                current.0 = if abs { x } else { current.0 + x };
                path.line_to(current.0, current.1);
                (None, None)
            }
            PathSegment::VerticalLineTo { abs, y } => {
                current.1 = if abs { y } else { current.1 + y };
                path.line_to(current.0, current.1);
                (None, None)
            }
            PathSegment::Quadratic { abs, x1, y1, x, y } => {
                let control = point(abs, current, x1, y1);
                current = point(abs, current, x, y);
                path.quad_to(control.0, control.1, current.0, current.1);
                (Some(control), None)
            }
            PathSegment::SmoothQuadratic { abs, x, y } => {
                let control = quad_control.map_or(current, |control| reflect(control, current));
                current = point(abs, current, x, y);
                path.quad_to(control.0, control.1, current.0, current.1);
                (Some(control), None)
            }
            PathSegment::CurveTo {
                abs,
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => {
                let control1 = point(abs, current, x1, y1);
                let control2 = point(abs, current, x2, y2);
                current = point(abs, current, x, y);
                path.cubic_to(control1.0, control1.1, control2.0, control2.1, current.0, current.1);
                (None, Some(control2))
            }
            PathSegment::SmoothCurveTo { abs, x2, y2, x, y } => {
                let control1 = cubic_control.map_or(current, |control| reflect(control, current));
                let control2 = point(abs, current, x2, y2);
                current = point(abs, current, x, y);
                path.cubic_to(control1.0, control1.1, control2.0, control2.1, current.0, current.1);
                (None, Some(control2))
            }
            PathSegment::ClosePath { .. } => {
                path.close();
                current = start;
                (None, None)
            }
            PathSegment::EllipticalArc { .. } => return Err(PathError::Arc),
        };
        quad_control = next_quad;
        cubic_control = next_cubic;
    }

    Ok(path)
}

fn point(abs: bool, current: (f64, f64), x: f64, y: f64) -> (f64, f64) {
    if abs {
        (x, y)
    } else {
        (current.0 + x, current.1 + y)
    }
}

fn reflect(point: (f64, f64), around: (f64, f64)) -> (f64, f64) {
    (2.0 * around.0 - point.0, 2.0 * around.1 - point.1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::Segment;
    use pretty_assertions::assert_eq;

    #[test]
    fn implicit_lines_after_move() {
        let path = parse("M0,0 10,0 10 10z").unwrap();
        assert_eq!(
            path.segments(),
            &[
                Segment::MoveTo { x: 0.0, y: 0.0 },
                Segment::LineTo { x: 10.0, y: 0.0 },
                Segment::LineTo { x: 10.0, y: 10.0 },
                Segment::Close,
            ]
        );
    }

    #[test]
    fn relative_commands_follow_the_pen() {
        let path = parse("m5 5 h10 v-5 l-5-5 Z m1 1 l2 0").unwrap();
        assert_eq!(
            path.segments(),
            &[
                Segment::MoveTo { x: 5.0, y: 5.0 },
                Segment::LineTo { x: 15.0, y: 5.0 },
                Segment::LineTo { x: 15.0, y: 0.0 },
                Segment::LineTo { x: 10.0, y: -5.0 },
                Segment::Close,
                Segment::MoveTo { x: 6.0, y: 6.0 },
                Segment::LineTo { x: 8.0, y: 6.0 },
            ]
        );
    }

    #[test]
    fn smooth_curves_reflect_control_points() {
        let path = parse("M0 0 Q10 10 20 0 T40 0 C50 10 60 10 70 0 S90 -10 100 0").unwrap();
        assert_eq!(
            path.segments()[2],
            Segment::QuadTo {
                cx: 30.0,
                cy: -10.0,
                x: 40.0,
                y: 0.0
            }
        );
        assert_eq!(
            path.segments()[4],
            Segment::CubicTo {
                c1x: 80.0,
                c1y: -10.0,
                c2x: 90.0,
                c2y: -10.0,
                x: 100.0,
                y: 0.0
            }
        );
    }

    #[test]
    fn smooth_curve_without_a_previous_curve_starts_at_the_pen() {
        let path = parse("M5 5 L10 10 T20 10").unwrap();
        assert_eq!(
            path.segments()[2],
            Segment::QuadTo {
                cx: 10.0,
                cy: 10.0,
                x: 20.0,
                y: 10.0
            }
        );
    }

    #[test]
    fn scientific_notation() {
        let path = parse("M1e1 -2.5E-1L.5.5").unwrap();
        assert_eq!(
            path.segments(),
            &[
                Segment::MoveTo { x: 10.0, y: -0.25 },
                Segment::LineTo { x: 0.5, y: 0.5 },
            ]
        );
    }

    #[test]
    fn invalid_data_is_rejected() {
        assert!(parse("L 10 10").is_err());
        assert!(matches!(parse("M 0 0 X 1"), Err(PathError::Syntax(_))));
        assert_eq!(parse("M0 0 A5 5 0 0 1 10 10"), Err(PathError::Arc));
        assert!(parse("").unwrap().is_empty());
    }
}
