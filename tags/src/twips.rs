use swf::{Rectangle, Twips};

pub const TWIPS_PER_PIXEL: f64 = 20.0;

/// The largest magnitude a RECT field can carry (31 signed bits).
pub const MAX_RECT_COORDINATE: i32 = (1 << 30) - 1;

/// Converts a pixel value into twips, rounding half away from zero.
pub fn to_twips(pixels: f64) -> i32 {
    (pixels * TWIPS_PER_PIXEL).round() as i32
}

/// Converts a pixel value into twips, falling back to zero when the result
/// cannot be represented in a RECT (overflow, infinities or NaN).
pub fn to_twips_clamped(pixels: f64) -> i32 {
    let twips = (pixels * TWIPS_PER_PIXEL).round();
    if twips.is_finite() && twips.abs() <= f64::from(MAX_RECT_COORDINATE) {
        twips as i32
    } else {
        0
    }
}

/// A rectangle from its edges in twips.
pub fn rect(x_min: i32, x_max: i32, y_min: i32, y_max: i32) -> Rectangle {
    Rectangle {
        x_min: Twips::new(x_min),
        x_max: Twips::new(x_max),
        y_min: Twips::new(y_min),
        y_max: Twips::new(y_max),
    }
}

/// A rectangle with its top left corner at the origin, sized in pixels.
pub fn rect_from_size(width: f64, height: f64) -> Rectangle {
    rect(0, to_twips(width), 0, to_twips(height))
}

/// A degenerate rectangle covering a single point.
pub fn rect_from_point(x: i32, y: i32) -> Rectangle {
    rect(x, x, y, y)
}

/// Bounds arithmetic on twips rectangles.
pub trait RectExt {
    fn is_zero(&self) -> bool;

    fn width(&self) -> i32;

    fn height(&self) -> i32;

    /// Grows the rectangle so that it contains `(x, y)`.
    fn extend(&mut self, x: i32, y: i32);

    /// Grows the rectangle so that it contains `other`.
    fn union(&mut self, other: &Rectangle);

    /// Pushes every edge outwards by `amount` twips.
    fn inflate(&self, amount: i32) -> Rectangle;

    fn translate(&self, dx: i32, dy: i32) -> Rectangle;

    fn contains(&self, x: i32, y: i32) -> bool;
}

impl RectExt for Rectangle {
    fn is_zero(&self) -> bool {
        *self == rect(0, 0, 0, 0)
    }

    fn width(&self) -> i32 {
        self.x_max.get() - self.x_min.get()
    }

    fn height(&self) -> i32 {
        self.y_max.get() - self.y_min.get()
    }

    fn extend(&mut self, x: i32, y: i32) {
        if x < self.x_min.get() {
            self.x_min = Twips::new(x);
        }
        if x > self.x_max.get() {
            self.x_max = Twips::new(x);
        }
        if y < self.y_min.get() {
            self.y_min = Twips::new(y);
        }
        if y > self.y_max.get() {
            self.y_max = Twips::new(y);
        }
    }

    fn union(&mut self, other: &Rectangle) {
        self.extend(other.x_min.get(), other.y_min.get());
        self.extend(other.x_max.get(), other.y_max.get());
    }

    fn inflate(&self, amount: i32) -> Rectangle {
        rect(
            self.x_min.get() - amount,
            self.x_max.get() + amount,
            self.y_min.get() - amount,
            self.y_max.get() + amount,
        )
    }

    fn translate(&self, dx: i32, dy: i32) -> Rectangle {
        rect(
            self.x_min.get() + dx,
            self.x_max.get() + dx,
            self.y_min.get() + dy,
            self.y_max.get() + dy,
        )
    }

    fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x_min.get() && x <= self.x_max.get() && y >= self.y_min.get() && y <= self.y_max.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn twips_round_half_away_from_zero() {
        assert_eq!(to_twips(1.0), 20);
        assert_eq!(to_twips(0.125), 3);
        assert_eq!(to_twips(-0.125), -3);
        assert_eq!(to_twips(0.625), 13);
        assert_eq!(to_twips(-0.625), -13);
        assert_eq!(to_twips(12.34), 247);
    }

    #[test]
    fn clamped_twips_fall_back_to_zero() {
        assert_eq!(to_twips_clamped(10.0), 200);
        assert_eq!(to_twips_clamped(1.0e12), 0);
        assert_eq!(to_twips_clamped(-1.0e12), 0);
        assert_eq!(to_twips_clamped(f64::NAN), 0);
        assert_eq!(to_twips_clamped(f64::INFINITY), 0);
    }

    #[test]
    fn rect_only_grows() {
        let mut bounds = rect_from_point(10, 10);
        bounds.extend(-5, 20);
        bounds.extend(0, 0);
        assert_eq!(bounds, rect(-5, 10, 0, 20));
        bounds.union(&rect(0, 40, 5, 5));
        assert_eq!(bounds, rect(-5, 40, 0, 20));
        assert_eq!(bounds.width(), 45);
        assert_eq!(bounds.height(), 20);
        assert!(bounds.contains(0, 0));
        assert!(!bounds.contains(41, 0));
    }

    #[test]
    fn zero_rect() {
        assert!(rect(0, 0, 0, 0).is_zero());
        assert!(!rect_from_size(1.0, 1.0).is_zero());
        assert_eq!(rect_from_size(2.5, 1.0), rect(0, 50, 0, 20));
        assert_eq!(rect(0, 10, 0, 10).inflate(5).translate(5, 0), rect(0, 20, -5, 15));
    }
}
