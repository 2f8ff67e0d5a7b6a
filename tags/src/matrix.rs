use crate::twips::{to_twips, TWIPS_PER_PIXEL};
use swf::{Fixed16, Matrix, Twips};

/// A translation, in twips.
pub fn translate(x: i32, y: i32) -> Matrix {
    Matrix {
        tx: Twips::new(x),
        ty: Twips::new(y),
        ..Matrix::IDENTITY
    }
}

pub fn scale(scale_x: f64, scale_y: f64) -> Matrix {
    Matrix {
        a: Fixed16::from_f64(scale_x),
        d: Fixed16::from_f64(scale_y),
        ..Matrix::IDENTITY
    }
}

/// The matrix bitmap fills need to map image pixels onto twips.
pub fn bitmap() -> Matrix {
    scale(TWIPS_PER_PIXEL, TWIPS_PER_PIXEL)
}

/// Builds a matrix from an affine transform `[a c tx; b d ty]` with the
/// translation in pixels.
pub fn from_affine(a: f64, b: f64, c: f64, d: f64, tx: f64, ty: f64) -> Matrix {
    Matrix {
        a: Fixed16::from_f64(a),
        b: Fixed16::from_f64(b),
        c: Fixed16::from_f64(c),
        d: Fixed16::from_f64(d),
        tx: Twips::new(to_twips(tx)),
        ty: Twips::new(to_twips(ty)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn affine_translation_is_in_twips() {
        assert_eq!(from_affine(1.0, 0.0, 0.0, 1.0, 0.0, 0.0), Matrix::IDENTITY);
        assert_eq!(from_affine(1.0, 0.0, 0.0, 1.0, 5.0, -2.5), translate(100, -50));
        assert_eq!(from_affine(2.0, 0.0, 0.0, 0.5, 0.0, 0.0), scale(2.0, 0.5));
    }

    #[test]
    fn bitmap_matrix_scales_by_twenty() {
        let matrix = bitmap();
        assert_eq!(matrix.a, Fixed16::from_f64(20.0));
        assert_eq!(matrix.d, Fixed16::from_f64(20.0));
        assert_eq!(matrix.b, Fixed16::ZERO);
        assert_eq!(matrix.tx, Twips::ZERO);
    }
}
