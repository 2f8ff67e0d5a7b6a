use swf::Color;

pub const BLACK: Color = rgb(0x000000);
pub const WHITE: Color = rgb(0xFFFFFF);

/// An opaque color from `0xRRGGBB`.
pub const fn rgb(rgb: u32) -> Color {
    argb(0xFF00_0000 | rgb)
}

/// A color from `0xAARRGGBB`.
pub const fn argb(argb: u32) -> Color {
    Color {
        r: (argb >> 16) as u8,
        g: (argb >> 8) as u8,
        b: argb as u8,
        a: (argb >> 24) as u8,
    }
}

/// Replaces the alpha channel with `alpha` in the 0.0 to 1.0 range.
pub fn with_alpha(color: Color, alpha: f64) -> Color {
    Color {
        a: (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
        ..color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn channels_from_packed_values() {
        let color = argb(0x80112233);
        assert_eq!((color.a, color.r, color.g, color.b), (0x80, 0x11, 0x22, 0x33));
        assert_eq!(rgb(0xAABBCC).a, 0xFF);
        assert_eq!(with_alpha(WHITE, 0.5).a, 128);
    }
}
