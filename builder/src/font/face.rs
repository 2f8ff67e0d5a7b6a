use std::fmt;
use tags::font::GlyphEntry;

/// Embedding permissions from a font's OS/2 `fsType` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FsType {
    pub installable: bool,
    pub editable: bool,
    pub preview_and_print: bool,
    pub no_embedding: bool,
}

impl FsType {
    pub const INSTALLABLE: FsType = FsType {
        installable: true,
        editable: false,
        preview_and_print: false,
        no_embedding: false,
    };

    /// Decodes the raw `fsType` bits.
    pub fn from_bits(bits: u16) -> Self {
        let usage = bits & 0x000F;
        Self {
            installable: usage == 0,
            no_embedding: usage & 0x0002 != 0,
            preview_and_print: usage & 0x0004 != 0,
            editable: usage & 0x0008 != 0,
        }
    }

    /// Whether the font may be embedded in a movie at all.
    pub fn usable(&self) -> bool {
        self.installable || self.editable || self.preview_and_print
    }
}

impl From<ttf_parser::Permissions> for FsType {
    fn from(permissions: ttf_parser::Permissions) -> Self {
        use ttf_parser::Permissions;
        match permissions {
            Permissions::Installable => FsType::from_bits(0x0000),
            Permissions::Restricted => FsType::from_bits(0x0002),
            Permissions::PreviewAndPrint => FsType::from_bits(0x0004),
            Permissions::Editable => FsType::from_bits(0x0008),
        }
    }
}

/// Weight and posture a face is looked up with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FontStyle {
    pub bold: bool,
    pub italic: bool,
}

impl FontStyle {
    pub const PLAIN: FontStyle = FontStyle {
        bold: false,
        italic: false,
    };
    pub const BOLD: FontStyle = FontStyle {
        bold: true,
        italic: false,
    };
    pub const ITALIC: FontStyle = FontStyle {
        bold: false,
        italic: true,
    };
    pub const BOLD_ITALIC: FontStyle = FontStyle {
        bold: true,
        italic: true,
    };

    /// Bit 0 is bold, bit 1 italic.
    pub fn from_bits(bits: u8) -> Self {
        Self {
            bold: bits & 1 != 0,
            italic: bits & 2 != 0,
        }
    }
}

impl fmt::Display for FontStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.bold, self.italic) {
            (false, false) => write!(f, "plain weight and style"),
            (true, false) => write!(f, "bold weight"),
            (false, true) => write!(f, "italic style"),
            (true, true) => write!(f, "bold weight and italic style"),
        }
    }
}

/// A single face of a font family.
///
/// Glyph entries are produced on demand and owned by the caller. Outlines
/// and advances are already scaled to the em square of the font tag the
/// face was opened for (1024 units, or 20480 for twips glyphs), with the y
/// axis pointing down. Metrics use the same scale.
pub trait FontFace {
    fn family(&self) -> &str;

    fn copyright(&self) -> Option<&str>;

    fn fs_type(&self) -> Option<FsType>;

    fn is_bold(&self) -> bool;

    fn is_italic(&self) -> bool;

    fn ascent(&self) -> i16;

    fn descent(&self) -> i16;

    fn line_gap(&self) -> i16;

    /// The size outlines were taken at, in the face's own units.
    fn point_size(&self) -> f64;

    /// Lowest code point the face maps to a glyph.
    fn first_char(&self) -> u16;

    fn glyph_count(&self) -> usize;

    /// The glyph for a BMP code point, or `None` when the face has none.
    fn glyph_entry(&self, code: u16) -> Option<GlyphEntry>;
}
