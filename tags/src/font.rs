pub use swf::{FontAlignZone, FontFlag, FontLayout, FontThickness, Glyph, KerningRecord, Language};
use crate::twips::rect;
use swf::{CharacterId, Rectangle, ShapeRecord, TagCode};

/// One character of a font: its outline, advance and optional hinting data.
///
/// `advance` is in the font's em units (1024 per em, or 20480 for fonts
/// that store twips). `index` is the position in the built glyph table and
/// stays `None` until the owning font has been built.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphEntry {
    pub code: u16,
    pub records: Vec<ShapeRecord>,
    pub advance: i32,
    pub bounds: Rectangle,
    pub zone_record: Option<ZoneRecord>,
    pub index: Option<u16>,
}

impl GlyphEntry {
    pub fn new(code: u16, records: Vec<ShapeRecord>, advance: i32) -> Self {
        Self {
            code,
            records,
            advance,
            bounds: rect(0, 0, 0, 0),
            zone_record: None,
            index: None,
        }
    }

    pub fn character(&self) -> Option<char> {
        char::from_u32(u32::from(self.code))
    }

    /// The glyph table entry, without a layout bounds entry. Advances
    /// outside the i16 range saturate.
    pub fn to_glyph(&self) -> Glyph {
        Glyph {
            shape_records: self.records.clone(),
            code: self.code,
            advance: self.advance.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16,
            bounds: None,
        }
    }
}

/// Alignment zones ("FlashType" hints) for one glyph: one horizontal and
/// one vertical zone, in glyph units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ZoneRecord {
    pub x: ZoneData,
    pub y: ZoneData,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ZoneData {
    pub coordinate: f32,
    pub range: f32,
}

impl ZoneRecord {
    /// The zone as stored in DefineFontAlignZones, as half floats.
    pub fn to_align_zone(self) -> FontAlignZone {
        FontAlignZone {
            left: f16_bits(self.x.coordinate) as i16,
            width: f16_bits(self.x.range) as i16,
            bottom: f16_bits(self.y.coordinate) as i16,
            height: f16_bits(self.y.range) as i16,
        }
    }
}

/// Converts to IEEE 754 half precision bits. Values beyond the half range
/// become infinities.
pub fn f16_bits(value: f32) -> u16 {
    let bits = value.to_bits();
    let sign = ((bits >> 16) & 0x8000) as u16;
    let exponent = ((bits >> 23) & 0xFF) as i32;
    let mantissa = bits & 0x007F_FFFF;

    if exponent == 0xFF {
        let nan = if mantissa != 0 { 0x0200 } else { 0 };
        return sign | 0x7C00 | nan;
    }
    let exponent = exponent - 127 + 15;
    if exponent >= 0x1F {
        return sign | 0x7C00;
    }
    if exponent <= 0 {
        // Subnormal, or too small for a half.
        if exponent < -10 {
            return sign;
        }
        let mantissa = mantissa | 0x0080_0000;
        let shift = (14 - exponent) as u32;
        let half = mantissa >> shift;
        let round = (mantissa >> (shift - 1)) & 1;
        return sign | (half + round) as u16;
    }
    let half = ((exponent as u32) << 10) | (mantissa >> 13);
    let round = (mantissa >> 12) & 1;
    sign | (half + round) as u16
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontVersion {
    DefineFont2,
    DefineFont3,
}

impl FontVersion {
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            c if c == TagCode::DefineFont2 as u16 => Some(FontVersion::DefineFont2),
            c if c == TagCode::DefineFont3 as u16 => Some(FontVersion::DefineFont3),
            _ => None,
        }
    }

    /// The number stored in `Font::version`.
    pub fn number(self) -> u8 {
        match self {
            FontVersion::DefineFont2 => 2,
            FontVersion::DefineFont3 => 3,
        }
    }

    /// DefineFont3 glyphs are stored in twips, twenty times the em square.
    pub fn uses_twips(self) -> bool {
        self == FontVersion::DefineFont3
    }

    pub fn em_square(self) -> i32 {
        if self.uses_twips() {
            EM_SQUARE * 20
        } else {
            EM_SQUARE
        }
    }
}

/// Logical units per em of SWF glyph outlines.
pub const EM_SQUARE: i32 = 1024;

/// Maps a language code of the font header onto its value.
pub fn language(code: u8) -> Language {
    match code {
        1 => Language::Latin,
        2 => Language::Japanese,
        3 => Language::Korean,
        4 => Language::SimplifiedChinese,
        5 => Language::TraditionalChinese,
        _ => Language::Unknown,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DefineFontAlignZones {
    pub thickness: FontThickness,
    pub zones: Vec<FontAlignZone>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DefineFontName {
    pub name: Option<String>,
    pub copyright: Option<String>,
}

/// A DefineFont2 or DefineFont3 tag with its glyph table in code point
/// order. The zone and license tags are written right after it.
#[derive(Debug, Clone, PartialEq)]
pub struct DefineFont {
    pub version: FontVersion,
    pub id: CharacterId,
    pub name: String,
    pub language: Language,
    pub flags: FontFlag,
    pub glyphs: Vec<Glyph>,
    pub layout: Option<FontLayout>,
    pub zones: Option<DefineFontAlignZones>,
    pub license: Option<DefineFontName>,
}

impl DefineFont {
    pub fn new(version: FontVersion, id: CharacterId, name: &str) -> Self {
        Self {
            version,
            id,
            name: name.to_string(),
            language: Language::Unknown,
            flags: FontFlag::empty(),
            glyphs: Vec::new(),
            layout: None,
            zones: None,
            license: None,
        }
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    pub fn codes(&self) -> Vec<u16> {
        self.glyphs.iter().map(|glyph| glyph.code).collect()
    }
}
