mod face;
mod manager;
mod zones;

pub use face::{FontFace, FontStyle, FsType};
pub use manager::{FontManager, TtfFontFace, TtfFontManager};
pub use zones::{OutlineZoneRecordBuilder, ZoneRecordBuilder};

use log::{debug, warn};
use std::collections::btree_map::{BTreeMap, Entry};
use std::ops::RangeInclusive;
use tags::font::{
    language, DefineFont, DefineFontAlignZones, DefineFontName, FontFlag, FontLayout, FontThickness, FontVersion,
    GlyphEntry,
};
use tags::{rect, CharacterId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FontError {
    #[error("No font manager provided. Cannot build font.")]
    NoFontManager,
    #[error("Cannot build DefineFont for SWF tag code {0}")]
    NotSupported(u16),
    #[error("Font for alias '{alias}' with {style} was not found {}", lookup(.family, .location))]
    NotFound {
        alias: String,
        family: Option<String>,
        style: FontStyle,
        location: Option<String>,
    },
    #[error("Error loading font '{location}': {message}")]
    Load { location: String, message: String },
    #[error("Invalid unicode range '{0}'")]
    InvalidUnicodeRange(String),
}

fn lookup(family: &Option<String>, location: &Option<String>) -> String {
    match (location, family) {
        (Some(location), _) => format!("at: {}", location),
        (None, Some(family)) => format!("by family name '{}'", family),
        (None, None) => String::new(),
    }
}

/// How a font tag is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontConfig {
    /// Write ascent, descent, leading and the advance and bounds tables.
    pub has_layout: bool,
    /// Request alignment zones. Only honoured for faces that have glyphs
    /// for `z`, `Z`, `l` and `L`.
    pub flash_type: bool,
    /// Attach a DefineFontName record when the face carries license info.
    pub use_license_tag: bool,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            has_layout: true,
            flash_type: false,
            use_license_tag: true,
        }
    }
}

/// Characters a face needs for alignment zones to be generated.
const FLASH_TYPE_CHARS: [char; 4] = ['z', 'Z', 'l', 'L'];

/// Builds a DefineFont2 or DefineFont3 tag from the glyphs of a face.
///
/// Glyphs are kept in code point order; adding a character that is
/// already present is only a lookup. The space character is always added.
pub struct FontBuilder {
    version: FontVersion,
    alias: String,
    config: FontConfig,
    flash_type: bool,
    language: u8,
    face: Box<dyn FontFace>,
    zone_builder: Option<Box<dyn ZoneRecordBuilder>>,
    glyphs: BTreeMap<u16, GlyphEntry>,
    id: Option<CharacterId>,
}

impl FontBuilder {
    /// A builder for `face`, with alignment zones derived from glyph
    /// outlines.
    pub fn new(code: u16, face: Box<dyn FontFace>, alias: &str, config: FontConfig) -> Result<Self, FontError> {
        Self::with_zone_builder(code, face, alias, config, Some(Box::new(OutlineZoneRecordBuilder)))
    }

    /// Without a zone builder alignment zones are never generated.
    pub fn with_zone_builder(
        code: u16,
        face: Box<dyn FontFace>,
        alias: &str,
        config: FontConfig,
        zone_builder: Option<Box<dyn ZoneRecordBuilder>>,
    ) -> Result<Self, FontError> {
        let version = FontVersion::from_code(code).ok_or(FontError::NotSupported(code))?;
        debug!("Initializing font '{}' as '{}'", face.family(), alias);

        let mut flash_type = config.flash_type
            && FLASH_TYPE_CHARS
                .iter()
                .all(|&c| face.glyph_entry(c as u16).is_some());
        if flash_type && zone_builder.is_none() {
            flash_type = false;
        }
        if config.flash_type && !flash_type {
            debug!("Alignment zones disabled for '{}'", alias);
        }

        let mut builder = Self {
            version,
            alias: alias.to_string(),
            config,
            flash_type,
            language: 0,
            face,
            zone_builder: if flash_type { zone_builder } else { None },
            glyphs: BTreeMap::new(),
            id: None,
        };
        if config.has_layout {
            debug!(
                "\tBold: {}, Italic: {}, Ascent: {}, Descent: {}, Leading: {}",
                builder.face.is_bold(),
                builder.face.is_italic(),
                builder.face.ascent(),
                builder.face.descent(),
                builder.face.line_gap()
            );
        }
        builder.add_char(' ');
        Ok(builder)
    }

    /// Resolves the face by family name through a font manager.
    pub fn from_manager(
        code: u16,
        manager: Option<&dyn FontManager>,
        alias: &str,
        family: &str,
        style: FontStyle,
        config: FontConfig,
    ) -> Result<Self, FontError> {
        let version = FontVersion::from_code(code).ok_or(FontError::NotSupported(code))?;
        let manager = manager.ok_or(FontError::NoFontManager)?;
        let face = manager
            .entry_from_system(family, style, version.uses_twips())?
            .ok_or_else(|| FontError::NotFound {
                alias: alias.to_string(),
                family: Some(family.to_string()),
                style,
                location: None,
            })?;
        Self::new(code, face, alias, config)
    }

    /// Loads the face from a font file through a font manager.
    pub fn from_location(
        code: u16,
        manager: Option<&dyn FontManager>,
        alias: &str,
        location: &std::path::Path,
        style: FontStyle,
        config: FontConfig,
    ) -> Result<Self, FontError> {
        let version = FontVersion::from_code(code).ok_or(FontError::NotSupported(code))?;
        let manager = manager.ok_or(FontError::NoFontManager)?;
        let face = manager
            .entry_from_location(location, style, version.uses_twips())?
            .ok_or_else(|| FontError::NotFound {
                alias: alias.to_string(),
                family: None,
                style,
                location: Some(location.display().to_string()),
            })?;
        Self::new(code, face, alias, config)
    }

    /// Adds a character from the default face. Characters outside the
    /// basic multilingual plane cannot be stored and are ignored.
    pub fn add_char(&mut self, c: char) -> Option<&GlyphEntry> {
        let code = u16::try_from(u32::from(c)).ok()?;
        self.add_code(None, code)
    }

    /// Adds a character from another face of the same family.
    pub fn add_char_from(&mut self, face: &dyn FontFace, c: char) -> Option<&GlyphEntry> {
        let code = u16::try_from(u32::from(c)).ok()?;
        self.add_code(Some(face), code)
    }

    fn add_code(&mut self, face: Option<&dyn FontFace>, code: u16) -> Option<&GlyphEntry> {
        let entry = match self.glyphs.entry(code) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(vacant) => {
                let face = match face {
                    Some(face) => face,
                    None => &*self.face,
                };
                vacant.insert(face.glyph_entry(code)?)
            }
        };
        if let Some(zone_builder) = &self.zone_builder {
            if entry.zone_record.is_none() {
                entry.zone_record = Some(zone_builder.build(entry));
            }
        }
        Some(entry)
    }

    /// Adds every character in `chars` the face supports.
    pub fn add_chars(&mut self, chars: impl IntoIterator<Item = char>) {
        for c in chars {
            self.add_char(c);
        }
    }

    /// Adds `count` supported characters, starting at `from` and skipping
    /// the code points the face has no glyph for.
    pub fn add_charset(&mut self, from: u16, count: usize) {
        let mut remaining = count;
        let mut code = from;
        while remaining > 0 && code < u16::MAX {
            if self.add_code(None, code).is_some() {
                remaining -= 1;
            }
            code += 1;
        }
    }

    /// Adds the supported characters of every range.
    pub fn add_ranges(&mut self, ranges: &[RangeInclusive<u32>]) {
        for range in ranges {
            let start = (*range.start()).min(u32::from(u16::MAX)) as u16;
            let end = (*range.end()).min(u32::from(u16::MAX)) as u16;
            for code in start..=end {
                self.add_code(None, code);
            }
        }
    }

    /// Adds as many characters as the face has glyphs, starting from its
    /// first mapped code point.
    pub fn add_all_chars(&mut self) {
        let (first, count) = (self.face.first_char(), self.face.glyph_count());
        debug!("\tAdding {} chars, starting from {}", count, first);
        self.add_charset(first, count);
    }

    /// Sets the language code; only 0 to 5 are defined.
    pub fn set_language(&mut self, code: u8) {
        if code < 6 {
            self.language = code;
        }
    }

    pub fn glyph(&self, c: char) -> Option<&GlyphEntry> {
        let code = u16::try_from(u32::from(c)).ok()?;
        self.glyphs.get(&code)
    }

    /// Position of a glyph in the built glyph table. Glyphs added after the
    /// font was built have no index.
    pub fn glyph_index(&self, c: char) -> Option<u16> {
        self.glyph(c)?.index
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn version(&self) -> FontVersion {
        self.version
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn flash_type(&self) -> bool {
        self.flash_type
    }

    pub fn font_height(&self) -> f64 {
        self.face.point_size()
    }

    pub fn name(&self) -> &str {
        self.face.family()
    }

    pub fn copyright(&self) -> Option<&str> {
        self.face.copyright()
    }

    pub fn fs_type(&self) -> Option<FsType> {
        self.face.fs_type()
    }

    /// The character id of the last built tag.
    pub fn id(&self) -> Option<CharacterId> {
        self.id
    }

    /// Builds the font tag and stamps each glyph entry with its position in
    /// the glyph table.
    pub fn build(&mut self, id: CharacterId) -> DefineFont {
        let count = self.glyphs.len();
        debug!("Building font '{}' with {} characters.", self.alias, count);

        let mut font = DefineFont::new(self.version, id, &self.alias);
        font.language = language(self.language);
        font.flags.set(FontFlag::IS_BOLD, self.face.is_bold());
        font.flags.set(FontFlag::IS_ITALIC, self.face.is_italic());
        font.flags.set(FontFlag::HAS_LAYOUT, self.config.has_layout);
        let wide_codes = self.version == FontVersion::DefineFont3 || self.glyphs.keys().any(|&code| code > 0xFF);
        font.flags.set(FontFlag::HAS_WIDE_CODES, wide_codes);

        let mut zones = (self.flash_type && self.version == FontVersion::DefineFont3).then(|| {
            DefineFontAlignZones {
                thickness: FontThickness::Medium,
                zones: Vec::with_capacity(count),
            }
        });
        let layout = self.config.has_layout.then(|| FontLayout {
            ascent: self.face.ascent().max(0) as u16,
            descent: self.face.descent().max(0) as u16,
            leading: self.face.line_gap(),
            kerning: Vec::new(),
        });
        if layout.is_none() {
            warn!("Font '{}' built without layout information", self.alias);
        }

        for (index, entry) in self.glyphs.values_mut().enumerate() {
            if let Some(zones) = zones.as_mut() {
                zones
                    .zones
                    .push(entry.zone_record.unwrap_or_default().to_align_zone());
            }
            let mut glyph = entry.to_glyph();
            if layout.is_some() {
                // Players ignore the bounds table but it has to be present.
                glyph.bounds = Some(rect(0, 0, 0, 0));
            }
            font.glyphs.push(glyph);
            entry.index = Some(index as u16);
        }
        font.layout = layout;
        font.zones = zones;

        let restricted = self.face.fs_type().map_or(false, |fs_type| !fs_type.installable);
        let name = Some(self.face.family()).filter(|name| !name.is_empty());
        if self.config.use_license_tag && (restricted || self.face.copyright().is_some() || name.is_some()) {
            font.license = Some(DefineFontName {
                name: name.map(str::to_string),
                copyright: self.face.copyright().map(str::to_string),
            });
        }

        self.id = Some(id);
        font
    }
}

/// Parses CSS style unicode ranges such as `U+0020-007E, U+00A?, U+20AC`.
/// A `?` matches any hex digit; the high end of a range may repeat the
/// `U+` prefix.
pub fn parse_unicode_ranges(value: &str) -> Result<Vec<RangeInclusive<u32>>, FontError> {
    let value = value.replace([';', '\n', '\r', '\x0C'], " ");
    let mut ranges = Vec::new();
    for element in value.split(',') {
        let element = element.trim().to_ascii_uppercase();
        if element.is_empty() {
            continue;
        }
        let range = element
            .strip_prefix("U+")
            .map(str::trim)
            .ok_or_else(|| FontError::InvalidUnicodeRange(element.clone()))?;
        let (low, high) = if range.find('?').map_or(false, |at| at > 0) {
            (range.replace('?', "0"), range.replace('?', "F"))
        } else if let Some((low, high)) = range.split_once('-').filter(|(low, _)| !low.is_empty()) {
            let high = high.trim();
            let high = high.strip_prefix("U+").unwrap_or(high).trim();
            (low.trim().to_string(), high.to_string())
        } else if range.len() <= 8 {
            (range.to_string(), range.to_string())
        } else {
            return Err(FontError::InvalidUnicodeRange(range.to_string()));
        };
        let parse = |digits: &str| {
            u32::from_str_radix(digits, 16).map_err(|_| FontError::InvalidUnicodeRange(range.to_string()))
        };
        ranges.push(parse(&low)?..=parse(&high)?);
    }
    Ok(ranges)
}
