use super::face::{FontFace, FontStyle, FsType};
use super::FontError;
use crate::path::Path;
use crate::shape::{shape_bounds, ShapeBuilder};
use log::debug;
use std::fs;
use std::path::PathBuf;
use tags::font::{GlyphEntry, EM_SQUARE};
use tags::twips::TWIPS_PER_PIXEL;
use ttf_parser::{name_id, Face, OutlineBuilder};

/// Locates font faces by family name or by file.
pub trait FontManager {
    /// Finds a face by family name and style. `Ok(None)` when no installed
    /// face matches.
    fn entry_from_system(
        &self,
        family: &str,
        style: FontStyle,
        use_twips: bool,
    ) -> Result<Option<Box<dyn FontFace>>, FontError>;

    /// Loads the face stored at `location`.
    fn entry_from_location(
        &self,
        location: &std::path::Path,
        style: FontStyle,
        use_twips: bool,
    ) -> Result<Option<Box<dyn FontFace>>, FontError>;
}

/// A TrueType or OpenType face, read with `ttf-parser`.
///
/// Only the raw font data is kept; the face tables are parsed again for
/// each glyph lookup.
pub struct TtfFontFace {
    data: Vec<u8>,
    index: u32,
    family: String,
    copyright: Option<String>,
    fs_type: Option<FsType>,
    bold: bool,
    italic: bool,
    ascent: i16,
    descent: i16,
    line_gap: i16,
    units_per_em: u16,
    first_char: u16,
    glyph_count: usize,
    use_twips: bool,
}

impl TtfFontFace {
    pub fn new(data: Vec<u8>, index: u32, use_twips: bool) -> Result<Self, ttf_parser::FaceParsingError> {
        let face = Face::parse(&data, index)?;
        let family = name(&face, name_id::FAMILY).unwrap_or_default();
        let copyright = name(&face, name_id::COPYRIGHT_NOTICE);
        let units_per_em = face.units_per_em();
        let scale = em_scale(units_per_em, use_twips);
        let metric = |value: f64| (value * scale).round().clamp(i16::MIN.into(), i16::MAX.into()) as i16;
        let first_char = (0..=u16::MAX)
            .find(|&code| char::from_u32(u32::from(code)).map_or(false, |c| face.glyph_index(c).is_some()))
            .unwrap_or(0);

        let fs_type = face.permissions().map(FsType::from);
        let (bold, italic) = (face.is_bold(), face.is_italic());
        let ascent = metric(f64::from(face.ascender()));
        let descent = metric(-f64::from(face.descender()));
        let line_gap = metric(f64::from(face.line_gap()));
        let glyph_count = usize::from(face.number_of_glyphs());

        Ok(Self {
            data,
            index,
            family,
            copyright,
            fs_type,
            bold,
            italic,
            ascent,
            descent,
            line_gap,
            units_per_em,
            first_char,
            glyph_count,
            use_twips,
        })
    }

    fn face(&self) -> Option<Face<'_>> {
        Face::parse(&self.data, self.index).ok()
    }
}

/// Font units to glyph units: the em square is 1024 units, scaled by
/// twenty again when glyphs are stored in twips.
fn em_scale(units_per_em: u16, use_twips: bool) -> f64 {
    let scale = f64::from(EM_SQUARE) / f64::from(units_per_em.max(1));
    if use_twips {
        scale * TWIPS_PER_PIXEL
    } else {
        scale
    }
}

fn name(face: &Face<'_>, id: u16) -> Option<String> {
    face.names()
        .into_iter()
        .filter(|name| name.name_id == id)
        .find_map(|name| name.to_string())
}

/// Collects an outline as a path in 1024 unit em space, y pointing down.
struct OutlineCollector {
    path: Path,
    scale: f64,
}

impl OutlineCollector {
    fn point(&self, x: f32, y: f32) -> (f64, f64) {
        (f64::from(x) * self.scale, -f64::from(y) * self.scale)
    }
}

impl OutlineBuilder for OutlineCollector {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.point(x, y);
        self.path.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.point(x, y);
        self.path.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (cx, cy) = self.point(x1, y1);
        let (x, y) = self.point(x, y);
        self.path.quad_to(cx, cy, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (c1x, c1y) = self.point(x1, y1);
        let (c2x, c2y) = self.point(x2, y2);
        let (x, y) = self.point(x, y);
        self.path.cubic_to(c1x, c1y, c2x, c2y, x, y);
    }

    fn close(&mut self) {
        self.path.close();
    }
}

impl FontFace for TtfFontFace {
    fn family(&self) -> &str {
        &self.family
    }

    fn copyright(&self) -> Option<&str> {
        self.copyright.as_deref()
    }

    fn fs_type(&self) -> Option<FsType> {
        self.fs_type
    }

    fn is_bold(&self) -> bool {
        self.bold
    }

    fn is_italic(&self) -> bool {
        self.italic
    }

    fn ascent(&self) -> i16 {
        self.ascent
    }

    fn descent(&self) -> i16 {
        self.descent
    }

    fn line_gap(&self) -> i16 {
        self.line_gap
    }

    fn point_size(&self) -> f64 {
        f64::from(self.units_per_em)
    }

    fn first_char(&self) -> u16 {
        self.first_char
    }

    fn glyph_count(&self) -> usize {
        self.glyph_count
    }

    fn glyph_entry(&self, code: u16) -> Option<GlyphEntry> {
        let face = self.face()?;
        let glyph = face.glyph_index(char::from_u32(u32::from(code))?)?;

        let mut outline = OutlineCollector {
            path: Path::new(),
            scale: em_scale(self.units_per_em, false),
        };
        // Glyphs without contours (spaces) still get an entry.
        face.outline_glyph(glyph, &mut outline);

        let mut builder = ShapeBuilder::glyph(if self.use_twips { TWIPS_PER_PIXEL } else { 1.0 });
        builder.process(&outline.path);
        let bounds = shape_bounds(builder.records(), &[]);

        let advance = f64::from(face.glyph_hor_advance(glyph).unwrap_or(0));
        let advance = (advance * em_scale(self.units_per_em, self.use_twips)) as i32;

        let mut entry = GlyphEntry::new(code, builder.into_records(), advance);
        entry.bounds = bounds;
        Some(entry)
    }
}

/// Resolves faces from TrueType and OpenType files in a list of
/// directories.
#[derive(Debug, Clone, Default)]
pub struct TtfFontManager {
    directories: Vec<PathBuf>,
}

const FONT_EXTENSIONS: [&str; 4] = ["ttf", "otf", "ttc", "otc"];

impl TtfFontManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// A manager searching the usual font directories of the platform.
    pub fn system() -> Self {
        let mut manager = Self::new();
        for directory in ["/usr/share/fonts", "/usr/local/share/fonts", "/Library/Fonts", "/System/Library/Fonts"] {
            manager.add_directory(directory);
        }
        if let Some(home) = std::env::var_os("HOME") {
            manager.add_directory(PathBuf::from(home).join(".fonts"));
        }
        if let Some(windir) = std::env::var_os("WINDIR") {
            manager.add_directory(PathBuf::from(windir).join("Fonts"));
        }
        manager
    }

    pub fn add_directory(&mut self, directory: impl Into<PathBuf>) {
        self.directories.push(directory.into());
    }

    fn font_files(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        let mut pending = self.directories.clone();
        while let Some(directory) = pending.pop() {
            let entries = match fs::read_dir(&directory) {
                Ok(entries) => entries,
                Err(_) => continue,
            };
            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_dir() {
                    pending.push(path);
                } else if is_font_file(&path) {
                    files.push(path);
                }
            }
        }
        files.sort();
        files
    }
}

fn is_font_file(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .map_or(false, |extension| {
            FONT_EXTENSIONS.contains(&extension.to_ascii_lowercase().as_str())
        })
}

impl FontManager for TtfFontManager {
    fn entry_from_system(
        &self,
        family: &str,
        style: FontStyle,
        use_twips: bool,
    ) -> Result<Option<Box<dyn FontFace>>, FontError> {
        let mut fallback = None;
        for file in self.font_files() {
            let data = match fs::read(&file) {
                Ok(data) => data,
                Err(err) => {
                    debug!("Skipping font file '{}': {}", file.display(), err);
                    continue;
                }
            };
            let count = ttf_parser::fonts_in_collection(&data).unwrap_or(1);
            for index in 0..count {
                let face = match Face::parse(&data, index) {
                    Ok(face) => face,
                    Err(_) => continue,
                };
                let matches_family = name(&face, name_id::FAMILY)
                    .map_or(false, |name| name.eq_ignore_ascii_case(family));
                if !matches_family {
                    continue;
                }
                if face.is_bold() == style.bold && face.is_italic() == style.italic {
                    debug!("Found font '{}' ({}) in '{}'", family, style, file.display());
                    return load(data, index, use_twips, &file).map(Some);
                }
                if fallback.is_none() {
                    fallback = Some((file.clone(), index));
                }
            }
        }
        match fallback {
            Some((file, index)) => {
                debug!(
                    "No '{}' face with {}, using '{}'",
                    family,
                    style,
                    file.display()
                );
                let data = fs::read(&file).map_err(|err| FontError::Load {
                    location: file.display().to_string(),
                    message: err.to_string(),
                })?;
                load(data, index, use_twips, &file).map(Some)
            }
            None => Ok(None),
        }
    }

    fn entry_from_location(
        &self,
        location: &std::path::Path,
        _style: FontStyle,
        use_twips: bool,
    ) -> Result<Option<Box<dyn FontFace>>, FontError> {
        if !location.exists() {
            return Ok(None);
        }
        let data = fs::read(location).map_err(|err| FontError::Load {
            location: location.display().to_string(),
            message: err.to_string(),
        })?;
        load(data, 0, use_twips, location).map(Some)
    }
}

fn load(
    data: Vec<u8>,
    index: u32,
    use_twips: bool,
    location: &std::path::Path,
) -> Result<Box<dyn FontFace>, FontError> {
    let face = TtfFontFace::new(data, index, use_twips).map_err(|err| FontError::Load {
        location: location.display().to_string(),
        message: err.to_string(),
    })?;
    Ok(Box::new(face))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn em_scale_targets_the_glyph_em_square() {
        assert_eq!(em_scale(2048, false), 0.5);
        assert_eq!(em_scale(2048, true), 10.0);
        assert_eq!(em_scale(1000, false), 1.024);
    }

    #[test]
    fn outlines_are_flipped_and_scaled() {
        let mut outline = OutlineCollector {
            path: Path::new(),
            scale: 0.5,
        };
        outline.move_to(0.0, 0.0);
        outline.line_to(100.0, 200.0);
        outline.close();
        assert_eq!(
            outline.path,
            Path::parse("M0 0 L50 -100 Z").expect("valid path")
        );
    }

    #[test]
    fn only_font_files_are_scanned() {
        assert!(is_font_file(std::path::Path::new("/fonts/Vera.TTF")));
        assert!(is_font_file(std::path::Path::new("fonts/Noto.otc")));
        assert!(!is_font_file(std::path::Path::new("fonts/readme.txt")));
        assert!(!is_font_file(std::path::Path::new("fonts/ttf")));
    }

    #[test]
    fn missing_files_are_not_found() {
        let manager = TtfFontManager::new();
        let face = manager
            .entry_from_location(std::path::Path::new("/nonexistent/font.ttf"), FontStyle::PLAIN, false)
            .expect("no error for a missing file");
        assert!(face.is_none());
    }

    #[test]
    fn garbage_is_a_load_error() {
        assert!(matches!(
            load(vec![1, 2, 3], 0, false, std::path::Path::new("junk.ttf")),
            Err(FontError::Load { .. })
        ));
    }
}
