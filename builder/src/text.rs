use crate::font::FontBuilder;
use log::warn;
use tags::text::{
    DefineEditText, DefineText, EditTextFlags, GlyphRecord, TextAlign, TextLayout, TextRecord, TextVersion,
};
use tags::twips::to_twips_clamped;
use tags::{rect, to_twips, CharacterId, Color, Matrix, RectExt, Rectangle, Twips};

/// A box in pixels: top left corner and size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextBounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl TextBounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Converts to twips. Coordinates a RECT cannot hold become zero.
    pub fn to_rect(&self) -> Rectangle {
        rect(
            to_twips_clamped(self.x),
            to_twips_clamped(self.x + self.width),
            to_twips_clamped(self.y),
            to_twips_clamped(self.y + self.height),
        )
    }
}

fn height_twips(height: f64) -> u16 {
    to_twips(height).clamp(0, i32::from(u16::MAX)) as u16
}

/// Zero offsets are left out of the record.
fn offset_twips(offset: f64) -> Option<Twips> {
    let twips = to_twips(offset).clamp(i32::from(i16::MIN), i32::from(i16::MAX));
    (twips != 0).then(|| Twips::new(twips))
}

fn empty_layout() -> TextLayout {
    TextLayout {
        align: TextAlign::Left,
        left_margin: Twips::new(0),
        right_margin: Twips::new(0),
        indent: Twips::new(0),
        leading: Twips::new(0),
    }
}

/// Lays out lines of text against a built font.
pub struct TextBuilder {
    version: TextVersion,
    records: Vec<TextRecord>,
    bounds: Option<Rectangle>,
}

impl Default for TextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBuilder {
    /// DefineText, with RGB colors.
    pub fn new() -> Self {
        Self {
            version: TextVersion::DefineText,
            records: Vec::new(),
            bounds: None,
        }
    }

    /// DefineText2, with RGBA colors.
    pub fn with_alpha() -> Self {
        Self {
            version: TextVersion::DefineText2,
            ..Self::new()
        }
    }

    /// Adds one record per line of `text`. Layout stops at the first empty
    /// line. The text bounds grow by the widest line and the height of
    /// every line laid out.
    pub fn add(
        &mut self,
        font: &FontBuilder,
        height: f64,
        text: &str,
        color: Option<Color>,
        x_offset: f64,
        y_offset: f64,
    ) {
        if let Some((width, lines)) = self.layout(font, height, text, color, x_offset, y_offset) {
            let size = i32::from(height_twips(height));
            self.grow(rect(0, width, 0, lines as i32 * size));
        }
    }

    /// Like [`TextBuilder::add`], with bounds measured by the caller.
    #[allow(clippy::too_many_arguments)]
    pub fn add_with_bounds(
        &mut self,
        font: &FontBuilder,
        height: f64,
        text: &str,
        color: Option<Color>,
        x_offset: f64,
        y_offset: f64,
        bounds: TextBounds,
    ) {
        if self
            .layout(font, height, text, color, x_offset, y_offset)
            .is_some()
        {
            self.grow(bounds.to_rect());
        }
    }

    fn grow(&mut self, area: Rectangle) {
        match self.bounds.as_mut() {
            Some(bounds) => bounds.union(&area),
            None => self.bounds = Some(area),
        }
    }

    /// Returns the widest line in twips and the number of lines laid out,
    /// or `None` when the font has not been built yet.
    fn layout(
        &mut self,
        font: &FontBuilder,
        height: f64,
        text: &str,
        color: Option<Color>,
        x_offset: f64,
        y_offset: f64,
    ) -> Option<(i32, usize)> {
        let font_id = match font.id() {
            Some(id) => id,
            None => {
                warn!("Font '{}' has not been built, text skipped", font.alias());
                return None;
            }
        };
        let size = height_twips(height);
        let em_square = i64::from(font.version().em_square());

        let mut widest = 0;
        let mut count = 0;
        for (line, content) in text.lines().enumerate() {
            // An empty record crashes the player.
            if content.is_empty() {
                break;
            }
            let mut glyphs = Vec::with_capacity(content.len());
            for c in content.chars() {
                let glyph = match font.glyph(c) {
                    Some(glyph) => glyph,
                    None => {
                        warn!("Character '{}' is not in font '{}'", c, font.alias());
                        continue;
                    }
                };
                let index = match glyph.index {
                    Some(index) => index,
                    None => {
                        warn!(
                            "Character '{}' was added to font '{}' after it was built, skipped",
                            c,
                            font.alias()
                        );
                        continue;
                    }
                };
                let advance = i64::from(glyph.advance) * i64::from(size) / em_square;
                glyphs.push(GlyphRecord {
                    index: u32::from(index),
                    advance: advance as i32,
                });
            }
            if glyphs.is_empty() {
                continue;
            }
            widest = widest.max(glyphs.iter().map(|glyph| glyph.advance).sum::<i32>());
            count = line + 1;
            self.records.push(TextRecord {
                font_id: Some(font_id),
                height: Some(Twips::new(i32::from(size))),
                color,
                x_offset: offset_twips(x_offset),
                y_offset: offset_twips(y_offset + height * line as f64),
                glyphs,
            });
        }
        Some((widest, count))
    }

    pub fn bounds(&self) -> Rectangle {
        self.bounds.clone().unwrap_or_else(|| rect(0, 0, 0, 0))
    }

    pub fn build(self, id: CharacterId) -> DefineText {
        DefineText {
            version: self.version,
            id,
            bounds: self.bounds.unwrap_or_else(|| rect(0, 0, 0, 0)),
            matrix: Matrix::IDENTITY,
            records: self.records,
        }
    }
}

/// Builds a DefineEditText tag.
#[derive(Debug, Clone)]
pub struct EditTextBuilder {
    bounds: Rectangle,
    flags: EditTextFlags,
    font_id: Option<CharacterId>,
    height: Option<u16>,
    color: Option<Color>,
    max_length: Option<u16>,
    layout: Option<TextLayout>,
    variable_name: String,
    initial_text: Option<String>,
}

impl EditTextBuilder {
    pub fn new(bounds: TextBounds) -> Self {
        Self {
            bounds: bounds.to_rect(),
            flags: EditTextFlags::default(),
            font_id: None,
            height: None,
            color: None,
            max_length: None,
            layout: None,
            variable_name: String::new(),
            initial_text: None,
        }
    }

    /// Renders with the embedded outlines of a built font.
    pub fn font(mut self, font: &FontBuilder, height: f64) -> Self {
        match font.id() {
            Some(id) => {
                self.font_id = Some(id);
                self.height = Some(height_twips(height));
                self.flags.use_outlines = true;
            }
            None => warn!("Font '{}' has not been built, edit text uses a device font", font.alias()),
        }
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn max_length(mut self, max_length: u16) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn align(mut self, align: TextAlign) -> Self {
        self.layout.get_or_insert_with(empty_layout).align = align;
        self
    }

    /// Margins and indent in pixels, leading in pixels.
    pub fn margins(mut self, left: f64, right: f64, indent: f64, leading: f64) -> Self {
        let layout = self.layout.get_or_insert_with(empty_layout);
        layout.left_margin = Twips::new(i32::from(height_twips(left)));
        layout.right_margin = Twips::new(i32::from(height_twips(right)));
        layout.indent = Twips::new(i32::from(height_twips(indent)));
        layout.leading = offset_twips(leading).unwrap_or_else(|| Twips::new(0));
        self
    }

    pub fn variable_name(mut self, name: &str) -> Self {
        self.variable_name = name.to_string();
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.initial_text = Some(text.to_string());
        self
    }

    pub fn html(mut self, html: bool) -> Self {
        self.flags.html = html;
        self
    }

    pub fn word_wrap(mut self, word_wrap: bool) -> Self {
        self.flags.word_wrap = word_wrap;
        self
    }

    pub fn multiline(mut self, multiline: bool) -> Self {
        self.flags.multiline = multiline;
        self
    }

    pub fn password(mut self, password: bool) -> Self {
        self.flags.password = password;
        self
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.flags.read_only = read_only;
        self
    }

    pub fn selectable(mut self, selectable: bool) -> Self {
        self.flags.no_select = !selectable;
        self
    }

    pub fn border(mut self, border: bool) -> Self {
        self.flags.border = border;
        self
    }

    pub fn auto_size(mut self, auto_size: bool) -> Self {
        self.flags.auto_size = auto_size;
        self
    }

    pub fn build(self, id: CharacterId) -> DefineEditText {
        DefineEditText {
            id,
            bounds: self.bounds,
            flags: self.flags,
            font_id: self.font_id,
            height: self.height,
            color: self.color,
            max_length: self.max_length,
            layout: self.layout,
            variable_name: self.variable_name,
            initial_text: self.initial_text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::tests::SquareFace;
    use crate::font::FontConfig;
    use pretty_assertions::assert_eq;
    use tags::color::{rgb, BLACK, WHITE};
    use tags::twips::MAX_RECT_COORDINATE;

    fn built_font(chars: &str) -> FontBuilder {
        let mut font = FontBuilder::new(48, Box::new(SquareFace::new(chars)), "Body", FontConfig::default())
            .expect("DefineFont2");
        font.add_chars(chars.chars());
        font.build(7);
        font
    }

    #[test]
    fn layout_stops_at_the_first_empty_line() {
        let font = built_font(" ABCD");
        let mut text = TextBuilder::new();
        text.add(&font, 20.0, "AB\n\nCD", None, 0.0, 0.0);
        let text = text.build(8);
        assert_eq!(text.records.len(), 1);
        assert_eq!(text.records[0].glyphs.len(), 2);
    }

    #[test]
    fn advances_are_scaled_to_the_text_height() {
        let font = built_font(" Ab");
        let mut text = TextBuilder::new();
        text.add(&font, 20.0, "Ab", Some(BLACK), 0.0, 0.0);
        let text = text.build(8);
        assert_eq!(
            text.records,
            vec![TextRecord {
                font_id: Some(7),
                height: Some(Twips::new(400)),
                color: Some(BLACK),
                x_offset: None,
                y_offset: None,
                glyphs: vec![
                    GlyphRecord {
                        index: 1,
                        advance: 234
                    },
                    GlyphRecord {
                        index: 2,
                        advance: 195
                    },
                ],
            }]
        );
        assert_eq!(text.bounds, rect(0, 429, 0, 400));
        assert_eq!(text.version, TextVersion::DefineText);
    }

    #[test]
    fn font_glyphs_are_not_changed_by_layout() {
        let font = built_font(" A");
        let before = font.glyph('A').cloned();
        let mut text = TextBuilder::new();
        text.add(&font, 72.0, "AAA", None, 0.0, 0.0);
        assert_eq!(font.glyph('A').cloned(), before);
    }

    #[test]
    fn missing_characters_are_skipped() {
        let font = built_font(" a");
        let mut text = TextBuilder::new();
        text.add(&font, 10.0, "a?a\n??\na", None, 5.0, 0.0);
        let text = text.build(2);
        assert_eq!(text.records.len(), 2);
        assert_eq!(text.records[0].glyphs.len(), 2);
        assert_eq!(text.records[0].x_offset, Some(Twips::new(100)));
        assert_eq!(text.records[0].y_offset, None);
        assert_eq!(text.records[1].y_offset, Some(Twips::new(400)));
        assert_eq!(text.bounds, rect(0, 194, 0, 600));
    }

    #[test]
    fn glyphs_added_after_build_are_skipped() {
        let mut font = FontBuilder::new(48, Box::new(SquareFace::new(" ab")), "Body", FontConfig::default())
            .expect("DefineFont2");
        font.add_char('a');
        font.build(7);
        font.add_char('b');
        assert_eq!(font.glyph_index('a'), Some(1));
        assert_eq!(font.glyph_index('b'), None);

        let mut text = TextBuilder::new();
        text.add(&font, 10.0, "ba", None, 0.0, 0.0);
        let text = text.build(8);
        assert_eq!(text.records.len(), 1);
        assert_eq!(
            text.records[0].glyphs,
            vec![GlyphRecord {
                index: 1,
                advance: 97
            }]
        );
    }

    #[test]
    fn supplied_bounds_are_clamped() {
        let font = built_font(" a");
        let mut text = TextBuilder::with_alpha();
        text.add_with_bounds(
            &font,
            10.0,
            "a",
            Some(WHITE),
            0.0,
            0.0,
            TextBounds::new(-1.0, 2.0, f64::from(MAX_RECT_COORDINATE), 3.0),
        );
        let text = text.build(2);
        assert_eq!(text.bounds, rect(-20, 0, 40, 100));
        assert_eq!(text.version, TextVersion::DefineText2);
    }

    #[test]
    fn unbuilt_fonts_are_skipped() {
        let font = FontBuilder::new(48, Box::new(SquareFace::new(" a")), "Body", FontConfig::default())
            .expect("DefineFont2");
        let mut text = TextBuilder::new();
        text.add(&font, 10.0, "a", None, 0.0, 0.0);
        let text = text.build(2);
        assert!(text.records.is_empty());
        assert!(text.bounds.is_zero());
    }

    #[test]
    fn edit_text_flags_and_layout() {
        let font = built_font(" a");
        let edit = EditTextBuilder::new(TextBounds::new(0.0, 0.0, 100.0, 20.0))
            .font(&font, 12.0)
            .color(rgb(0x336699))
            .max_length(40)
            .align(TextAlign::Center)
            .margins(2.0, 2.0, 0.0, 1.5)
            .variable_name("title")
            .text("hello")
            .multiline(true)
            .word_wrap(true)
            .selectable(false)
            .border(true)
            .build(9);
        assert_eq!(edit.bounds, rect(0, 2000, 0, 400));
        assert_eq!(edit.font_id, Some(7));
        assert_eq!(edit.height, Some(240));
        assert_eq!(
            edit.layout,
            Some(TextLayout {
                align: TextAlign::Center,
                left_margin: Twips::new(40),
                right_margin: Twips::new(40),
                indent: Twips::new(0),
                leading: Twips::new(30),
            })
        );
        assert!(edit.flags.use_outlines);
        assert!(edit.flags.no_select);
        assert!(edit.flags.multiline && edit.flags.word_wrap && edit.flags.border);
        assert!(!edit.flags.html && !edit.flags.password);
        assert_eq!(edit.variable_name, "title");
        assert_eq!(edit.initial_text.as_deref(), Some("hello"));
    }
}
