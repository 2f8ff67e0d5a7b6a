pub use swf::{GlyphEntry as GlyphRecord, TextAlign, TextLayout, TextRecord};
use swf::{CharacterId, Color, Matrix, Rectangle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextVersion {
    /// RGB colors.
    DefineText,
    /// RGBA colors.
    DefineText2,
}

/// A static text. A record may hold any number of glyphs; runs longer than
/// a record can carry are split when the tag is written.
#[derive(Debug, Clone, PartialEq)]
pub struct DefineText {
    pub version: TextVersion,
    pub id: CharacterId,
    pub bounds: Rectangle,
    pub matrix: Matrix,
    pub records: Vec<TextRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EditTextFlags {
    pub word_wrap: bool,
    pub multiline: bool,
    pub password: bool,
    pub read_only: bool,
    pub auto_size: bool,
    pub no_select: bool,
    pub border: bool,
    pub was_static: bool,
    pub html: bool,
    pub use_outlines: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DefineEditText {
    pub id: CharacterId,
    pub bounds: Rectangle,
    pub flags: EditTextFlags,
    pub font_id: Option<CharacterId>,
    /// Type size in twips.
    pub height: Option<u16>,
    pub color: Option<Color>,
    pub max_length: Option<u16>,
    pub layout: Option<TextLayout>,
    pub variable_name: String,
    pub initial_text: Option<String>,
}
