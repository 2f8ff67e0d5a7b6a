use encoding_rs::WINDOWS_1252;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use log::{debug, warn};
use std::collections::HashMap;
use std::io::Write;
use swf::{
    BitmapFormat, EditText, Font, FontFlag, Header, PlaceObjectAction, Sprite, SwfStr, Text,
    Twips,
};
use tags::font::DefineFont;
use tags::image::DefineBitsLossless;
use tags::shape::{Shape, ShapeRecord};
use tags::sprite::{DefineSprite, PlaceObject};
use tags::text::{DefineEditText, DefineText, TextRecord, TextVersion};
use tags::{CharacterId, Tag};
use thiserror::Error;

/// Edge deltas are written with at most 17 signed bits.
pub const MAX_EDGE_BITS: u32 = 17;

/// A text record stores its glyph count in a byte.
pub const MAX_GLYPHS_PER_RECORD: usize = 0xFF;

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("{what} of {value} does not fit in {bits} bits")]
    Overflow {
        what: &'static str,
        value: i64,
        bits: u32,
    },
    #[error("String {0:?} contains a NUL character")]
    NulInString(String),
    #[error("String {0:?} cannot be written in Windows-1252")]
    Unencodable(String),
    #[error("Font name {0:?} is longer than 255 bytes")]
    FontNameTooLong(String),
    #[error("Font {id} has {count} glyphs, more than a font tag can hold")]
    TooManyGlyphs { id: CharacterId, count: usize },
    #[error("String {0:?} was not prepared before conversion")]
    UnpreparedString(String),
    #[error("Bitmap {0} was not prepared before conversion")]
    UnpreparedBitmap(CharacterId),
    #[error("Error compressing bitmap data: {0}")]
    Compression(#[from] std::io::Error),
    #[error("Error writing movie: {0}")]
    Write(#[from] swf::error::Error),
}

type Result<T> = std::result::Result<T, EncodeError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderSettings {
    /// SWF version of the movie; strings are UTF-8 from version 6 on.
    pub version: u8,
    /// zlib level for lossless bitmap payloads, 0 to 9.
    pub compression_level: u32,
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self {
            version: 10,
            compression_level: 6,
        }
    }
}

/// Bytes the converted tags borrow: strings in the movie's encoding and
/// compressed bitmap payloads.
#[derive(Debug, Default)]
pub struct TagData {
    strings: HashMap<String, Vec<u8>>,
    bitmaps: HashMap<CharacterId, Vec<u8>>,
}

impl TagData {
    fn string(&self, value: &str) -> Result<&SwfStr> {
        self.strings
            .get(value)
            .map(|bytes| SwfStr::from_bytes(bytes))
            .ok_or_else(|| EncodeError::UnpreparedString(value.to_string()))
    }

    fn optional_string(&self, value: Option<&str>) -> Result<Option<&SwfStr>> {
        value.map(|value| self.string(value)).transpose()
    }

    fn bitmap(&self, id: CharacterId) -> Result<&[u8]> {
        self.bitmaps
            .get(&id)
            .map(Vec::as_slice)
            .ok_or(EncodeError::UnpreparedBitmap(id))
    }
}

/// Turns tag values into the records of a movie.
///
/// Writing happens in two steps: `prepare` checks every tag and builds the
/// bytes that have to be encoded or compressed, then `convert` produces
/// the records borrowing from them.
#[derive(Debug, Clone, Default)]
pub struct TagEncoder {
    settings: EncoderSettings,
}

impl TagEncoder {
    pub fn new(version: u8) -> Self {
        Self::with_settings(EncoderSettings {
            version,
            ..Default::default()
        })
    }

    pub fn with_settings(settings: EncoderSettings) -> Self {
        Self { settings }
    }

    pub fn version(&self) -> u8 {
        self.settings.version
    }

    /// Writes a complete movie: the header, the tags and the end record.
    pub fn write_movie<W: Write>(&self, header: &Header, tags: &[Tag], output: W) -> Result<()> {
        if header.version != self.settings.version {
            warn!(
                "Movie header is version {}, strings are encoded for version {}",
                header.version, self.settings.version
            );
        }
        let data = self.prepare(tags)?;
        let records = self.convert(tags, &data)?;
        debug!("Writing {} records", records.len());
        swf::write_swf(header, &records, output)?;
        Ok(())
    }

    /// Checks a tag list and encodes everything its records borrow.
    pub fn prepare(&self, tags: &[Tag]) -> Result<TagData> {
        let mut data = TagData::default();
        for tag in tags {
            self.prepare_tag(tag, &mut data)?;
        }
        Ok(data)
    }

    fn prepare_tag(&self, tag: &Tag, data: &mut TagData) -> Result<()> {
        match tag {
            Tag::DefineShape(shape) => check_edges(shape)?,
            Tag::DefineBitsLossless(bits) => {
                let compressed = self.compress(bits)?;
                debug!(
                    "Bitmap {}: {} bytes compressed to {}",
                    bits.id,
                    bits.data.len(),
                    compressed.len()
                );
                data.bitmaps.insert(bits.id, compressed);
            }
            Tag::DefineFont(font) => {
                let count = font.glyphs.len();
                if count > usize::from(u16::MAX) {
                    return Err(EncodeError::TooManyGlyphs { id: font.id, count });
                }
                if self.add_string(data, &font.name)? > 255 {
                    return Err(EncodeError::FontNameTooLong(font.name.clone()));
                }
                if let Some(license) = &font.license {
                    self.add_string(data, license.name.as_deref().unwrap_or(""))?;
                    self.add_string(data, license.copyright.as_deref().unwrap_or(""))?;
                }
            }
            Tag::DefineEditText(text) => {
                self.add_string(data, &text.variable_name)?;
                if let Some(initial) = &text.initial_text {
                    self.add_string(data, initial)?;
                }
            }
            Tag::PlaceObject(place) => {
                if let Some(name) = &place.name {
                    self.add_string(data, name)?;
                }
            }
            Tag::DefineSprite(sprite) => {
                for nested in &sprite.tags {
                    self.prepare_tag(nested, data)?;
                }
            }
            Tag::DefineBits(_) | Tag::DefineText(_) | Tag::ShowFrame => {}
        }
        Ok(())
    }

    /// Converts a prepared tag list. A font is followed by its zone and
    /// name records; a sprite is preceded by the definitions in its tag
    /// list.
    pub fn convert<'a>(&self, tags: &'a [Tag], data: &'a TagData) -> Result<Vec<swf::Tag<'a>>> {
        let mut records = Vec::new();
        for tag in tags {
            self.convert_into(tag, data, &mut records)?;
        }
        Ok(records)
    }

    fn convert_into<'a>(
        &self,
        tag: &'a Tag,
        data: &'a TagData,
        records: &mut Vec<swf::Tag<'a>>,
    ) -> Result<()> {
        match tag {
            Tag::DefineShape(shape) => records.push(swf::Tag::DefineShape((**shape).clone())),
            Tag::DefineBits(bits) => records.push(swf::Tag::DefineBitsJpeg2 {
                id: bits.id,
                jpeg_data: &bits.jpeg_data,
            }),
            Tag::DefineBitsLossless(bits) => {
                records.push(swf::Tag::DefineBitsLossless(swf::DefineBitsLossless {
                    version: 2,
                    id: bits.id,
                    format: BitmapFormat::Rgb32,
                    width: bits.width,
                    height: bits.height,
                    num_colors: 0,
                    data: data.bitmap(bits.id)?,
                }))
            }
            Tag::DefineFont(font) => convert_font(font, data, records)?,
            Tag::DefineText(text) => {
                let converted = Box::new(convert_text(text));
                records.push(match text.version {
                    TextVersion::DefineText => swf::Tag::DefineText(converted),
                    TextVersion::DefineText2 => swf::Tag::DefineText2(converted),
                });
            }
            Tag::DefineEditText(text) => {
                records.push(swf::Tag::DefineEditText(Box::new(convert_edit_text(text, data)?)))
            }
            Tag::PlaceObject(place) => {
                records.push(swf::Tag::PlaceObject(Box::new(convert_place(place, data)?)))
            }
            Tag::DefineSprite(sprite) => {
                for nested in sprite.tags.iter().filter(|nested| nested.is_definition()) {
                    self.convert_into(nested, data, records)?;
                }
                records.push(swf::Tag::DefineSprite(self.convert_sprite(sprite, data)?));
            }
            Tag::ShowFrame => records.push(swf::Tag::ShowFrame),
        }
        Ok(())
    }

    fn convert_sprite<'a>(&self, sprite: &'a DefineSprite, data: &'a TagData) -> Result<Sprite<'a>> {
        let mut tags = Vec::new();
        let mut frames: u16 = 0;
        for nested in sprite.tags.iter().filter(|nested| !nested.is_definition()) {
            if let Tag::ShowFrame = nested {
                frames += 1;
            }
            self.convert_into(nested, data, &mut tags)?;
        }
        if frames != sprite.frame_count {
            debug!(
                "Sprite {} declares {} frames, writing {}",
                sprite.id, sprite.frame_count, frames
            );
        }
        Ok(Sprite {
            id: sprite.id,
            num_frames: frames,
            tags,
        })
    }

    fn compress(&self, bits: &DefineBitsLossless) -> Result<Vec<u8>> {
        let level = Compression::new(self.settings.compression_level.min(9));
        let mut zlib = ZlibEncoder::new(Vec::new(), level);
        zlib.write_all(&bits.data)?;
        Ok(zlib.finish()?)
    }

    /// Encodes a string once, returning its length in bytes.
    fn add_string(&self, data: &mut TagData, value: &str) -> Result<usize> {
        if let Some(bytes) = data.strings.get(value) {
            return Ok(bytes.len());
        }
        let bytes = self.string_bytes(value)?;
        let len = bytes.len();
        data.strings.insert(value.to_string(), bytes);
        Ok(len)
    }

    fn string_bytes(&self, value: &str) -> Result<Vec<u8>> {
        if value.contains('\0') {
            return Err(EncodeError::NulInString(value.to_string()));
        }
        if self.settings.version >= 6 {
            return Ok(value.as_bytes().to_vec());
        }
        let (bytes, _, unmappable) = WINDOWS_1252.encode(value);
        if unmappable {
            return Err(EncodeError::Unencodable(value.to_string()));
        }
        Ok(bytes.into_owned())
    }
}

/// Number of bits `value` takes as a signed field.
fn signed_bits(value: i32) -> u32 {
    let magnitude = if value < 0 { !value } else { value };
    33 - magnitude.leading_zeros()
}

fn check_edges(shape: &Shape) -> Result<()> {
    for record in &shape.shape {
        let deltas = match record {
            ShapeRecord::StraightEdge { delta_x, delta_y } => vec![*delta_x, *delta_y],
            ShapeRecord::CurvedEdge {
                control_delta_x,
                control_delta_y,
                anchor_delta_x,
                anchor_delta_y,
            } => vec![*control_delta_x, *control_delta_y, *anchor_delta_x, *anchor_delta_y],
            ShapeRecord::StyleChange(_) => continue,
        };
        if let Some(delta) = deltas.iter().find(|delta| signed_bits(delta.get()) > MAX_EDGE_BITS) {
            return Err(EncodeError::Overflow {
                what: "Edge delta",
                value: i64::from(delta.get()).abs(),
                bits: MAX_EDGE_BITS,
            });
        }
    }
    Ok(())
}

// Glyph offsets are always written as 32 bits.
fn convert_font<'a>(font: &'a DefineFont, data: &'a TagData, records: &mut Vec<swf::Tag<'a>>) -> Result<()> {
    records.push(swf::Tag::DefineFont2(Box::new(Font {
        version: font.version.number(),
        id: font.id,
        name: data.string(&font.name)?,
        language: font.language,
        layout: font.layout.clone(),
        glyphs: font.glyphs.clone(),
        flags: font.flags | FontFlag::HAS_WIDE_OFFSETS,
    })));
    if let Some(zones) = &font.zones {
        records.push(swf::Tag::DefineFontAlignZones {
            id: font.id,
            thickness: zones.thickness,
            zones: zones.zones.clone(),
        });
    }
    if let Some(license) = &font.license {
        records.push(swf::Tag::DefineFontName {
            id: font.id,
            name: data.string(license.name.as_deref().unwrap_or(""))?,
            copyright_info: data.string(license.copyright.as_deref().unwrap_or(""))?,
        });
    }
    Ok(())
}

fn convert_text(text: &DefineText) -> Text {
    Text {
        id: text.id,
        bounds: text.bounds.clone(),
        matrix: text.matrix,
        records: text.records.iter().flat_map(split_record).collect(),
    }
}

/// Runs longer than a record can hold continue in records that change no
/// style.
fn split_record(record: &TextRecord) -> Vec<TextRecord> {
    let mut chunks = record.glyphs.chunks(MAX_GLYPHS_PER_RECORD);
    let first = TextRecord {
        font_id: record.font_id,
        color: record.color.clone(),
        x_offset: record.x_offset,
        y_offset: record.y_offset,
        height: record.height,
        glyphs: chunks.next().unwrap_or(&[]).to_vec(),
    };
    let mut split = vec![first];
    split.extend(chunks.map(|chunk| TextRecord {
        font_id: None,
        color: None,
        x_offset: None,
        y_offset: None,
        height: None,
        glyphs: chunk.to_vec(),
    }));
    split
}

fn convert_edit_text<'a>(text: &'a DefineEditText, data: &'a TagData) -> Result<EditText<'a>> {
    let flags = &text.flags;
    let mut edit = EditText::new()
        .with_id(text.id)
        .with_bounds(text.bounds.clone())
        .with_color(text.color.clone())
        .with_max_length(text.max_length)
        .with_layout(text.layout.clone())
        .with_variable_name(data.string(&text.variable_name)?)
        .with_initial_text(data.optional_string(text.initial_text.as_deref())?)
        .with_is_word_wrap(flags.word_wrap)
        .with_is_multiline(flags.multiline)
        .with_is_password(flags.password)
        .with_is_read_only(flags.read_only)
        .with_is_auto_size(flags.auto_size)
        .with_is_selectable(!flags.no_select)
        .with_has_border(flags.border)
        .with_was_static(flags.was_static)
        .with_is_html(flags.html)
        .with_use_outlines(flags.use_outlines);
    if let Some(font_id) = text.font_id {
        edit = edit.with_font_id(font_id, Twips::new(i32::from(text.height.unwrap_or(0))));
    }
    Ok(edit)
}

fn convert_place<'a>(place: &'a PlaceObject, data: &'a TagData) -> Result<swf::PlaceObject<'a>> {
    let action = match place.character_id {
        Some(id) => PlaceObjectAction::Place(id),
        // Without a character the placement modifies the existing one.
        None => PlaceObjectAction::Modify,
    };
    Ok(swf::PlaceObject {
        version: 2,
        action,
        depth: place.depth,
        matrix: place.matrix,
        color_transform: None,
        ratio: None,
        name: data.optional_string(place.name.as_deref())?,
        clip_depth: None,
        class_name: None,
        filters: None,
        background_color: None,
        blend_mode: None,
        clip_actions: None,
        has_image: false,
        is_bitmap_cached: None,
        is_visible: None,
        amf_data: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Read;
    use swf::{Fixed8, TextAlign, TextLayout};
    use tags::color::{argb, rgb, BLACK};
    use tags::font::{
        DefineFontAlignZones, DefineFontName, FontAlignZone, FontThickness, FontVersion, Glyph,
    };
    use tags::image::DefineBits;
    use tags::shape::{move_to, straight, LineStyle, ShapeFlag, ShapeStyles};
    use tags::text::{EditTextFlags, GlyphRecord};
    use tags::{rect, Matrix};

    fn shape(records: Vec<ShapeRecord>) -> Shape {
        Shape {
            version: 3,
            id: 1,
            shape_bounds: rect(-20, 2020, -20, 20),
            edge_bounds: rect(0, 2000, 0, 0),
            flags: ShapeFlag::HAS_SCALING_STROKES,
            styles: ShapeStyles {
                fill_styles: Vec::new(),
                line_styles: vec![LineStyle::new().with_width(Twips::new(40)).with_color(BLACK)],
            },
            shape: records,
        }
    }

    fn convert(encoder: &TagEncoder, tags: &[Tag], check: impl FnOnce(Vec<swf::Tag<'_>>)) {
        let data = encoder.prepare(tags).expect("valid tags");
        check(encoder.convert(tags, &data).expect("prepared tags"));
    }

    fn place(name: &str) -> Tag {
        Tag::PlaceObject(Box::new(PlaceObject {
            depth: 1,
            character_id: None,
            matrix: None,
            name: Some(name.to_string()),
        }))
    }

    fn font(version: FontVersion, name: &str) -> DefineFont {
        let mut font = DefineFont::new(version, 3, name);
        font.glyphs = vec![Glyph {
            shape_records: vec![move_to(0, -8000), straight(8000, 0)],
            code: u16::from(b'L'),
            advance: 500,
            bounds: None,
        }];
        font
    }

    #[test]
    fn edge_limits() {
        assert_eq!(signed_bits(0), 1);
        assert_eq!(signed_bits(-1), 1);
        assert_eq!(signed_bits(65535), 17);
        assert_eq!(signed_bits(-65536), 17);
        assert_eq!(signed_bits(65536), 18);
    }

    #[test]
    fn shapes_pass_through() {
        let tags = [Tag::DefineShape(Box::new(shape(vec![move_to(0, 0), straight(2000, 0)])))];
        convert(&TagEncoder::new(10), &tags, |records| {
            assert_eq!(records.len(), 1);
            match &records[0] {
                swf::Tag::DefineShape(converted) => {
                    assert_eq!(converted.version, 3);
                    assert_eq!(converted.shape.len(), 2);
                    assert_eq!(converted.shape_bounds, rect(-20, 2020, -20, 20));
                }
                other => panic!("unexpected record {:?}", other),
            }
        });
    }

    #[test]
    fn oversized_edges_are_rejected() {
        let tags = [Tag::DefineShape(Box::new(shape(vec![straight(70000, 0)])))];
        assert!(matches!(
            TagEncoder::new(10).prepare(&tags),
            Err(EncodeError::Overflow { value: 70000, bits: 17, .. })
        ));
        let tags = [Tag::DefineShape(Box::new(shape(vec![straight(0, -65536)])))];
        assert!(TagEncoder::new(10).prepare(&tags).is_ok());
    }

    #[test]
    fn lossless_payload_is_zlib_compressed() {
        let tags = [Tag::DefineBitsLossless(DefineBitsLossless {
            id: 4,
            width: 2,
            height: 1,
            data: vec![0xFF, 1, 2, 3, 0, 0, 0, 0],
        })];
        convert(&TagEncoder::new(10), &tags, |records| match &records[0] {
            swf::Tag::DefineBitsLossless(bits) => {
                assert_eq!((bits.version, bits.id, bits.width, bits.height), (2, 4, 2, 1));
                assert!(matches!(bits.format, BitmapFormat::Rgb32));
                let mut inflated = Vec::new();
                flate2::read::ZlibDecoder::new(bits.data)
                    .read_to_end(&mut inflated)
                    .expect("valid zlib stream");
                assert_eq!(inflated, vec![0xFF, 1, 2, 3, 0, 0, 0, 0]);
            }
            other => panic!("unexpected record {:?}", other),
        });
    }

    #[test]
    fn unprepared_tags_are_rejected() {
        let tags = [place("logo")];
        let data = TagData::default();
        assert!(matches!(
            TagEncoder::new(10).convert(&tags, &data),
            Err(EncodeError::UnpreparedString(name)) if name == "logo"
        ));
    }

    #[test]
    fn font3_emits_zones_and_name() {
        let mut tag = font(FontVersion::DefineFont3, "Vera");
        tag.zones = Some(DefineFontAlignZones {
            thickness: FontThickness::Medium,
            zones: vec![FontAlignZone {
                left: 0,
                width: 0x6FD0,
                bottom: 0,
                height: 0x6FD0,
            }],
        });
        tag.license = Some(DefineFontName {
            name: Some("Vera".to_string()),
            copyright: None,
        });
        let tags = [Tag::DefineFont(Box::new(tag))];
        convert(&TagEncoder::new(10), &tags, |records| {
            assert_eq!(records.len(), 3);
            match &records[0] {
                swf::Tag::DefineFont2(font) => {
                    assert_eq!(font.version, 3);
                    assert_eq!(font.name.as_bytes(), b"Vera");
                    assert!(font.flags.contains(FontFlag::HAS_WIDE_OFFSETS));
                    assert_eq!(font.glyphs.len(), 1);
                }
                other => panic!("unexpected record {:?}", other),
            }
            assert!(matches!(
                &records[1],
                swf::Tag::DefineFontAlignZones { id: 3, zones, .. } if zones.len() == 1
            ));
            match &records[2] {
                swf::Tag::DefineFontName { id, name, copyright_info } => {
                    assert_eq!(*id, 3);
                    assert_eq!(name.as_bytes(), b"Vera");
                    assert_eq!(copyright_info.as_bytes(), b"");
                }
                other => panic!("unexpected record {:?}", other),
            }
        });
    }

    #[test]
    fn font_limits() {
        let long = "n".repeat(256);
        let tags = [Tag::DefineFont(Box::new(font(FontVersion::DefineFont2, &long)))];
        assert!(matches!(
            TagEncoder::new(10).prepare(&tags),
            Err(EncodeError::FontNameTooLong(_))
        ));

        let mut tag = font(FontVersion::DefineFont2, "Vera");
        tag.glyphs = vec![tag.glyphs[0].clone(); 65536];
        let tags = [Tag::DefineFont(Box::new(tag))];
        assert!(matches!(
            TagEncoder::new(10).prepare(&tags),
            Err(EncodeError::TooManyGlyphs { id: 3, count: 65536 })
        ));
    }

    #[test]
    fn long_text_runs_are_split() {
        let text = DefineText {
            version: TextVersion::DefineText2,
            id: 5,
            bounds: rect(0, 0, 0, 0),
            matrix: Matrix::IDENTITY,
            records: vec![TextRecord {
                font_id: Some(3),
                color: Some(rgb(0x102030)),
                x_offset: None,
                y_offset: Some(Twips::new(-40)),
                height: Some(Twips::new(400)),
                glyphs: vec![GlyphRecord { index: 0, advance: 1 }; 300],
            }],
        };
        let tags = [Tag::DefineText(text)];
        convert(&TagEncoder::new(10), &tags, |records| match &records[0] {
            swf::Tag::DefineText2(text) => {
                let counts: Vec<usize> = text.records.iter().map(|record| record.glyphs.len()).collect();
                assert_eq!(counts, vec![255, 45]);
                assert_eq!(text.records[0].font_id, Some(3));
                assert_eq!(text.records[0].y_offset, Some(Twips::new(-40)));
                let rest = &text.records[1];
                assert_eq!(rest.font_id, None);
                assert_eq!(rest.color, None);
                assert_eq!(rest.height, None);
            }
            other => panic!("unexpected record {:?}", other),
        });
    }

    #[test]
    fn edit_text_fields() {
        let text = DefineEditText {
            id: 6,
            bounds: rect(0, 2000, 0, 400),
            flags: EditTextFlags {
                multiline: true,
                use_outlines: true,
                ..Default::default()
            },
            font_id: Some(3),
            height: Some(240),
            color: Some(argb(0x80FF0000)),
            max_length: None,
            layout: Some(TextLayout {
                align: TextAlign::Left,
                left_margin: Twips::new(0),
                right_margin: Twips::new(0),
                indent: Twips::new(0),
                leading: Twips::new(40),
            }),
            variable_name: "name".to_string(),
            initial_text: Some("hi".to_string()),
        };
        let tags = [Tag::DefineEditText(Box::new(text))];
        convert(&TagEncoder::new(10), &tags, |records| match &records[0] {
            swf::Tag::DefineEditText(edit) => {
                let expected = EditText::new()
                    .with_id(6)
                    .with_bounds(rect(0, 2000, 0, 400))
                    .with_color(Some(argb(0x80FF0000)))
                    .with_max_length(None)
                    .with_layout(Some(TextLayout {
                        align: TextAlign::Left,
                        left_margin: Twips::new(0),
                        right_margin: Twips::new(0),
                        indent: Twips::new(0),
                        leading: Twips::new(40),
                    }))
                    .with_variable_name(SwfStr::from_utf8_str("name"))
                    .with_initial_text(Some(SwfStr::from_utf8_str("hi")))
                    .with_is_word_wrap(false)
                    .with_is_multiline(true)
                    .with_is_password(false)
                    .with_is_read_only(false)
                    .with_is_auto_size(false)
                    .with_is_selectable(true)
                    .with_has_border(false)
                    .with_was_static(false)
                    .with_is_html(false)
                    .with_use_outlines(true)
                    .with_font_id(3, Twips::new(240));
                assert_eq!(**edit, expected);
            }
            other => panic!("unexpected record {:?}", other),
        });
    }

    #[test]
    fn placements_modify_without_a_character() {
        let tags = [
            Tag::PlaceObject(Box::new(PlaceObject {
                depth: 1,
                character_id: Some(2),
                matrix: Some(Matrix::IDENTITY),
                name: Some("logo".to_string()),
            })),
            place("other"),
        ];
        convert(&TagEncoder::new(10), &tags, |records| {
            match &records[0] {
                swf::Tag::PlaceObject(place) => {
                    assert_eq!(place.version, 2);
                    assert_eq!(place.depth, 1);
                    assert!(matches!(place.action, PlaceObjectAction::Place(2)));
                    assert_eq!(place.matrix, Some(Matrix::IDENTITY));
                    assert_eq!(place.name.map(SwfStr::as_bytes), Some(&b"logo"[..]));
                }
                other => panic!("unexpected record {:?}", other),
            }
            assert!(matches!(
                &records[1],
                swf::Tag::PlaceObject(place) if matches!(place.action, PlaceObjectAction::Modify)
            ));
        });
    }

    #[test]
    fn sprites_hoist_definitions() {
        let sprite = DefineSprite {
            id: 2,
            frame_count: 1,
            tags: vec![
                Tag::DefineBits(DefineBits {
                    id: 1,
                    jpeg_data: vec![0xFF, 0xD8, 0xFF, 0xD9],
                    width: 1,
                    height: 1,
                }),
                Tag::PlaceObject(Box::new(PlaceObject::new(1, 1))),
                Tag::ShowFrame,
                Tag::ShowFrame,
            ],
        };
        let tags = [Tag::DefineSprite(sprite)];
        convert(&TagEncoder::new(10), &tags, |records| {
            assert_eq!(records.len(), 2);
            assert!(matches!(&records[0], swf::Tag::DefineBitsJpeg2 { id: 1, .. }));
            match &records[1] {
                swf::Tag::DefineSprite(sprite) => {
                    assert_eq!(sprite.id, 2);
                    assert_eq!(sprite.num_frames, 2);
                    assert_eq!(sprite.tags.len(), 3);
                    assert!(matches!(sprite.tags[0], swf::Tag::PlaceObject(_)));
                }
                other => panic!("unexpected record {:?}", other),
            }
        });
    }

    #[test]
    fn strings_follow_the_movie_version() {
        let tags = [place("café")];
        let name = |encoder: &TagEncoder| {
            let data = encoder.prepare(&tags).expect("encodable name");
            match &encoder.convert(&tags, &data).expect("prepared")[0] {
                swf::Tag::PlaceObject(place) => place.name.map(|name| name.as_bytes().to_vec()),
                _ => None,
            }
        };
        assert_eq!(name(&TagEncoder::new(6)), Some("café".as_bytes().to_vec()));
        assert_eq!(name(&TagEncoder::new(5)), Some(b"caf\xE9".to_vec()));
        assert!(matches!(
            TagEncoder::new(5).prepare(&[place("日本")]),
            Err(EncodeError::Unencodable(_))
        ));
        assert!(matches!(
            TagEncoder::new(6).prepare(&[place("a\0b")]),
            Err(EncodeError::NulInString(_))
        ));
    }

    #[test]
    fn writes_an_uncompressed_movie() {
        let header = Header {
            compression: swf::Compression::None,
            version: 10,
            stage_size: rect(0, 11000, 0, 8000),
            frame_rate: Fixed8::from_f32(24.0),
            num_frames: 1,
        };
        let tags = [
            Tag::DefineShape(Box::new(shape(vec![move_to(0, 0), straight(2000, 0)]))),
            Tag::PlaceObject(Box::new(PlaceObject::new(1, 1))),
            Tag::ShowFrame,
        ];
        let mut output = Vec::new();
        TagEncoder::new(10)
            .write_movie(&header, &tags, &mut output)
            .expect("writable movie");
        assert_eq!(&output[..4], b"FWS\x0A");
        let length = u32::from_le_bytes([output[4], output[5], output[6], output[7]]);
        assert_eq!(length as usize, output.len());
    }
}
