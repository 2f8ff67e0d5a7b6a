use builder::font::{parse_unicode_ranges, FontStyle, TtfFontManager};
use builder::image::{build_image, build_image_shape, build_sprite, FileImageSource, FillMode, ImageKind};
use builder::text::TextBounds;
use builder::{DefineShapeBuilder, EditTextBuilder, FontBuilder, FontConfig, GraphicsState, Path, Stroke, TextBuilder};
use clap::{Parser, Subcommand, ValueEnum};
use encoder::TagEncoder;
use encoding_rs::Encoding;
use log::{debug, info};
use std::fmt::Display;
use std::fs;
use std::path::PathBuf;
use strip_bom::StripBom;
use swf::{Compression, Fixed8, Header};
use tags::color::{argb, rgb, BLACK};
use tags::shape::{FillStyle, ShapeVersion};
use tags::sprite::PlaceObject;
use tags::twips::rect_from_size;
use tags::{Color, Dictionary, Tag, TagCode};

/// Builds a one frame SWF movie from an image, a vector path or a text.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// The output movie. Defaults to the input name with a .swf extension.
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// SWF version of the movie
    #[arg(long, global = true, default_value_t = 10)]
    swf_version: u8,

    /// Stage width in pixels
    #[arg(long, global = true, default_value_t = 550.0)]
    stage_width: f64,

    /// Stage height in pixels
    #[arg(long, global = true, default_value_t = 400.0)]
    stage_height: f64,

    #[arg(long, global = true, default_value_t = 24.0)]
    frame_rate: f32,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Embed a PNG, GIF or JPEG image as a bitmap filled shape
    Image {
        input: PathBuf,

        /// Shape width in pixels, the image width by default
        #[arg(long)]
        width: Option<f64>,

        /// Shape height in pixels, the image height by default
        #[arg(long)]
        height: Option<f64>,

        #[arg(long, value_enum, default_value_t = Mode::Clip)]
        mode: Mode,

        /// Wrap a JPEG image in a sprite, naming the placed shape
        #[arg(long)]
        sprite: Option<String>,
    },
    /// Draw SVG style path data ("M 0 0 L 100 0 ...")
    Path {
        data: String,

        /// Fill color, #RRGGBB or #AARRGGBB
        #[arg(long, value_parser = parse_color)]
        fill: Option<Color>,

        /// Stroke color, #RRGGBB or #AARRGGBB
        #[arg(long, value_parser = parse_color)]
        stroke: Option<Color>,

        /// Stroke width in pixels
        #[arg(long, default_value_t = 1.0)]
        stroke_width: f64,

        /// Write a DefineShape4 tag
        #[arg(long)]
        shape4: bool,
    },
    /// Lay out the lines of a text file with an embedded font
    Text {
        /// A TrueType or OpenType font file
        font: PathBuf,

        input: PathBuf,

        /// Encoding label of the text file
        #[arg(long, default_value = "utf-8")]
        encoding: String,

        /// Type size in pixels
        #[arg(long, default_value_t = 12.0)]
        size: f64,

        #[arg(long, value_parser = parse_color)]
        color: Option<Color>,

        /// Build a DefineFont3 tag with coordinates in twips
        #[arg(long)]
        font3: bool,

        /// Generate alignment zones (DefineFont3 only)
        #[arg(long)]
        flash_type: bool,

        /// Embed every glyph of the face instead of the ones the text uses
        #[arg(long)]
        all_chars: bool,

        /// Also embed these code points, e.g. "U+0020-007E,U+00A9"
        #[arg(long)]
        ranges: Option<String>,

        /// Write an editable text field instead of static text
        #[arg(long)]
        edit: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    Clip,
    Repeat,
    Scale,
}

impl From<Mode> for FillMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Clip => FillMode::Clip,
            Mode::Repeat => FillMode::Repeat,
            Mode::Scale => FillMode::Scale,
        }
    }
}

fn invalid_input(message: &str) -> ! {
    eprintln!("Invalid input: {}", message);
    std::process::exit(1);
}

fn build_error(message: impl Display) -> ! {
    eprintln!("Error while building:\n{}", message);
    std::process::exit(1);
}

fn parse_color(value: &str) -> Result<Color, String> {
    let digits = value.trim_start_matches('#').trim_start_matches("0x");
    let color = u32::from_str_radix(digits, 16).map_err(|err| err.to_string())?;
    match digits.len() {
        6 => Ok(rgb(color)),
        8 => Ok(argb(color)),
        _ => Err(format!("expected #RRGGBB or #AARRGGBB, found '{}'", value)),
    }
}

/// The tags of the movie's only frame: definitions, then the placement of
/// the last character defined.
fn build_tags(command: &Command, ids: &mut Dictionary) -> Vec<Tag> {
    let mut tags = Vec::new();
    match command {
        Command::Image {
            input,
            width,
            height,
            mode,
            sprite,
        } => {
            if !input.is_file() {
                invalid_input("Image file not found");
            }
            let kind = ImageKind::guess(input)
                .unwrap_or_else(|| invalid_input("Expected a .png, .gif, .jpg or .jpeg image"));
            let mut source = FileImageSource::new(input);
            if let Some(name) = sprite {
                if kind != ImageKind::Jpeg {
                    invalid_input("Only JPEG images can be wrapped in a sprite");
                }
                let sprite = build_sprite(ids, name, &mut source).unwrap_or_else(|err| build_error(err));
                tags.push(Tag::DefineSprite(sprite));
            } else {
                let bitmap = build_image(ids.allocate(), kind, &mut source)
                    .unwrap_or_else(|err| build_error(err));
                let (bitmap_id, size) = match &bitmap {
                    Tag::DefineBits(bits) => (bits.id, (bits.width, bits.height)),
                    Tag::DefineBitsLossless(bits) => (bits.id, (bits.width, bits.height)),
                    _ => build_error("Image did not produce a bitmap tag"),
                };
                info!("{} {}x{} image", kind.mime_type(), size.0, size.1);
                let shape = build_image_shape(
                    ids.allocate(),
                    bitmap_id,
                    size,
                    width.unwrap_or(f64::from(size.0)),
                    height.unwrap_or(f64::from(size.1)),
                    (*mode).into(),
                );
                tags.push(bitmap);
                tags.push(Tag::DefineShape(Box::new(shape)));
            }
        }
        Command::Path {
            data,
            fill,
            stroke,
            stroke_width,
            shape4,
        } => {
            if fill.is_none() && stroke.is_none() {
                invalid_input("A path needs --fill, --stroke or both");
            }
            let path = Path::parse(data).unwrap_or_else(|err| build_error(err));
            let version = if *shape4 {
                ShapeVersion::DefineShape4
            } else {
                ShapeVersion::DefineShape3
            };
            let state = GraphicsState::new(
                FillStyle::Color(fill.unwrap_or(BLACK)),
                Stroke::new(*stroke_width, stroke.unwrap_or(BLACK)),
            )
            .with_version(version);
            let shape = DefineShapeBuilder::build(ids.allocate(), &path, &state, stroke.is_some(), fill.is_some());
            tags.push(Tag::DefineShape(Box::new(shape)));
        }
        Command::Text {
            font,
            input,
            encoding,
            size,
            color,
            font3,
            flash_type,
            all_chars,
            ranges,
            edit,
        } => {
            if !input.is_file() {
                invalid_input("Text file not found");
            }
            let encoding = Encoding::for_label(encoding.as_bytes())
                .unwrap_or_else(|| invalid_input("Unknown text encoding"));
            let data = fs::read(input).unwrap_or_else(|err| build_error(err));
            let (decoded, had_errors) = encoding.decode_without_bom_handling(&data);
            if had_errors {
                debug!("Malformed {} sequences replaced in {}", encoding.name(), input.display());
            }
            let text = decoded.strip_bom().replace("\r\n", "\n");

            let code = if *font3 {
                TagCode::DefineFont3
            } else {
                TagCode::DefineFont2
            };
            let config = FontConfig {
                flash_type: *flash_type,
                ..Default::default()
            };
            let alias = font
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or("font");
            let manager = TtfFontManager::new();
            let mut font = FontBuilder::from_location(
                code as u16,
                Some(&manager),
                alias,
                font,
                FontStyle::PLAIN,
                config,
            )
            .unwrap_or_else(|err| build_error(err));
            if *all_chars {
                font.add_all_chars();
            } else {
                font.add_chars(text.chars());
            }
            if let Some(ranges) = ranges {
                let ranges = parse_unicode_ranges(ranges).unwrap_or_else(|err| build_error(err));
                font.add_ranges(&ranges);
            }
            let font_tag = font.build(ids.allocate());
            tags.push(Tag::DefineFont(Box::new(font_tag)));

            if *edit {
                let lines = text.lines().count().max(1) as f64;
                let width = text.lines().map(|line| line.chars().count()).max().unwrap_or(0) as f64 * size;
                let mut field = EditTextBuilder::new(TextBounds::new(0.0, 0.0, width, lines * size))
                    .font(&font, *size)
                    .multiline(lines > 1.0)
                    .text(&text);
                if let Some(color) = color {
                    field = field.color(*color);
                }
                tags.push(Tag::DefineEditText(Box::new(field.build(ids.allocate()))));
            } else {
                let mut builder = if color.map_or(false, |color| color.a != 0xFF) {
                    TextBuilder::with_alpha()
                } else {
                    TextBuilder::new()
                };
                builder.add(&font, *size, &text, *color, 0.0, 0.0);
                tags.push(Tag::DefineText(builder.build(ids.allocate())));
            }
        }
    }

    if let Some(id) = tags.last().and_then(Tag::character_id) {
        tags.push(Tag::PlaceObject(Box::new(PlaceObject::new(id, 1))));
    }
    tags.push(Tag::ShowFrame);
    tags
}

fn default_output(command: &Command) -> PathBuf {
    let input = match command {
        Command::Image { input, .. } | Command::Text { input, .. } => input.clone(),
        Command::Path { .. } => PathBuf::from("path"),
    };
    PathBuf::from(input.file_name().unwrap_or_default()).with_extension("swf")
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let mut ids = Dictionary::new();
    let tags = build_tags(&args.command, &mut ids);
    debug!("{} characters, {} tags", ids.len(), tags.len());

    let header = Header {
        compression: Compression::Zlib,
        version: args.swf_version,
        stage_size: rect_from_size(args.stage_width, args.stage_height),
        frame_rate: Fixed8::from_f32(args.frame_rate),
        num_frames: 1,
    };
    let output = args.output.clone().unwrap_or_else(|| default_output(&args.command));
    let file = fs::File::create(&output).unwrap_or_else(|err| build_error(err));
    let writer = std::io::BufWriter::new(file);
    TagEncoder::new(args.swf_version)
        .write_movie(&header, &tags, writer)
        .unwrap_or_else(|err| build_error(err));
    info!("Wrote {}", output.display());
}
