//! Label font lookup and text rasterization
//!
//! The badge label is drawn either with a TrueType font found on the system
//! (parsed with `rusttype`) or, when none can be loaded, with a small
//! built-in 5x7 bitmap font. Callers pick once through [`LabelFont::lookup`]
//! and use the same measuring and drawing calls for both.

use crate::badge::blend_pixel;
use image::{Rgba, RgbaImage};
use log::debug;
use rusttype::{point, Font, Scale};
use std::path::{Path, PathBuf};

/// Font files probed in order when no explicit font is given
pub const SYSTEM_FONT_PATHS: &[&str] = &[
    "C:\\Windows\\Fonts\\arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "/usr/share/fonts/truetype/msttcorefonts/Arial.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
];

/// Ink box of a piece of text relative to its drawing origin
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextBounds {
    pub x_offset: i32,
    pub y_offset: i32,
    pub width: u32,
    pub height: u32,
}

/// A font ready to draw the badge label
pub enum LabelFont {
    /// TrueType font loaded from disk
    System {
        font: Font<'static>,
        scale: Scale,
        source: PathBuf,
    },
    /// Built-in bitmap glyphs
    Builtin(BitmapFont),
}

impl std::fmt::Debug for LabelFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LabelFont::System { scale, source, .. } => f
                .debug_struct("System")
                .field("source", source)
                .field("scale", &scale.y)
                .finish(),
            LabelFont::Builtin(bitmap) => f.debug_tuple("Builtin").field(bitmap).finish(),
        }
    }
}

impl LabelFont {
    /// Finds a font for text `px_height` pixels tall.
    ///
    /// `explicit` is tried first, then [`SYSTEM_FONT_PATHS`]. Any read or
    /// parse failure moves on to the next candidate; when all fail the
    /// built-in bitmap font is returned. This never fails.
    pub fn lookup(px_height: u32, explicit: Option<&Path>) -> LabelFont {
        let candidates = explicit
            .map(Path::to_path_buf)
            .into_iter()
            .chain(SYSTEM_FONT_PATHS.iter().map(PathBuf::from));

        for path in candidates {
            if let Some(font) = load_font_file(&path) {
                debug!("Using label font {}", path.display());
                return LabelFont::System {
                    font,
                    scale: Scale::uniform(px_height.max(1) as f32),
                    source: path,
                };
            }
        }

        debug!("No system font available, using built-in bitmap font");
        LabelFont::builtin(px_height)
    }

    /// Built-in bitmap font scaled to roughly `px_height`
    pub fn builtin(px_height: u32) -> LabelFont {
        LabelFont::Builtin(BitmapFont::for_height(px_height))
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, LabelFont::Builtin(_))
    }

    /// Measures the ink box of `text` drawn with its origin at (0, 0)
    pub fn measure(&self, text: &str) -> TextBounds {
        match self {
            LabelFont::System { font, scale, .. } => {
                let ascent = font.v_metrics(*scale).ascent;
                let mut min = (i32::MAX, i32::MAX);
                let mut max = (i32::MIN, i32::MIN);

                for glyph in font.layout(text, *scale, point(0.0, ascent)) {
                    if let Some(bb) = glyph.pixel_bounding_box() {
                        min = (min.0.min(bb.min.x), min.1.min(bb.min.y));
                        max = (max.0.max(bb.max.x), max.1.max(bb.max.y));
                    }
                }

                if min.0 > max.0 {
                    return TextBounds::default();
                }

                TextBounds {
                    x_offset: min.0,
                    y_offset: min.1,
                    width: (max.0 - min.0) as u32,
                    height: (max.1 - min.1) as u32,
                }
            }
            LabelFont::Builtin(bitmap) => bitmap.measure(text),
        }
    }

    /// Draws `text` with its origin (top-left of the line box) at `origin`
    pub fn draw(&self, canvas: &mut RgbaImage, text: &str, origin: (i32, i32), color: Rgba<u8>) {
        match self {
            LabelFont::System { font, scale, .. } => {
                let ascent = font.v_metrics(*scale).ascent;
                let start = point(origin.0 as f32, origin.1 as f32 + ascent);

                for glyph in font.layout(text, *scale, start) {
                    if let Some(bb) = glyph.pixel_bounding_box() {
                        glyph.draw(|gx, gy, coverage| {
                            blend_pixel(
                                canvas,
                                bb.min.x + gx as i32,
                                bb.min.y + gy as i32,
                                color,
                                coverage,
                            );
                        });
                    }
                }
            }
            LabelFont::Builtin(bitmap) => bitmap.draw(canvas, text, origin, color),
        }
    }
}

fn load_font_file(path: &Path) -> Option<Font<'static>> {
    let data = match std::fs::read(path) {
        Ok(data) => data,
        Err(err) => {
            debug!("Font {} unavailable: {}", path.display(), err);
            return None;
        }
    };

    let font = Font::try_from_vec(data);
    if font.is_none() {
        debug!("Font {} could not be parsed", path.display());
    }
    font
}

const GLYPH_WIDTH: u32 = 5;
const GLYPH_HEIGHT: u32 = 7;
const GLYPH_SPACING: u32 = 1;

/// Fixed 5x7 bitmap font drawn at an integer scale factor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapFont {
    pub scale: u32,
}

impl BitmapFont {
    pub fn for_height(px_height: u32) -> Self {
        Self {
            scale: (px_height / GLYPH_HEIGHT).max(1),
        }
    }

    fn advance(&self) -> u32 {
        (GLYPH_WIDTH + GLYPH_SPACING) * self.scale
    }

    pub fn measure(&self, text: &str) -> TextBounds {
        let count = text.chars().count() as u32;
        if count == 0 {
            return TextBounds::default();
        }

        TextBounds {
            x_offset: 0,
            y_offset: 0,
            width: count * self.advance() - GLYPH_SPACING * self.scale,
            height: GLYPH_HEIGHT * self.scale,
        }
    }

    pub fn draw(&self, canvas: &mut RgbaImage, text: &str, origin: (i32, i32), color: Rgba<u8>) {
        let scale = self.scale as i32;
        let mut pen_x = origin.0;

        for ch in text.chars() {
            if let Some(rows) = glyph_rows(ch) {
                for (row, bits) in rows.iter().enumerate() {
                    for col in 0..GLYPH_WIDTH {
                        if bits & (0b10000 >> col) == 0 {
                            continue;
                        }
                        let x0 = pen_x + col as i32 * scale;
                        let y0 = origin.1 + row as i32 * scale;
                        for dy in 0..scale {
                            for dx in 0..scale {
                                blend_pixel(canvas, x0 + dx, y0 + dy, color, 1.0);
                            }
                        }
                    }
                }
            }
            pen_x += self.advance() as i32;
        }
    }
}

/// Rows of a 5x7 glyph, most significant of the low five bits on the left.
/// Lowercase letters use the uppercase shapes; anything else is blank.
fn glyph_rows(ch: char) -> Option<[u8; 7]> {
    let rows = match ch.to_ascii_uppercase() {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11100, 0b10010, 0b10001, 0b10001, 0b10001, 0b10010, 0b11100],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        _ => return None,
    };
    Some(rows)
}
