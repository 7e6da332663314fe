//! Procedural badge drawing
//!
//! A badge is a filled disc, a white ring, a white center dot, an optional
//! "UCG" label in the lower third and a thin dark border, drawn onto a
//! transparent square canvas.

use crate::font::LabelFont;
use image::{ImageBuffer, Rgba, RgbaImage};
use std::path::PathBuf;

pub const BACKGROUND: Rgba<u8> = Rgba([102, 126, 234, 255]);
pub const FOREGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const BORDER: Rgba<u8> = Rgba([51, 51, 51, 255]);

/// Text drawn on badges large enough to hold it
pub const LABEL: &str = "UCG";

/// Smallest size that gets a label
pub const LABEL_MIN_SIZE: u32 = 32;

/// Knobs for [`render_with`]
#[derive(Debug, Clone)]
pub struct BadgeOptions {
    /// Label text; `None` skips the text step entirely
    pub label: Option<String>,

    /// Font file tried before the system font list
    pub font_path: Option<PathBuf>,

    /// Probe system fonts; when false the built-in bitmap font is used
    pub system_fonts: bool,
}

impl Default for BadgeOptions {
    fn default() -> Self {
        Self {
            label: Some(LABEL.to_string()),
            font_path: None,
            system_fonts: true,
        }
    }
}

/// Renders the badge at `size`x`size` with the default label and font lookup
pub fn render(size: u32) -> RgbaImage {
    render_with(size, &BadgeOptions::default())
}

pub fn render_with(size: u32, options: &BadgeOptions) -> RgbaImage {
    let mut canvas: RgbaImage = ImageBuffer::from_pixel(size, size, Rgba([0, 0, 0, 0]));
    let s = size as f32;

    // Background disc inset by 2px
    fill_circle(&mut canvas, &Circle::from_bbox(2.0, 2.0, s - 2.0, s - 2.0), BACKGROUND);

    let center = (size / 2) as f32;

    let ring_radius = (size / 3) as f32;
    let ring_width = (size / 16).max(1) as f32;
    stroke_circle(
        &mut canvas,
        &Circle::new(center, center, ring_radius),
        ring_width,
        FOREGROUND,
    );

    let dot_radius = (size / 8) as f32;
    fill_circle(&mut canvas, &Circle::new(center, center, dot_radius), FOREGROUND);

    if size >= LABEL_MIN_SIZE {
        if let Some(label) = options.label.as_deref() {
            draw_label(&mut canvas, label, options);
        }
    }

    stroke_circle(&mut canvas, &Circle::from_bbox(1.0, 1.0, s - 1.0, s - 1.0), 1.0, BORDER);

    canvas
}

/// Centers `label` horizontally with its middle at three quarters of the height
fn draw_label(canvas: &mut RgbaImage, label: &str, options: &BadgeOptions) {
    let size = canvas.width();
    let font_px = size / 6;

    let font = if options.system_fonts {
        LabelFont::lookup(font_px, options.font_path.as_deref())
    } else {
        LabelFont::builtin(font_px)
    };

    // position the ink box, not the line origin
    let bounds = font.measure(label);
    let x = (size as i32 - bounds.width as i32).div_euclid(2) - bounds.x_offset;
    let y = (size as f32 * 0.75 - (bounds.height / 2) as f32).floor() as i32 - bounds.y_offset;

    font.draw(canvas, label, (x, y), FOREGROUND);
}

#[derive(Debug, Clone, Copy)]
struct Circle {
    cx: f32,
    cy: f32,
    radius: f32,
}

impl Circle {
    fn new(cx: f32, cy: f32, radius: f32) -> Self {
        Self { cx, cy, radius }
    }

    /// Circle inscribed in the box `[x0, y0]..[x1, y1]`
    fn from_bbox(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            cx: (x0 + x1) / 2.0,
            cy: (y0 + y1) / 2.0,
            radius: ((x1 - x0) / 2.0).min((y1 - y0) / 2.0),
        }
    }

    /// Distance from the circle center to the center of pixel (x, y)
    fn distance(&self, x: u32, y: u32) -> f32 {
        let dx = x as f32 + 0.5 - self.cx;
        let dy = y as f32 + 0.5 - self.cy;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Fraction of a pixel covered by an edge `signed` pixels away (positive is inside)
fn edge_coverage(signed: f32) -> f32 {
    (signed + 0.5).clamp(0.0, 1.0)
}

fn fill_circle(canvas: &mut RgbaImage, circle: &Circle, color: Rgba<u8>) {
    for y in 0..canvas.height() {
        for x in 0..canvas.width() {
            let coverage = edge_coverage(circle.radius - circle.distance(x, y));
            if coverage > 0.0 {
                blend_pixel(canvas, x as i32, y as i32, color, coverage);
            }
        }
    }
}

/// Outline of `width` pixels laid inside the circle's radius
fn stroke_circle(canvas: &mut RgbaImage, circle: &Circle, width: f32, color: Rgba<u8>) {
    let inner = circle.radius - width;
    for y in 0..canvas.height() {
        for x in 0..canvas.width() {
            let d = circle.distance(x, y);
            let coverage = edge_coverage(circle.radius - d) - edge_coverage(inner - d);
            if coverage > 0.0 {
                blend_pixel(canvas, x as i32, y as i32, color, coverage);
            }
        }
    }
}

/// Source-over blend of `color` at `coverage` onto the pixel at (x, y).
/// Coordinates outside the canvas are ignored.
pub(crate) fn blend_pixel(canvas: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>, coverage: f32) {
    if x < 0 || y < 0 || x as u32 >= canvas.width() || y as u32 >= canvas.height() {
        return;
    }

    let src_a = color[3] as f32 / 255.0 * coverage.clamp(0.0, 1.0);
    if src_a <= 0.0 {
        return;
    }

    let dst = canvas.get_pixel_mut(x as u32, y as u32);
    let dst_a = dst[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);

    for channel in 0..3 {
        let src = color[channel] as f32;
        let old = dst[channel] as f32;
        let value = (src * src_a + old * dst_a * (1.0 - src_a)) / out_a;
        dst[channel] = value.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}
