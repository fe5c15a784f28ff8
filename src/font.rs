//! Label fonts
//!
//! The label is drawn with a TrueType face when one can be found on the system
//! (or at an explicit path), and with a small built-in bitmap font otherwise.
//! Loading never fails: every miss is logged at debug level and the next
//! candidate is tried.

use image::{Rgb, RgbImage};
use log::debug;
use rusttype::{point, Font, PositionedGlyph, Scale};
use std::path::{Path, PathBuf};

/// Width and height of a measured label, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextBounds {
    pub width: u32,
    pub height: u32,
}

/// A font ready to measure and draw a label at one pixel size
pub enum LabelFont {
    TrueType { font: Font<'static>, scale: Scale },
    Bitmap { scale: u32 },
}

impl LabelFont {
    /// Load the preferred font at `px` pixels, falling back to the bitmap font
    pub fn load(px: u32, explicit: Option<&Path>) -> LabelFont {
        LabelFont::from_face(load_preferred_face(explicit), px)
    }

    /// Wrap an already loaded face, or the bitmap font when there is none
    pub fn from_face(face: Option<Font<'static>>, px: u32) -> LabelFont {
        match face {
            Some(font) => LabelFont::TrueType {
                font,
                scale: Scale::uniform(px.max(1) as f32),
            },
            None => LabelFont::bitmap(px),
        }
    }

    /// The built-in bitmap font sized to roughly match a `px` pixel TrueType face
    pub fn bitmap(px: u32) -> LabelFont {
        LabelFont::Bitmap {
            scale: (px / 10).max(1),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, LabelFont::Bitmap { .. })
    }

    /// Bounding box of `text` when drawn with its top-left anchor at the origin
    pub fn measure(&self, text: &str) -> TextBounds {
        match self {
            LabelFont::TrueType { font, scale } => {
                let glyphs = layout(font, *scale, text, 0, 0);
                let mut bounds: Option<(i32, i32, i32, i32)> = None;
                for bb in glyphs.iter().filter_map(|g| g.pixel_bounding_box()) {
                    bounds = Some(match bounds {
                        None => (bb.min.x, bb.min.y, bb.max.x, bb.max.y),
                        Some((x0, y0, x1, y1)) => (
                            x0.min(bb.min.x),
                            y0.min(bb.min.y),
                            x1.max(bb.max.x),
                            y1.max(bb.max.y),
                        ),
                    });
                }

                match bounds {
                    Some((x0, y0, x1, y1)) => TextBounds {
                        width: (x1 - x0) as u32,
                        height: (y1 - y0) as u32,
                    },
                    None => TextBounds {
                        width: 0,
                        height: 0,
                    },
                }
            }
            LabelFont::Bitmap { scale } => {
                let count = text.chars().count() as u32;
                if count == 0 {
                    return TextBounds {
                        width: 0,
                        height: 0,
                    };
                }
                TextBounds {
                    width: count * GLYPH_ADVANCE * scale - scale,
                    height: GLYPH_HEIGHT * scale,
                }
            }
        }
    }

    /// Draw `text` with its top-left anchor at `origin`, clipping at the canvas edges
    pub fn draw(&self, canvas: &mut RgbImage, text: &str, origin: (i32, i32), color: Rgb<u8>) {
        match self {
            LabelFont::TrueType { font, scale } => {
                for glyph in layout(font, *scale, text, origin.0, origin.1) {
                    let Some(bb) = glyph.pixel_bounding_box() else {
                        continue;
                    };
                    glyph.draw(|gx, gy, coverage| {
                        let x = bb.min.x + gx as i32;
                        let y = bb.min.y + gy as i32;
                        if let Some(pixel) = pixel_at(canvas, x, y) {
                            *pixel = blend(*pixel, color, coverage);
                        }
                    });
                }
            }
            LabelFont::Bitmap { scale } => {
                let s = *scale as i32;
                for (index, ch) in text.chars().enumerate() {
                    let left = origin.0 + index as i32 * GLYPH_ADVANCE as i32 * s;
                    for (row, bits) in bitmap_glyph(ch).iter().enumerate() {
                        for col in 0..GLYPH_WIDTH {
                            if bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                                continue;
                            }
                            let x = left + col as i32 * s;
                            let y = origin.1 + row as i32 * s;
                            fill_block(canvas, x, y, s, color);
                        }
                    }
                }
            }
        }
    }
}

/// Lay out `text` so that the ascender line sits at `top`
fn layout(
    font: &Font<'static>,
    scale: Scale,
    text: &str,
    left: i32,
    top: i32,
) -> Vec<PositionedGlyph<'static>> {
    let ascent = font.v_metrics(scale).ascent;
    font.layout(text, scale, point(left as f32, top as f32 + ascent))
        .collect()
}

fn pixel_at(canvas: &mut RgbImage, x: i32, y: i32) -> Option<&mut Rgb<u8>> {
    if x < 0 || y < 0 || x as u32 >= canvas.width() || y as u32 >= canvas.height() {
        return None;
    }
    Some(canvas.get_pixel_mut(x as u32, y as u32))
}

fn fill_block(canvas: &mut RgbImage, x: i32, y: i32, side: i32, color: Rgb<u8>) {
    for dy in 0..side {
        for dx in 0..side {
            if let Some(pixel) = pixel_at(canvas, x + dx, y + dy) {
                *pixel = color;
            }
        }
    }
}

fn blend(under: Rgb<u8>, over: Rgb<u8>, coverage: f32) -> Rgb<u8> {
    let a = coverage.clamp(0.0, 1.0);
    let mix = |u: u8, o: u8| (u as f32 * (1.0 - a) + o as f32 * a).round() as u8;
    Rgb([
        mix(under[0], over[0]),
        mix(under[1], over[1]),
        mix(under[2], over[2]),
    ])
}

/// Try the explicit path first, then the platform candidates
pub fn load_preferred_face(explicit: Option<&Path>) -> Option<Font<'static>> {
    if let Some(path) = explicit {
        if let Some(font) = load_face(path) {
            debug!("Using label font {}", path.display());
            return Some(font);
        }
    }

    for candidate in candidate_font_paths() {
        if let Some(font) = load_face(&candidate) {
            debug!("Using label font {}", candidate.display());
            return Some(font);
        }
    }

    debug!("No TrueType font found, using the built-in bitmap font");
    None
}

/// Read a TrueType face (the first face of a collection)
pub fn load_face(path: &Path) -> Option<Font<'static>> {
    let data = match std::fs::read(path) {
        Ok(data) => data,
        Err(err) => {
            debug!("Skipping font {}: {err}", path.display());
            return None;
        }
    };

    let font = Font::try_from_vec_and_index(data, 0);
    if font.is_none() {
        debug!("Skipping font {}: not a usable TrueType face", path.display());
    }
    font
}

#[cfg(target_os = "macos")]
fn candidate_font_paths() -> Vec<PathBuf> {
    [
        "/System/Library/Fonts/Helvetica.ttc",
        "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "/Library/Fonts/Arial.ttf",
    ]
    .iter()
    .map(PathBuf::from)
    .collect()
}

#[cfg(target_os = "windows")]
fn candidate_font_paths() -> Vec<PathBuf> {
    let system_root = std::env::var("SYSTEMROOT").unwrap_or_else(|_| "C:\\Windows".to_string());
    ["arialbd.ttf", "arial.ttf", "segoeuib.ttf", "segoeui.ttf"]
        .iter()
        .map(|name| Path::new(&system_root).join("Fonts").join(name))
        .collect()
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn candidate_font_paths() -> Vec<PathBuf> {
    [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
        "/usr/share/fonts/truetype/noto/NotoSans-Bold.ttf",
        "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    ]
    .iter()
    .map(PathBuf::from)
    .collect()
}

const GLYPH_WIDTH: u32 = 5;
const GLYPH_HEIGHT: u32 = 7;
const GLYPH_ADVANCE: u32 = GLYPH_WIDTH + 1;

/// 5x7 glyph rows, most significant of the low five bits is the leftmost column
fn bitmap_glyph(ch: char) -> [u8; 7] {
    match ch.to_ascii_uppercase() {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
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
        '-' => [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
        ' ' => [0; 7],
        _ => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b00000, 0b00100],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

    #[test]
    fn bitmap_measure_scales_with_glyph_count() {
        let font = LabelFont::Bitmap { scale: 1 };
        assert_eq!(
            font.measure("AI"),
            TextBounds {
                width: 11,
                height: 7
            }
        );

        let font = LabelFont::Bitmap { scale: 3 };
        assert_eq!(
            font.measure("AI"),
            TextBounds {
                width: 33,
                height: 21
            }
        );
        assert_eq!(font.measure("").width, 0);
    }

    #[test]
    fn bitmap_scale_tracks_font_size() {
        assert!(matches!(LabelFont::bitmap(8), LabelFont::Bitmap { scale: 1 }));
        assert!(matches!(LabelFont::bitmap(64), LabelFont::Bitmap { scale: 6 }));
        assert!(LabelFont::from_face(None, 24).is_fallback());
    }

    #[test]
    fn bitmap_draw_sets_glyph_pixels() {
        let mut canvas = RgbImage::new(12, 8);
        let font = LabelFont::Bitmap { scale: 1 };
        font.draw(&mut canvas, "AI", (0, 0), WHITE);

        // Top row of 'A' is .###.
        assert_eq!(*canvas.get_pixel(0, 0), Rgb([0, 0, 0]));
        assert_eq!(*canvas.get_pixel(1, 0), WHITE);
        assert_eq!(*canvas.get_pixel(3, 0), WHITE);
        assert_eq!(*canvas.get_pixel(4, 0), Rgb([0, 0, 0]));
        // Stem of 'I' sits in the middle column of the second cell
        assert_eq!(*canvas.get_pixel(8, 3), WHITE);
        assert_eq!(*canvas.get_pixel(7, 3), Rgb([0, 0, 0]));
    }

    #[test]
    fn bitmap_draw_clips_at_edges() {
        let mut canvas = RgbImage::new(4, 4);
        let font = LabelFont::Bitmap { scale: 2 };
        font.draw(&mut canvas, "AI", (-3, -3), WHITE);
        font.draw(&mut canvas, "AI", (3, 3), WHITE);
        assert_eq!(canvas.dimensions(), (4, 4));
    }

    #[test]
    fn lowercase_uses_uppercase_glyphs() {
        assert_eq!(bitmap_glyph('a'), bitmap_glyph('A'));
        assert_ne!(bitmap_glyph('%'), bitmap_glyph(' '));
    }

    #[test]
    fn unreadable_font_file_is_skipped() {
        let dir = tempfile::TempDir::new().unwrap();
        let bogus = dir.path().join("bogus.ttf");
        std::fs::write(&bogus, b"not a font").unwrap();

        assert!(load_face(&bogus).is_none());
        assert!(load_face(&dir.path().join("missing.ttf")).is_none());
    }

    #[test]
    fn blend_respects_coverage() {
        let under = Rgb([0, 0, 0]);
        assert_eq!(blend(under, WHITE, 0.0), under);
        assert_eq!(blend(under, WHITE, 1.0), WHITE);
        assert_eq!(blend(under, WHITE, 0.5), Rgb([128, 128, 128]));
    }
}
