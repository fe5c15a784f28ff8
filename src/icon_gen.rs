use crate::error::{IconError, Result};
use crate::font::LabelFont;
use image::{ImageFormat, Rgb, RgbImage};
use log::debug;
use std::{
    fs::create_dir_all,
    io::Cursor,
    path::{Path, PathBuf},
};

/// Icon sizes written by a default run
pub const DEFAULT_SIZES: [u32; 4] = [16, 32, 48, 128];
/// Output directory of a default run, relative to the extension root
pub const DEFAULT_OUTPUT_DIR: &str = "public/icons";
pub const DEFAULT_LABEL: &str = "AI";
/// Largest icon edge accepted, in pixels
pub const MAX_SIZE: u32 = 4096;

/// Colors used to draw an icon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgb<u8>,
    pub border: Rgb<u8>,
    pub shadow: Rgb<u8>,
    pub foreground: Rgb<u8>,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            background: Rgb([0x25, 0x63, 0xeb]),
            border: Rgb([0x1e, 0x40, 0xaf]),
            shadow: Rgb([0x1e, 0x3a, 0x8a]),
            foreground: Rgb([0xff, 0xff, 0xff]),
        }
    }
}

/// Everything a run needs; `Default` reproduces the fixed icon set
#[derive(Debug, Clone)]
pub struct IconConfig {
    pub output_dir: PathBuf,
    pub sizes: Vec<u32>,
    pub label: String,
    pub palette: Palette,
    /// Font tried before the platform candidates
    pub font_path: Option<PathBuf>,
}

impl Default for IconConfig {
    fn default() -> Self {
        IconConfig {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            sizes: DEFAULT_SIZES.to_vec(),
            label: DEFAULT_LABEL.to_string(),
            palette: Palette::default(),
            font_path: None,
        }
    }
}

/// One icon to produce
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconSpec {
    pub size: u32,
    pub output_path: PathBuf,
}

impl IconSpec {
    pub fn new(size: u32, out_dir: &Path) -> Self {
        IconSpec {
            size,
            output_path: out_dir.join(format!("icon{size}.png")),
        }
    }
}

/// Reject sizes the renderer cannot draw before anything is written
pub fn check_size(size: u32) -> Result<()> {
    if size == 0 || size > MAX_SIZE {
        return Err(IconError::InvalidSize {
            size,
            max: MAX_SIZE,
        });
    }
    Ok(())
}

/// Sizes in first-seen order with repeats removed
pub fn unique_sizes(sizes: &[u32]) -> Vec<u32> {
    let mut seen = Vec::with_capacity(sizes.len());
    for &size in sizes {
        if seen.contains(&size) {
            debug!("Skipping repeated size {size}");
            continue;
        }
        seen.push(size);
    }
    seen
}

pub fn border_width(size: u32) -> u32 {
    (size / 16).max(1)
}

pub fn shadow_offset(size: u32) -> u32 {
    (size / 32).max(1)
}

pub fn font_size(size: u32) -> u32 {
    (size / 2).max(1)
}

/// Top-left anchor of a `text_width` x `text_height` label, nudged up by a tenth of the icon
pub fn label_position(size: u32, text_width: u32, text_height: u32) -> (i32, i32) {
    let size = size as i32;
    (
        (size - text_width as i32).div_euclid(2),
        (size - text_height as i32).div_euclid(2) - size / 10,
    )
}

/// Draw an icon, loading the label font for its size
pub fn render_icon(size: u32, config: &IconConfig) -> RgbImage {
    let font = LabelFont::load(font_size(size), config.font_path.as_deref());
    if font.is_fallback() {
        debug!("Drawing {size}x{size} label with the bitmap font");
    }
    render_icon_with_font(size, config, &font)
}

/// Draw an icon with an already chosen label font
pub fn render_icon_with_font(size: u32, config: &IconConfig, font: &LabelFont) -> RgbImage {
    let palette = &config.palette;
    let mut img = RgbImage::from_pixel(size, size, palette.background);

    let bw = border_width(size);
    stroke_rect(&mut img, bw, bw, size - bw, size - bw, bw, palette.border);

    let bounds = font.measure(&config.label);
    let (x, y) = label_position(size, bounds.width, bounds.height);

    let offset = shadow_offset(size) as i32;
    font.draw(&mut img, &config.label, (x + offset, y + offset), palette.shadow);
    font.draw(&mut img, &config.label, (x, y), palette.foreground);

    img
}

/// Outline the inclusive rectangle (x0, y0)..=(x1, y1) with a stroke growing inward
fn stroke_rect(
    img: &mut RgbImage,
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
    width: u32,
    color: Rgb<u8>,
) {
    if width == 0 || x0 > x1 || y0 > y1 {
        return;
    }
    let inner = width - 1;

    fill_rect(img, x0, y0, x1, y0 + inner, color);
    fill_rect(img, x0, y1.saturating_sub(inner), x1, y1, color);
    fill_rect(img, x0, y0, x0 + inner, y1, color);
    fill_rect(img, x1.saturating_sub(inner), y0, x1, y1, color);
}

fn fill_rect(img: &mut RgbImage, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgb<u8>) {
    let x1 = x1.min(img.width().saturating_sub(1));
    let y1 = y1.min(img.height().saturating_sub(1));
    for y in y0..=y1 {
        for x in x0..=x1 {
            img.put_pixel(x, y, color);
        }
    }
}

/// Encode an icon as PNG in memory
pub fn encode_png(img: &RgbImage) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)
        .map_err(|err| IconError::MissingCapability {
            format: "PNG",
            reason: err.to_string(),
        })?;
    Ok(buf.into_inner())
}

/// Write an icon to `path`, creating parent directories as needed
pub fn save_icon(img: &RgbImage, path: &Path) -> Result<()> {
    let data = encode_png(img)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent).map_err(|err| IconError::filesystem(parent, err))?;
    }
    std::fs::write(path, data).map_err(|err| IconError::filesystem(path, err))?;
    Ok(())
}

/// Render one icon and write it to `output_path`
pub fn generate_icon(size: u32, output_path: &Path, config: &IconConfig) -> Result<PathBuf> {
    check_size(size)?;
    let img = render_icon(size, config);
    save_icon(&img, output_path)?;
    println!("Created {}", output_path.display());
    Ok(output_path.to_path_buf())
}

/// Write every configured size in order, stopping at the first failure
///
/// Repeated sizes are written once. All sizes are checked before the output
/// directory is created.
pub fn generate_all(config: &IconConfig) -> Result<Vec<IconSpec>> {
    let sizes = unique_sizes(&config.sizes);
    for &size in &sizes {
        check_size(size)?;
    }

    create_dir_all(&config.output_dir)
        .map_err(|err| IconError::filesystem(&config.output_dir, err))?;
    debug!("Writing icons to {}", config.output_dir.display());

    let mut written = Vec::with_capacity(sizes.len());
    for size in sizes {
        let spec = IconSpec::new(size, &config.output_dir);
        generate_icon(spec.size, &spec.output_path, config)?;
        written.push(spec);
    }
    Ok(written)
}
