use anyhow::{Context, Result};
use clap::Parser;
use ext_icons::{
    capability,
    icon_gen::{
        self, IconConfig, Palette, DEFAULT_LABEL, DEFAULT_OUTPUT_DIR, DEFAULT_SIZES, MAX_SIZE,
    },
    manifest,
};
use image::Rgb;
use std::{path::PathBuf, str::FromStr};

#[derive(Debug, Parser)]
#[clap(
    name = "icon-gen",
    about = "Generate the placeholder icons bundled with the browser extension"
)]
struct Args {
    /// Output directory.
    #[clap(short, long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    output: PathBuf,

    /// Icon sizes to generate, in pixels (repeats are written once).
    #[clap(
        short,
        long,
        value_delimiter = ',',
        value_name = "SIZES",
        default_values_t = DEFAULT_SIZES,
        value_parser = clap::value_parser!(u32).range(1..=MAX_SIZE as i64)
    )]
    sizes: Vec<u32>,

    /// Text drawn in the middle of every icon.
    #[clap(long, default_value = DEFAULT_LABEL)]
    label: String,

    /// TrueType font to try before the system fonts.
    #[clap(long, value_name = "PATH")]
    font: Option<PathBuf>,

    /// Background fill (CSS color format)
    #[clap(long, value_name = "COLOR", default_value = "#2563eb", value_parser = parse_color)]
    background: Rgb<u8>,

    /// Border color (CSS color format)
    #[clap(long, value_name = "COLOR", default_value = "#1e40af", value_parser = parse_color)]
    border: Rgb<u8>,

    /// Label shadow color (CSS color format)
    #[clap(long, value_name = "COLOR", default_value = "#1e3a8a", value_parser = parse_color)]
    shadow: Rgb<u8>,

    /// Label color (CSS color format)
    #[clap(long, value_name = "COLOR", default_value = "#ffffff", value_parser = parse_color)]
    foreground: Rgb<u8>,

    /// Also write icons.json with the manifest `icons` entries
    #[clap(long)]
    manifest: bool,
}

impl Args {
    fn config(&self) -> IconConfig {
        IconConfig {
            output_dir: self.output.clone(),
            sizes: icon_gen::unique_sizes(&self.sizes),
            label: self.label.clone(),
            palette: Palette {
                background: self.background,
                border: self.border,
                shadow: self.shadow,
                foreground: self.foreground,
            },
            font_path: self.font.clone(),
        }
    }
}

fn parse_color(value: &str) -> std::result::Result<Rgb<u8>, String> {
    css_color::Srgb::from_str(value)
        .map(|color| {
            Rgb([
                (color.red * 255.).round() as u8,
                (color.green * 255.).round() as u8,
                (color.blue * 255.).round() as u8,
            ])
        })
        .map_err(|_| format!("invalid CSS color: {value}"))
}

fn run(config: &IconConfig, write_manifest: bool) -> ext_icons::Result<()> {
    capability::probe_png()?;

    let written = icon_gen::generate_all(config)?;
    if write_manifest {
        manifest::write_manifest(&config.output_dir, &written)?;
    }

    println!("\n✓ All icons created successfully!");
    println!("Run 'npm run build' to rebuild the extension with icons.");
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = args.config();

    match run(&config, args.manifest) {
        Err(err) if err.is_missing_capability() => {
            for line in capability::reinstall_instructions(&err) {
                println!("{line}");
            }
            Ok(())
        }
        result => result.with_context(|| {
            format!("Failed to generate icons in {}", config.output_dir.display())
        }),
    }
}
