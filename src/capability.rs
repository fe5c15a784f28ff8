//! Startup check for the PNG encoder
//!
//! PNG support is the `png` crate feature. A binary built without it cannot
//! draw anything useful, so the run stops before touching the filesystem and
//! tells the user how to get a working build.

use crate::error::{IconError, Result};
use crate::icon_gen::encode_png;
use image::RgbImage;

/// Encode a 1x1 image to confirm the PNG encoder is compiled in
pub fn probe_png() -> Result<()> {
    encode_png(&RgbImage::new(1, 1)).map(|_| ())
}

/// Lines printed when the encoder is missing
pub fn reinstall_instructions(err: &IconError) -> Vec<String> {
    vec![
        format!("{err}"),
        String::new(),
        "Rebuild icon-gen with PNG support and run it again:".to_string(),
        "  cargo install --path . --features png".to_string(),
        "  icon-gen".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "png")]
    #[test]
    fn default_build_can_encode_png() {
        assert!(probe_png().is_ok());
    }

    #[cfg(not(feature = "png"))]
    #[test]
    fn build_without_png_reports_missing_capability() {
        let err = probe_png().unwrap_err();
        assert!(err.is_missing_capability());
    }

    #[test]
    fn instructions_name_the_feature_and_rerun() {
        let err = IconError::MissingCapability {
            format: "PNG",
            reason: "format not supported".to_string(),
        };
        let lines = reinstall_instructions(&err);
        assert!(lines[0].contains("PNG"));
        assert!(lines.iter().any(|l| l.contains("--features png")));
        assert_eq!(lines.last().map(String::as_str), Some("  icon-gen"));
    }
}
