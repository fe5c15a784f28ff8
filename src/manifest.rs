//! `icons.json` fragment for the extension manifest
//!
//! Mirrors the `icons` key of a browser extension `manifest.json`, so the
//! generated block can be pasted (or merged by the build) as-is.

use crate::error::{IconError, Result};
use crate::icon_gen::IconSpec;
use serde::Serialize;
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

pub const MANIFEST_FILE: &str = "icons.json";

/// Root of the manifest fragment
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct IconManifest {
    /// Icon path per pixel size, relative to the extension root
    pub icons: BTreeMap<u32, String>,
}

impl IconManifest {
    /// Build the fragment for icons written into `output_dir`
    pub fn from_specs(output_dir: &Path, specs: &[IconSpec]) -> Self {
        let prefix = output_dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());

        let icons = specs
            .iter()
            .map(|spec| {
                let file = spec
                    .output_path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| format!("icon{}.png", spec.size));
                let path = match &prefix {
                    Some(dir) => format!("{dir}/{file}"),
                    None => file,
                };
                (spec.size, path)
            })
            .collect();

        IconManifest { icons }
    }
}

/// Write `icons.json` next to the icons
pub fn write_manifest(output_dir: &Path, specs: &[IconSpec]) -> Result<PathBuf> {
    let manifest = IconManifest::from_specs(output_dir, specs);
    let path = output_dir.join(MANIFEST_FILE);

    let json = serde_json::to_string_pretty(&manifest)
        .map_err(|err| IconError::filesystem(&path, err.into()))?;
    std::fs::write(&path, json).map_err(|err| IconError::filesystem(&path, err))?;

    println!("Created {}", path.display());
    Ok(path)
}
