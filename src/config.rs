//! Icon set configuration shared by the renderer batch and the manifest updater
//!
//! Output file names and manifest keys are both derived from [`IconConfig`],
//! so the set of sizes written to disk always matches the set registered
//! in the manifest.

use crate::error::ConfigError;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Sizes generated when none are configured
pub const DEFAULT_SIZES: [u32; 4] = [16, 32, 48, 128];

/// Directory (relative to the extension root) holding the icons
pub const DEFAULT_ICONS_DIR: &str = "icons";

/// Manifest file name (relative to the extension root)
pub const DEFAULT_MANIFEST: &str = "manifest.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconConfig {
    /// Ordered pixel sizes; each produces one square PNG
    pub sizes: Vec<u32>,

    /// Icons directory, relative to the extension root
    pub icons_dir: PathBuf,

    /// Manifest path, relative to the extension root
    pub manifest_path: PathBuf,

    /// Font file tried before the system font list
    pub font_path: Option<PathBuf>,
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            sizes: DEFAULT_SIZES.to_vec(),
            icons_dir: PathBuf::from(DEFAULT_ICONS_DIR),
            manifest_path: PathBuf::from(DEFAULT_MANIFEST),
            font_path: None,
        }
    }
}

impl IconConfig {
    /// Checks that the size list is non-empty, positive, and free of duplicates
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sizes.is_empty() {
            return Err(ConfigError::NoSizes);
        }

        let mut seen = HashSet::new();
        for &size in &self.sizes {
            if size == 0 {
                return Err(ConfigError::ZeroSize);
            }
            if !seen.insert(size) {
                return Err(ConfigError::DuplicateSize(size));
            }
        }

        Ok(())
    }

    /// Manifest-facing path for a size, always with forward slashes
    /// (`icons/icon16.png` with the default directory)
    pub fn icon_path(&self, size: u32) -> String {
        let dir = self
            .icons_dir
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if dir.is_empty() {
            format!("icon{size}.png")
        } else {
            format!("{dir}/icon{size}.png")
        }
    }

    /// On-disk location of the icon for `size` under `root`
    pub fn icon_file(&self, size: u32, root: &Path) -> PathBuf {
        root.join(&self.icons_dir).join(format!("icon{size}.png"))
    }

    /// On-disk location of the manifest under `root`
    pub fn manifest_file(&self, root: &Path) -> PathBuf {
        root.join(&self.manifest_path)
    }

    /// The `"{size}": "{icon_path}"` map written into the manifest, in size-list order
    pub fn icon_entries(&self) -> Map<String, Value> {
        self.sizes
            .iter()
            .map(|&size| (size.to_string(), Value::String(self.icon_path(size))))
            .collect()
    }
}
