//! Generator configuration.
//!
//! Defaults reproduce the fixed layout of a web app's `public/` directory:
//! `icon-base.svg` rendered to 192×192 and 512×512 PNGs next to it.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_SOURCE: &str = "public/icon-base.svg";
pub const DEFAULT_OUTPUT_DIR: &str = "public";
pub const DEFAULT_SIZES: [u32; 2] = [192, 512];

/// Largest accepted side length; a 16384² RGBA pixmap is already 1 GiB.
pub const MAX_SIZE: u32 = 16384;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// SVG file to rasterize.
    pub source_path: PathBuf,

    /// Directory receiving `icon-{size}x{size}.png` files.
    pub output_dir: PathBuf,

    /// Square side lengths in pixels, processed in order.
    pub sizes: Vec<u32>,

    /// Re-save every PNG through the optimizing encoder.
    pub optimize: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_path: PathBuf::from(DEFAULT_SOURCE),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            sizes: DEFAULT_SIZES.to_vec(),
            optimize: true,
        }
    }
}

impl Config {
    /// Read a JSON config file. Missing fields fall back to their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(pos) = self.sizes.iter().position(|&size| size == 0) {
            anyhow::bail!("Icon sizes must be positive (entry {} is 0)", pos);
        }
        if let Some(&size) = self.sizes.iter().find(|&&size| size > MAX_SIZE) {
            anyhow::bail!("Icon size {} exceeds the maximum of {}", size, MAX_SIZE);
        }
        Ok(())
    }

    pub fn output_path(&self, size: u32) -> PathBuf {
        self.output_dir.join(format!("icon-{size}x{size}.png"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_matches_public_layout() {
        let config = Config::default();
        assert_eq!(config.source_path, PathBuf::from("public/icon-base.svg"));
        assert_eq!(config.sizes, vec![192, 512]);
        assert!(config.optimize);
        assert_eq!(
            config.output_path(192),
            PathBuf::from("public").join("icon-192x192.png")
        );
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("icons.json");
        std::fs::write(&path, r#"{ "sizes": [48, 96, 48] }"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.sizes, vec![48, 96, 48]);
        assert_eq!(config.output_dir, PathBuf::from("public"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unknown_field_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("icons.json");
        std::fs::write(&path, r#"{ "quality": 95 }"#).unwrap();

        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn missing_file_names_path() {
        let err = Config::load(Path::new("does/not/exist.json")).unwrap_err();
        assert!(err.to_string().contains("does/not/exist.json"));
    }

    #[test]
    fn zero_size_fails_validation() {
        let config = Config {
            sizes: vec![192, 0],
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("entry 1"));
    }

    #[test]
    fn oversized_entry_fails_validation() {
        let config = Config {
            sizes: vec![192, 65536],
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("65536"));

        let at_limit = Config {
            sizes: vec![MAX_SIZE],
            ..Config::default()
        };
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn empty_sizes_are_valid() {
        let config = Config {
            sizes: Vec::new(),
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }
}
