use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::color::ColorScale;

/// Directory name under the platform config dir.
pub const APP_NAME: &str = "petro-viewer";

/// Per data path (tabular vs well log) display settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathConfig {
    pub color_scale: ColorScale,
    /// Suggested file name for the filtered download.
    pub download_name: String,
}

/// Viewer settings, read from `<config_dir>/petro-viewer/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    /// Number of histogram bins.
    pub histogram_bins: usize,
    /// Scatter point radius in screen points.
    pub point_radius: f32,
    pub tabular: PathConfig,
    pub well_log: PathConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            histogram_bins: 50,
            point_radius: 2.5,
            tabular: PathConfig {
                color_scale: ColorScale::Viridis,
                download_name: "filtered_data.csv".to_string(),
            },
            well_log: PathConfig {
                color_scale: ColorScale::Plasma,
                download_name: "filtered_las_data.csv".to_string(),
            },
        }
    }
}

impl ViewerConfig {
    /// Default config file location, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_NAME).join("config.toml"))
    }

    /// Load settings. An explicit path must exist; a missing default file
    /// means defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) if p.exists() => p,
                _ => return Ok(Self::default()),
            },
        };
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = Self::from_toml(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: ViewerConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.histogram_bins == 0 {
            bail!("histogram_bins must be at least 1");
        }
        if !(self.point_radius.is_finite() && self.point_radius > 0.0) {
            bail!("point_radius must be a positive number");
        }
        for (name, path) in [("tabular", &self.tabular), ("well_log", &self.well_log)] {
            if path.download_name.trim().is_empty() {
                bail!("{name}.download_name must not be empty");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(ViewerConfig::from_toml("").unwrap(), ViewerConfig::default());
    }

    #[test]
    fn partial_override() {
        let cfg = ViewerConfig::from_toml(
            r#"
histogram_bins = 20

[well_log]
color_scale = "viridis"
download_name = "zone.csv"
"#,
        )
        .unwrap();
        assert_eq!(cfg.histogram_bins, 20);
        assert_eq!(cfg.well_log.color_scale, ColorScale::Viridis);
        assert_eq!(cfg.tabular, ViewerConfig::default().tabular);
    }

    #[test]
    fn rejects_unknown_keys_and_zero_bins() {
        assert!(ViewerConfig::from_toml("bins = 3").is_err());
        assert!(ViewerConfig::from_toml("histogram_bins = 0").is_err());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        assert!(ViewerConfig::load(Some(Path::new("/nonexistent/petro.toml"))).is_err());
    }

    #[test]
    fn defaults_serialize_back() {
        let text = toml::to_string(&ViewerConfig::default()).unwrap();
        assert_eq!(ViewerConfig::from_toml(&text).unwrap(), ViewerConfig::default());
    }
}
