use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::EdaError;

pub const DEFAULT_INPUT: &str = "WineQT.csv";
pub const DEFAULT_OUTPUT_DIR: &str = "outputs";

/// Largest figure side accepted, in pixels.
pub const MAX_FIGURE_PIXELS: u32 = 16_384;

/// Plot rendering settings. Figure sizes are in inches; pixels = inches × dpi.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    pub dpi: u32,
    pub bins: usize,
    pub histogram_size: [u32; 2],
    pub heatmap_size: [u32; 2],
    pub boxplot_size: [u32; 2],
    /// TrueType font for chart text; system fonts are searched when unset
    pub font: Option<PathBuf>,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            dpi: 150,
            bins: 30,
            histogram_size: [14, 10],
            heatmap_size: [10, 8],
            boxplot_size: [12, 8],
            font: None,
        }
    }
}

impl PlotConfig {
    /// Pixel dimensions of a figure size at the configured DPI.
    ///
    /// Saturates instead of overflowing; [`PlotConfig::validate`] rejects
    /// settings that would get that far.
    pub fn pixels(&self, size: [u32; 2]) -> (u32, u32) {
        (
            size[0].saturating_mul(self.dpi),
            size[1].saturating_mul(self.dpi),
        )
    }

    /// Reject settings no figure can be drawn with.
    pub fn validate(&self) -> Result<(), EdaError> {
        if self.dpi == 0 {
            return Err(EdaError::InvalidConfig("plots.dpi must be positive".to_string()));
        }
        if self.bins == 0 {
            return Err(EdaError::InvalidConfig("plots.bins must be positive".to_string()));
        }

        let figures = [
            ("histogram_size", self.histogram_size),
            ("heatmap_size", self.heatmap_size),
            ("boxplot_size", self.boxplot_size),
        ];
        for (name, size) in figures {
            if size.contains(&0) {
                return Err(EdaError::InvalidConfig(format!(
                    "plots.{name} must have positive width and height"
                )));
            }
            for side in size {
                match side.checked_mul(self.dpi) {
                    Some(px) if px <= MAX_FIGURE_PIXELS => {}
                    _ => {
                        return Err(EdaError::InvalidConfig(format!(
                            "plots.{name} at {} dpi exceeds {MAX_FIGURE_PIXELS} pixels",
                            self.dpi
                        )))
                    }
                }
            }
        }
        Ok(())
    }
}

/// Run configuration: where to read, where to write, how to plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdaConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    /// Rows shown in the console preview
    pub head_rows: usize,
    pub plots: PlotConfig,
}

impl Default for EdaConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            head_rows: 5,
            plots: PlotConfig::default(),
        }
    }
}

impl EdaConfig {
    /// Parse a TOML document; missing keys take defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, EdaError> {
        let config: Self = toml::from_str(s)?;
        config.plots.validate()?;
        Ok(config)
    }

    /// Load a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EdaError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }
}
