//! Plot configuration.
//!
//! Defaults for plot size, theme and spring layers can be kept in a YAML
//! file:
//!
//! ```yaml
//! width: 1024
//! height: 768
//! theme: minimal
//! spring:
//!   diameter: 0.5
//!   tension: 1.2
//! tension_range: [0.2, 2.0]
//! na_rm: true
//! ```
//!
//! Missing keys take their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::grammar::{GGPlot, Geom, Layer, Theme};
use crate::scale::RescaleScale;
use crate::spring::SpringParams;

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotConfig {
    /// Configuration version.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Plot width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,

    /// Plot height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,

    /// Theme preset name.
    #[serde(default = "default_theme")]
    pub theme: String,

    /// Plot title.
    #[serde(default)]
    pub title: Option<String>,

    /// Parameters for spring layers.
    #[serde(default)]
    pub spring: SpringParams,

    /// Output range of the tension scale.
    #[serde(default = "default_tension_range")]
    pub tension_range: (f32, f32),

    /// Drop rows with missing values without warning.
    #[serde(default)]
    pub na_rm: bool,
}

fn default_version() -> u32 {
    1
}
fn default_width() -> u32 {
    800
}
fn default_height() -> u32 {
    600
}
fn default_theme() -> String {
    "grey".to_string()
}
fn default_tension_range() -> (f32, f32) {
    RescaleScale::TENSION_RANGE
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            width: default_width(),
            height: default_height(),
            theme: default_theme(),
            title: None,
            spring: SpringParams::default(),
            tension_range: default_tension_range(),
            na_rm: false,
        }
    }
}

impl PlotConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| Error::ConfigNotFound(path.display().to_string()))?;

        let config = Self::parse(&content)?;
        debug!(path = %path.display(), theme = %config.theme, "loaded plot config");
        Ok(config)
    }

    /// Parses configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error with line number if parsing fails.
    pub fn parse(yaml: &str) -> Result<Self> {
        serde_yaml_ng::from_str(yaml).map_err(|e| {
            let line = e.location().map_or(0, |l| l.line());
            Error::ConfigParse { line, message: e.to_string() }
        })
    }

    /// Loads configuration with fallback to defaults.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Serializes the configuration to YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml_ng::to_string(self).map_err(|e| Error::ConfigParse { line: 0, message: e.to_string() })
    }

    /// The configured theme preset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownTheme`] for an unrecognised name.
    pub fn theme(&self) -> Result<Theme> {
        Theme::by_name(&self.theme).ok_or_else(|| Error::UnknownTheme(self.theme.clone()))
    }

    /// A spring layer using the configured parameters.
    #[must_use]
    pub fn spring_layer(&self) -> Layer {
        let geom = Geom::spring()
            .diameter(self.spring.diameter)
            .tension(self.spring.tension)
            .n(self.spring.n);
        Layer::new(geom).na_rm(self.na_rm)
    }

    /// Apply size, theme, title and tension range to a plot.
    ///
    /// # Errors
    ///
    /// Returns an error if the theme name is unknown or the spring
    /// parameters are invalid.
    pub fn apply(&self, plot: GGPlot) -> Result<GGPlot> {
        self.spring.validate()?;
        let mut plot = plot
            .dimensions(self.width, self.height)
            .theme(self.theme()?)
            .scale_tension(self.tension_range.0, self.tension_range.1);
        if let Some(title) = &self.title {
            plot = plot.title(title.clone());
        }
        Ok(plot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = PlotConfig::new();
        assert_eq!(config.version, 1);
        assert_eq!((config.width, config.height), (800, 600));
        assert_eq!(config.spring, SpringParams::default());
        assert_eq!(config.tension_range, (0.1, 1.0));
        assert!(!config.na_rm);
    }

    #[test]
    fn test_config_parse_minimal() {
        let config = PlotConfig::parse("width: 320").unwrap();
        assert_eq!(config.width, 320);
        assert_eq!(config.height, 600);
        assert_eq!(config.theme, "grey");
    }

    #[test]
    fn test_config_parse_full() {
        let yaml = r"
version: 1
width: 1024
height: 768
theme: dark
title: Springs
spring:
  diameter: 0.5
  n: 20
tension_range: [0.2, 2.0]
na_rm: true
";
        let config = PlotConfig::parse(yaml).unwrap();
        assert_eq!(config.theme, "dark");
        assert_eq!(config.title.as_deref(), Some("Springs"));
        assert_eq!(config.spring.diameter, 0.5);
        assert_eq!(config.spring.tension, SpringParams::DEFAULT_TENSION);
        assert_eq!(config.spring.n, 20);
        assert_eq!(config.tension_range, (0.2, 2.0));
        assert!(config.na_rm);
    }

    #[test]
    fn test_config_parse_error_includes_line() {
        let yaml = "
width: 100
spring:
  n: lots
";
        let err = PlotConfig::parse(yaml).unwrap_err();
        match &err {
            Error::ConfigParse { line, .. } => assert_eq!(*line, 4),
            other => panic!("unexpected error {other:?}"),
        }
        assert!(err.to_string().contains("line 4"));
    }

    #[test]
    fn test_config_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "theme: bw\nheight: 300").unwrap();
        let config = PlotConfig::load(file.path()).unwrap();
        assert_eq!(config.theme, "bw");
        assert_eq!(config.height, 300);
    }

    #[test]
    fn test_config_load_missing_file() {
        let err = PlotConfig::load("/nonexistent/spring.yaml").unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound(_)));
        assert_eq!(PlotConfig::load_or_default("/nonexistent/spring.yaml"), PlotConfig::default());
    }

    #[test]
    fn test_config_yaml_roundtrip() {
        let config = PlotConfig { theme: "void".into(), na_rm: true, ..PlotConfig::default() };
        let yaml = config.to_yaml().unwrap();
        assert_eq!(PlotConfig::parse(&yaml).unwrap(), config);
    }

    #[test]
    fn test_unknown_theme() {
        let config = PlotConfig { theme: "neon".into(), ..PlotConfig::default() };
        assert!(matches!(config.theme(), Err(Error::UnknownTheme(name)) if name == "neon"));
        assert!(config.apply(GGPlot::new()).is_err());
    }

    #[test]
    fn test_apply_rejects_invalid_spring() {
        let mut config = PlotConfig::default();
        config.spring.tension = 0.0;
        assert!(matches!(config.apply(GGPlot::new()), Err(Error::InvalidParameter { name: "tension", .. })));
    }

    #[test]
    fn test_spring_layer_uses_config() {
        let mut config = PlotConfig::default();
        config.spring.n = 10;
        config.na_rm = true;
        let layer = config.spring_layer();
        assert!(layer.na_rm);
        assert_eq!(layer.geom.spring_params().map(|p| p.n), Some(10));
    }

    #[test]
    fn test_apply_configures_plot() {
        let config = PlotConfig::parse("width: 200\nheight: 100\ntheme: void\ntension_range: [1.0, 1.0]").unwrap();
        let plot = config
            .apply(GGPlot::new())
            .unwrap()
            .data_segments(&[0.0], &[0.0], &[3.0], &[0.0])
            .aes(crate::grammar::Aes::new().x("x").y("y").xend("xend").yend("yend").tension("x"))
            .layer(config.spring_layer())
            .build()
            .unwrap();
        // tension rescaled to 1.0: 3 revolutions at 50 points each
        assert_eq!(plot.layer_data(0).unwrap().nrow(), 150);
        let fb = plot.to_framebuffer().unwrap();
        assert_eq!((fb.width(), fb.height()), (200, 100));
    }
}
