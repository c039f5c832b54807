//! Aesthetic mappings for Grammar of Graphics.
//!
//! Maps data columns to visual properties. Evaluating a mapping produces a
//! frame whose columns are named after the aesthetics, which is what stats
//! and geoms consume.

use crate::color::Rgba;
use crate::error::{Error, Result};

use super::data::DataFrame;

/// Aesthetic mapping specification.
#[derive(Debug, Clone, Default)]
pub struct Aes {
    /// X position mapping (column name).
    pub x: Option<String>,
    /// Y position mapping (column name).
    pub y: Option<String>,
    /// X end position mapping (column name).
    pub xend: Option<String>,
    /// Y end position mapping (column name).
    pub yend: Option<String>,
    /// Color mapping (column name).
    pub color: Option<String>,
    /// Group mapping (column name).
    pub group: Option<String>,
    /// Spring diameter mapping (column name).
    pub diameter: Option<String>,
    /// Spring tension mapping (column name).
    pub tension: Option<String>,

    // Fixed values (not data-mapped)
    /// Fixed color value.
    pub color_value: Option<Rgba>,
    /// Fixed size value (line width or point size, in pixels).
    pub size_value: Option<f32>,
    /// Fixed alpha value.
    pub alpha_value: Option<f32>,
}

impl Aes {
    /// Create a new aesthetic mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Map x position to a column.
    #[must_use]
    pub fn x(mut self, column: &str) -> Self {
        self.x = Some(column.to_string());
        self
    }

    /// Map y position to a column.
    #[must_use]
    pub fn y(mut self, column: &str) -> Self {
        self.y = Some(column.to_string());
        self
    }

    /// Map x end position to a column.
    #[must_use]
    pub fn xend(mut self, column: &str) -> Self {
        self.xend = Some(column.to_string());
        self
    }

    /// Map y end position to a column.
    #[must_use]
    pub fn yend(mut self, column: &str) -> Self {
        self.yend = Some(column.to_string());
        self
    }

    /// Map color to a column.
    #[must_use]
    pub fn color(mut self, column: &str) -> Self {
        self.color = Some(column.to_string());
        self
    }

    /// Map group to a column.
    #[must_use]
    pub fn group(mut self, column: &str) -> Self {
        self.group = Some(column.to_string());
        self
    }

    /// Map spring diameter to a column.
    #[must_use]
    pub fn diameter(mut self, column: &str) -> Self {
        self.diameter = Some(column.to_string());
        self
    }

    /// Map spring tension to a column.
    #[must_use]
    pub fn tension(mut self, column: &str) -> Self {
        self.tension = Some(column.to_string());
        self
    }

    /// Set a fixed color value.
    #[must_use]
    pub fn color_value(mut self, color: Rgba) -> Self {
        self.color_value = Some(color);
        self
    }

    /// Set a fixed size value.
    #[must_use]
    pub fn size_value(mut self, size: f32) -> Self {
        self.size_value = Some(size);
        self
    }

    /// Set a fixed alpha value.
    #[must_use]
    pub fn alpha_value(mut self, alpha: f32) -> Self {
        self.alpha_value = Some(alpha.clamp(0.0, 1.0));
        self
    }

    /// Merge another Aes, with other taking precedence.
    #[must_use]
    pub fn merge(&self, other: &Aes) -> Aes {
        Aes {
            x: other.x.clone().or_else(|| self.x.clone()),
            y: other.y.clone().or_else(|| self.y.clone()),
            xend: other.xend.clone().or_else(|| self.xend.clone()),
            yend: other.yend.clone().or_else(|| self.yend.clone()),
            color: other.color.clone().or_else(|| self.color.clone()),
            group: other.group.clone().or_else(|| self.group.clone()),
            diameter: other.diameter.clone().or_else(|| self.diameter.clone()),
            tension: other.tension.clone().or_else(|| self.tension.clone()),
            color_value: other.color_value.or(self.color_value),
            size_value: other.size_value.or(self.size_value),
            alpha_value: other.alpha_value.or(self.alpha_value),
        }
    }

    /// The data-mapped aesthetics as `(aesthetic, column)` pairs.
    #[must_use]
    pub fn mappings(&self) -> Vec<(&'static str, &str)> {
        [
            ("x", &self.x),
            ("y", &self.y),
            ("xend", &self.xend),
            ("yend", &self.yend),
            ("color", &self.color),
            ("group", &self.group),
            ("diameter", &self.diameter),
            ("tension", &self.tension),
        ]
        .into_iter()
        .filter_map(|(aes, col)| col.as_deref().map(|c| (aes, c)))
        .collect()
    }

    /// Evaluate the mappings against `data`.
    ///
    /// The result has one column per mapped aesthetic, named after the
    /// aesthetic, and as many rows as `data`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownColumn`] if a mapping names a missing column.
    pub fn map(&self, data: &DataFrame) -> Result<DataFrame> {
        let mut mapped = DataFrame::new();
        for (aesthetic, column) in self.mappings() {
            let values = data
                .get(column)
                .ok_or_else(|| Error::UnknownColumn { aesthetic, column: column.to_string() })?;
            mapped.add_column(aesthetic, values.to_vec());
        }
        Ok(mapped)
    }
}
