//! Scale functions for data-to-visual mappings.
//!
//! Position scales map data coordinates to pixels. Non-position scales
//! rescale mapped values (tension) or resolve them to colours.
//! Based on the Grammar of Graphics [Wilkinson 2005].

use trueno::Vector;

use crate::color::{hue_palette, Rgba};
use crate::error::{Error, Result};
use crate::grammar::DataValue;

/// Colour used for missing values in colour mappings (grey50).
pub const NA_COLOR: Rgba = Rgba::rgb(127, 127, 127);

/// Trait for scale functions that map domain values to range values.
pub trait Scale<D, R> {
    /// Transform a domain value to a range value.
    fn scale(&self, value: D) -> R;

    /// Get the domain extent.
    fn domain(&self) -> (D, D);

    /// Get the range extent.
    fn range(&self) -> (R, R);
}

/// Linear scale for continuous-to-continuous mapping.
#[derive(Debug, Clone, Copy)]
pub struct LinearScale {
    domain_min: f32,
    domain_max: f32,
    range_min: f32,
    range_max: f32,
}

impl LinearScale {
    /// Create a new linear scale.
    ///
    /// # Errors
    ///
    /// Returns an error if the domain is empty or not finite.
    pub fn new(domain: (f32, f32), range: (f32, f32)) -> Result<Self> {
        if !domain.0.is_finite() || !domain.1.is_finite() {
            return Err(Error::ScaleDomain("Domain bounds must be finite".to_string()));
        }
        if (domain.0 - domain.1).abs() < f32::EPSILON {
            return Err(Error::ScaleDomain("Domain min and max cannot be equal".to_string()));
        }

        Ok(Self { domain_min: domain.0, domain_max: domain.1, range_min: range.0, range_max: range.1 })
    }

    /// Invert the scale (range to domain).
    #[must_use]
    pub fn invert(&self, value: f32) -> f32 {
        let t = (value - self.range_min) / (self.range_max - self.range_min);
        self.domain_min + t * (self.domain_max - self.domain_min)
    }

    /// Pixels per domain unit (signed).
    #[must_use]
    pub fn ratio(&self) -> f32 {
        (self.range_max - self.range_min) / (self.domain_max - self.domain_min)
    }
}

impl Scale<f32, f32> for LinearScale {
    fn scale(&self, value: f32) -> f32 {
        let t = (value - self.domain_min) / (self.domain_max - self.domain_min);
        self.range_min + t * (self.range_max - self.range_min)
    }

    fn domain(&self) -> (f32, f32) {
        (self.domain_min, self.domain_max)
    }

    fn range(&self) -> (f32, f32) {
        (self.range_min, self.range_max)
    }
}

/// Minimum and maximum of the finite values, or `None` if there are none.
///
/// The reduction runs on trueno's SIMD backend.
#[must_use]
pub fn extent(values: &[f32]) -> Option<(f32, f32)> {
    let finite: Vec<f32> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return None;
    }

    let vec = Vector::from_vec(finite);
    let min = vec.min().unwrap_or(f32::NAN);
    let max = vec.max().unwrap_or(f32::NAN);
    (min.is_finite() && max.is_finite()).then_some((min, max))
}

/// Continuous rescaling of a non-position aesthetic onto a fixed output range.
///
/// The default tension scale maps the observed tension values onto
/// `[0.1, 1.0]`, so arbitrary data columns produce sensible coils.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RescaleScale {
    to: (f32, f32),
}

impl Default for RescaleScale {
    fn default() -> Self {
        Self::tension()
    }
}

impl RescaleScale {
    /// Output range of the default tension scale.
    pub const TENSION_RANGE: (f32, f32) = (0.1, 1.0);

    /// Create a rescaling scale onto `[min, max]`.
    ///
    /// # Errors
    ///
    /// Returns an error if either bound is not finite.
    pub fn new(min: f32, max: f32) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(Error::ScaleDomain(format!("Invalid output range [{min}, {max}]")));
        }
        Ok(Self { to: (min, max) })
    }

    /// The default tension scale.
    #[must_use]
    pub const fn tension() -> Self {
        Self { to: Self::TENSION_RANGE }
    }

    /// Output range.
    #[must_use]
    pub const fn output_range(&self) -> (f32, f32) {
        self.to
    }

    /// Rescale values from their observed extent onto the output range.
    ///
    /// Missing values stay missing. A constant input maps to the middle of
    /// the output range.
    #[must_use]
    pub fn rescale(&self, values: &[Option<f32>]) -> Vec<Option<f32>> {
        let present: Vec<f32> = values.iter().filter_map(|v| *v).collect();
        let Some((min, max)) = extent(&present) else {
            return values.iter().map(|_| None).collect();
        };
        let (lo, hi) = self.to;
        let span = max - min;

        values
            .iter()
            .map(|v| {
                v.filter(|x| x.is_finite()).map(|x| {
                    if span.abs() < f32::EPSILON {
                        (lo + hi) / 2.0
                    } else {
                        lo + (x - min) / span * (hi - lo)
                    }
                })
            })
            .collect()
    }
}

/// Resolve a mapped colour column to one colour per row.
///
/// Any text value makes the mapping discrete: the distinct values are sorted
/// and assigned evenly spaced hues. Purely numeric columns use the default
/// continuous gradient. Missing values get [`NA_COLOR`].
#[must_use]
pub fn map_colors(values: &[DataValue]) -> Vec<Rgba> {
    let discrete = values.iter().any(|v| matches!(v, DataValue::Text(_)));

    if discrete {
        let mut levels: Vec<String> =
            values.iter().filter(|v| !v.is_null()).map(ToString::to_string).collect();
        levels.sort();
        levels.dedup();
        let palette = hue_palette(levels.len());

        return values
            .iter()
            .map(|v| {
                if v.is_null() {
                    return NA_COLOR;
                }
                let key = v.to_string();
                levels
                    .binary_search(&key)
                    .ok()
                    .and_then(|i| palette.get(i).copied())
                    .unwrap_or(NA_COLOR)
            })
            .collect();
    }

    let numbers: Vec<f32> = values.iter().filter_map(DataValue::as_f32).collect();
    let Some((min, max)) = extent(&numbers) else {
        return vec![NA_COLOR; values.len()];
    };
    let span = max - min;

    values
        .iter()
        .map(|v| match v.as_f32().filter(|x| x.is_finite()) {
            Some(x) if span > f32::EPSILON => {
                Rgba::GRADIENT_LOW.lerp(Rgba::GRADIENT_HIGH, (x - min) / span)
            }
            Some(_) => Rgba::GRADIENT_LOW,
            None => NA_COLOR,
        })
        .collect()
}
