//! The spring (coil) transform.
//!
//! Replaces the straight segment between two points with a polyline that
//! winds around it. The coil advances linearly from start to end while a
//! point circles the moving centre:
//!
//! ```text
//! revolutions = |to - from| / (diameter * tension)
//! points      = ceil(n * revolutions)
//! s           = i / (points - 1)
//! p(s)        = lerp(from, to, s) + diameter/2 * (cos θ, sin θ),  θ = 2π s revolutions
//! ```
//!
//! `tension` is the distance travelled per revolution relative to the
//! diameter: larger values stretch the coil, smaller values compress it.
//!
//! # Example
//!
//! ```
//! use spring_viz::geometry::Point;
//! use spring_viz::spring::{create_spring, SpringParams};
//!
//! let coil = create_spring(Point::new(0.0, 0.0), Point::new(3.0, 0.0), &SpringParams::default())
//!     .unwrap();
//! assert_eq!(coil.len(), 200);
//! ```

use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::Point;

/// Parameters shared by every spring in a layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringParams {
    /// Coil diameter, in the units of the space the spring is drawn in.
    pub diameter: f32,
    /// Distance advanced per revolution, as a multiple of the diameter.
    pub tension: f32,
    /// Points sampled per revolution.
    pub n: u32,
}

impl Default for SpringParams {
    fn default() -> Self {
        Self {
            diameter: Self::DEFAULT_DIAMETER,
            tension: Self::DEFAULT_TENSION,
            n: Self::DEFAULT_N,
        }
    }
}

impl SpringParams {
    /// Default coil diameter.
    pub const DEFAULT_DIAMETER: f32 = 1.0;
    /// Default tension.
    pub const DEFAULT_TENSION: f32 = 0.75;
    /// Default points per revolution.
    pub const DEFAULT_N: u32 = 50;
    /// Largest number of points a single spring may sample.
    pub const MAX_POINTS: usize = 1 << 20;

    /// Create validated parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if any value is out of range.
    pub fn new(diameter: f32, tension: f32, n: u32) -> Result<Self> {
        let params = Self { diameter, tension, n };
        params.validate()?;
        Ok(params)
    }

    /// Set the diameter (unvalidated).
    #[must_use]
    pub fn with_diameter(mut self, diameter: f32) -> Self {
        self.diameter = diameter;
        self
    }

    /// Set the tension (unvalidated).
    #[must_use]
    pub fn with_tension(mut self, tension: f32) -> Self {
        self.tension = tension;
        self
    }

    /// Set the points per revolution (unvalidated).
    #[must_use]
    pub fn with_n(mut self, n: u32) -> Self {
        self.n = n;
        self
    }

    /// Check that diameter and tension are positive and `n` is non-zero.
    ///
    /// NaN is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] naming the first offending value.
    pub fn validate(&self) -> Result<()> {
        if self.diameter.is_nan() || self.diameter <= 0.0 {
            return Err(Error::InvalidParameter {
                name: "diameter",
                reason: "must be larger than zero",
            });
        }
        if self.tension.is_nan() || self.tension <= 0.0 {
            return Err(Error::InvalidParameter {
                name: "tension",
                reason: "must be larger than zero",
            });
        }
        if self.n == 0 {
            return Err(Error::InvalidParameter { name: "n", reason: "must be greater than zero" });
        }
        Ok(())
    }

    /// Number of revolutions over a spring of the given length.
    #[must_use]
    pub fn revolutions(&self, length: f32) -> f32 {
        length / (self.diameter * self.tension)
    }

    /// Number of points sampled over a spring of the given length.
    ///
    /// Fractional counts round up.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if the count is not finite or
    /// exceeds [`Self::MAX_POINTS`].
    pub fn point_count(&self, length: f32) -> Result<usize> {
        let revolutions = f64::from(length) / (f64::from(self.diameter) * f64::from(self.tension));
        let count = (f64::from(self.n) * revolutions).ceil();
        if !count.is_finite() || count > Self::MAX_POINTS as f64 {
            return Err(Error::InvalidParameter { name: "n", reason: "produces too many points" });
        }
        Ok(count.max(0.0) as usize)
    }
}

/// Compute the coil polyline from `from` to `to`.
///
/// A zero-length spring has no revolutions and yields an empty path.
///
/// # Errors
///
/// Returns [`Error::InvalidParameter`] if the parameters fail
/// [`SpringParams::validate`], an endpoint is not finite, or the spring
/// would need more than [`SpringParams::MAX_POINTS`] points.
pub fn create_spring(from: Point, to: Point, params: &SpringParams) -> Result<Vec<Point>> {
    params.validate()?;
    if !from.is_finite() || !to.is_finite() {
        return Err(Error::InvalidParameter { name: "endpoints", reason: "must be finite" });
    }

    let length = from.distance(to);
    let revolutions = params.revolutions(length);
    let count = params.point_count(length)?;
    let radius = params.diameter / 2.0;
    let last = count.saturating_sub(1).max(1) as f32;

    Ok((0..count)
        .map(|i| {
            let s = i as f32 / last;
            let theta = s * revolutions * TAU;
            let centre = from.lerp(to, s);
            Point::new(theta.cos() * radius + centre.x, theta.sin() * radius + centre.y)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    fn origin_to(x: f32, y: f32, params: &SpringParams) -> Vec<Point> {
        create_spring(Point::ORIGIN, Point::new(x, y), params).unwrap()
    }

    #[test]
    fn test_defaults() {
        let p = SpringParams::default();
        assert_eq!(p.diameter, 1.0);
        assert_eq!(p.tension, 0.75);
        assert_eq!(p.n, 50);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad = [
            (SpringParams::default().with_diameter(0.0), "diameter"),
            (SpringParams::default().with_diameter(-1.0), "diameter"),
            (SpringParams::default().with_diameter(f32::NAN), "diameter"),
            (SpringParams::default().with_tension(0.0), "tension"),
            (SpringParams::default().with_tension(-0.5), "tension"),
            (SpringParams::default().with_n(0), "n"),
        ];
        for (params, expected) in bad {
            match params.validate() {
                Err(Error::InvalidParameter { name, .. }) => assert_eq!(name, expected),
                other => panic!("expected InvalidParameter({expected}), got {other:?}"),
            }
        }
    }

    #[test]
    fn test_new_validates() {
        assert!(SpringParams::new(2.0, 1.0, 10).is_ok());
        assert!(SpringParams::new(2.0, 0.0, 10).is_err());
    }

    #[test]
    fn test_point_count_whole_revolutions() {
        // length 3, diameter 1, tension 0.75 -> 4 revolutions of 50 points
        let coil = origin_to(3.0, 0.0, &SpringParams::default());
        assert_eq!(coil.len(), 200);
    }

    #[test]
    fn test_point_count_rounds_up() {
        // 1 / 0.75 revolutions * 50 = 66.67 -> 67 points
        let params = SpringParams::default();
        assert_eq!(params.point_count(1.0).unwrap(), 67);
        assert_eq!(origin_to(1.0, 0.0, &params).len(), 67);
    }

    #[test]
    fn test_endpoints_offset_by_radius() {
        let params = SpringParams::new(2.0, 0.5, 20).unwrap();
        // 4 / (2 * 0.5) = 4 whole revolutions
        let coil = create_spring(Point::new(1.0, 1.0), Point::new(1.0, 5.0), &params).unwrap();
        let first = coil[0];
        let last = coil[coil.len() - 1];
        assert_abs_diff_eq!(first.x, 2.0, epsilon = 1e-4);
        assert_abs_diff_eq!(first.y, 1.0, epsilon = 1e-4);
        assert_abs_diff_eq!(last.x, 2.0, epsilon = 1e-3);
        assert_abs_diff_eq!(last.y, 5.0, epsilon = 1e-3);
    }

    #[test]
    fn test_quarter_revolution_sample() {
        // 1 revolution sampled at 5 points: angles 0, 90, 180, 270, 360
        let params = SpringParams::new(2.0, 4.0, 5).unwrap();
        let coil = origin_to(8.0, 0.0, &params);
        assert_eq!(coil.len(), 5);
        assert_abs_diff_eq!(coil[1].x, 2.0, epsilon = 1e-4);
        assert_abs_diff_eq!(coil[1].y, 1.0, epsilon = 1e-4);
        assert_abs_diff_eq!(coil[2].x, 3.0, epsilon = 1e-4);
        assert_abs_diff_eq!(coil[2].y, 0.0, epsilon = 1e-4);
        assert_abs_diff_eq!(coil[3].x, 6.0, epsilon = 1e-4);
        assert_abs_diff_eq!(coil[3].y, -1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_zero_length_is_empty() {
        let coil = create_spring(Point::new(2.0, 2.0), Point::new(2.0, 2.0), &SpringParams::default())
            .unwrap();
        assert!(coil.is_empty());
    }

    #[test]
    fn test_single_point_spring() {
        // 0.01 revolutions * 50 = 0.5 -> one point at the start
        let params = SpringParams::default();
        let coil = origin_to(0.0075, 0.0, &params);
        assert_eq!(coil.len(), 1);
        assert_abs_diff_eq!(coil[0].x, 0.5, epsilon = 1e-5);
        assert_abs_diff_eq!(coil[0].y, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_non_finite_endpoint_rejected() {
        let result =
            create_spring(Point::ORIGIN, Point::new(f32::INFINITY, 0.0), &SpringParams::default());
        assert!(matches!(result, Err(Error::InvalidParameter { name: "endpoints", .. })));
    }

    #[test]
    fn test_invalid_params_rejected_before_work() {
        let params = SpringParams::default().with_tension(0.0);
        assert!(create_spring(Point::ORIGIN, Point::new(1.0, 0.0), &params).is_err());
    }

    #[test]
    fn test_tiny_tension_rejected_instead_of_allocating() {
        let params = SpringParams::new(1.0, 1e-38, 50).unwrap();
        let result = create_spring(Point::ORIGIN, Point::new(1.0, 0.0), &params);
        assert!(matches!(
            result,
            Err(Error::InvalidParameter { name: "n", reason: "produces too many points" })
        ));
    }

    #[test]
    fn test_point_cap_boundary() {
        // 1 revolution per unit at n = 1024: 1024 units hit the cap exactly
        let params = SpringParams::new(1.0, 1.0, 1024).unwrap();
        assert_eq!(params.point_count(1024.0).unwrap(), SpringParams::MAX_POINTS);
        assert!(params.point_count(1025.0).is_err());
    }

    #[test]
    fn test_params_yaml_defaults() {
        let p: SpringParams = serde_yaml_ng::from_str("tension: 2.0").unwrap();
        assert_eq!(p.tension, 2.0);
        assert_eq!(p.diameter, SpringParams::DEFAULT_DIAMETER);
        assert_eq!(p.n, SpringParams::DEFAULT_N);
    }

    proptest! {
        #[test]
        fn prop_points_stay_within_radius_of_axis(
            x0 in -50.0f32..50.0,
            y0 in -50.0f32..50.0,
            x1 in -50.0f32..50.0,
            y1 in -50.0f32..50.0,
            diameter in 0.5f32..5.0,
            tension in 0.5f32..3.0,
        ) {
            let from = Point::new(x0, y0);
            let to = Point::new(x1, y1);
            let params = SpringParams::new(diameter, tension, 20).unwrap();
            let coil = create_spring(from, to, &params).unwrap();
            let last = coil.len().saturating_sub(1).max(1) as f32;
            for (i, p) in coil.iter().enumerate() {
                let centre = from.lerp(to, i as f32 / last);
                prop_assert!((p.distance(centre) - diameter / 2.0).abs() < 1e-2);
            }
        }

        #[test]
        fn prop_count_matches_formula(length in 0.0f32..100.0, tension in 0.2f32..2.0, n in 1u32..80) {
            let params = SpringParams::new(1.0, tension, n).unwrap();
            let coil = create_spring(Point::ORIGIN, Point::new(length, 0.0), &params).unwrap();
            prop_assert_eq!(coil.len(), params.point_count(length).unwrap());
        }
    }
}
