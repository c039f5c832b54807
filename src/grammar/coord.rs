//! Coordinate systems for Grammar of Graphics.
//!
//! Decide which data window ends up in the plotting panel.

/// Coordinate system type.
#[derive(Debug, Clone, PartialEq)]
pub enum Coord {
    /// Cartesian coordinates (x, y).
    Cartesian {
        /// X axis limits.
        xlim: Option<(f32, f32)>,
        /// Y axis limits.
        ylim: Option<(f32, f32)>,
    },
    /// Cartesian coordinates with a fixed aspect ratio.
    ///
    /// One y unit spans `ratio` times as many pixels as one x unit. Springs
    /// drawn in data space only look circular with `ratio = 1`.
    Fixed {
        /// Aspect ratio (y/x).
        ratio: f32,
    },
}

impl Default for Coord {
    fn default() -> Self {
        Coord::cartesian()
    }
}

impl Coord {
    /// Create a Cartesian coordinate system.
    #[must_use]
    pub fn cartesian() -> Self {
        Coord::Cartesian { xlim: None, ylim: None }
    }

    /// Create a fixed aspect ratio coordinate system.
    ///
    /// Non-positive or non-finite ratios fall back to 1.
    #[must_use]
    pub fn fixed(ratio: f32) -> Self {
        let ratio = if ratio.is_finite() && ratio > 0.0 { ratio } else { 1.0 };
        Coord::Fixed { ratio }
    }

    /// Create an equal-units coordinate system.
    #[must_use]
    pub fn equal() -> Self {
        Coord::fixed(1.0)
    }

    /// Set x-axis limits.
    #[must_use]
    pub fn xlim(mut self, min: f32, max: f32) -> Self {
        if let Coord::Cartesian { ref mut xlim, .. } = self {
            *xlim = Some((min, max));
        }
        self
    }

    /// Set y-axis limits.
    #[must_use]
    pub fn ylim(mut self, min: f32, max: f32) -> Self {
        if let Coord::Cartesian { ref mut ylim, .. } = self {
            *ylim = Some((min, max));
        }
        self
    }

    /// Fit data ranges to a panel of `width` x `height` pixels.
    ///
    /// Cartesian limits replace the data ranges. A fixed ratio widens
    /// whichever range is too narrow, keeping it centred.
    #[must_use]
    pub fn fit(
        &self,
        x: (f32, f32),
        y: (f32, f32),
        width: f32,
        height: f32,
    ) -> ((f32, f32), (f32, f32)) {
        match self {
            Coord::Cartesian { xlim, ylim } => (xlim.unwrap_or(x), ylim.unwrap_or(y)),
            Coord::Fixed { ratio } => {
                let (x_span, y_span) = (x.1 - x.0, y.1 - y.0);
                if x_span <= 0.0 || y_span <= 0.0 || width <= 0.0 || height <= 0.0 {
                    return (x, y);
                }
                let px_per_x = (width / x_span).min(height / (ratio * y_span));
                let new_x_span = width / px_per_x;
                let new_y_span = height / (ratio * px_per_x);
                (widen(x, new_x_span), widen(y, new_y_span))
            }
        }
    }
}

fn widen(range: (f32, f32), span: f32) -> (f32, f32) {
    let mid = (range.0 + range.1) / 2.0;
    (mid - span / 2.0, mid + span / 2.0)
}
