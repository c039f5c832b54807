//! Geometry types for Grammar of Graphics.
//!
//! Defines visual representations of data.

use super::aes::Aes;
use super::stat::Stat;
use crate::spring::SpringParams;

/// Shape types for point geometries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointShape {
    /// Filled circle.
    #[default]
    Circle,
    /// Filled square.
    Square,
}

/// Geometry type specification.
#[derive(Debug, Clone)]
pub enum GeomType {
    /// Points.
    Point {
        /// Point shape.
        shape: PointShape,
    },
    /// Lines connecting rows in order, one line per group.
    Path {
        /// Line width in pixels.
        width: f32,
    },
    /// Straight line from `(x, y)` to `(xend, yend)`.
    Segment {
        /// Line width in pixels.
        width: f32,
    },
    /// Spring from `(x, y)` to `(xend, yend)` computed in device space.
    ///
    /// The diameter is in pixels, so coils stay round whatever the data
    /// aspect ratio. A mapped `diameter` column is read as pixels too; it
    /// does not pass through the position scales.
    Coil {
        /// Line width in pixels.
        width: f32,
        /// Coil parameters; `diameter` is in pixels.
        params: SpringParams,
    },
}

impl GeomType {
    /// Short name used in messages.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            GeomType::Point { .. } => "geom_point",
            GeomType::Path { .. } => "geom_path",
            GeomType::Segment { .. } => "geom_segment",
            GeomType::Coil { .. } => "geom_coil",
        }
    }

    /// Aesthetics the geom needs in its (post-stat) data.
    #[must_use]
    pub fn required_aes(&self) -> &'static [&'static str] {
        match self {
            GeomType::Point { .. } | GeomType::Path { .. } => &["x", "y"],
            GeomType::Segment { .. } | GeomType::Coil { .. } => &["x", "y", "xend", "yend"],
        }
    }
}

/// A geometry layer.
#[derive(Debug, Clone)]
pub struct Geom {
    /// The geometry type.
    pub geom_type: GeomType,
    /// Layer-specific aesthetics.
    pub aes: Option<Aes>,
    /// Statistical transformation.
    pub stat: Option<Stat>,
}

impl Geom {
    /// Default coil diameter for [`Geom::coil`], in pixels.
    pub const COIL_DIAMETER_PX: f32 = 12.0;

    fn with_type(geom_type: GeomType) -> Self {
        Self { geom_type, aes: None, stat: None }
    }

    /// Create a point geometry.
    #[must_use]
    pub fn point() -> Self {
        Self::with_type(GeomType::Point { shape: PointShape::Circle })
    }

    /// Create a path geometry.
    #[must_use]
    pub fn path() -> Self {
        Self::with_type(GeomType::Path { width: 1.0 })
    }

    /// Create a segment geometry.
    #[must_use]
    pub fn segment() -> Self {
        Self::with_type(GeomType::Segment { width: 1.0 })
    }

    /// Create a spring layer: a path drawn through the spring stat.
    ///
    /// Diameter and tension are in data units.
    #[must_use]
    pub fn spring() -> Self {
        Self { stat: Some(Stat::spring(SpringParams::default())), ..Self::path() }
    }

    /// Create a device-space coil geometry.
    ///
    /// Diameters, set here or mapped per row, are in pixels.
    #[must_use]
    pub fn coil() -> Self {
        Self::with_type(GeomType::Coil {
            width: 1.0,
            params: SpringParams::default().with_diameter(Self::COIL_DIAMETER_PX),
        })
    }

    /// Set the point shape.
    #[must_use]
    pub fn shape(mut self, shape: PointShape) -> Self {
        if let GeomType::Point { shape: ref mut s } = self.geom_type {
            *s = shape;
        }
        self
    }

    /// Set the line width.
    #[must_use]
    pub fn width(mut self, width: f32) -> Self {
        match &mut self.geom_type {
            GeomType::Path { width: w }
            | GeomType::Segment { width: w }
            | GeomType::Coil { width: w, .. } => *w = width.max(0.0),
            GeomType::Point { .. } => {}
        }
        self
    }

    /// Set the spring diameter.
    #[must_use]
    pub fn diameter(self, diameter: f32) -> Self {
        self.update_spring(|p| p.diameter = diameter)
    }

    /// Set the spring tension.
    #[must_use]
    pub fn tension(self, tension: f32) -> Self {
        self.update_spring(|p| p.tension = tension)
    }

    /// Set the points per spring revolution.
    #[must_use]
    pub fn n(self, n: u32) -> Self {
        self.update_spring(|p| p.n = n)
    }

    /// Spring parameters, if this geom draws springs.
    #[must_use]
    pub fn spring_params(&self) -> Option<&SpringParams> {
        match (&self.geom_type, &self.stat) {
            (GeomType::Coil { params, .. }, _) => Some(params),
            (_, Some(Stat::Spring(stat))) => Some(stat.params()),
            _ => None,
        }
    }

    fn update_spring(mut self, update: impl FnOnce(&mut SpringParams)) -> Self {
        if let GeomType::Coil { params, .. } = &mut self.geom_type {
            update(params);
        } else if let Some(Stat::Spring(stat)) = &mut self.stat {
            update(stat.params_mut());
        }
        self
    }

    /// Add layer-specific aesthetics.
    #[must_use]
    pub fn aes(mut self, aes: Aes) -> Self {
        self.aes = Some(aes);
        self
    }

    /// Set statistical transformation.
    #[must_use]
    pub fn stat(mut self, stat: Stat) -> Self {
        self.stat = Some(stat);
        self
    }
}
