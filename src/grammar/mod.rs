//! Grammar of Graphics implementation.
//!
//! Provides a declarative, layered plot specification with a pluggable stat
//! seam, after Wilkinson's Grammar of Graphics [Wilkinson 2005].
//!
//! # Components
//!
//! - **Data**: an ordered columnar [`DataFrame`]
//! - **Aesthetics**: mappings from columns to x, y, xend, yend, color, group,
//!   diameter and tension
//! - **Statistics**: [`StatTransform`] plugins such as [`StatSpring`]
//! - **Geometries**: point, path, segment and device-space coil
//! - **Coordinates**: Cartesian with limits, or a fixed aspect ratio
//!
//! # Example
//!
//! ```rust
//! use spring_viz::grammar::*;
//!
//! let plot = GGPlot::new()
//!     .data_segments(&[0.0, 1.0], &[0.0, 0.0], &[3.0, 4.0], &[1.0, 2.0])
//!     .geom(Geom::spring().diameter(0.5))
//!     .build()
//!     .unwrap();
//! assert!(plot.layer_data(0).unwrap().nrow() > 0);
//! ```
//!
//! # References
//!
//! - Wilkinson, L. (2005). *The Grammar of Graphics*. Springer.
//! - Wickham, H. (2010). "A Layered Grammar of Graphics." Journal of Computational
//!   and Graphical Statistics.

mod aes;
mod coord;
mod data;
pub(crate) mod geom;
mod ggplot;
mod stat;
mod stat_spring;
mod theme;

pub use aes::Aes;
pub use coord::Coord;
pub use data::{DataFrame, DataValue};
pub use geom::{Geom, GeomType, PointShape};
pub use ggplot::{BuiltGGPlot, GGPlot, Layer};
pub use stat::{Stat, StatIdentity, StatTransform};
pub use stat_spring::StatSpring;
pub use theme::Theme;
