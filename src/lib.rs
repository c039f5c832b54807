//! # Spring-Viz
//!
//! Grammar-of-graphics plotting with a spring (coil) statistical
//! transformation.
//!
//! Every `(x, y) -> (xend, yend)` row of a layer can be drawn as a coil
//! instead of a straight segment. The transform is exposed three ways:
//!
//! - [`spring::create_spring`]: the bare geometry, one polyline per segment
//! - [`grammar::StatSpring`]: a stat plugin behind the
//!   [`grammar::StatTransform`] seam, used by [`grammar::Geom::spring`]
//! - [`grammar::Geom::coil`]: a geom that computes coils in pixel space so
//!   they stay round at any aspect ratio
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use spring_viz::prelude::*;
//!
//! let plot = GGPlot::new()
//!     .data_segments(&[0.0, 2.0], &[0.0, 1.0], &[4.0, 5.0], &[1.0, 3.0])
//!     .geom(Geom::spring().diameter(0.4).tension(0.5))
//!     .coord(Coord::equal())
//!     .build()?;
//!
//! plot.render_to_file("springs.png")?;
//! # Ok::<(), spring_viz::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `gpu`: Enable GPU compute acceleration in trueno
//! - `parallel`: Enable parallel processing in trueno
//!
//! ## References
//!
//! - Wilkinson, L. (2005). *The Grammar of Graphics*. Springer.
//! - Wu, X. (1991). "An Efficient Antialiasing Technique." SIGGRAPH '91.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code
#![cfg_attr(test, allow(clippy::unwrap_used))]
// Allow common patterns in graphics/visualization code
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// Color types and color space conversions.
pub mod color;

/// Core framebuffer for pixel rendering.
pub mod framebuffer;

/// Geometric primitives.
pub mod geometry;

/// Scale functions for data-to-visual mappings.
pub mod scale;

/// The spring (coil) transform.
pub mod spring;

// ============================================================================
// Visualization Modules
// ============================================================================

/// Grammar of Graphics implementation.
pub mod grammar;

/// Plot configuration files.
pub mod config;

// ============================================================================
// Rendering Modules
// ============================================================================

/// Rasterization of plot marks.
pub mod render;

/// Output encoders (PNG, SVG).
pub mod output;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for spring-viz operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust
/// use spring_viz::prelude::*;
/// ```
pub mod prelude {
    pub use crate::color::{Hsla, Rgba};
    pub use crate::config::PlotConfig;
    pub use crate::error::{Error, Result};
    pub use crate::framebuffer::Framebuffer;
    pub use crate::geometry::Point;
    pub use crate::grammar::{
        Aes, BuiltGGPlot, Coord, DataFrame, DataValue, GGPlot, Geom, Layer, Stat, StatSpring,
        StatTransform, Theme,
    };
    pub use crate::scale::{LinearScale, Scale};
    pub use crate::spring::{create_spring, SpringParams};
}

// ============================================================================
// Re-exports
// ============================================================================

/// Re-export trueno for direct access to SIMD operations.
pub use trueno;
