//! Rasterization of plot marks into a [`Framebuffer`](crate::framebuffer::Framebuffer).
//!
//! # Algorithms
//!
//! - **Wu's Anti-aliased Line**: lines and polylines with sub-pixel accuracy
//! - **Midpoint Circle**: filled point markers
//!
//! # References
//!
//! - Wu, X. (1991). "An Efficient Antialiasing Technique." SIGGRAPH '91.

mod primitives;

pub use primitives::{
    draw_circle, draw_line_aa, draw_polyline, draw_rect, draw_rect_outline, draw_thick_line,
};
