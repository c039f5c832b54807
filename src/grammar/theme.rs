//! Theme system for Grammar of Graphics.
//!
//! Controls the non-data visual appearance of plots.

use crate::color::Rgba;

/// Theme specification.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Background color.
    pub background: Rgba,
    /// Panel background color.
    pub panel_background: Rgba,
    /// Grid line color.
    pub grid_color: Rgba,
    /// Axis line color.
    pub axis_color: Rgba,
    /// Text color (titles and labels in vector output).
    pub text_color: Rgba,
    /// Color of marks with no color aesthetic.
    pub ink: Rgba,
    /// Show grid lines.
    pub show_grid: bool,
    /// Show axis lines.
    pub show_axis: bool,
    /// Show panel border.
    pub show_panel_border: bool,
    /// Grid intervals per axis.
    pub grid_breaks: u32,
    /// Margin around the panel in pixels.
    pub margin: u32,
}

impl Default for Theme {
    fn default() -> Self {
        Self::grey()
    }
}

impl Theme {
    /// Names accepted by [`Theme::by_name`].
    pub const NAMES: [&'static str; 5] = ["grey", "minimal", "bw", "dark", "void"];

    /// Grey panel with white grid.
    #[must_use]
    pub fn grey() -> Self {
        Self {
            background: Rgba::WHITE,
            panel_background: Rgba::rgb(235, 235, 235),
            grid_color: Rgba::WHITE,
            axis_color: Rgba::rgb(50, 50, 50),
            text_color: Rgba::rgb(50, 50, 50),
            ink: Rgba::BLACK,
            show_grid: true,
            show_axis: true,
            show_panel_border: false,
            grid_breaks: 5,
            margin: 40,
        }
    }

    /// Minimal theme with white background.
    #[must_use]
    pub fn minimal() -> Self {
        Self {
            panel_background: Rgba::WHITE,
            grid_color: Rgba::rgb(220, 220, 220),
            axis_color: Rgba::rgb(100, 100, 100),
            show_axis: false,
            ..Self::grey()
        }
    }

    /// Black and white theme.
    #[must_use]
    pub fn bw() -> Self {
        Self {
            panel_background: Rgba::WHITE,
            grid_color: Rgba::rgb(200, 200, 200),
            axis_color: Rgba::BLACK,
            text_color: Rgba::BLACK,
            show_panel_border: true,
            ..Self::grey()
        }
    }

    /// Dark theme.
    #[must_use]
    pub fn dark() -> Self {
        Self {
            background: Rgba::rgb(30, 30, 30),
            panel_background: Rgba::rgb(40, 40, 40),
            grid_color: Rgba::rgb(60, 60, 60),
            axis_color: Rgba::rgb(180, 180, 180),
            text_color: Rgba::rgb(220, 220, 220),
            ink: Rgba::rgb(235, 235, 235),
            ..Self::grey()
        }
    }

    /// Nothing but data.
    #[must_use]
    pub fn void() -> Self {
        Self {
            panel_background: Rgba::WHITE,
            show_grid: false,
            show_axis: false,
            margin: 10,
            ..Self::grey()
        }
    }

    /// Look up a preset by name.
    #[must_use]
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "grey" | "gray" => Some(Self::grey()),
            "minimal" => Some(Self::minimal()),
            "bw" => Some(Self::bw()),
            "dark" => Some(Self::dark()),
            "void" => Some(Self::void()),
            _ => None,
        }
    }

    /// Set the default mark color.
    #[must_use]
    pub fn ink(mut self, color: Rgba) -> Self {
        self.ink = color;
        self
    }

    /// Set margin.
    #[must_use]
    pub fn margin(mut self, margin: u32) -> Self {
        self.margin = margin;
        self
    }

    /// Enable or disable grid lines.
    #[must_use]
    pub fn grid(mut self, show: bool) -> Self {
        self.show_grid = show;
        self
    }
}
