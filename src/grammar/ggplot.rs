//! Main GGPlot builder and renderer.
//!
//! Building a plot runs every layer through the same pipeline: resolve data,
//! merge and evaluate aesthetics, derive groups, apply scales, run the stat
//! and check the geom. Rendering turns the computed layer data into marks in
//! pixel space, which are then rasterized or written as SVG.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::framebuffer::Framebuffer;
use crate::geometry::Point;
use crate::output::{PngEncoder, SvgElement, SvgEncoder, TextAnchor};
use crate::render::{draw_circle, draw_line_aa, draw_polyline, draw_rect, draw_rect_outline};
use crate::scale::{extent, map_colors, LinearScale, RescaleScale, Scale, NA_COLOR};
use crate::spring::{create_spring, SpringParams};

use super::aes::Aes;
use super::coord::Coord;
use super::data::{DataFrame, DataValue};
use super::geom::{Geom, GeomType, PointShape};
use super::stat::{check_required_aes, Stat};
use super::theme::Theme;

/// Point diameter in pixels when no size is set.
const DEFAULT_POINT_SIZE: f32 = 4.0;

/// A layer in the plot.
#[derive(Debug, Clone)]
pub struct Layer {
    /// The geometry.
    pub geom: Geom,
    /// The statistical transformation.
    pub stat: Stat,
    /// Layer-specific data (if different from plot data).
    pub data: Option<DataFrame>,
    /// Layer-specific aesthetics.
    pub aes: Aes,
    /// Drop rows with missing values silently.
    pub na_rm: bool,
    /// Combine the plot aesthetics with the layer's.
    pub inherit_aes: bool,
}

impl Layer {
    /// Create a layer from a geometry, using the stat it carries.
    #[must_use]
    pub fn new(geom: Geom) -> Self {
        Self {
            stat: geom.stat.clone().unwrap_or_default(),
            aes: geom.aes.clone().unwrap_or_default(),
            geom,
            data: None,
            na_rm: false,
            inherit_aes: true,
        }
    }

    /// Create a layer from a stat, drawn with the stat's default geometry.
    #[must_use]
    pub fn from_stat(stat: Stat) -> Self {
        let geom = stat.transform().default_geom();
        Self { stat, ..Self::new(geom) }
    }

    /// Set layer-specific data.
    #[must_use]
    pub fn data(mut self, data: DataFrame) -> Self {
        self.data = Some(data);
        self
    }

    /// Set layer aesthetics.
    #[must_use]
    pub fn aes(mut self, aes: Aes) -> Self {
        self.aes = aes;
        self
    }

    /// Drop rows with missing values without warning.
    #[must_use]
    pub fn na_rm(mut self, na_rm: bool) -> Self {
        self.na_rm = na_rm;
        self
    }

    /// Whether to inherit the plot aesthetics.
    #[must_use]
    pub fn inherit_aes(mut self, inherit: bool) -> Self {
        self.inherit_aes = inherit;
        self
    }
}

/// Grammar of Graphics plot builder.
#[derive(Debug, Clone)]
pub struct GGPlot {
    data: DataFrame,
    aes: Aes,
    layers: Vec<Layer>,
    coord: Coord,
    theme: Theme,
    tension_range: (f32, f32),
    width: u32,
    height: u32,
    title: Option<String>,
    xlab: Option<String>,
    ylab: Option<String>,
}

impl Default for GGPlot {
    fn default() -> Self {
        Self::new()
    }
}

impl GGPlot {
    /// Create a new plot builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: DataFrame::new(),
            aes: Aes::new(),
            layers: Vec::new(),
            coord: Coord::cartesian(),
            theme: Theme::grey(),
            tension_range: RescaleScale::TENSION_RANGE,
            width: 800,
            height: 600,
            title: None,
            xlab: None,
            ylab: None,
        }
    }

    /// Set the data.
    #[must_use]
    pub fn data(mut self, data: DataFrame) -> Self {
        self.data = data;
        self
    }

    /// Convenience: set x and y data directly.
    #[must_use]
    pub fn data_xy(mut self, x: &[f32], y: &[f32]) -> Self {
        self.data = DataFrame::from_xy(x, y);
        self.aes = self.aes.x("x").y("y");
        self
    }

    /// Convenience: set segment endpoints directly.
    #[must_use]
    pub fn data_segments(mut self, x: &[f32], y: &[f32], xend: &[f32], yend: &[f32]) -> Self {
        self.data = DataFrame::from_segments(x, y, xend, yend);
        self.aes = self.aes.x("x").y("y").xend("xend").yend("yend");
        self
    }

    /// Set global aesthetics.
    #[must_use]
    pub fn aes(mut self, aes: Aes) -> Self {
        self.aes = aes;
        self
    }

    /// Add a geometry layer.
    #[must_use]
    pub fn geom(mut self, geom: Geom) -> Self {
        self.layers.push(Layer::new(geom));
        self
    }

    /// Add a stat layer drawn with the stat's default geometry.
    #[must_use]
    pub fn stat(mut self, stat: Stat) -> Self {
        self.layers.push(Layer::from_stat(stat));
        self
    }

    /// Add a layer.
    #[must_use]
    pub fn layer(mut self, layer: Layer) -> Self {
        self.layers.push(layer);
        self
    }

    /// Set coordinate system.
    #[must_use]
    pub fn coord(mut self, coord: Coord) -> Self {
        self.coord = coord;
        self
    }

    /// Set theme.
    #[must_use]
    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Set the output range of the continuous tension scale.
    ///
    /// Both bounds must be positive; [`GGPlot::build`] rejects others.
    #[must_use]
    pub fn scale_tension(mut self, min: f32, max: f32) -> Self {
        self.tension_range = (min, max);
        self
    }

    /// Set dimensions.
    #[must_use]
    pub fn dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set x-axis label.
    #[must_use]
    pub fn xlab(mut self, label: impl Into<String>) -> Self {
        self.xlab = Some(label.into());
        self
    }

    /// Set y-axis label.
    #[must_use]
    pub fn ylab(mut self, label: impl Into<String>) -> Self {
        self.ylab = Some(label.into());
        self
    }

    /// Build the plot, computing every layer's data.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no layers, the dimensions are zero, the
    /// tension range is invalid, or any layer fails to compute.
    pub fn build(self) -> Result<BuiltGGPlot> {
        if self.layers.is_empty() {
            return Err(Error::Rendering("No geometry layers specified".into()));
        }
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidDimensions { width: self.width, height: self.height });
        }
        let (low, high) = self.tension_range;
        let tension_scale = RescaleScale::new(low, high)?;
        // Rescaled tensions must stay valid spring tensions
        if low <= 0.0 || high <= 0.0 {
            return Err(Error::ScaleDomain(format!(
                "Tension range [{low}, {high}] must be larger than zero"
            )));
        }

        let mut built = Vec::with_capacity(self.layers.len());
        for (index, layer) in self.layers.iter().enumerate() {
            let data = self.compute_layer(layer, &tension_scale)?;
            debug!(
                layer = index,
                geom = layer.geom.geom_type.name(),
                stat = layer.stat.transform().name(),
                rows = data.nrow(),
                "built layer"
            );
            let aes = if layer.inherit_aes { self.aes.merge(&layer.aes) } else { layer.aes.clone() };
            built.push(BuiltLayer { geom: layer.geom.clone(), aes, data });
        }

        Ok(BuiltGGPlot {
            layers: built,
            coord: self.coord,
            theme: self.theme,
            width: self.width,
            height: self.height,
            title: self.title,
            xlab: self.xlab,
            ylab: self.ylab,
        })
    }

    fn compute_layer(&self, layer: &Layer, tension_scale: &RescaleScale) -> Result<DataFrame> {
        let source = layer.data.as_ref().unwrap_or(&self.data);
        let aes = if layer.inherit_aes { self.aes.merge(&layer.aes) } else { layer.aes.clone() };
        let mut data = aes.map(source)?;

        add_color_groups(&mut data);

        if let Some(tension) = data.numeric("tension") {
            let rescaled = tension_scale.rescale(&tension);
            data.add_column("tension", rescaled.into_iter().map(DataValue::from).collect());
        }

        let data = layer.stat.transform().compute_layer(data, layer.na_rm)?;
        let geom = &layer.geom.geom_type;
        check_required_aes(geom.name(), geom.required_aes(), &data)?;
        Ok(data)
    }
}

/// Discrete colour values split a layer into groups.
fn add_color_groups(data: &mut DataFrame) {
    if data.has_column("group") {
        return;
    }
    let Some(colors) = data.get("color") else {
        return;
    };
    if !colors.iter().any(|v| matches!(v, DataValue::Text(_))) {
        return;
    }
    let groups = colors.iter().map(|v| DataValue::Text(v.to_string())).collect();
    data.add_column("group", groups);
}

#[derive(Debug, Clone)]
struct BuiltLayer {
    geom: Geom,
    aes: Aes,
    data: DataFrame,
}

/// A pixel-space mark, shared by the raster and vector backends.
#[derive(Debug, Clone, PartialEq)]
enum Mark {
    Polyline { points: Vec<Point>, color: Rgba, width: f32 },
    Circle { center: Point, radius: f32, color: Rgba },
    Square { center: Point, half: f32, color: Rgba },
}

/// Plotting panel in pixels.
#[derive(Debug, Clone, Copy)]
struct Panel {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl Panel {
    fn right(&self) -> f32 {
        self.x + self.width
    }

    fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// A built GGPlot ready for rendering.
#[derive(Debug)]
pub struct BuiltGGPlot {
    layers: Vec<BuiltLayer>,
    coord: Coord,
    theme: Theme,
    width: u32,
    height: u32,
    title: Option<String>,
    xlab: Option<String>,
    ylab: Option<String>,
}

impl BuiltGGPlot {
    /// Number of layers.
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Computed data of layer `index`, after the stat has run.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSuchLayer`] if the index is out of range.
    pub fn layer_data(&self, index: usize) -> Result<&DataFrame> {
        self.layers
            .get(index)
            .map(|layer| &layer.data)
            .ok_or(Error::NoSuchLayer { index, count: self.layers.len() })
    }

    /// Render to framebuffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the panel is empty or a layer cannot be drawn.
    pub fn to_framebuffer(&self) -> Result<Framebuffer> {
        let panel = self.panel()?;
        let (x_scale, y_scale) = self.scales(&panel)?;
        let marks = self.marks(&x_scale, &y_scale)?;

        let mut fb = Framebuffer::new(self.width, self.height)?;
        fb.clear(self.theme.background);
        draw_rect(
            &mut fb,
            panel.x as i32,
            panel.y as i32,
            panel.width as u32,
            panel.height as u32,
            self.theme.panel_background,
        );

        if self.theme.show_grid {
            for (from, to) in self.grid_lines(&panel) {
                draw_line_aa(&mut fb, from.x, from.y, to.x, to.y, self.theme.grid_color);
            }
        }

        for mark in &marks {
            match mark {
                Mark::Polyline { points, color, width } => draw_polyline(&mut fb, points, *width, *color),
                Mark::Circle { center, radius, color } => draw_circle(
                    &mut fb,
                    center.x.round() as i32,
                    center.y.round() as i32,
                    radius.round() as i32,
                    *color,
                ),
                Mark::Square { center, half, color } => {
                    let side = (half * 2.0).round().max(1.0) as u32;
                    draw_rect(
                        &mut fb,
                        (center.x - half).round() as i32,
                        (center.y - half).round() as i32,
                        side,
                        side,
                        *color,
                    );
                }
            }
        }

        if self.theme.show_axis {
            for (from, to) in axis_lines(&panel) {
                draw_line_aa(&mut fb, from.x, from.y, to.x, to.y, self.theme.axis_color);
            }
        }

        if self.theme.show_panel_border {
            draw_rect_outline(
                &mut fb,
                panel.x as u32,
                panel.y as u32,
                panel.width as u32,
                panel.height as u32,
                self.theme.axis_color,
            );
        }

        debug!(marks = marks.len(), width = self.width, height = self.height, "rendered framebuffer");
        Ok(fb)
    }

    /// Render to a PNG file.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or file output fails.
    pub fn render_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let fb = self.to_framebuffer()?;
        PngEncoder::write_to_file(&fb, path)
    }

    /// Render to an SVG document with vector marks, title and axis labels.
    ///
    /// # Errors
    ///
    /// Returns an error if the panel is empty or a layer cannot be drawn.
    pub fn to_svg(&self) -> Result<String> {
        Ok(self.svg_encoder()?.render())
    }

    /// Render to an SVG file.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or file output fails.
    pub fn render_svg_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.svg_encoder()?.write_to_file(path)
    }

    fn svg_encoder(&self) -> Result<SvgEncoder> {
        let panel = self.panel()?;
        let (x_scale, y_scale) = self.scales(&panel)?;
        let marks = self.marks(&x_scale, &y_scale)?;
        let theme = &self.theme;

        let mut svg = SvgEncoder::new(self.width, self.height)
            .background(Some(theme.background))
            .rect(panel.x, panel.y, panel.width, panel.height, theme.panel_background);

        if theme.show_grid {
            for (from, to) in self.grid_lines(&panel) {
                svg = svg.line(from, to, theme.grid_color, 1.0);
            }
        }

        for mark in marks {
            let element = match mark {
                Mark::Polyline { points, color, width } => {
                    SvgElement::Polyline { points, stroke: color, stroke_width: width }
                }
                Mark::Circle { center, radius, color } => {
                    SvgElement::Circle { cx: center.x, cy: center.y, r: radius, fill: color }
                }
                Mark::Square { center, half, color } => SvgElement::Rect {
                    x: center.x - half,
                    y: center.y - half,
                    width: half * 2.0,
                    height: half * 2.0,
                    fill: Some(color),
                    stroke: None,
                },
            };
            svg.add_element(element);
        }

        if theme.show_axis {
            for (from, to) in axis_lines(&panel) {
                svg = svg.line(from, to, theme.axis_color, 1.0);
            }
        }

        if theme.show_panel_border {
            svg.add_element(SvgElement::Rect {
                x: panel.x,
                y: panel.y,
                width: panel.width,
                height: panel.height,
                fill: None,
                stroke: Some(theme.axis_color),
            });
        }

        let margin = theme.margin as f32;
        let center_x = panel.x + panel.width / 2.0;
        if let Some(title) = &self.title {
            svg = svg.text_anchored(center_x, margin * 0.6, title, 16.0, theme.text_color, TextAnchor::Middle);
        }
        if let Some(xlab) = &self.xlab {
            let y = self.height as f32 - margin * 0.3;
            svg = svg.text_anchored(center_x, y, xlab, 12.0, theme.text_color, TextAnchor::Middle);
        }
        if let Some(ylab) = &self.ylab {
            svg.add_element(SvgElement::Text {
                x: margin * 0.4,
                y: panel.y + panel.height / 2.0,
                text: ylab.clone(),
                font_size: 12.0,
                fill: theme.text_color,
                anchor: TextAnchor::Middle,
                rotate: true,
            });
        }

        Ok(svg)
    }

    fn panel(&self) -> Result<Panel> {
        let margin = self.theme.margin;
        let width = self.width.saturating_sub(2 * margin);
        let height = self.height.saturating_sub(2 * margin);
        if width == 0 || height == 0 {
            return Err(Error::Rendering(format!(
                "Margin {margin} leaves no room for the panel in a {}x{} plot",
                self.width, self.height
            )));
        }
        Ok(Panel { x: margin as f32, y: margin as f32, width: width as f32, height: height as f32 })
    }

    /// Data ranges over every layer, padded by 5% and fitted by the coord.
    fn scales(&self, panel: &Panel) -> Result<(LinearScale, LinearScale)> {
        let collect = |names: [&str; 2]| -> Vec<f32> {
            self.layers
                .iter()
                .flat_map(|layer| names.iter().filter_map(move |n| layer.data.numeric(n)))
                .flatten()
                .flatten()
                .collect()
        };

        let x = padded(extent(&collect(["x", "xend"])));
        let y = padded(extent(&collect(["y", "yend"])));
        let (x, y) = self.coord.fit(x, y, panel.width, panel.height);

        let x_scale = LinearScale::new(x, (panel.x, panel.right()))?;
        // Inverted for screen coordinates
        let y_scale = LinearScale::new(y, (panel.bottom(), panel.y))?;
        Ok((x_scale, y_scale))
    }

    fn grid_lines(&self, panel: &Panel) -> Vec<(Point, Point)> {
        let breaks = self.theme.grid_breaks.max(1);
        (0..=breaks)
            .flat_map(|i| {
                let t = i as f32 / breaks as f32;
                let x = panel.x + t * panel.width;
                let y = panel.y + t * panel.height;
                [
                    (Point::new(panel.x, y), Point::new(panel.right(), y)),
                    (Point::new(x, panel.y), Point::new(x, panel.bottom())),
                ]
            })
            .collect()
    }

    fn marks(&self, x_scale: &LinearScale, y_scale: &LinearScale) -> Result<Vec<Mark>> {
        let mut marks = Vec::new();
        for layer in &self.layers {
            let data = &layer.data;
            let colors = self.layer_colors(layer);
            let to_px = |x: Option<f32>, y: Option<f32>| match (x, y) {
                (Some(x), Some(y)) => Some(Point::new(x_scale.scale(x), y_scale.scale(y))),
                _ => None,
            };
            let column = |name: &str| data.numeric(name).unwrap_or_else(|| vec![None; data.nrow()]);
            let (x, y) = (column("x"), column("y"));

            match &layer.geom.geom_type {
                GeomType::Point { shape } => {
                    let size = layer.aes.size_value.unwrap_or(DEFAULT_POINT_SIZE);
                    for (i, color) in colors.iter().enumerate() {
                        let Some(center) = to_px(x[i], y[i]) else { continue };
                        marks.push(match shape {
                            PointShape::Circle => Mark::Circle { center, radius: size / 2.0, color: *color },
                            PointShape::Square => Mark::Square { center, half: size / 2.0, color: *color },
                        });
                    }
                }
                GeomType::Path { width } => {
                    let width = layer.aes.size_value.unwrap_or(*width);
                    for rows in path_groups(data) {
                        let mut run = Vec::new();
                        for &i in &rows {
                            match to_px(x[i], y[i]) {
                                Some(p) => run.push(p),
                                // A missing value breaks the path
                                None => flush_run(&mut marks, &mut run, colors[rows[0]], width),
                            }
                        }
                        flush_run(&mut marks, &mut run, colors[rows[0]], width);
                    }
                }
                GeomType::Segment { width } => {
                    let width = layer.aes.size_value.unwrap_or(*width);
                    let (xend, yend) = (column("xend"), column("yend"));
                    for (i, color) in colors.iter().enumerate() {
                        if let (Some(from), Some(to)) = (to_px(x[i], y[i]), to_px(xend[i], yend[i])) {
                            marks.push(Mark::Polyline { points: vec![from, to], color: *color, width });
                        }
                    }
                }
                GeomType::Coil { width, params } => {
                    let width = layer.aes.size_value.unwrap_or(*width);
                    let (xend, yend) = (column("xend"), column("yend"));
                    let diameter = data.numeric("diameter");
                    let tension = data.numeric("tension");
                    let at = |col: &Option<Vec<Option<f32>>>, i: usize| col.as_ref().and_then(|c| c[i]);

                    for (i, color) in colors.iter().enumerate() {
                        let (Some(from), Some(to)) = (to_px(x[i], y[i]), to_px(xend[i], yend[i])) else {
                            continue;
                        };
                        let row_params = SpringParams {
                            diameter: at(&diameter, i).unwrap_or(params.diameter),
                            tension: at(&tension, i).unwrap_or(params.tension),
                            n: params.n,
                        };
                        let points = create_spring(from, to, &row_params)?;
                        if points.len() > 1 {
                            marks.push(Mark::Polyline { points, color: *color, width });
                        }
                    }
                }
            }
        }
        Ok(marks)
    }

    /// One colour per row of the layer data.
    fn layer_colors(&self, layer: &BuiltLayer) -> Vec<Rgba> {
        let n = layer.data.nrow();
        let mut colors = match layer.data.get("color") {
            Some(values) => map_colors(values),
            None => vec![layer.aes.color_value.unwrap_or(self.theme.ink); n],
        };
        colors.resize(n, NA_COLOR);
        match layer.aes.alpha_value {
            Some(alpha) => colors.into_iter().map(|c| c.fade(alpha)).collect(),
            None => colors,
        }
    }
}

fn flush_run(marks: &mut Vec<Mark>, run: &mut Vec<Point>, color: Rgba, width: f32) {
    if run.len() > 1 {
        marks.push(Mark::Polyline { points: std::mem::take(run), color, width });
    } else {
        run.clear();
    }
}

/// Row indices per `group`, groups in order of first appearance.
fn path_groups(data: &DataFrame) -> Vec<Vec<usize>> {
    let n = data.nrow();
    let Some(groups) = data.get("group") else {
        return if n == 0 { Vec::new() } else { vec![(0..n).collect()] };
    };

    let mut order: Vec<Vec<usize>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for i in 0..n {
        let key = groups.get(i).map_or_else(|| DataValue::Null.to_string(), ToString::to_string);
        let slot = *index.entry(key).or_insert_with(|| {
            order.push(Vec::new());
            order.len() - 1
        });
        order[slot].push(i);
    }
    order
}

fn axis_lines(panel: &Panel) -> [(Point, Point); 2] {
    [
        (Point::new(panel.x, panel.bottom()), Point::new(panel.right(), panel.bottom())),
        (Point::new(panel.x, panel.y), Point::new(panel.x, panel.bottom())),
    ]
}

/// Widen a degenerate range to one unit each side, then pad by 5%.
fn padded(range: Option<(f32, f32)>) -> (f32, f32) {
    let (mut min, mut max) = range.unwrap_or((0.0, 1.0));
    if min >= max {
        min -= 1.0;
        max += 1.0;
    }
    let pad = (max - min) * 0.05;
    (min - pad, max + pad)
}
