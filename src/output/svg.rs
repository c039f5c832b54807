//! SVG output encoder.
//!
//! Plots are written as vector marks; a framebuffer can also be embedded as
//! a base64 PNG image.

use std::fmt::Write as FmtWrite;
use std::fs;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine};
use tracing::debug;

use crate::color::Rgba;
use crate::error::Result;
use crate::framebuffer::Framebuffer;
use crate::geometry::Point;

/// SVG document builder.
#[derive(Debug, Clone)]
pub struct SvgEncoder {
    width: u32,
    height: u32,
    /// Background color (None for transparent).
    background: Option<Rgba>,
    elements: Vec<SvgElement>,
}

/// An SVG element.
///
/// Field names match SVG attribute names.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum SvgElement {
    /// Rectangle
    Rect { x: f32, y: f32, width: f32, height: f32, fill: Option<Rgba>, stroke: Option<Rgba> },
    /// Circle
    Circle { cx: f32, cy: f32, r: f32, fill: Rgba },
    /// Line
    Line { from: Point, to: Point, stroke: Rgba, stroke_width: f32 },
    /// Connected line segments
    Polyline { points: Vec<Point>, stroke: Rgba, stroke_width: f32 },
    /// Text
    Text { x: f32, y: f32, text: String, font_size: f32, fill: Rgba, anchor: TextAnchor, rotate: bool },
    /// Embedded raster image (data URI)
    Image { width: f32, height: f32, data: String },
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextAnchor {
    /// Text starts at the position.
    #[default]
    Start,
    /// Text is centered on the position.
    Middle,
    /// Text ends at the position.
    End,
}

impl TextAnchor {
    fn as_str(self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

impl SvgEncoder {
    /// Create an empty document with a white background.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, background: Some(Rgba::WHITE), elements: Vec::new() }
    }

    /// Create a document embedding the framebuffer as a PNG image.
    ///
    /// # Errors
    ///
    /// Returns an error if PNG encoding fails.
    pub fn from_framebuffer(fb: &Framebuffer) -> Result<Self> {
        let png_bytes = super::PngEncoder::to_bytes(fb)?;
        let data = format!("data:image/png;base64,{}", STANDARD.encode(&png_bytes));

        let mut encoder = Self::new(fb.width(), fb.height()).background(None);
        encoder.add_element(SvgElement::Image {
            width: fb.width() as f32,
            height: fb.height() as f32,
            data,
        });
        Ok(encoder)
    }

    /// Set background color (None for transparent).
    #[must_use]
    pub fn background(mut self, color: Option<Rgba>) -> Self {
        self.background = color;
        self
    }

    /// Number of elements added so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether no elements have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Add a filled rectangle.
    #[must_use]
    pub fn rect(mut self, x: f32, y: f32, width: f32, height: f32, fill: Rgba) -> Self {
        self.add_element(SvgElement::Rect { x, y, width, height, fill: Some(fill), stroke: None });
        self
    }

    /// Add a filled circle.
    #[must_use]
    pub fn circle(mut self, cx: f32, cy: f32, r: f32, fill: Rgba) -> Self {
        self.add_element(SvgElement::Circle { cx, cy, r, fill });
        self
    }

    /// Add a line.
    #[must_use]
    pub fn line(mut self, from: Point, to: Point, stroke: Rgba, stroke_width: f32) -> Self {
        self.add_element(SvgElement::Line { from, to, stroke, stroke_width });
        self
    }

    /// Add a polyline.
    #[must_use]
    pub fn polyline(mut self, points: &[Point], stroke: Rgba, stroke_width: f32) -> Self {
        self.add_element(SvgElement::Polyline { points: points.to_vec(), stroke, stroke_width });
        self
    }

    /// Add text.
    #[must_use]
    pub fn text(self, x: f32, y: f32, text: &str, font_size: f32, fill: Rgba) -> Self {
        self.text_anchored(x, y, text, font_size, fill, TextAnchor::Start)
    }

    /// Add text with an anchor.
    #[must_use]
    pub fn text_anchored(
        mut self,
        x: f32,
        y: f32,
        text: &str,
        font_size: f32,
        fill: Rgba,
        anchor: TextAnchor,
    ) -> Self {
        self.add_element(SvgElement::Text {
            x,
            y,
            text: text.to_string(),
            font_size,
            fill,
            anchor,
            rotate: false,
        });
        self
    }

    /// Add a raw element.
    pub fn add_element(&mut self, element: SvgElement) {
        self.elements.push(element);
    }

    /// Render to an SVG string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut svg = String::with_capacity(256 + self.elements.len() * 96);
        let (w, h) = (self.width, self.height);

        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
        );
        if let Some(bg) = self.background {
            let _ = writeln!(svg, r#"  <rect width="100%" height="100%" fill="{}"/>"#, css(bg));
        }
        for element in &self.elements {
            let _ = writeln!(svg, "  {}", element_to_svg(element));
        }
        svg.push_str("</svg>\n");
        svg
    }

    /// Write the rendered document to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if file writing fails.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.render())?;
        debug!(path = %path.display(), elements = self.elements.len(), "wrote SVG");
        Ok(())
    }
}

/// CSS color string.
fn css(color: Rgba) -> String {
    if color.a == 255 {
        format!("rgb({},{},{})", color.r, color.g, color.b)
    } else {
        format!("rgba({},{},{},{:.3})", color.r, color.g, color.b, f32::from(color.a) / 255.0)
    }
}

/// Coordinates are written with at most two decimals.
fn num(v: f32) -> String {
    let rounded = (v * 100.0).round() / 100.0;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        format!("{rounded}")
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn element_to_svg(element: &SvgElement) -> String {
    match element {
        SvgElement::Rect { x, y, width, height, fill, stroke } => {
            let fill = fill.map_or_else(|| "none".to_string(), css);
            let stroke = stroke.map(|s| format!(r#" stroke="{}""#, css(s))).unwrap_or_default();
            format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{fill}"{stroke}/>"#,
                num(*x),
                num(*y),
                num(*width),
                num(*height)
            )
        }
        SvgElement::Circle { cx, cy, r, fill } => {
            format!(r#"<circle cx="{}" cy="{}" r="{}" fill="{}"/>"#, num(*cx), num(*cy), num(*r), css(*fill))
        }
        SvgElement::Line { from, to, stroke, stroke_width } => format!(
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}"/>"#,
            num(from.x),
            num(from.y),
            num(to.x),
            num(to.y),
            css(*stroke),
            num(*stroke_width)
        ),
        SvgElement::Polyline { points, stroke, stroke_width } => {
            let points: Vec<String> =
                points.iter().map(|p| format!("{},{}", num(p.x), num(p.y))).collect();
            format!(
                r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="{}" stroke-linejoin="round"/>"#,
                points.join(" "),
                css(*stroke),
                num(*stroke_width)
            )
        }
        SvgElement::Text { x, y, text, font_size, fill, anchor, rotate } => {
            let (x, y) = (num(*x), num(*y));
            let transform =
                if *rotate { format!(r#" transform="rotate(-90 {x} {y})""#) } else { String::new() };
            format!(
                r#"<text x="{x}" y="{y}" font-size="{}" fill="{}" text-anchor="{}" font-family="sans-serif"{transform}>{}</text>"#,
                num(*font_size),
                css(*fill),
                anchor.as_str(),
                escape(text)
            )
        }
        SvgElement::Image { width, height, data } => {
            format!(
                r#"<image x="0" y="0" width="{}" height="{}" xlink:href="{data}"/>"#,
                num(*width),
                num(*height)
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_svg_header() {
        let svg = SvgEncoder::new(800, 600).render();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"width="800""#));
        assert!(svg.contains(r#"viewBox="0 0 800 600""#));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_svg_transparent_background() {
        let svg = SvgEncoder::new(100, 100).background(None).render();
        assert_eq!(svg.matches("<rect").count(), 0);
    }

    #[test]
    fn test_svg_rect_and_circle() {
        let svg = SvgEncoder::new(100, 100)
            .rect(10.0, 20.0, 30.0, 40.0, Rgba::RED)
            .circle(50.0, 50.0, 2.5, Rgba::BLUE)
            .render();
        assert!(svg.contains(r#"<rect x="10" y="20" width="30" height="40" fill="rgb(255,0,0)"/>"#));
        assert!(svg.contains(r#"<circle cx="50" cy="50" r="2.5" fill="rgb(0,0,255)"/>"#));
    }

    #[test]
    fn test_svg_polyline_rounds_coordinates() {
        let points = [Point::new(0.0, 0.0), Point::new(1.23456, 2.0), Point::new(-0.001, 3.0)];
        let svg = SvgEncoder::new(10, 10).polyline(&points, Rgba::BLACK, 1.0).render();
        assert!(svg.contains(r#"points="0,0 1.23,2 0,3""#));
        assert!(svg.contains(r#"fill="none""#));
    }

    #[test]
    fn test_svg_line() {
        let svg = SvgEncoder::new(100, 100)
            .line(Point::ORIGIN, Point::new(100.0, 100.0), Rgba::BLACK, 2.0)
            .render();
        assert!(svg.contains(r#"x2="100""#));
        assert!(svg.contains(r#"stroke-width="2""#));
    }

    #[test]
    fn test_svg_text_escaping() {
        let svg = SvgEncoder::new(100, 100)
            .text(10.0, 50.0, "<b> & \"q\"", 12.0, Rgba::BLACK)
            .render();
        assert!(svg.contains("&lt;b&gt; &amp; &quot;q&quot;"));
        assert!(svg.contains(r#"text-anchor="start""#));
    }

    #[test]
    fn test_svg_rotated_text() {
        let mut svg = SvgEncoder::new(100, 100);
        svg.add_element(SvgElement::Text {
            x: 10.0,
            y: 50.0,
            text: "y".into(),
            font_size: 12.0,
            fill: Rgba::BLACK,
            anchor: TextAnchor::Middle,
            rotate: true,
        });
        assert!(svg.render().contains(r#"transform="rotate(-90 10 50)""#));
    }

    #[test]
    fn test_css_alpha() {
        assert_eq!(css(Rgba::new(255, 0, 0, 128)), "rgba(255,0,0,0.502)");
        assert_eq!(css(Rgba::BLACK), "rgb(0,0,0)");
    }

    #[test]
    fn test_svg_from_framebuffer() {
        let mut fb = Framebuffer::new(4, 4).unwrap();
        fb.clear(Rgba::RED);
        let svg = SvgEncoder::from_framebuffer(&fb).unwrap().render();
        assert!(svg.contains("<image"));
        assert!(svg.contains("data:image/png;base64,"));
    }

    #[test]
    fn test_svg_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plot.svg");
        SvgEncoder::new(10, 10).rect(1.0, 1.0, 8.0, 8.0, Rgba::BLUE).write_to_file(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("</svg>"));
    }
}
