//! Primitive rendering functions.
//!
//! Rasterization for the marks plots are made of: anti-aliased lines and
//! polylines, filled circles and rectangles.

use crate::color::Rgba;
use crate::framebuffer::Framebuffer;
use crate::geometry::Point;

// ============================================================================
// Line Drawing
// ============================================================================

/// Draw an anti-aliased line using Wu's algorithm.
///
/// Two pixels are plotted at each step along the major axis, their
/// intensities split by the fractional distance to the ideal line. The
/// segment is clipped to the framebuffer first, so off-screen spans cost
/// nothing.
///
/// # References
///
/// Wu, X. (1991). "An Efficient Antialiasing Technique." SIGGRAPH '91.
pub fn draw_line_aa(fb: &mut Framebuffer, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgba) {
    if !(x0.is_finite() && y0.is_finite() && x1.is_finite() && y1.is_finite()) {
        return;
    }
    let Some((x0, y0, x1, y1)) = clip_line(fb, x0, y0, x1, y1) else {
        return;
    };

    let steep = (y1 - y0).abs() > (x1 - x0).abs();
    let (x0, y0, x1, y1) = if steep { (y0, x0, y1, x1) } else { (x0, y0, x1, y1) };
    let (x0, y0, x1, y1) = if x0 > x1 { (x1, y1, x0, y0) } else { (x0, y0, x1, y1) };

    let dx = x1 - x0;
    let dy = y1 - y0;
    let gradient = if dx.abs() < f32::EPSILON { 1.0 } else { dy / dx };

    let mut put = |major: i32, minor: i32, intensity: f32| {
        if steep {
            plot(fb, minor, major, color, intensity);
        } else {
            plot(fb, major, minor, color, intensity);
        }
    };

    // First endpoint
    let xend = x0.round();
    let yend = y0 + gradient * (xend - x0);
    let xgap = rfpart(x0 + 0.5);
    let xpxl1 = xend as i32;
    let ypxl1 = yend.floor() as i32;
    put(xpxl1, ypxl1, rfpart(yend) * xgap);
    put(xpxl1, ypxl1 + 1, fpart(yend) * xgap);

    let mut intery = yend + gradient;

    // Second endpoint
    let xend = x1.round();
    let yend = y1 + gradient * (xend - x1);
    let xgap = fpart(x1 + 0.5);
    let xpxl2 = xend as i32;
    let ypxl2 = yend.floor() as i32;
    put(xpxl2, ypxl2, rfpart(yend) * xgap);
    put(xpxl2, ypxl2 + 1, fpart(yend) * xgap);

    for x in (xpxl1 + 1)..xpxl2 {
        let ipart = intery.floor() as i32;
        put(x, ipart, rfpart(intery));
        put(x, ipart + 1, fpart(intery));
        intery += gradient;
    }
}

/// Clip a segment to the framebuffer, with a two-pixel margin so clipped
/// endpoints fall outside the visible area (Liang-Barsky).
fn clip_line(fb: &Framebuffer, x0: f32, y0: f32, x1: f32, y1: f32) -> Option<(f32, f32, f32, f32)> {
    const MARGIN: f64 = 2.0;
    let (x0, y0, x1, y1) = (f64::from(x0), f64::from(y0), f64::from(x1), f64::from(y1));
    let (xmin, ymin) = (-MARGIN, -MARGIN);
    let xmax = f64::from(fb.width()) + MARGIN;
    let ymax = f64::from(fb.height()) + MARGIN;
    let (dx, dy) = (x1 - x0, y1 - y0);

    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;
    for (p, q) in [(-dx, x0 - xmin), (dx, xmax - x0), (-dy, y0 - ymin), (dy, ymax - y0)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    // Huge inputs lose precision in the parametric form; keep the result in the box
    let at = |t: f64| ((x0 + t * dx).clamp(xmin, xmax) as f32, (y0 + t * dy).clamp(ymin, ymax) as f32);
    let ((cx0, cy0), (cx1, cy1)) = (at(t0), at(t1));
    Some((cx0, cy0, cx1, cy1))
}

/// Draw a line of the given pixel width.
///
/// Wider lines are built from parallel one-pixel strokes offset along the
/// line normal.
pub fn draw_thick_line(fb: &mut Framebuffer, from: Point, to: Point, width: f32, color: Rgba) {
    let strokes = width.round().max(1.0) as i32;
    if strokes == 1 {
        draw_line_aa(fb, from.x, from.y, to.x, to.y, color);
        return;
    }

    let length = from.distance(to);
    if length < f32::EPSILON {
        draw_circle(fb, from.x.round() as i32, from.y.round() as i32, strokes / 2, color);
        return;
    }
    let (nx, ny) = (-(to.y - from.y) / length, (to.x - from.x) / length);

    let half = (strokes - 1) as f32 / 2.0;
    for k in 0..strokes {
        let offset = k as f32 - half;
        draw_line_aa(
            fb,
            from.x + nx * offset,
            from.y + ny * offset,
            to.x + nx * offset,
            to.y + ny * offset,
            color,
        );
    }
}

/// Draw connected line segments through `points`.
pub fn draw_polyline(fb: &mut Framebuffer, points: &[Point], width: f32, color: Rgba) {
    for pair in points.windows(2) {
        draw_thick_line(fb, pair[0], pair[1], width, color);
    }
}

/// Plot a pixel with intensity (for anti-aliased drawing).
#[inline]
fn plot(fb: &mut Framebuffer, x: i32, y: i32, color: Rgba, intensity: f32) {
    if x >= 0 && y >= 0 && x < fb.width() as i32 && y < fb.height() as i32 {
        let alpha = (f32::from(color.a) * intensity.clamp(0.0, 1.0)) as u8;
        fb.blend_pixel(x as u32, y as u32, color.with_alpha(alpha));
    }
}

#[inline]
fn fpart(x: f32) -> f32 {
    x - x.floor()
}

#[inline]
fn rfpart(x: f32) -> f32 {
    1.0 - fpart(x)
}

// ============================================================================
// Rectangle Drawing
// ============================================================================

/// Draw a filled rectangle, cropped to the framebuffer.
pub fn draw_rect(fb: &mut Framebuffer, x: i32, y: i32, width: u32, height: u32, color: Rgba) {
    let crop = |origin: i32, extent: u32| {
        let start = origin.max(0);
        let end = i64::from(origin) + i64::from(extent);
        (start as u32, (end - i64::from(start)).max(0) as u32)
    };
    let (x, width) = crop(x, width);
    let (y, height) = crop(y, height);
    if width > 0 && height > 0 {
        fb.fill_rect(x, y, width, height, color);
    }
}

/// Draw a one-pixel rectangle outline.
pub fn draw_rect_outline(fb: &mut Framebuffer, x: u32, y: u32, width: u32, height: u32, color: Rgba) {
    if width == 0 || height == 0 {
        return;
    }
    fb.fill_rect(x, y, width, 1, color);
    fb.fill_rect(x, y + height - 1, width, 1, color);
    fb.fill_rect(x, y, 1, height, color);
    fb.fill_rect(x + width - 1, y, 1, height, color);
}

// ============================================================================
// Circle Drawing
// ============================================================================

/// Draw a filled circle using the midpoint algorithm.
pub fn draw_circle(fb: &mut Framebuffer, cx: i32, cy: i32, radius: i32, color: Rgba) {
    if radius <= 0 {
        if radius == 0 && cx >= 0 && cy >= 0 {
            fb.set_pixel(cx as u32, cy as u32, color);
        }
        return;
    }

    let mut x = radius;
    let mut y = 0;
    let mut err = 1 - radius;

    while x >= y {
        draw_horizontal_line(fb, cx - x, cx + x, cy + y, color);
        draw_horizontal_line(fb, cx - x, cx + x, cy - y, color);
        draw_horizontal_line(fb, cx - y, cx + y, cy + x, color);
        draw_horizontal_line(fb, cx - y, cx + y, cy - x, color);

        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x) + 1;
        }
    }
}

#[inline]
fn draw_horizontal_line(fb: &mut Framebuffer, x1: i32, x2: i32, y: i32, color: Rgba) {
    if y < 0 || y >= fb.height() as i32 {
        return;
    }

    let x_start = x1.max(0) as u32;
    let x_end = (x2 + 1).max(0).min(fb.width() as i32) as u32;
    if x_start < x_end {
        fb.fill_rect(x_start, y as u32, x_end - x_start, 1, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn white(width: u32, height: u32) -> Framebuffer {
        let mut fb = Framebuffer::new(width, height).unwrap();
        fb.clear(Rgba::WHITE);
        fb
    }

    fn darkened(fb: &Framebuffer) -> usize {
        fb.count_pixels(|c| c != Rgba::WHITE)
    }

    #[test]
    fn test_draw_line_aa_horizontal() {
        let mut fb = white(100, 100);
        draw_line_aa(&mut fb, 10.0, 50.0, 90.0, 50.0, Rgba::BLACK);
        assert_eq!(fb.get_pixel(50, 50), Some(Rgba::BLACK));
        assert_eq!(fb.get_pixel(50, 10), Some(Rgba::WHITE));
    }

    #[test]
    fn test_draw_line_aa_steep() {
        let mut fb = white(100, 100);
        draw_line_aa(&mut fb, 50.0, 10.0, 50.0, 90.0, Rgba::BLACK);
        assert_eq!(fb.get_pixel(50, 50), Some(Rgba::BLACK));
    }

    #[test]
    fn test_draw_line_aa_diagonal_blends() {
        let mut fb = white(100, 100);
        draw_line_aa(&mut fb, 10.0, 10.0, 90.0, 50.0, Rgba::BLACK);
        assert!(darkened(&fb) > 80);
    }

    #[test]
    fn test_draw_line_aa_ignores_non_finite() {
        let mut fb = white(10, 10);
        draw_line_aa(&mut fb, f32::NAN, 0.0, 5.0, 5.0, Rgba::BLACK);
        assert_eq!(darkened(&fb), 0);
    }

    #[test]
    fn test_draw_line_aa_clips_offscreen() {
        let mut fb = white(10, 10);
        draw_line_aa(&mut fb, -50.0, 5.0, 50.0, 5.0, Rgba::BLACK);
        assert_eq!(fb.get_pixel(5, 5), Some(Rgba::BLACK));
    }

    #[test]
    fn test_thick_line_covers_more() {
        let mut thin = white(100, 100);
        let mut thick = white(100, 100);
        let (a, b) = (Point::new(10.0, 50.0), Point::new(90.0, 50.0));
        draw_thick_line(&mut thin, a, b, 1.0, Rgba::BLACK);
        draw_thick_line(&mut thick, a, b, 3.0, Rgba::BLACK);
        assert!(darkened(&thick) > 2 * darkened(&thin));
    }

    #[test]
    fn test_draw_polyline() {
        let mut fb = white(100, 100);
        let points = [Point::new(10.0, 10.0), Point::new(90.0, 10.0), Point::new(90.0, 90.0)];
        draw_polyline(&mut fb, &points, 1.0, Rgba::BLACK);
        assert_eq!(fb.get_pixel(50, 10), Some(Rgba::BLACK));
        assert_eq!(fb.get_pixel(90, 50), Some(Rgba::BLACK));
    }

    #[test]
    fn test_draw_polyline_single_point_draws_nothing() {
        let mut fb = white(10, 10);
        draw_polyline(&mut fb, &[Point::new(5.0, 5.0)], 1.0, Rgba::BLACK);
        assert_eq!(darkened(&fb), 0);
    }

    #[test]
    fn test_draw_circle() {
        let mut fb = white(100, 100);
        draw_circle(&mut fb, 50, 50, 10, Rgba::RED);
        assert_eq!(fb.get_pixel(50, 50), Some(Rgba::RED));
        assert_eq!(fb.get_pixel(59, 50), Some(Rgba::RED));
        assert_eq!(fb.get_pixel(62, 50), Some(Rgba::WHITE));
    }

    #[test]
    fn test_draw_rect_outline() {
        let mut fb = white(20, 20);
        draw_rect_outline(&mut fb, 2, 2, 10, 10, Rgba::BLACK);
        assert_eq!(fb.get_pixel(2, 2), Some(Rgba::BLACK));
        assert_eq!(fb.get_pixel(11, 11), Some(Rgba::BLACK));
        assert_eq!(fb.get_pixel(6, 6), Some(Rgba::WHITE));
        assert_eq!(darkened(&fb), 36);
    }

    #[test]
    fn test_draw_rect_crops_negative_origin() {
        let mut fb = white(10, 10);
        draw_rect(&mut fb, -2, -2, 4, 4, Rgba::BLUE);
        assert_eq!(fb.get_pixel(0, 0), Some(Rgba::BLUE));
        assert_eq!(fb.get_pixel(1, 1), Some(Rgba::BLUE));
        assert_eq!(fb.get_pixel(2, 2), Some(Rgba::WHITE));
        assert_eq!(darkened(&fb), 4);
    }

    #[test]
    fn test_draw_rect_fully_offscreen() {
        let mut fb = white(10, 10);
        draw_rect(&mut fb, -5, -5, 3, 3, Rgba::BLUE);
        assert_eq!(darkened(&fb), 0);
    }

    #[test]
    fn test_clip_line_to_framebuffer() {
        let fb = white(10, 10);
        let (x0, y0, x1, y1) = clip_line(&fb, -1.0e9, 5.0, 1.0e9, 5.0).unwrap();
        assert_abs_diff_eq!(x0, -2.0, epsilon = 1e-3);
        assert_abs_diff_eq!(x1, 12.0, epsilon = 1e-3);
        assert_eq!((y0, y1), (5.0, 5.0));
        assert!(clip_line(&fb, -1.0e9, 50.0, 1.0e9, 50.0).is_none());
        assert!(clip_line(&fb, 20.0, 0.0, 30.0, 10.0).is_none());
        assert_eq!(clip_line(&fb, 1.0, 2.0, 3.0, 4.0), Some((1.0, 2.0, 3.0, 4.0)));
    }

    #[test]
    fn test_draw_line_aa_far_offscreen_endpoints() {
        let mut fb = white(20, 20);
        draw_line_aa(&mut fb, -3.0e38, 10.0, 3.0e38, 10.0, Rgba::BLACK);
        assert_eq!(fb.get_pixel(0, 10), Some(Rgba::BLACK));
        assert_eq!(fb.get_pixel(19, 10), Some(Rgba::BLACK));
        assert_eq!(darkened(&fb), 20);
    }
}
