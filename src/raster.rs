// ============================================================================
// SOFTWARE RASTERIZER
// ============================================================================

//! Turns a [`Scene`] into RGBA8 pixels.
//!
//! Data space is fitted into the canvas with equal aspect and y pointing up.
//! Text sizes and stroke widths are in points and scale with canvas height.

use std::path::Path;

use rusttype::{point, Font, PositionedGlyph, Scale};

use crate::config::Color;
use crate::error::{Error, Result};
use crate::scene::{HAlign, Scene, Shape, VAlign};

/// Points spanned by the full canvas height (a 4.8 inch figure).
const POINTS_PER_CANVAS: f64 = 345.6;
/// Fraction of the data extent left empty on each side.
const MARGIN: f64 = 0.05;

/// Everything besides the scene that decides how it looks.
#[derive(Clone)]
pub struct RenderStyle {
    pub background: Color,
    pub font: Option<Font<'static>>,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            background: Color::WHITE,
            font: None,
        }
    }
}

/// Reads a TrueType/OpenType font from disk.
pub fn load_font(path: &Path) -> Result<Font<'static>> {
    let data = std::fs::read(path)?;
    Font::try_from_vec(data)
        .ok_or_else(|| Error::Font(format!("{} is not a usable font", path.display())))
}

pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
}

impl<'a> Canvas<'a> {
    /// `frame` holds `width * height` RGBA8 pixels.
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        Self {
            frame,
            width,
            height,
        }
    }

    pub fn clear(&mut self, color: Color) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.r, color.g, color.b, 0xff]);
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: Color, alpha: f32) {
        if x < self.width && y < self.height && (y * self.width + x) * 4 + 4 <= self.frame.len() {
            let idx = (y * self.width + x) * 4;
            let a = alpha.clamp(0.0, 1.0);
            let src = [color.r as f32, color.g as f32, color.b as f32];
            let dst = [
                self.frame[idx] as f32,
                self.frame[idx + 1] as f32,
                self.frame[idx + 2] as f32,
            ];
            let out = [
                (src[0] * a + dst[0] * (1.0 - a)).round() as u8,
                (src[1] * a + dst[1] * (1.0 - a)).round() as u8,
                (src[2] * a + dst[2] * (1.0 - a)).round() as u8,
                0xff,
            ];
            self.frame[idx..idx + 4].copy_from_slice(&out);
        }
    }

    fn blend(&mut self, x: i64, y: i64, color: Color, alpha: f32) {
        if x >= 0 && y >= 0 && alpha > 0.001 {
            self.set_pixel(x as usize, y as usize, color, alpha);
        }
    }
}

/// Affine map from data space to pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    scale: f64,
    center: (f64, f64),
    width: f64,
    height: f64,
}

impl Viewport {
    /// Fits `bounds` into a `width` x `height` canvas with equal aspect.
    pub fn fit(bounds: Option<(f64, f64, f64, f64)>, width: usize, height: usize) -> Self {
        let (min_x, min_y, max_x, max_y) = bounds.unwrap_or((-1.0, -1.0, 1.0, 1.0));
        let span_x = (max_x - min_x).max(f64::EPSILON);
        let span_y = (max_y - min_y).max(f64::EPSILON);
        let pad = 1.0 + 2.0 * MARGIN;
        let scale = (width as f64 / (span_x * pad)).min(height as f64 / (span_y * pad));
        Self {
            scale,
            center: ((min_x + max_x) / 2.0, (min_y + max_y) / 2.0),
            width: width as f64,
            height: height as f64,
        }
    }

    /// Pixels per data unit.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn to_px(&self, (x, y): (f64, f64)) -> (f64, f64) {
        (
            self.width / 2.0 + (x - self.center.0) * self.scale,
            self.height / 2.0 - (y - self.center.1) * self.scale,
        )
    }

    pub fn to_data(&self, (px, py): (f64, f64)) -> (f64, f64) {
        (
            self.center.0 + (px - self.width / 2.0) / self.scale,
            self.center.1 - (py - self.height / 2.0) / self.scale,
        )
    }

    /// Pixel rows and columns covering a data-space box grown by `pad_px`.
    fn pixel_box(&self, bounds: (f64, f64, f64, f64), pad_px: f64) -> (i64, i64, i64, i64) {
        let (x0, y0) = self.to_px((bounds.0, bounds.3));
        let (x1, y1) = self.to_px((bounds.2, bounds.1));
        let clip = |v: f64, limit: f64| v.clamp(0.0, limit) as i64;
        (
            clip((x0 - pad_px).floor(), self.width - 1.0),
            clip((y0 - pad_px).floor(), self.height - 1.0),
            clip((x1 + pad_px).ceil(), self.width - 1.0),
            clip((y1 + pad_px).ceil(), self.height - 1.0),
        )
    }
}

fn points_to_px(points: f64, canvas_height: usize) -> f64 {
    points * canvas_height as f64 / POINTS_PER_CANVAS
}

/// Clears the canvas and draws every element in z-order.
pub fn render_scene(canvas: &mut Canvas, scene: &Scene, style: &RenderStyle) {
    canvas.clear(style.background);
    if canvas.width == 0 || canvas.height == 0 {
        return;
    }
    let viewport = Viewport::fit(scene.bounds(), canvas.width, canvas.height);

    for element in scene.iter_draw_order() {
        let alpha = element.alpha;
        match &element.shape {
            Shape::Wedge {
                center,
                radius,
                width,
                theta0,
                theta1,
                fill,
                edge,
                line_width,
            } => {
                let stroke_px = points_to_px(*line_width, canvas.height);
                let Some(bounds) = element.shape.bounds() else {
                    continue;
                };
                let wedge = WedgeGeometry {
                    center: *center,
                    radius: *radius,
                    inner: (radius - width).max(0.0),
                    theta0: *theta0,
                    theta1: *theta1,
                };
                draw_wedge(
                    canvas, &viewport, &wedge, bounds, *fill, *edge, stroke_px, alpha,
                );
            }
            Shape::Arrow {
                origin,
                dx,
                dy,
                width,
                head_width,
                head_length,
                color,
            } => {
                let scale = viewport.scale();
                let len = dx.hypot(*dy);
                if len <= 0.0 {
                    continue;
                }
                let (ux, uy) = (dx / len, dy / len);
                let base = (origin.0 + dx, origin.1 + dy);
                let tip = (base.0 + ux * head_length, base.1 + uy * head_length);
                let half = head_width / 2.0;
                let left = (base.0 - uy * half, base.1 + ux * half);
                let right = (base.0 + uy * half, base.1 - ux * half);

                let p0 = viewport.to_px(*origin);
                let p1 = viewport.to_px(base);
                draw_thick_line_aa(canvas, p0, p1, (width * scale) as f32, *color, alpha);
                fill_triangle_aa(
                    canvas,
                    [viewport.to_px(left), viewport.to_px(right), viewport.to_px(tip)],
                    *color,
                    alpha,
                );
            }
            Shape::Circle {
                center,
                radius,
                color,
            } => {
                let (cx, cy) = viewport.to_px(*center);
                draw_circle(canvas, cx, cy, radius * viewport.scale(), *color, alpha);
            }
            Shape::Text {
                position,
                text,
                size,
                bold,
                rotation,
                h_align,
                v_align,
                color,
            } => {
                let Some(font) = style.font.as_ref() else {
                    continue;
                };
                let label = TextLabel {
                    anchor: viewport.to_px(*position),
                    text,
                    size_px: points_to_px(f64::from(*size), canvas.height) as f32,
                    bold: *bold,
                    rotation: *rotation,
                    h_align: *h_align,
                    v_align: *v_align,
                };
                draw_text(canvas, font, &label, *color, alpha);
            }
        }
    }
}

/// Renders `scene` into a freshly allocated RGBA8 buffer.
pub fn rasterize(scene: &Scene, width: usize, height: usize, style: &RenderStyle) -> Vec<u8> {
    let mut frame = vec![0u8; width * height * 4];
    let mut canvas = Canvas::new(&mut frame, width, height);
    render_scene(&mut canvas, scene, style);
    frame
}

// ============================================================================
// DRAWING PRIMITIVES
// ============================================================================

struct WedgeGeometry {
    center: (f64, f64),
    radius: f64,
    inner: f64,
    theta0: f64,
    theta1: f64,
}

#[allow(clippy::too_many_arguments)]
fn draw_wedge(
    canvas: &mut Canvas,
    viewport: &Viewport,
    wedge: &WedgeGeometry,
    bounds: (f64, f64, f64, f64),
    fill: Color,
    edge: Color,
    stroke_px: f64,
    alpha: f32,
) {
    let scale = viewport.scale();
    let span = wedge.theta1 - wedge.theta0;
    let (min_x, min_y, max_x, max_y) = viewport.pixel_box(bounds, stroke_px + 1.0);

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let (wx, wy) = viewport.to_data((x as f64 + 0.5, y as f64 + 0.5));
            let (rx, ry) = (wx - wedge.center.0, wy - wedge.center.1);
            let r = rx.hypot(ry);
            let rel = (ry.atan2(rx).to_degrees() - wedge.theta0).rem_euclid(360.0);
            if span < 360.0 && rel > span {
                continue;
            }

            // Signed pixel distance to the nearest boundary, positive inside.
            let mut dist = (wedge.radius - r) * scale;
            if wedge.inner > 0.0 {
                dist = dist.min((r - wedge.inner) * scale);
            }
            if span < 360.0 {
                let to_edge = |deg: f64| r * scale * deg.min(90.0).to_radians().sin();
                dist = dist.min(to_edge(rel)).min(to_edge(span - rel));
            }

            let coverage = (dist + 0.5).clamp(0.0, 1.0) as f32;
            canvas.blend(x, y, fill, coverage * alpha);
            if stroke_px > 0.0 {
                let stroke = (stroke_px / 2.0 + 0.5 - dist.abs()).clamp(0.0, 1.0) as f32;
                canvas.blend(x, y, edge, stroke * alpha);
            }
        }
    }
}

fn draw_thick_line_aa(
    canvas: &mut Canvas,
    (x0, y0): (f64, f64),
    (x1, y1): (f64, f64),
    thickness: f32,
    color: Color,
    alpha: f32,
) {
    let pad = thickness.ceil() as f64 + 1.0;
    let min_x = (x0.min(x1) - pad).floor() as i64;
    let max_x = (x0.max(x1) + pad).ceil() as i64;
    let min_y = (y0.min(y1) - pad).floor() as i64;
    let max_y = (y0.max(y1) + pad).ceil() as i64;
    let dx = (x1 - x0) as f32;
    let dy = (y1 - y0) as f32;
    let len_sq = (dx * dx + dy * dy).max(f32::EPSILON);
    for y in min_y.max(0)..=max_y.min(canvas.height as i64 - 1) {
        for x in min_x.max(0)..=max_x.min(canvas.width as i64 - 1) {
            let px = x as f32 + 0.5 - x0 as f32;
            let py = y as f32 + 0.5 - y0 as f32;
            let t = ((px * dx + py * dy) / len_sq).clamp(0.0, 1.0);
            let lx = t * dx;
            let ly = t * dy;
            let dist = ((lx - px).powi(2) + (ly - py).powi(2)).sqrt();
            let aa = (1.0 - (dist - thickness / 2.0).clamp(0.0, 1.0)).clamp(0.0, 1.0);
            if aa > 0.01 {
                canvas.blend(x, y, color, aa * alpha);
            }
        }
    }
}

fn fill_triangle_aa(canvas: &mut Canvas, corners: [(f64, f64); 3], color: Color, alpha: f32) {
    let min_x = corners.iter().map(|c| c.0).fold(f64::MAX, f64::min).floor() as i64 - 1;
    let max_x = corners.iter().map(|c| c.0).fold(f64::MIN, f64::max).ceil() as i64 + 1;
    let min_y = corners.iter().map(|c| c.1).fold(f64::MAX, f64::min).floor() as i64 - 1;
    let max_y = corners.iter().map(|c| c.1).fold(f64::MIN, f64::max).ceil() as i64 + 1;

    // Edge functions normalised to pixel distances; positive means inside
    // regardless of winding.
    let area = (corners[1].0 - corners[0].0) * (corners[2].1 - corners[0].1)
        - (corners[1].1 - corners[0].1) * (corners[2].0 - corners[0].0);
    if area.abs() < f64::EPSILON {
        return;
    }
    let winding = area.signum();
    let edges: Vec<(f64, f64, f64)> = (0..3)
        .map(|i| {
            let (ax, ay) = corners[i];
            let (bx, by) = corners[(i + 1) % 3];
            let len = (bx - ax).hypot(by - ay).max(f64::EPSILON);
            (ax, ay, len)
        })
        .collect();

    for y in min_y.max(0)..=max_y.min(canvas.height as i64 - 1) {
        for x in min_x.max(0)..=max_x.min(canvas.width as i64 - 1) {
            let (px, py) = (x as f64 + 0.5, y as f64 + 0.5);
            let dist = (0..3)
                .map(|i| {
                    let (ax, ay, len) = edges[i];
                    let (bx, by) = corners[(i + 1) % 3];
                    winding * ((bx - ax) * (py - ay) - (by - ay) * (px - ax)) / len
                })
                .fold(f64::MAX, f64::min);
            let coverage = (dist + 0.5).clamp(0.0, 1.0) as f32;
            canvas.blend(x, y, color, coverage * alpha);
        }
    }
}

fn draw_circle(canvas: &mut Canvas, cx: f64, cy: f64, radius: f64, color: Color, alpha: f32) {
    let min_x = (cx - radius - 1.0).floor().max(0.0) as i64;
    let max_x = ((cx + radius + 1.0).ceil() as i64).min(canvas.width as i64 - 1);
    let min_y = (cy - radius - 1.0).floor().max(0.0) as i64;
    let max_y = ((cy + radius + 1.0).ceil() as i64).min(canvas.height as i64 - 1);
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let dist = (x as f64 + 0.5 - cx).hypot(y as f64 + 0.5 - cy);
            let aa = (radius - dist + 0.5).clamp(0.0, 1.0) as f32;
            canvas.blend(x, y, color, aa * alpha);
        }
    }
}

struct TextLabel<'t> {
    anchor: (f64, f64),
    text: &'t str,
    size_px: f32,
    bold: bool,
    rotation: f64,
    h_align: HAlign,
    v_align: VAlign,
}

fn draw_text(canvas: &mut Canvas, font: &Font, label: &TextLabel, color: Color, alpha: f32) {
    let scale = Scale::uniform(label.size_px);
    let v_metrics = font.v_metrics(scale);
    let glyphs: Vec<PositionedGlyph> = font
        .layout(label.text, scale, point(0.0, v_metrics.ascent))
        .collect();

    let (min_x, max_x, min_y, max_y) = glyphs.iter().filter_map(|g| g.pixel_bounding_box()).fold(
        (i32::MAX, i32::MIN, i32::MAX, i32::MIN),
        |(min_x, max_x, min_y, max_y), bb| {
            (
                min_x.min(bb.min.x),
                max_x.max(bb.max.x),
                min_y.min(bb.min.y),
                max_y.max(bb.max.y),
            )
        },
    );
    if min_x >= max_x || min_y >= max_y {
        return;
    }

    let anchor_x = match label.h_align {
        HAlign::Left => min_x as f64,
        HAlign::Center => (min_x + max_x) as f64 / 2.0,
        HAlign::Right => max_x as f64,
    };
    let anchor_y = match label.v_align {
        VAlign::Top => min_y as f64,
        VAlign::Center => (min_y + max_y) as f64 / 2.0,
        VAlign::Bottom => max_y as f64,
    };

    // Counter-clockwise in data space is clockwise with y pointing down.
    let (sin_r, cos_r) = (-label.rotation.to_radians()).sin_cos();
    let passes: &[f64] = if label.bold { &[0.0, 0.6] } else { &[0.0] };

    for glyph in &glyphs {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, v| {
                if v <= 0.001 {
                    return;
                }
                for &shift in passes {
                    let local_x = gx as f64 + bb.min.x as f64 - anchor_x + shift;
                    let local_y = gy as f64 + bb.min.y as f64 - anchor_y;
                    let x = label.anchor.0 + local_x * cos_r - local_y * sin_r;
                    let y = label.anchor.1 + local_x * sin_r + local_y * cos_r;
                    draw_antialiased_pixel(canvas, x, y, color, v * alpha);
                }
            });
        }
    }
}

fn draw_antialiased_pixel(canvas: &mut Canvas, x: f64, y: f64, color: Color, alpha: f32) {
    let x_floor = x.floor() as i64;
    let y_floor = y.floor() as i64;
    let x_frac = x - x_floor as f64;
    let y_frac = y - y_floor as f64;

    // Bilinear split across the four nearest pixels.
    let samples = [
        (x_floor, y_floor, (1.0 - x_frac) * (1.0 - y_frac)),
        (x_floor + 1, y_floor, x_frac * (1.0 - y_frac)),
        (x_floor, y_floor + 1, (1.0 - x_frac) * y_frac),
        (x_floor + 1, y_floor + 1, x_frac * y_frac),
    ];
    for (px, py, weight) in samples {
        canvas.blend(px, py, color, alpha * weight as f32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Element;

    fn pixel_at(frame: &[u8], width: usize, (x, y): (f64, f64)) -> (u8, u8, u8) {
        let idx = (y as usize * width + x as usize) * 4;
        (frame[idx], frame[idx + 1], frame[idx + 2])
    }

    #[test]
    fn test_viewport_round_trip_and_orientation() {
        let viewport = Viewport::fit(Some((-1.0, -1.0, 1.0, 1.0)), 200, 100);
        let (cx, cy) = viewport.to_px((0.0, 0.0));
        assert_eq!((cx, cy), (100.0, 50.0));
        let (_, up) = viewport.to_px((0.0, 0.5));
        assert!(up < cy, "larger y should be higher on screen");
        let (x, y) = viewport.to_data(viewport.to_px((0.3, -0.7)));
        assert!((x - 0.3).abs() < 1e-9 && (y + 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_viewport_keeps_aspect() {
        let viewport = Viewport::fit(Some((-1.0, 0.0, 1.0, 1.0)), 300, 300);
        let (x0, _) = viewport.to_px((-1.0, 0.0));
        let (x1, _) = viewport.to_px((1.0, 0.0));
        let (_, y0) = viewport.to_px((0.0, 0.0));
        let (_, y1) = viewport.to_px((0.0, 1.0));
        assert!(((x1 - x0) - 2.0 * (y0 - y1)).abs() < 1e-9);
    }

    #[test]
    fn test_clear_fills_background() {
        let frame = rasterize(&Scene::new(), 4, 3, &RenderStyle::default());
        assert_eq!(frame.len(), 4 * 3 * 4);
        assert!(frame.chunks_exact(4).all(|p| p == [0xff, 0xff, 0xff, 0xff]));
    }

    #[test]
    fn test_circle_fills_center() {
        let mut scene = Scene::new();
        scene.add(Element::new(Shape::Circle {
            center: (0.0, 0.0),
            radius: 1.0,
            color: Color::new(0xff, 0x00, 0x00),
        }));
        let frame = rasterize(&scene, 100, 100, &RenderStyle::default());
        assert_eq!(pixel_at(&frame, 100, (50.0, 50.0)), (0xff, 0x00, 0x00));
        assert_eq!(pixel_at(&frame, 100, (0.0, 0.0)), (0xff, 0xff, 0xff));
    }

    #[test]
    fn test_wedge_fills_band_only() {
        let mut scene = Scene::new();
        scene.add(Element::new(Shape::Wedge {
            center: (0.0, 0.0),
            radius: 1.0,
            width: 0.4,
            theta0: 0.0,
            theta1: 180.0,
            fill: Color::new(0x00, 0x00, 0xff),
            edge: Color::new(0x00, 0x00, 0xff),
            line_width: 0.0,
        }));
        let (w, h) = (220, 120);
        let frame = rasterize(&scene, w, h, &RenderStyle::default());
        let viewport = Viewport::fit(scene.bounds(), w, h);
        let band = viewport.to_px((0.0, 0.8));
        let hole = viewport.to_px((0.0, 0.3));
        let side = viewport.to_px((0.8 * 0.7071, 0.8 * 0.7071));
        assert_eq!(pixel_at(&frame, w, band), (0x00, 0x00, 0xff));
        assert_eq!(pixel_at(&frame, w, side), (0x00, 0x00, 0xff));
        assert_eq!(pixel_at(&frame, w, hole), (0xff, 0xff, 0xff));
    }

    #[test]
    fn test_arrow_draws_shaft() {
        let mut scene = Scene::new();
        scene.add(Element::new(Shape::Circle {
            center: (0.0, 0.0),
            radius: 1.0,
            color: Color::WHITE,
        }));
        scene.add(Element::new(Shape::Arrow {
            origin: (0.0, 0.0),
            dx: 0.0,
            dy: 0.5,
            width: 0.1,
            head_width: 0.2,
            head_length: 0.1,
            color: Color::BLACK,
        }));
        let frame = rasterize(&scene, 100, 100, &RenderStyle::default());
        let viewport = Viewport::fit(scene.bounds(), 100, 100);
        assert_eq!(pixel_at(&frame, 100, viewport.to_px((0.0, 0.25))), (0, 0, 0));
        assert_eq!(pixel_at(&frame, 100, viewport.to_px((0.0, 0.55))), (0, 0, 0));
        assert_eq!(
            pixel_at(&frame, 100, viewport.to_px((0.0, -0.5))),
            (0xff, 0xff, 0xff)
        );
    }

    #[test]
    fn test_text_skipped_without_font() {
        let mut scene = Scene::new();
        scene.add(Element::new(Shape::Text {
            position: (0.0, 0.0),
            text: "42.00".to_string(),
            size: 28.0,
            bold: false,
            rotation: 0.0,
            h_align: HAlign::Center,
            v_align: VAlign::Center,
            color: Color::BLACK,
        }));
        let frame = rasterize(&scene, 50, 50, &RenderStyle::default());
        assert!(frame.chunks_exact(4).all(|p| p == [0xff, 0xff, 0xff, 0xff]));
    }

    #[test]
    fn test_load_font_missing_file() {
        let err = load_font(Path::new("/definitely/not/here.ttf")).err().unwrap();
        assert!(matches!(err, Error::Io(_)));
    }
}
