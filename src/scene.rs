// ============================================================================
// RETAINED MODE SCENE
// ============================================================================

//! The drawing surface each widget owns.
//!
//! Shapes live in data space (the dial is centered on the origin with radius
//! 1). Elements are drawn by ascending z-order, ties broken by insertion order.

use crate::config::Color;
use crate::geometry::polar;

/// Default z-order for filled shapes.
pub const Z_PATCH: f64 = 1.0;
/// Default z-order for text.
pub const Z_TEXT: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Center,
    Bottom,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Annular sector between `radius - width` and `radius`, `theta0 <= theta1`.
    Wedge {
        center: (f64, f64),
        radius: f64,
        width: f64,
        theta0: f64,
        theta1: f64,
        fill: Color,
        edge: Color,
        /// Edge stroke in points; zero draws no stroke.
        line_width: f64,
    },
    /// Shaft from `origin` along `(dx, dy)` with a triangular head beyond it.
    Arrow {
        origin: (f64, f64),
        dx: f64,
        dy: f64,
        width: f64,
        head_width: f64,
        head_length: f64,
        color: Color,
    },
    Circle {
        center: (f64, f64),
        radius: f64,
        color: Color,
    },
    Text {
        position: (f64, f64),
        text: String,
        /// Points, scaled to the canvas at render time.
        size: f32,
        bold: bool,
        /// Degrees counter-clockwise.
        rotation: f64,
        h_align: HAlign,
        v_align: VAlign,
        color: Color,
    },
}

impl Shape {
    /// Data-space extent `(min_x, min_y, max_x, max_y)`; text has none.
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        match self {
            Shape::Wedge {
                center,
                radius,
                width,
                theta0,
                theta1,
                ..
            } => {
                let span = theta1 - theta0;
                if !(span < 360.0) {
                    return Some((
                        center.0 - radius,
                        center.1 - radius,
                        center.0 + radius,
                        center.1 + radius,
                    ));
                }
                let inner = (radius - width).max(0.0);
                let start = theta0.rem_euclid(360.0);
                let end = start + span.max(0.0);
                // Corners plus every axis crossing inside the sweep.
                let mut points = vec![
                    polar(*center, *radius, start),
                    polar(*center, *radius, end),
                    polar(*center, inner, start),
                    polar(*center, inner, end),
                ];
                let mut axis = (start / 90.0).ceil() * 90.0;
                while axis <= end {
                    points.push(polar(*center, *radius, axis));
                    axis += 90.0;
                }
                Some(extent(&points))
            }
            Shape::Arrow {
                origin,
                dx,
                dy,
                head_width,
                head_length,
                ..
            } => {
                let len = dx.hypot(*dy);
                let (ux, uy) = if len > 0.0 { (dx / len, dy / len) } else { (1.0, 0.0) };
                let tip = (
                    origin.0 + dx + ux * head_length,
                    origin.1 + dy + uy * head_length,
                );
                let half = head_width / 2.0;
                let base = (origin.0 + dx, origin.1 + dy);
                Some(extent(&[
                    *origin,
                    tip,
                    (base.0 - uy * half, base.1 + ux * half),
                    (base.0 + uy * half, base.1 - ux * half),
                ]))
            }
            Shape::Circle { center, radius, .. } => Some((
                center.0 - radius,
                center.1 - radius,
                center.0 + radius,
                center.1 + radius,
            )),
            Shape::Text { .. } => None,
        }
    }
}

fn extent(points: &[(f64, f64)]) -> (f64, f64, f64, f64) {
    points.iter().fold(
        (f64::MAX, f64::MAX, f64::MIN, f64::MIN),
        |(min_x, min_y, max_x, max_y), &(x, y)| {
            (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
        },
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub shape: Shape,
    pub z_order: f64,
    /// Opacity in `[0, 1]`.
    pub alpha: f32,
}

impl Element {
    pub fn new(shape: Shape) -> Self {
        let z_order = match shape {
            Shape::Text { .. } => Z_TEXT,
            _ => Z_PATCH,
        };
        Self {
            shape,
            z_order,
            alpha: 1.0,
        }
    }

    pub fn with_z_order(mut self, z_order: f64) -> Self {
        self.z_order = z_order;
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha.clamp(0.0, 1.0);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct Scene {
    elements: Vec<(ElementId, Element)>,
    next_id: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, element: Element) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        self.elements.push((id, element));
        id
    }

    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        let index = self.elements.iter().position(|(e, _)| *e == id)?;
        Some(self.elements.remove(index).1)
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements
            .iter()
            .find(|(e, _)| *e == id)
            .map(|(_, element)| element)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &Element)> {
        self.elements.iter().map(|(id, element)| (*id, element))
    }

    /// Elements sorted by z-order; equal z-orders keep insertion order.
    pub fn iter_draw_order(&self) -> Vec<&Element> {
        let mut sorted: Vec<&Element> = self.elements.iter().map(|(_, e)| e).collect();
        sorted.sort_by(|a, b| a.z_order.total_cmp(&b.z_order));
        sorted
    }

    /// Union of all shape extents, or `None` when nothing has an extent.
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        self.elements
            .iter()
            .filter_map(|(_, e)| e.shape.bounds())
            .reduce(|a, b| (a.0.min(b.0), a.1.min(b.1), a.2.max(b.2), a.3.max(b.3)))
    }
}

/// The indicator and value label a widget replaces on every update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DynamicSlot {
    indicator: ElementId,
    label: ElementId,
}

impl DynamicSlot {
    pub fn install(scene: &mut Scene, indicator: Element, label: Element) -> Self {
        Self {
            indicator: scene.add(indicator),
            label: scene.add(label),
        }
    }

    pub fn indicator(&self) -> ElementId {
        self.indicator
    }

    pub fn label(&self) -> ElementId {
        self.label
    }

    pub fn replace_indicator(&mut self, scene: &mut Scene, indicator: Element) {
        scene.remove(self.indicator);
        self.indicator = scene.add(indicator);
    }

    pub fn replace_label(&mut self, scene: &mut Scene, label: Element) {
        scene.remove(self.label);
        self.label = scene.add(label);
    }
}
