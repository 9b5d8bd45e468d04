// ============================================================================
// WEDGE DIAL WITH POINTER
// ============================================================================

use tracing::debug;

use crate::colormap::ColorMap;
use crate::config::{Color, GaugeConfig};
use crate::error::{ensure_finite, Error, Result};
use crate::geometry::{polar, AngleScale};
use crate::scene::{DynamicSlot, Element, ElementId, HAlign, Scene, Shape, VAlign};
use crate::widget::{ensure_value, format_tick, format_value, Publisher, RenderEvent, Widget};

pub const RADIUS: f64 = 1.0;
pub const BAND_WIDTH: f64 = 0.4;
pub const LABEL_PAD: f64 = 0.06;
pub const CENTER: (f64, f64) = (0.0, 0.0);
pub const ARROW_LENGTH: f64 = 0.37;

const ARROW_WIDTH: f64 = 0.04;
const ARROW_HEAD_WIDTH: f64 = 0.09;
const ARROW_HEAD_LENGTH: f64 = 0.1;
const WEDGE_EDGE_WIDTH: f64 = 1.0;
const TICK_FONT_SIZE: f32 = 14.0;
const TITLE_FONT_SIZE: f32 = 22.0;
const VALUE_FONT_SIZE: f32 = 16.0;
const TITLE_POSITION: (f64, f64) = (0.0, -0.14);
const VALUE_POSITION: (f64, f64) = (0.0, -0.3);
const Z_POINTER: f64 = 2.0;
const Z_HUB_FACE: f64 = 11.0;

/// Semicircular (or custom-angle) dial of colored wedges with a pointer arrow.
#[derive(Debug, Clone)]
pub struct Gauge {
    scale: AngleScale,
    value: f64,
    scene: Scene,
    wedges: Vec<ElementId>,
    ticks: Vec<ElementId>,
    dynamic: DynamicSlot,
    publisher: Publisher,
}

impl Gauge {
    pub fn new(config: GaugeConfig) -> Result<Self> {
        let scale = AngleScale::new(
            (config.val_start, config.val_end),
            (config.angle_start, config.angle_end),
            config.out_of_range,
        )?;
        let colors = ColorMap::from_name(&config.colors)?;
        if config.n_wedges == 0 {
            return Err(Error::InvalidWedgeCount);
        }
        let value = ensure_finite("value", config.value)?;
        let tick_values = match config.tick_step {
            Some(step) => scale.tick_values(step)?,
            None => Vec::new(),
        };

        let mut scene = Scene::new();

        let wedges = (0..config.n_wedges)
            .map(|i| {
                let (theta0, theta1) = scale.slice(i, config.n_wedges);
                let color = colors.sample(i as f64 / config.n_wedges as f64);
                scene.add(Element::new(Shape::Wedge {
                    center: CENTER,
                    radius: RADIUS,
                    width: BAND_WIDTH,
                    theta0,
                    theta1,
                    fill: color,
                    edge: color,
                    line_width: WEDGE_EDGE_WIDTH,
                }))
            })
            .collect();

        let ticks = tick_values
            .iter()
            .map(|&tick| {
                let theta = scale.value_to_angle(tick);
                scene.add(Element::new(Shape::Text {
                    position: polar(CENTER, RADIUS + LABEL_PAD, theta),
                    text: format_tick(tick),
                    size: TICK_FONT_SIZE,
                    bold: true,
                    // Baseline tangent to the dial.
                    rotation: theta - 90.0,
                    h_align: HAlign::Center,
                    v_align: VAlign::Center,
                    color: Color::BLACK,
                }))
            })
            .collect();

        if let Some(title) = &config.title {
            scene.add(Element::new(Shape::Text {
                position: TITLE_POSITION,
                text: title.clone(),
                size: TITLE_FONT_SIZE,
                bold: true,
                rotation: 0.0,
                h_align: HAlign::Center,
                v_align: VAlign::Center,
                color: Color::BLACK,
            }));
        }

        scene.add(Element::new(Shape::Circle {
            center: CENTER,
            radius: 0.02,
            color: Color::BLACK,
        }));
        scene.add(
            Element::new(Shape::Circle {
                center: CENTER,
                radius: 0.01,
                color: Color::WHITE,
            })
            .with_z_order(Z_HUB_FACE),
        );

        let shown = scale.admit(value);
        let dynamic = DynamicSlot::install(&mut scene, pointer(&scale, shown), value_label(value));

        debug!(
            val_start = config.val_start,
            val_end = config.val_end,
            wedges = config.n_wedges,
            ticks = tick_values.len(),
            colors = colors.name(),
            "gauge constructed"
        );

        Ok(Self {
            scale,
            value,
            scene,
            wedges,
            ticks,
            dynamic,
            publisher: Publisher::default(),
        })
    }

    pub fn scale(&self) -> &AngleScale {
        &self.scale
    }

    /// Angle, in degrees, the pointer currently shows.
    ///
    /// Extrapolated values keep their unwrapped angle, so `-50` on the
    /// default dial reads `270`.
    pub fn pointer_angle(&self) -> f64 {
        self.scale.value_to_angle(self.scale.admit(self.value))
    }

    pub fn wedge_ids(&self) -> &[ElementId] {
        &self.wedges
    }

    pub fn tick_ids(&self) -> &[ElementId] {
        &self.ticks
    }
}

impl Widget for Gauge {
    fn value(&self) -> f64 {
        self.value
    }

    fn set(&mut self, value: f64) -> Result<Vec<RenderEvent>> {
        let value = ensure_value(value)?;
        self.value = value;
        let shown = self.scale.admit(value);
        self.dynamic.replace_indicator(&mut self.scene, pointer(&self.scale, shown));
        self.dynamic.replace_label(&mut self.scene, value_label(value));
        Ok(vec![self.publisher.publish(&self.scene, value, true)])
    }

    fn scene(&self) -> &Scene {
        &self.scene
    }

    fn dynamic(&self) -> DynamicSlot {
        self.dynamic
    }
}

fn pointer(scale: &AngleScale, value: f64) -> Element {
    let theta = scale.value_to_angle(value).to_radians();
    Element::new(Shape::Arrow {
        origin: CENTER,
        dx: ARROW_LENGTH * theta.cos(),
        dy: ARROW_LENGTH * theta.sin(),
        width: ARROW_WIDTH,
        head_width: ARROW_HEAD_WIDTH,
        head_length: ARROW_HEAD_LENGTH,
        color: Color::BLACK,
    })
    .with_z_order(Z_POINTER)
}

fn value_label(value: f64) -> Element {
    Element::new(Shape::Text {
        position: VALUE_POSITION,
        text: format_value(value),
        size: VALUE_FONT_SIZE,
        bold: false,
        rotation: 0.0,
        h_align: HAlign::Center,
        v_align: VAlign::Center,
        color: Color::BLACK,
    })
}
