// ============================================================================
// ANIMATED ARC DIAL
// ============================================================================

use tracing::debug;

use crate::colormap::ColorMap;
use crate::config::{ArcGaugeConfig, Color};
use crate::error::{ensure_finite, Result};
use crate::geometry::{interpolation_steps, ordered, polar, AngleScale, Normalizer};
use crate::scene::{DynamicSlot, Element, ElementId, HAlign, Scene, Shape, VAlign};
use crate::widget::{ensure_value, format_tick, format_value, Publisher, RenderEvent, Widget};

pub const RADIUS: f64 = 1.0;
pub const BAND_WIDTH: f64 = 0.45;
pub const LABEL_PAD: f64 = 0.1;
pub const CENTER: (f64, f64) = (0.0, 0.0);

const EDGE_WIDTH: f64 = 0.3;
const BACKGROUND_GRAY: f64 = 0.95;
const SHADOW_OFFSET: (f64, f64) = (0.01, -0.01);
const SHADOW_DARKEN: f64 = 0.3;
const SHADOW_ALPHA: f32 = 0.5;
const BOUND_FONT_SIZE: f32 = 14.0;
const TITLE_FONT_SIZE: f32 = 10.0;
const VALUE_FONT_SIZE: f32 = 28.0;
const Z_SHADOW: f64 = 0.5;
const Z_ARC: f64 = 2.0;

/// Dial filled by a single colored arc that sweeps to each new value.
#[derive(Debug, Clone)]
pub struct ArcGauge {
    scale: AngleScale,
    normalizer: Normalizer,
    colors: ColorMap,
    animation_steps: usize,
    value: f64,
    /// `value` after the out-of-range policy; where the arc ends.
    shown: f64,
    scene: Scene,
    background: ElementId,
    dynamic: DynamicSlot,
    publisher: Publisher,
}

impl ArcGauge {
    pub fn new(config: ArcGaugeConfig) -> Result<Self> {
        let scale = AngleScale::new(
            (config.val_start, config.val_end),
            (config.angle_start, config.angle_end),
            config.out_of_range,
        )?;
        let colors = ColorMap::from_name(&config.colors)?;
        let value = ensure_finite("value", config.value)?;
        let normalizer = scale.normalizer();
        let shown = scale.admit(value);

        let mut scene = Scene::new();
        let dynamic = DynamicSlot::install(
            &mut scene,
            value_arc(&scale, &normalizer, &colors, shown),
            value_label(value),
        );

        let (theta0, theta1) = ordered(config.angle_start, config.angle_end);
        let band = |center: (f64, f64), fill: Color, edge: Color| Shape::Wedge {
            center,
            radius: RADIUS,
            width: BAND_WIDTH,
            theta0,
            theta1,
            fill,
            edge,
            line_width: EDGE_WIDTH,
        };
        let background_fill = Color::gray(BACKGROUND_GRAY);
        let background = scene.add(Element::new(band(CENTER, background_fill, Color::BLACK)));
        scene.add(
            Element::new(band(
                (CENTER.0 + SHADOW_OFFSET.0, CENTER.1 + SHADOW_OFFSET.1),
                background_fill.darkened(SHADOW_DARKEN),
                Color::BLACK.darkened(SHADOW_DARKEN),
            ))
            .with_z_order(Z_SHADOW)
            .with_alpha(SHADOW_ALPHA),
        );

        for (bound, angle) in [
            (config.val_start, config.angle_start),
            (config.val_end, config.angle_end),
        ] {
            let (x, y) = polar(CENTER, RADIUS - BAND_WIDTH / 2.0, angle);
            scene.add(Element::new(Shape::Text {
                position: (x, y - LABEL_PAD),
                text: format_tick(bound),
                size: BOUND_FONT_SIZE,
                bold: false,
                rotation: 0.0,
                h_align: HAlign::Center,
                v_align: VAlign::Center,
                color: Color::BLACK,
            }));
        }

        if let Some(title) = &config.title {
            scene.add(Element::new(Shape::Text {
                position: (CENTER.0, CENTER.1 - LABEL_PAD),
                text: title.clone(),
                size: TITLE_FONT_SIZE,
                bold: false,
                rotation: 0.0,
                h_align: HAlign::Center,
                v_align: VAlign::Center,
                color: Color::BLACK,
            }));
        }

        debug!(
            val_start = config.val_start,
            val_end = config.val_end,
            steps = config.animation_steps,
            colors = colors.name(),
            "arc gauge constructed"
        );

        Ok(Self {
            scale,
            normalizer,
            colors,
            animation_steps: config.animation_steps,
            value,
            shown,
            scene,
            background,
            dynamic,
            publisher: Publisher::default(),
        })
    }

    pub fn scale(&self) -> &AngleScale {
        &self.scale
    }

    pub fn animation_steps(&self) -> usize {
        self.animation_steps
    }

    pub fn background_id(&self) -> ElementId {
        self.background
    }

    /// Ordered angular span of the value arc currently drawn.
    pub fn arc_span(&self) -> Option<(f64, f64)> {
        match self.scene.get(self.dynamic.indicator())?.shape {
            Shape::Wedge { theta0, theta1, .. } => Some((theta0, theta1)),
            _ => None,
        }
    }

    fn draw_arc(&mut self, value: f64) {
        let arc = value_arc(&self.scale, &self.normalizer, &self.colors, value);
        self.dynamic.replace_indicator(&mut self.scene, arc);
    }
}

impl Widget for ArcGauge {
    fn value(&self) -> f64 {
        self.value
    }

    fn set(&mut self, value: f64) -> Result<Vec<RenderEvent>> {
        let value = ensure_value(value)?;
        if value == self.value {
            return Ok(Vec::new());
        }
        let from = self.shown;
        let to = self.scale.admit(value);
        self.value = value;
        self.shown = to;

        self.dynamic.replace_label(&mut self.scene, value_label(value));
        if to == from {
            // Arc already there, e.g. both values clamped to the same end.
            return Ok(vec![self.publisher.publish(&self.scene, to, true)]);
        }

        let mut frames = Vec::with_capacity(self.animation_steps + 1);
        for step in interpolation_steps(from, to, self.animation_steps) {
            self.draw_arc(step);
            frames.push(self.publisher.publish(&self.scene, step, false));
        }
        self.draw_arc(to);
        frames.push(self.publisher.publish(&self.scene, to, true));
        Ok(frames)
    }

    fn scene(&self) -> &Scene {
        &self.scene
    }

    fn dynamic(&self) -> DynamicSlot {
        self.dynamic
    }
}

fn value_arc(scale: &AngleScale, normalizer: &Normalizer, colors: &ColorMap, value: f64) -> Element {
    let (theta0, theta1) = ordered(scale.angle_start, scale.value_to_angle(value));
    Element::new(Shape::Wedge {
        center: CENTER,
        radius: RADIUS,
        width: BAND_WIDTH,
        theta0,
        theta1,
        fill: colors.sample(normalizer.normalize(value)),
        edge: Color::BLACK,
        line_width: EDGE_WIDTH,
    })
    .with_z_order(Z_ARC)
}

fn value_label(value: f64) -> Element {
    Element::new(Shape::Text {
        position: (CENTER.0, CENTER.1 + (RADIUS - BAND_WIDTH) / 2.0),
        text: format_value(value),
        size: VALUE_FONT_SIZE,
        bold: false,
        rotation: 0.0,
        h_align: HAlign::Center,
        v_align: VAlign::Top,
        color: Color::BLACK,
    })
}
