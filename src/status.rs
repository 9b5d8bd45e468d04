// ============================================================================
// THRESHOLD STATUS INDICATOR
// ============================================================================

use tracing::debug;

use crate::config::{Color, StatusConfig};
use crate::error::{ensure_finite, Error, Result};
use crate::scene::{DynamicSlot, Element, HAlign, Scene, Shape, VAlign};
use crate::widget::{ensure_value, format_value, Publisher, RenderEvent, Widget};

const LABEL_FONT_SIZE: f32 = 42.0;

/// Bucket a value falls into against the `mid` and `high` thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Normal,
    Warning,
    Critical,
}

impl Severity {
    /// Boundary values belong to the more severe bucket.
    pub fn classify(value: f64, mid: f64, high: f64) -> Self {
        if value >= high {
            Severity::Critical
        } else if value >= mid {
            Severity::Warning
        } else {
            Severity::Normal
        }
    }

    pub fn color(self) -> Color {
        match self {
            Severity::Normal => Color::from_unit(0.0, 0.5, 0.0),
            Severity::Warning => Color::from_unit(0.75, 0.75, 0.0),
            Severity::Critical => Color::from_unit(1.0, 0.0, 0.0),
        }
    }
}

/// Filled circle colored by severity, with the value printed beside it.
#[derive(Debug, Clone)]
pub struct Status {
    mid: f64,
    high: f64,
    value: f64,
    scene: Scene,
    dynamic: DynamicSlot,
    publisher: Publisher,
}

impl Status {
    pub fn new(config: StatusConfig) -> Result<Self> {
        let mid = ensure_finite("mid", config.mid)?;
        let high = ensure_finite("high", config.high)?;
        if mid > high {
            return Err(Error::InvalidThresholds { mid, high });
        }
        let value = ensure_finite("value", config.value)?;

        let mut scene = Scene::new();
        let severity = Severity::classify(value, mid, high);
        let dynamic = DynamicSlot::install(&mut scene, indicator(severity), value_label(value));

        debug!(mid, high, value, ?severity, "status constructed");

        Ok(Self {
            mid,
            high,
            value,
            scene,
            dynamic,
            publisher: Publisher::default(),
        })
    }

    pub fn severity(&self) -> Severity {
        Severity::classify(self.value, self.mid, self.high)
    }

    pub fn thresholds(&self) -> (f64, f64) {
        (self.mid, self.high)
    }
}

impl Widget for Status {
    fn value(&self) -> f64 {
        self.value
    }

    fn set(&mut self, value: f64) -> Result<Vec<RenderEvent>> {
        let value = ensure_value(value)?;
        if value == self.value {
            return Ok(Vec::new());
        }
        self.value = value;
        let severity = self.severity();
        self.dynamic.replace_indicator(&mut self.scene, indicator(severity));
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

fn indicator(severity: Severity) -> Element {
    Element::new(Shape::Circle {
        center: (0.0, 0.0),
        radius: 1.0,
        color: severity.color(),
    })
}

fn value_label(value: f64) -> Element {
    Element::new(Shape::Text {
        position: (1.0, 0.0),
        text: format_value(value),
        size: LABEL_FONT_SIZE,
        bold: false,
        rotation: 0.0,
        h_align: HAlign::Right,
        v_align: VAlign::Center,
        color: Color::BLACK,
    })
}
