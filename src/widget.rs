//! Common interface of the display widgets.
//!
//! `set` never touches a display. It returns the frames it produced and the
//! caller (usually [`crate::viewer::Viewer`]) decides when to present them.

use tracing::trace;

use crate::error::{Error, Result};
use crate::scene::{DynamicSlot, Scene};

/// Snapshot of a widget's scene published by an update.
#[derive(Debug, Clone)]
pub struct RenderEvent {
    /// Per-widget counter, starting at 1 for the first published frame.
    pub sequence: u64,
    /// The value this frame depicts; intermediate animation values included.
    pub value: f64,
    /// Last frame of the update that produced it.
    pub is_final: bool,
    pub scene: Scene,
}

pub trait Widget {
    /// Current value as last passed to `set` (or the initial value).
    fn value(&self) -> f64;

    /// Redraws the dynamic elements for `value` and returns the frames.
    ///
    /// Non-finite values are rejected and leave the widget unchanged.
    fn set(&mut self, value: f64) -> Result<Vec<RenderEvent>>;

    fn scene(&self) -> &Scene;

    /// The indicator and label currently attached to the scene.
    fn dynamic(&self) -> DynamicSlot;
}

/// Hands out sequence numbers and snapshots the scene.
#[derive(Debug, Clone, Default)]
pub(crate) struct Publisher {
    sequence: u64,
}

impl Publisher {
    pub(crate) fn publish(&mut self, scene: &Scene, value: f64, is_final: bool) -> RenderEvent {
        self.sequence += 1;
        trace!(sequence = self.sequence, value, is_final, "frame published");
        RenderEvent {
            sequence: self.sequence,
            value,
            is_final,
            scene: scene.clone(),
        }
    }
}

pub(crate) fn ensure_value(value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::NonFiniteValue(value))
    }
}

/// Label text for a displayed value, two decimals.
pub fn format_value(value: f64) -> String {
    format!("{value:.2}")
}

/// Scale label text; whole numbers print without a fractional part.
pub fn format_tick(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publisher_sequences() {
        let scene = Scene::new();
        let mut publisher = Publisher::default();
        let first = publisher.publish(&scene, 1.0, false);
        let second = publisher.publish(&scene, 2.0, true);
        assert_eq!(first.sequence, 1);
        assert_eq!(second.sequence, 2);
        assert!(!first.is_final);
        assert!(second.is_final);
    }

    #[test]
    fn test_ensure_value() {
        assert_eq!(ensure_value(4.0).unwrap(), 4.0);
        assert!(matches!(ensure_value(f64::NAN), Err(Error::NonFiniteValue(_))));
        assert!(ensure_value(f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(3.14159), "3.14");
        assert_eq!(format_value(60.0), "60.00");
        assert_eq!(format_value(-0.5), "-0.50");
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(10.0), "10");
        assert_eq!(format_tick(-20.0), "-20");
        assert_eq!(format_tick(2.5), "2.5");
    }
}
