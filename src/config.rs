// ============================================================================
// WIDGET AND VIEWER CONFIGURATION
// ============================================================================

use std::path::PathBuf;

use bon::Builder;

use crate::geometry::OutOfRange;

/// Color representation for scene elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::new(0xff, 0xff, 0xff);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn as_tuple(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// Gray level in `[0, 1]`, where `0.95` is a very light gray.
    pub fn gray(level: f64) -> Self {
        let v = channel(level);
        Self::new(v, v, v)
    }

    pub fn from_unit(r: f64, g: f64, b: f64) -> Self {
        Self::new(channel(r), channel(g), channel(b))
    }

    /// Linear blend toward `other`; `t` is clamped into `[0, 1]`.
    pub fn lerp(self, other: Color, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Self::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }

    /// Multiplies every channel by `factor`, used for drop shadows.
    pub fn darkened(self, factor: f64) -> Self {
        let scale = |c: u8| (c as f64 * factor.clamp(0.0, 1.0)).round() as u8;
        Self::new(scale(self.r), scale(self.g), scale(self.b))
    }
}

fn channel(unit: f64) -> u8 {
    (unit.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Configuration for the wedge-style pointer gauge
#[derive(Debug, Clone, Builder)]
pub struct GaugeConfig {
    #[builder(default = 0.0)]
    pub val_start: f64,
    #[builder(default = 100.0)]
    pub val_end: f64,
    #[builder(default = 0.0)]
    pub value: f64,
    #[builder(into, default = "hot".to_string())]
    pub colors: String,
    #[builder(into)]
    pub title: Option<String>,
    #[builder(default = 30)]
    pub n_wedges: usize,
    #[builder(default = 180.0)]
    pub angle_start: f64,
    #[builder(default = 0.0)]
    pub angle_end: f64,
    pub tick_step: Option<f64>,
    #[builder(default)]
    pub out_of_range: OutOfRange,
}

/// Configuration for the animated arc gauge
#[derive(Debug, Clone, Builder)]
pub struct ArcGaugeConfig {
    #[builder(default = 0.0)]
    pub val_start: f64,
    #[builder(default = 100.0)]
    pub val_end: f64,
    #[builder(default = 0.0)]
    pub value: f64,
    #[builder(into, default = "Wistia".to_string())]
    pub colors: String,
    #[builder(into)]
    pub title: Option<String>,
    #[builder(default = 180.0)]
    pub angle_start: f64,
    #[builder(default = 0.0)]
    pub angle_end: f64,
    /// Intermediate frames published before the final one on each change.
    #[builder(default = 6)]
    pub animation_steps: usize,
    #[builder(default)]
    pub out_of_range: OutOfRange,
}

/// Configuration for the threshold status indicator
#[derive(Debug, Clone, Builder)]
pub struct StatusConfig {
    pub mid: f64,
    pub high: f64,
    #[builder(default = 0.0)]
    pub value: f64,
}

/// Configuration for the window viewer
#[derive(Debug, Clone, Builder)]
pub struct ViewerConfig {
    #[builder(into, default = "dialgauge".to_string())]
    pub title: String,
    #[builder(default = 480)]
    pub window_width: usize,
    #[builder(default = 360)]
    pub window_height: usize,
    #[builder(default = 60.0)]
    pub max_framerate: f64,
    #[builder(default = Color::WHITE)]
    pub background: Color,
    /// TrueType/OpenType font used for labels; text is skipped without one.
    #[builder(into)]
    pub font_path: Option<PathBuf>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gray_levels() {
        assert_eq!(Color::gray(0.0), Color::BLACK);
        assert_eq!(Color::gray(1.0), Color::WHITE);
        assert_eq!(Color::gray(0.95), Color::new(242, 242, 242));
    }

    #[test]
    fn test_lerp_endpoints_and_midpoint() {
        let a = Color::new(0, 100, 200);
        let b = Color::new(100, 200, 0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Color::new(50, 150, 100));
        assert_eq!(a.lerp(b, 3.0), b);
    }

    #[test]
    fn test_darkened() {
        assert_eq!(Color::new(200, 100, 10).darkened(0.5), Color::new(100, 50, 5));
    }

    #[test]
    fn test_gauge_config_defaults() {
        let config = GaugeConfig::builder().build();
        assert_eq!(config.val_start, 0.0);
        assert_eq!(config.val_end, 100.0);
        assert_eq!(config.colors, "hot");
        assert_eq!(config.n_wedges, 30);
        assert_eq!(config.angle_start, 180.0);
        assert_eq!(config.angle_end, 0.0);
        assert!(config.title.is_none());
        assert!(config.tick_step.is_none());
        assert_eq!(config.out_of_range, OutOfRange::Extrapolate);
    }

    #[test]
    fn test_arc_gauge_config_defaults() {
        let config = ArcGaugeConfig::builder().title("Load").build();
        assert_eq!(config.colors, "Wistia");
        assert_eq!(config.animation_steps, 6);
        assert_eq!(config.title.as_deref(), Some("Load"));
    }

    #[test]
    fn test_viewer_config_default() {
        let config = ViewerConfig::default();
        assert_eq!(config.window_width, 480);
        assert_eq!(config.background, Color::WHITE);
        assert!(config.font_path.is_none());
    }
}
