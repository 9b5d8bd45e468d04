// ============================================================================
// NAMED COLOR MAPS
// ============================================================================

use crate::config::Color;
use crate::error::{Error, Result};

/// Piecewise-linear color map sampled on `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorMap {
    name: String,
    stops: Vec<(f64, Color)>,
}

const HOT: &[(f64, (u8, u8, u8))] = &[
    (0.0, (0x0a, 0x00, 0x00)),
    (0.365079, (0xff, 0x00, 0x00)),
    (0.746032, (0xff, 0xff, 0x00)),
    (1.0, (0xff, 0xff, 0xff)),
];

const WISTIA: &[(f64, (u8, u8, u8))] = &[
    (0.0, (0xe4, 0xff, 0x7a)),
    (0.25, (0xff, 0xe8, 0x1a)),
    (0.5, (0xff, 0xbd, 0x00)),
    (0.75, (0xff, 0xa0, 0x00)),
    (1.0, (0xfc, 0x7f, 0x00)),
];

const VIRIDIS: &[(f64, (u8, u8, u8))] = &[
    (0.0, (0x44, 0x01, 0x54)),
    (0.25, (0x3b, 0x52, 0x8b)),
    (0.5, (0x21, 0x91, 0x8c)),
    (0.75, (0x5e, 0xc9, 0x62)),
    (1.0, (0xfd, 0xe7, 0x25)),
];

const GRAY: &[(f64, (u8, u8, u8))] = &[(0.0, (0x00, 0x00, 0x00)), (1.0, (0xff, 0xff, 0xff))];

const RDYLGN: &[(f64, (u8, u8, u8))] = &[
    (0.0, (0xa5, 0x00, 0x26)),
    (0.2, (0xf4, 0x6d, 0x43)),
    (0.4, (0xfe, 0xe0, 0x8b)),
    (0.5, (0xff, 0xff, 0xbf)),
    (0.6, (0xd9, 0xef, 0x8b)),
    (0.8, (0x66, 0xbd, 0x63)),
    (1.0, (0x00, 0x68, 0x37)),
];

const COOLWARM: &[(f64, (u8, u8, u8))] = &[
    (0.0, (0x3b, 0x4c, 0xc0)),
    (0.5, (0xdd, 0xdd, 0xdd)),
    (1.0, (0xb4, 0x04, 0x26)),
];

fn lookup(name: &str) -> Option<&'static [(f64, (u8, u8, u8))]> {
    match name {
        "hot" => Some(HOT),
        "wistia" => Some(WISTIA),
        "viridis" => Some(VIRIDIS),
        "gray" | "grey" => Some(GRAY),
        "rdylgn" => Some(RDYLGN),
        "coolwarm" => Some(COOLWARM),
        _ => None,
    }
}

impl ColorMap {
    /// Resolves a map by name, case-insensitively. A `_r` suffix reverses it.
    pub fn from_name(name: &str) -> Result<Self> {
        let lower = name.to_ascii_lowercase();
        let (base, reversed) = match lower.strip_suffix("_r") {
            Some(base) => (base, true),
            None => (lower.as_str(), false),
        };
        let table = lookup(base).ok_or_else(|| Error::UnknownColorMap(name.to_string()))?;

        let mut stops: Vec<(f64, Color)> = table
            .iter()
            .map(|&(t, (r, g, b))| (t, Color::new(r, g, b)))
            .collect();
        if reversed {
            stops = stops.into_iter().rev().map(|(t, c)| (1.0 - t, c)).collect();
        }

        Ok(Self {
            name: name.to_string(),
            stops,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Color at position `t`, clamped into `[0, 1]`. NaN maps to the low end.
    pub fn sample(&self, t: f64) -> Color {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let upper = self
            .stops
            .iter()
            .position(|&(stop, _)| stop >= t)
            .unwrap_or(self.stops.len() - 1);
        if upper == 0 {
            return self.stops[0].1;
        }
        let (t0, c0) = self.stops[upper - 1];
        let (t1, c1) = self.stops[upper];
        if t1 <= t0 {
            return c1;
        }
        c0.lerp(c1, (t - t0) / (t1 - t0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_names_resolve() {
        for name in ["hot", "Wistia", "viridis", "gray", "RdYlGn", "coolwarm", "hot_r"] {
            assert!(ColorMap::from_name(name).is_ok(), "{name} should resolve");
        }
    }

    #[test]
    fn test_unknown_name_fails() {
        let err = ColorMap::from_name("jet2").unwrap_err();
        assert!(matches!(err, Error::UnknownColorMap(ref n) if n == "jet2"));
    }

    #[test]
    fn test_sample_endpoints() {
        let gray = ColorMap::from_name("gray").unwrap();
        assert_eq!(gray.sample(0.0), Color::BLACK);
        assert_eq!(gray.sample(1.0), Color::WHITE);
        assert_eq!(gray.sample(0.5), Color::new(128, 128, 128));
    }

    #[test]
    fn test_sample_clamps() {
        let gray = ColorMap::from_name("gray").unwrap();
        assert_eq!(gray.sample(-4.0), Color::BLACK);
        assert_eq!(gray.sample(7.0), Color::WHITE);
        assert_eq!(gray.sample(f64::NAN), Color::BLACK);
    }

    #[test]
    fn test_hot_passes_through_red_and_yellow() {
        let hot = ColorMap::from_name("hot").unwrap();
        assert_eq!(hot.sample(0.365079), Color::new(0xff, 0x00, 0x00));
        assert_eq!(hot.sample(0.746032), Color::new(0xff, 0xff, 0x00));
    }

    #[test]
    fn test_reversed_map() {
        let forward = ColorMap::from_name("Wistia").unwrap();
        let reversed = ColorMap::from_name("Wistia_r").unwrap();
        assert_eq!(forward.sample(0.0), reversed.sample(1.0));
        assert_eq!(forward.sample(1.0), reversed.sample(0.0));
        assert_eq!(reversed.name(), "Wistia_r");
    }
}
