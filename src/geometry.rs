//! Data-space geometry shared by the dial widgets.
//!
//! Angles are degrees, counter-clockwise from the positive x axis, and may run
//! in either direction (the default dial sweeps from 180 down to 0).

use tracing::warn;

use crate::error::{ensure_finite, Error, Result};

/// Upper limit on tick labels around one dial.
pub const MAX_TICKS: usize = 10_000;

/// What to do with values that fall outside `[val_start, val_end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutOfRange {
    /// Map linearly past the ends of the dial.
    #[default]
    Extrapolate,
    /// Pin the value to the nearest end before mapping.
    Clamp,
}

/// Linear mapping from a value range onto an angle range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleScale {
    pub val_start: f64,
    pub val_end: f64,
    pub angle_start: f64,
    pub angle_end: f64,
    pub out_of_range: OutOfRange,
}

impl AngleScale {
    pub fn new(
        (val_start, val_end): (f64, f64),
        (angle_start, angle_end): (f64, f64),
        out_of_range: OutOfRange,
    ) -> Result<Self> {
        ensure_finite("val_start", val_start)?;
        ensure_finite("val_end", val_end)?;
        ensure_finite("angle_start", angle_start)?;
        ensure_finite("angle_end", angle_end)?;
        if val_start == val_end {
            return Err(Error::DegenerateRange(val_start));
        }
        Ok(Self {
            val_start,
            val_end,
            angle_start,
            angle_end,
            out_of_range,
        })
    }

    pub fn contains(&self, value: f64) -> bool {
        let (lo, hi) = ordered(self.val_start, self.val_end);
        (lo..=hi).contains(&value)
    }

    /// Applies the out-of-range policy, logging any value outside the range.
    pub fn admit(&self, value: f64) -> f64 {
        if self.contains(value) {
            return value;
        }
        warn!(
            value,
            val_start = self.val_start,
            val_end = self.val_end,
            policy = ?self.out_of_range,
            "value outside gauge range"
        );
        match self.out_of_range {
            OutOfRange::Extrapolate => value,
            OutOfRange::Clamp => {
                let (lo, hi) = ordered(self.val_start, self.val_end);
                value.clamp(lo, hi)
            }
        }
    }

    pub fn value_to_angle(&self, value: f64) -> f64 {
        // Exact at both ends so the pointer lands on the drawn boundary.
        if value == self.val_start {
            return self.angle_start;
        }
        if value == self.val_end {
            return self.angle_end;
        }
        self.angle_start
            + (value - self.val_start) / (self.val_end - self.val_start)
                * (self.angle_end - self.angle_start)
    }

    pub fn normalizer(&self) -> Normalizer {
        Normalizer {
            vmin: self.val_start,
            vmax: self.val_end,
        }
    }

    /// Angular span `[start, end]` of slice `i` out of `n`, ordered ascending.
    pub fn slice(&self, i: usize, n: usize) -> (f64, f64) {
        let span = self.angle_end - self.angle_start;
        let theta0 = self.angle_start + i as f64 / n as f64 * span;
        let theta1 = self.angle_start + (i + 1) as f64 / n as f64 * span;
        ordered(theta0, theta1)
    }

    /// Values for tick labels every `step`, starting at `val_start`.
    ///
    /// Yields `floor(|val_end - val_start| / step) + 1` values stepping toward
    /// `val_end`. Steps giving more than [`MAX_TICKS`] labels are rejected.
    pub fn tick_values(&self, step: f64) -> Result<Vec<f64>> {
        if !(step.is_finite() && step > 0.0) {
            return Err(Error::InvalidTickStep(step));
        }
        let span = self.val_end - self.val_start;
        let count = (span.abs() / step).floor() + 1.0;
        if !(count <= MAX_TICKS as f64) {
            return Err(Error::InvalidTickStep(step));
        }
        let count = count as usize;
        let direction = span.signum();
        Ok((0..count)
            .map(|i| self.val_start + direction * i as f64 * step)
            .collect())
    }
}

/// Maps a raw value onto `[0, 1]` for color lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalizer {
    pub vmin: f64,
    pub vmax: f64,
}

impl Normalizer {
    /// Unclamped; values outside the range land outside `[0, 1]`.
    pub fn normalize(&self, value: f64) -> f64 {
        (value - self.vmin) / (self.vmax - self.vmin)
    }
}

/// Returns the pair smallest first.
pub fn ordered(a: f64, b: f64) -> (f64, f64) {
    if b < a {
        (b, a)
    } else {
        (a, b)
    }
}

/// Point at `radius` from `center` in direction `degrees`.
pub fn polar(center: (f64, f64), radius: f64, degrees: f64) -> (f64, f64) {
    let theta = degrees.to_radians();
    (
        center.0 + radius * theta.cos(),
        center.1 + radius * theta.sin(),
    )
}

/// `count` evenly spaced values from `from` toward `to`, `to` excluded.
pub fn interpolation_steps(from: f64, to: f64, count: usize) -> Vec<f64> {
    let delta = (to - from) / count as f64;
    (0..count).map(|k| from + k as f64 * delta).collect()
}
