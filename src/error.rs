use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Degenerate range: start and end are both {0}")]
    DegenerateRange(f64),

    #[error("Non-finite parameter: {name} = {value}")]
    NonFiniteParameter { name: &'static str, value: f64 },

    #[error("Non-finite value: {0}")]
    NonFiniteValue(f64),

    #[error("Unknown color map: {0}")]
    UnknownColorMap(String),

    #[error("Wedge count must be at least 1")]
    InvalidWedgeCount,

    #[error("Invalid tick step {0}: must be positive and give at most 10000 ticks")]
    InvalidTickStep(f64),

    #[error("Invalid thresholds: mid {mid} is above high {high}")]
    InvalidThresholds { mid: f64, high: f64 },

    #[error("Font error: {0}")]
    Font(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("Window error: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("Pixels error: {0}")]
    Pixels(#[from] pixels::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Fails with [`Error::NonFiniteParameter`] when `value` is NaN or infinite.
pub(crate) fn ensure_finite(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::NonFiniteParameter { name, value })
    }
}
