//! Analog dial gauges and a threshold status light.
//!
//! Each widget owns a retained [`Scene`] of shapes. Updating a widget swaps
//! its dynamic indicator and label and returns [`RenderEvent`]s, which can be
//! rasterized with [`raster::rasterize`] or presented by a [`Viewer`].
//!
//! ```no_run
//! use dialgauge::{Gauge, GaugeConfig, Viewer, ViewerConfig, Widget};
//!
//! let mut gauge = Gauge::new(GaugeConfig::builder().tick_step(10.0).build())?;
//! gauge.set(50.0)?;
//! Viewer::new(ViewerConfig::default()).show(&mut gauge)?;
//! # Ok::<(), dialgauge::Error>(())
//! ```

// ============================================================================
// MODULES
// ============================================================================

pub mod arc_gauge;
pub mod colormap;
pub mod config;
pub mod error;
pub mod gauge;
pub mod geometry;
pub mod raster;
pub mod scene;
pub mod status;
pub mod viewer;
pub mod widget;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use arc_gauge::ArcGauge;
pub use colormap::ColorMap;
pub use config::{ArcGaugeConfig, Color, GaugeConfig, StatusConfig, ViewerConfig};
pub use error::{Error, Result};
pub use gauge::Gauge;
pub use geometry::{AngleScale, OutOfRange};
pub use scene::{DynamicSlot, Element, ElementId, Scene, Shape};
pub use status::{Severity, Status};
pub use viewer::{FrameQueue, Viewer, WidgetCommand};
pub use widget::{RenderEvent, Widget};
