//! plotaxis: axis layout, tick generation and curve decimation for
//! interactive 2D plots.
//!
//! The crate computes where axes, ticks and labels go and which curve points
//! are worth drawing. Text measurement and drawing stay with the host through
//! the `LabelSizeOracle` and `Renderer` traits.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{LayoutConfig, PlotEngine, PlotRegionConfig};
pub use error::{PlotError, PlotResult};
