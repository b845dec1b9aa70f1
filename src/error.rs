use thiserror::Error;

use crate::core::{AxisId, CurveId};

pub type PlotResult<T> = Result<T, PlotError>;

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("invalid range: min={min}, max={max} ({reason})")]
    InvalidRange { min: f64, max: f64, reason: String },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("curve component lengths differ: x={x_len}, y={y_len}")]
    MismatchedLengths { x_len: usize, y_len: usize },

    #[error("unknown axis: {0:?}")]
    UnknownAxis(AxisId),

    #[error("unknown curve: {0:?}")]
    UnknownCurve(CurveId),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
