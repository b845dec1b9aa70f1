pub mod axis;
pub mod axis_kind;
pub mod curve;
pub mod date_ticks;
pub mod decimation;
pub mod label_text;
pub mod ticks;
pub mod types;

pub use axis::{
    Axis, AxisId, AxisOrientation, AxisSide, AxisStyle, LabelFormatter, TickLabel,
};
pub use axis_kind::AxisKind;
pub use curve::{Curve, CurveId, SortedValues};
pub use date_ticks::{DateTickUnit, derive_date_ticks, from_ole_date, to_ole_date};
pub use decimation::{CurveDecimator, DecimationMask, PixelScale, PointRegion};
pub use label_text::{LabelText, format_numeric_label};
pub use ticks::{
    DecomposedNumber, Tick, TickOverrides, TickSet, TickStep, derive_ticks, nice_interval,
};
pub use types::{LabelSize, Margins, Range, Rect, Size, Thickness1D, Transform1D};
