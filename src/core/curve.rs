use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::axis_kind::AxisKind;
use crate::core::decimation::{CurveDecimator, DecimationMask, PixelScale};
use crate::core::types::{Range, Rect};
use crate::error::{PlotError, PlotResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CurveId(pub u32);

impl fmt::Display for CurveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "curve#{}", self.0)
    }
}

/// Coordinate used for ordered lookups along the curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortedValues {
    /// Transformed X is non-decreasing.
    X,
    /// Transformed Y is non-decreasing (X is not).
    Y,
    /// Neither is ordered; lookups go through a permutation sorted by X.
    Permuted,
}

/// A polyline in data coordinates plus its axis-transformed copy.
#[derive(Debug, Clone)]
pub struct Curve {
    x: Vec<f64>,
    y: Vec<f64>,
    x_transformed: Vec<f64>,
    y_transformed: Vec<f64>,
    sorted_values: SortedValues,
    sorted_transformed: Vec<f64>,
    sorted_to_unsorted: Vec<usize>,
    decimator: CurveDecimator,
}

impl Curve {
    /// Builds a curve with identity transforms.
    ///
    /// # Errors
    /// Returns [`PlotError::MismatchedLengths`] when `x` and `y` differ in length.
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> PlotResult<Self> {
        if x.len() != y.len() {
            return Err(PlotError::MismatchedLengths {
                x_len: x.len(),
                y_len: y.len(),
            });
        }
        let len = x.len();
        let mut curve = Self {
            x_transformed: x.clone(),
            y_transformed: y.clone(),
            x,
            y,
            sorted_values: SortedValues::X,
            sorted_transformed: Vec::new(),
            sorted_to_unsorted: Vec::new(),
            decimator: CurveDecimator::new(len),
        };
        curve.determine_sorted();
        Ok(curve)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    #[must_use]
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    #[must_use]
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    #[must_use]
    pub fn x_transformed(&self) -> &[f64] {
        &self.x_transformed
    }

    #[must_use]
    pub fn y_transformed(&self) -> &[f64] {
        &self.y_transformed
    }

    #[must_use]
    pub fn sorted_values(&self) -> SortedValues {
        self.sorted_values
    }

    /// Maps sorted position to original point index.
    #[must_use]
    pub fn sorted_to_unsorted(&self) -> &[usize] {
        &self.sorted_to_unsorted
    }

    /// Recomputes transformed coordinates for the given axis kinds.
    ///
    /// Resets decimation so the next view update recomputes it.
    pub fn transform(&mut self, x_kind: AxisKind, y_kind: AxisKind) {
        self.x_transformed = self.x.iter().map(|&v| x_kind.graph_transform(v)).collect();
        self.y_transformed = self.y.iter().map(|&v| y_kind.graph_transform(v)).collect();
        self.determine_sorted();
        self.decimator = CurveDecimator::new(self.len());
    }

    fn determine_sorted(&mut self) {
        self.sorted_to_unsorted = (0..self.len()).collect();
        if is_sorted(&self.x_transformed) {
            self.sorted_values = SortedValues::X;
            self.sorted_transformed = self.x_transformed.clone();
        } else if is_sorted(&self.y_transformed) {
            self.sorted_values = SortedValues::Y;
            self.sorted_transformed = self.y_transformed.clone();
        } else {
            self.sorted_values = SortedValues::Permuted;
            let x = &self.x_transformed;
            self.sorted_to_unsorted
                .sort_by(|&a, &b| x[a].total_cmp(&x[b]));
            self.sorted_transformed = self.sorted_to_unsorted.iter().map(|&i| x[i]).collect();
        }
    }

    /// Bounding box of the transformed points, ignoring non-finite values.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        let x = finite_range(&self.x_transformed)?;
        let y = finite_range(&self.y_transformed)?;
        Some(Rect::from_ranges(x, y))
    }

    /// Index of the point whose sorted coordinate is closest to `transformed`.
    #[must_use]
    pub fn nearest_index(&self, transformed: f64) -> Option<usize> {
        if self.sorted_transformed.is_empty() || transformed.is_nan() {
            return None;
        }
        let upper = self
            .sorted_transformed
            .partition_point(|&value| value < transformed);
        let position = match upper {
            0 => 0,
            n if n == self.sorted_transformed.len() => n - 1,
            n => {
                let below = transformed - self.sorted_transformed[n - 1];
                let above = self.sorted_transformed[n] - transformed;
                if below <= above { n - 1 } else { n }
            }
        };
        self.sorted_to_unsorted.get(position).copied()
    }

    /// Decimates the curve for `view` (transformed graph coordinates).
    pub fn filter_min_max(&mut self, view: Rect, scale: PixelScale) -> &DecimationMask {
        self.decimator
            .compute_visible_subset(&self.x_transformed, &self.y_transformed, view, scale)
    }

    #[must_use]
    pub fn decimation(&self) -> &DecimationMask {
        self.decimator.mask()
    }

    /// Forces the next [`Curve::filter_min_max`] call to recompute.
    pub fn invalidate_decimation(&mut self) {
        self.decimator.invalidate();
    }
}

fn is_sorted(values: &[f64]) -> bool {
    values.windows(2).all(|pair| pair[0] <= pair[1])
}

fn finite_range(values: &[f64]) -> Option<Range> {
    values
        .iter()
        .copied()
        .filter(|value| value.is_finite())
        .fold(None, |acc: Option<Range>, value| {
            Some(match acc {
                Some(range) => Range::new(range.min.min(value), range.max.max(value)),
                None => Range::new(value, value),
            })
        })
}

#[cfg(test)]
mod tests {
    use super::{Curve, SortedValues};
    use crate::core::AxisKind;
    use crate::error::PlotError;

    #[test]
    fn mismatched_lengths_are_rejected() {
        let err = Curve::new(vec![1.0, 2.0], vec![1.0]).expect_err("must fail");
        assert!(matches!(err, PlotError::MismatchedLengths { x_len: 2, y_len: 1 }));
    }

    #[test]
    fn sortedness_prefers_x_then_y() {
        let curve = Curve::new(vec![0.0, 1.0, 2.0], vec![5.0, 1.0, 3.0]).expect("curve");
        assert_eq!(curve.sorted_values(), SortedValues::X);
        let curve = Curve::new(vec![2.0, 0.0, 1.0], vec![1.0, 2.0, 3.0]).expect("curve");
        assert_eq!(curve.sorted_values(), SortedValues::Y);
    }

    #[test]
    fn unsorted_curve_builds_permutation() {
        let curve = Curve::new(vec![3.0, 1.0, 2.0], vec![0.0, 5.0, 1.0]).expect("curve");
        assert_eq!(curve.sorted_values(), SortedValues::Permuted);
        assert_eq!(curve.sorted_to_unsorted(), &[1, 2, 0]);
        assert_eq!(curve.nearest_index(2.9), Some(0));
        assert_eq!(curve.nearest_index(-10.0), Some(1));
    }

    #[test]
    fn log_transform_updates_bounds() {
        let mut curve = Curve::new(vec![1.0, 10.0, 100.0], vec![1.0, 2.0, 3.0]).expect("curve");
        curve.transform(AxisKind::Log, AxisKind::Linear);
        let bounds = curve.bounds().expect("bounds");
        assert_eq!((bounds.x_min, bounds.x_max), (0.0, 2.0));
        assert_eq!((bounds.y_min, bounds.y_max), (1.0, 3.0));
    }
}
