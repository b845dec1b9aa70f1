//! View-dependent level-of-detail filtering for polylines.
//!
//! Points are classified against a padded copy of the view. Runs of points
//! that stay off-screen on the same side are dropped from the line except
//! for their boundary points, and on-screen stretches keep only the points
//! that move the line by a visible amount in both directions.

#[cfg(feature = "parallel-classification")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::types::Rect;

/// Minimum padded extent of the cached region, in pixels.
pub const MIN_CACHED_EXTENT_PX: f64 = 500.0;
/// Allowed drift of the pixel scale before the cache is considered stale.
pub const SCALE_DRIFT_TOLERANCE: f64 = 0.1;
/// Inner min/max band, as a fraction of a pixel.
pub const INNER_BAND_PX: f64 = 0.25;
/// Outer min/max band, as a fraction of a pixel.
pub const OUTER_BAND_PX: f64 = 0.75;
/// Point count above which classification runs in parallel.
pub const PARALLEL_CLASSIFICATION_THRESHOLD: usize = 16_384;

/// Graph units covered by one canvas pixel on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelScale {
    pub x: f64,
    pub y: f64,
}

impl PixelScale {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn ratio_to(self, cached: Self) -> (f64, f64) {
        (self.x / cached.x, self.y / cached.y)
    }
}

/// Coarse position of a point relative to the padded view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum PointRegion {
    #[default]
    Inside = 0,
    Left = 1,
    Right = 2,
    Below = 4,
    Above = 8,
}

impl PointRegion {
    /// X is tested first, so a point left of and below the view is `Left`.
    #[must_use]
    pub fn classify(x: f64, y: f64, region: Rect) -> Self {
        if x < region.x_min {
            Self::Left
        } else if x > region.x_max {
            Self::Right
        } else if y < region.y_min {
            Self::Below
        } else if y > region.y_max {
            Self::Above
        } else {
            Self::Inside
        }
    }

    #[must_use]
    pub fn is_outside(self) -> bool {
        self != Self::Inside
    }
}

/// Per-point include flags produced by decimation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DecimationMask {
    pub include_line: Vec<bool>,
    pub include_marker: Vec<bool>,
}

impl DecimationMask {
    #[must_use]
    pub fn all_included(len: usize) -> Self {
        Self {
            include_line: vec![true; len],
            include_marker: vec![true; len],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.include_line.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.include_line.is_empty()
    }

    #[must_use]
    pub fn line_point_count(&self) -> usize {
        self.include_line.iter().filter(|included| **included).count()
    }

    #[must_use]
    pub fn marker_count(&self) -> usize {
        self.include_marker.iter().filter(|included| **included).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DecimationCache {
    region: Rect,
    scale: PixelScale,
}

/// Lazily recomputed decimation state for one curve.
#[derive(Debug, Clone, Default)]
pub struct CurveDecimator {
    cache: Option<DecimationCache>,
    regions: Vec<PointRegion>,
    mask: DecimationMask,
}

impl CurveDecimator {
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            cache: None,
            regions: vec![PointRegion::Inside; len],
            mask: DecimationMask::all_included(len),
        }
    }

    /// Drops the cached view so the next call recomputes.
    pub fn invalidate(&mut self) {
        self.cache = None;
    }

    #[must_use]
    pub fn mask(&self) -> &DecimationMask {
        &self.mask
    }

    #[must_use]
    pub fn regions(&self) -> &[PointRegion] {
        &self.regions
    }

    /// Padded region cached by the last recomputation.
    #[must_use]
    pub fn cached_region(&self) -> Option<Rect> {
        self.cache.map(|cache| cache.region)
    }

    /// Updates the include masks for `view` (graph coordinates) at `scale`.
    ///
    /// `x` and `y` are transformed coordinates of equal length. Recomputation
    /// is skipped while the view stays inside the cached padded region and
    /// the scale has not drifted by more than 10% on either axis.
    pub fn compute_visible_subset(
        &mut self,
        x: &[f64],
        y: &[f64],
        view: Rect,
        scale: PixelScale,
    ) -> &DecimationMask {
        let len = x.len().min(y.len());
        if self.mask.len() != len {
            *self = Self::new(len);
        }
        if len <= 2 {
            return &self.mask;
        }

        if let Some(cache) = self.cache {
            let (width_ratio, height_ratio) = scale.ratio_to(cache.scale);
            let within = |ratio: f64| {
                ratio > 1.0 - SCALE_DRIFT_TOLERANCE && ratio < 1.0 + SCALE_DRIFT_TOLERANCE
            };
            if cache.region.contains_rect(view) && within(width_ratio) && within(height_ratio) {
                trace!(points = len, "decimation cache hit");
                return &self.mask;
            }
        }

        let region = padded_region(view, scale);
        self.cache = Some(DecimationCache { region, scale });
        self.classify(&x[..len], &y[..len], region);
        filter_min_max(&x[..len], &y[..len], &self.regions, scale, &mut self.mask);

        debug!(
            points = len,
            line_points = self.mask.line_point_count(),
            markers = self.mask.marker_count(),
            "recomputed curve decimation"
        );
        &self.mask
    }

    fn classify(&mut self, x: &[f64], y: &[f64], region: Rect) {
        #[cfg(feature = "parallel-classification")]
        {
            if x.len() > PARALLEL_CLASSIFICATION_THRESHOLD {
                self.regions = x
                    .par_iter()
                    .zip(y.par_iter())
                    .map(|(&px, &py)| PointRegion::classify(px, py, region))
                    .collect();
                self.reset_masks_from_regions();
                return;
            }
        }

        self.regions.clear();
        self.regions.extend(
            x.iter()
                .zip(y)
                .map(|(&px, &py)| PointRegion::classify(px, py, region)),
        );
        self.reset_masks_from_regions();
    }

    fn reset_masks_from_regions(&mut self) {
        for (index, region) in self.regions.iter().enumerate() {
            self.mask.include_line[index] = false;
            self.mask.include_marker[index] = !region.is_outside();
        }
    }
}

fn padded_region(view: Rect, scale: PixelScale) -> Rect {
    let width = view.width().max(scale.x.abs() * MIN_CACHED_EXTENT_PX);
    let height = view.height().max(scale.y.abs() * MIN_CACHED_EXTENT_PX);
    Rect::new(
        view.x_min - width / 2.0,
        view.y_min - height / 2.0,
        view.x_max + width / 2.0,
        view.y_max + height / 2.0,
    )
}

/// Running extremes of one min/max scan, relative to the segment start.
struct Envelope {
    x_max: f64,
    x_min: f64,
    y_max: f64,
    y_min: f64,
    x_max_outer: f64,
    x_min_outer: f64,
    y_max_outer: f64,
    y_min_outer: f64,
    x_max_index: Option<usize>,
    x_min_index: Option<usize>,
    y_max_index: Option<usize>,
    y_min_index: Option<usize>,
    within_x: bool,
    within_y: bool,
}

impl Envelope {
    fn new(x: f64, y: f64, scale: PixelScale) -> Self {
        let (inner_x, inner_y) = (scale.x.abs() * INNER_BAND_PX, scale.y.abs() * INNER_BAND_PX);
        let (outer_x, outer_y) = (scale.x.abs() * OUTER_BAND_PX, scale.y.abs() * OUTER_BAND_PX);
        Self {
            x_max: x + inner_x,
            x_min: x - inner_x,
            y_max: y + inner_y,
            y_min: y - inner_y,
            x_max_outer: x + outer_x,
            x_min_outer: x - outer_x,
            y_max_outer: y + outer_y,
            y_min_outer: y - outer_y,
            x_max_index: None,
            x_min_index: None,
            y_max_index: None,
            y_min_index: None,
            within_x: true,
            within_y: true,
        }
    }

    /// Folds in point `index`; returns the extreme indices to force-include
    /// once the point has left the outer band on both axes.
    fn push(&mut self, index: usize, x: f64, y: f64) -> Option<[Option<usize>; 2]> {
        if x > self.x_max {
            self.x_max = x;
            self.x_max_index = Some(index);
            if x > self.x_max_outer {
                self.within_x = false;
                if !self.within_y {
                    return Some([self.y_max_index, self.y_min_index]);
                }
            }
        } else if x < self.x_min {
            self.x_min = x;
            self.x_min_index = Some(index);
            if x < self.x_min_outer {
                self.within_x = false;
                if !self.within_y {
                    return Some([self.y_max_index, self.y_min_index]);
                }
            }
        }
        if y > self.y_max {
            self.y_max = y;
            self.y_max_index = Some(index);
            if y > self.y_max_outer {
                self.within_y = false;
                if !self.within_x {
                    return Some([self.x_max_index, self.x_min_index]);
                }
            }
        } else if y < self.y_min {
            self.y_min = y;
            self.y_min_index = Some(index);
            if y < self.y_min_outer {
                self.within_y = false;
                if !self.within_x {
                    return Some([self.x_max_index, self.x_min_index]);
                }
            }
        }
        None
    }
}

/// True when an off-screen run of at least two points starts at `index`.
fn starts_off_screen_run(regions: &[PointRegion], index: usize) -> bool {
    index + 1 < regions.len()
        && regions[index].is_outside()
        && regions[index] == regions[index + 1]
}

fn filter_min_max(
    x: &[f64],
    y: &[f64],
    regions: &[PointRegion],
    scale: PixelScale,
    mask: &mut DecimationMask,
) {
    let len = x.len();
    let include = &mut mask.include_line;
    let mut index = 0;

    loop {
        if starts_off_screen_run(regions, index) {
            let region = regions[index];
            while index < len - 2 && regions[index + 1] == region {
                index += 1;
            }
            if regions[index + 1] == region {
                // The run reaches the last point; nothing past it to connect to.
                break;
            }
            include[index] = true;
            include[index + 1] = true;
            index += 1;
            if index == len - 1 {
                break;
            }
            continue;
        }
        include[index] = true;

        let mut envelope = Envelope::new(x[index], y[index], scale);
        index += 1;
        loop {
            if starts_off_screen_run(regions, index) {
                break;
            }
            if let Some(extremes) = envelope.push(index, x[index], y[index]) {
                for extreme in extremes.into_iter().flatten() {
                    include[extreme] = true;
                }
                break;
            }
            if index == len - 1 {
                break;
            }
            index += 1;
        }
        include[index] = true;
        include[index - 1] = true;
        if index == len - 1 {
            break;
        }
    }
}
