use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Axis, AxisId, AxisOrientation, AxisSide, Margins};
use crate::error::{PlotError, PlotResult};

use super::layout_config::{LayoutConfig, PlotRegionConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegionId(pub u32);

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "region#{}", self.0)
    }
}

pub type AxisIds = SmallVec<[AxisId; 4]>;

/// Axes that must end up with one shared total length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedAxisGroup {
    pub orientation: AxisOrientation,
    pub axes: AxisIds,
}

/// One subplot: its sizing inputs and the axes placed around it.
///
/// Axes are kept in insertion order; the first axis on a side is innermost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotRegion {
    id: RegionId,
    config: PlotRegionConfig,
    x_axes: AxisIds,
    y_axes: AxisIds,
    initial_margins: Margins,
}

impl PlotRegion {
    #[must_use]
    pub fn id(&self) -> RegionId {
        self.id
    }

    #[must_use]
    pub fn config(&self) -> &PlotRegionConfig {
        &self.config
    }

    #[must_use]
    pub fn x_axes(&self) -> &[AxisId] {
        &self.x_axes
    }

    #[must_use]
    pub fn y_axes(&self) -> &[AxisId] {
        &self.y_axes
    }

    #[must_use]
    pub fn axes(&self, orientation: AxisOrientation) -> &[AxisId] {
        match orientation {
            AxisOrientation::Horizontal => &self.x_axes,
            AxisOrientation::Vertical => &self.y_axes,
        }
    }

    /// Margins computed by the last margin initialization.
    #[must_use]
    pub fn initial_margins(&self) -> Margins {
        self.initial_margins
    }

    pub(crate) fn set_initial_margins(&mut self, margins: Margins) {
        self.initial_margins = margins;
    }

    /// Fixed plot length along `orientation`, if configured.
    #[must_use]
    pub fn fixed_plot_length(&self, orientation: AxisOrientation) -> Option<f64> {
        match orientation {
            AxisOrientation::Horizontal => self.config.fixed_plot_width,
            AxisOrientation::Vertical => self.config.fixed_plot_height,
        }
    }

    #[must_use]
    pub fn available_length(&self, orientation: AxisOrientation) -> f64 {
        match orientation {
            AxisOrientation::Horizontal => self.config.available.width,
            AxisOrientation::Vertical => self.config.available.height,
        }
    }
}

/// Everything the layout solver reads and mutates.
#[derive(Debug, Clone, Default)]
pub struct LayoutContext {
    config: LayoutConfig,
    axes: IndexMap<AxisId, Axis>,
    regions: IndexMap<RegionId, PlotRegion>,
    axis_regions: IndexMap<AxisId, RegionId>,
    aligned_groups: Vec<AlignedAxisGroup>,
    next_axis_id: u32,
    next_region_id: u32,
}

impl LayoutContext {
    pub fn new(config: LayoutConfig) -> PlotResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    #[must_use]
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: LayoutConfig) -> PlotResult<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn add_region(&mut self, config: PlotRegionConfig) -> PlotResult<RegionId> {
        config.validate()?;
        let id = RegionId(self.next_region_id);
        self.next_region_id += 1;
        self.regions.insert(
            id,
            PlotRegion {
                id,
                config,
                x_axes: AxisIds::new(),
                y_axes: AxisIds::new(),
                initial_margins: Margins::default(),
            },
        );
        Ok(id)
    }

    pub fn set_region_config(&mut self, id: RegionId, config: PlotRegionConfig) -> PlotResult<()> {
        config.validate()?;
        let region = self.region_mut(id)?;
        region.config = config;
        Ok(())
    }

    /// Creates an axis in `region` and returns its id.
    pub fn add_axis(
        &mut self,
        region: RegionId,
        orientation: AxisOrientation,
        side: AxisSide,
    ) -> PlotResult<AxisId> {
        let id = AxisId(self.next_axis_id);
        let target = self.region_mut(region)?;
        match orientation {
            AxisOrientation::Horizontal => target.x_axes.push(id),
            AxisOrientation::Vertical => target.y_axes.push(id),
        }
        self.next_axis_id += 1;
        self.axes.insert(id, Axis::new(id, orientation, side));
        self.axis_regions.insert(id, region);
        Ok(id)
    }

    /// Registers axes that must share one total length.
    ///
    /// Every member must exist and share one orientation.
    pub fn add_aligned_group(&mut self, axes: &[AxisId]) -> PlotResult<()> {
        let Some(first) = axes.first() else {
            return Err(PlotError::InvalidConfig(
                "aligned axis group must not be empty".to_owned(),
            ));
        };
        let orientation = self.axis(*first)?.orientation();
        for id in axes {
            if self.axis(*id)?.orientation() != orientation {
                return Err(PlotError::InvalidConfig(format!(
                    "aligned axis group mixes orientations at {id}"
                )));
            }
            if self.aligned_groups.iter().any(|group| group.axes.contains(id)) {
                return Err(PlotError::InvalidConfig(format!(
                    "{id} already belongs to an aligned group"
                )));
            }
        }
        self.aligned_groups.push(AlignedAxisGroup {
            orientation,
            axes: axes.iter().copied().collect(),
        });
        Ok(())
    }

    pub fn axis(&self, id: AxisId) -> PlotResult<&Axis> {
        self.axes.get(&id).ok_or(PlotError::UnknownAxis(id))
    }

    pub fn axis_mut(&mut self, id: AxisId) -> PlotResult<&mut Axis> {
        self.axes.get_mut(&id).ok_or(PlotError::UnknownAxis(id))
    }

    pub fn axes(&self) -> impl Iterator<Item = &Axis> {
        self.axes.values()
    }

    pub(crate) fn axes_map(&self) -> &IndexMap<AxisId, Axis> {
        &self.axes
    }

    pub(crate) fn axes_map_mut(&mut self) -> &mut IndexMap<AxisId, Axis> {
        &mut self.axes
    }

    pub fn region(&self, id: RegionId) -> PlotResult<&PlotRegion> {
        self.regions
            .get(&id)
            .ok_or_else(|| PlotError::InvalidConfig(format!("unknown {id}")))
    }

    fn region_mut(&mut self, id: RegionId) -> PlotResult<&mut PlotRegion> {
        self.regions
            .get_mut(&id)
            .ok_or_else(|| PlotError::InvalidConfig(format!("unknown {id}")))
    }

    pub fn regions(&self) -> impl Iterator<Item = &PlotRegion> {
        self.regions.values()
    }

    pub(crate) fn region_ids(&self) -> Vec<RegionId> {
        self.regions.keys().copied().collect()
    }

    pub(crate) fn regions_map_mut(&mut self) -> &mut IndexMap<RegionId, PlotRegion> {
        &mut self.regions
    }

    #[must_use]
    pub fn region_of(&self, axis: AxisId) -> Option<RegionId> {
        self.axis_regions.get(&axis).copied()
    }

    /// Axes of `region` on one side, innermost first.
    #[must_use]
    pub fn axes_on(&self, region: &PlotRegion, orientation: AxisOrientation, side: AxisSide) -> AxisIds {
        region
            .axes(orientation)
            .iter()
            .copied()
            .filter(|id| self.axes.get(id).is_some_and(|axis| axis.side() == side))
            .collect()
    }

    /// Caller groups first, then one group per region and orientation for
    /// the axes no caller group claimed.
    ///
    /// A caller group pulls in every same-orientation axis of each region it
    /// touches, so one plot's X (or Y) axes always share a total length.
    /// Caller groups that end up sharing an axis are merged.
    #[must_use]
    pub fn resolved_groups(&self) -> Vec<AlignedAxisGroup> {
        let mut groups: Vec<AlignedAxisGroup> = Vec::new();
        for group in &self.aligned_groups {
            let mut merged = AlignedAxisGroup {
                orientation: group.orientation,
                axes: AxisIds::new(),
            };
            for id in &group.axes {
                let members = self
                    .region_of(*id)
                    .and_then(|region| self.regions.get(&region))
                    .map_or(std::slice::from_ref(id), |region| region.axes(group.orientation));
                push_missing(&mut merged.axes, members);
            }
            groups.retain(|existing| {
                let overlaps = existing.axes.iter().any(|id| merged.axes.contains(id));
                if overlaps {
                    push_missing(&mut merged.axes, &existing.axes);
                }
                !overlaps
            });
            groups.push(merged);
        }

        let claimed = |id: &AxisId| groups.iter().any(|group| group.axes.contains(id));
        let mut region_groups = Vec::new();
        for region in self.regions.values() {
            for orientation in [AxisOrientation::Horizontal, AxisOrientation::Vertical] {
                let axes: AxisIds = region
                    .axes(orientation)
                    .iter()
                    .copied()
                    .filter(|id| !claimed(id))
                    .collect();
                if !axes.is_empty() {
                    region_groups.push(AlignedAxisGroup { orientation, axes });
                }
            }
        }
        groups.extend(region_groups);
        groups
    }

    /// Marks the first axis on every side of every region innermost.
    pub(crate) fn refresh_innermost(&mut self) {
        for region in self.regions.values() {
            for orientation in [AxisOrientation::Horizontal, AxisOrientation::Vertical] {
                let mut seen_near = false;
                let mut seen_far = false;
                for id in region.axes(orientation) {
                    if let Some(axis) = self.axes.get_mut(id) {
                        let seen = match axis.side() {
                            AxisSide::Near => &mut seen_near,
                            AxisSide::Far => &mut seen_far,
                        };
                        axis.set_innermost(!*seen);
                        *seen = true;
                    }
                }
            }
        }
    }
}

fn push_missing(axes: &mut AxisIds, members: &[AxisId]) {
    for id in members {
        if !axes.contains(id) {
            axes.push(*id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::LayoutContext;
    use crate::api::layout_config::{LayoutConfig, PlotRegionConfig};
    use crate::core::{AxisOrientation, AxisSide, Size};

    fn context() -> LayoutContext {
        LayoutContext::new(LayoutConfig::default()).expect("config")
    }

    #[test]
    fn first_axis_per_side_is_innermost() {
        let mut ctx = context();
        let region = ctx
            .add_region(PlotRegionConfig::new(Size::new(400.0, 300.0)))
            .expect("region");
        let inner = ctx
            .add_axis(region, AxisOrientation::Vertical, AxisSide::Near)
            .expect("axis");
        let outer = ctx
            .add_axis(region, AxisOrientation::Vertical, AxisSide::Near)
            .expect("axis");
        let right = ctx
            .add_axis(region, AxisOrientation::Vertical, AxisSide::Far)
            .expect("axis");
        ctx.refresh_innermost();
        assert!(ctx.axis(inner).expect("axis").is_innermost());
        assert!(!ctx.axis(outer).expect("axis").is_innermost());
        assert!(ctx.axis(right).expect("axis").is_innermost());
    }

    #[test]
    fn unclaimed_axes_get_region_groups() {
        let mut ctx = context();
        let top = ctx
            .add_region(PlotRegionConfig::new(Size::new(400.0, 150.0)))
            .expect("region");
        let bottom = ctx
            .add_region(PlotRegionConfig::new(Size::new(400.0, 150.0)))
            .expect("region");
        let y_top = ctx
            .add_axis(top, AxisOrientation::Vertical, AxisSide::Near)
            .expect("axis");
        let y_bottom = ctx
            .add_axis(bottom, AxisOrientation::Vertical, AxisSide::Near)
            .expect("axis");
        let x_bottom = ctx
            .add_axis(bottom, AxisOrientation::Horizontal, AxisSide::Near)
            .expect("axis");
        ctx.add_aligned_group(&[y_top, y_bottom]).expect("group");

        let groups = ctx.resolved_groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].axes.as_slice(), &[y_top, y_bottom]);
        assert_eq!(groups[1].axes.as_slice(), &[x_bottom]);
    }

    #[test]
    fn caller_group_pulls_in_remaining_axes_of_touched_regions() {
        let mut ctx = context();
        let top = ctx
            .add_region(PlotRegionConfig::new(Size::new(400.0, 150.0)))
            .expect("region");
        let bottom = ctx
            .add_region(PlotRegionConfig::new(Size::new(400.0, 150.0)))
            .expect("region");
        let left_top = ctx
            .add_axis(top, AxisOrientation::Vertical, AxisSide::Near)
            .expect("axis");
        let right_top = ctx
            .add_axis(top, AxisOrientation::Vertical, AxisSide::Far)
            .expect("axis");
        let left_bottom = ctx
            .add_axis(bottom, AxisOrientation::Vertical, AxisSide::Near)
            .expect("axis");
        let right_bottom = ctx
            .add_axis(bottom, AxisOrientation::Vertical, AxisSide::Far)
            .expect("axis");
        ctx.add_aligned_group(&[left_top, left_bottom]).expect("left group");
        ctx.add_aligned_group(&[right_bottom]).expect("right group");

        let groups = ctx.resolved_groups();
        assert_eq!(groups.len(), 1);
        let mut axes = groups[0].axes.to_vec();
        axes.sort();
        assert_eq!(axes, vec![left_top, right_top, left_bottom, right_bottom]);
    }

    #[test]
    fn mixed_orientation_group_is_rejected() {
        let mut ctx = context();
        let region = ctx
            .add_region(PlotRegionConfig::new(Size::new(400.0, 300.0)))
            .expect("region");
        let x = ctx
            .add_axis(region, AxisOrientation::Horizontal, AxisSide::Near)
            .expect("axis");
        let y = ctx
            .add_axis(region, AxisOrientation::Vertical, AxisSide::Near)
            .expect("axis");
        assert!(ctx.add_aligned_group(&[x, y]).is_err());
        assert!(ctx.add_aligned_group(&[]).is_err());
    }
}
