// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Constraint layout driven by edge anchors.

use alloc::vec::Vec;

use kurbo::{Point, Size};
use smallvec::SmallVec;

use crate::{
    Layout, LayoutError, LayoutItem, LayoutItems, LayoutResult, SizeConstraints, ViewportBounds,
};

/// Distance from an edge, measured from the viewport or from another item.
///
/// Relative anchors name another slot by index:
/// - a leading anchor (`left`/`top`) relative to `X` places the item `value`
///   after `X`'s trailing edge,
/// - a trailing anchor (`right`/`bottom`) relative to `X` places the item's
///   trailing edge `value` before `X`'s leading edge.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Anchor {
    /// Offset from the reference edge.
    pub value: f64,
    /// Slot index of the reference item, or `None` for the viewport.
    pub relative_to: Option<usize>,
}

impl Anchor {
    /// An anchor against the viewport edge.
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Self {
            value,
            relative_to: None,
        }
    }

    /// An anchor against the facing edge of another item.
    #[must_use]
    pub const fn relative(value: f64, target: usize) -> Self {
        Self {
            value,
            relative_to: Some(target),
        }
    }
}

/// Anchor constraints for one item.
///
/// Anchoring both edges of an axis makes the item span the distance between
/// them, overriding its own and any percentage size. Centers are offsets from
/// the middle of the viewport and apply only when neither edge is anchored.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AnchorLayoutData {
    /// Left edge anchor.
    pub left: Option<Anchor>,
    /// Right edge anchor.
    pub right: Option<Anchor>,
    /// Top edge anchor.
    pub top: Option<Anchor>,
    /// Bottom edge anchor.
    pub bottom: Option<Anchor>,
    /// Horizontal offset from the viewport center.
    pub horizontal_center: Option<f64>,
    /// Vertical offset from the viewport center.
    pub vertical_center: Option<f64>,
    /// Width as a percentage (`0..=100`) of the viewport width.
    pub percent_width: Option<f64>,
    /// Height as a percentage (`0..=100`) of the viewport height.
    pub percent_height: Option<f64>,
}

impl AnchorLayoutData {
    /// Anchors all four edges to the viewport with the given inset.
    #[must_use]
    pub const fn fill(inset: f64) -> Self {
        Self {
            left: Some(Anchor::new(inset)),
            right: Some(Anchor::new(inset)),
            top: Some(Anchor::new(inset)),
            bottom: Some(Anchor::new(inset)),
            horizontal_center: None,
            vertical_center: None,
            percent_width: None,
            percent_height: None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct AxisRules {
    start: Option<Anchor>,
    end: Option<Anchor>,
    center: Option<f64>,
    percent: Option<f64>,
}

impl AxisRules {
    fn targets(&self) -> SmallVec<[usize; 2]> {
        self.start
            .iter()
            .chain(self.end.iter())
            .filter_map(|a| a.relative_to)
            .collect()
    }
}

#[derive(Clone, Copy, Debug)]
enum Axis {
    X,
    Y,
}

impl Axis {
    fn rules(self, data: Option<AnchorLayoutData>) -> AxisRules {
        let Some(d) = data else {
            return AxisRules::default();
        };
        match self {
            Self::X => AxisRules {
                start: d.left,
                end: d.right,
                center: d.horizontal_center,
                percent: d.percent_width,
            },
            Self::Y => AxisRules {
                start: d.top,
                end: d.bottom,
                center: d.vertical_center,
                percent: d.percent_height,
            },
        }
    }

    fn pos(self, p: Point) -> f64 {
        match self {
            Self::X => p.x,
            Self::Y => p.y,
        }
    }

    fn len(self, s: Size) -> f64 {
        match self {
            Self::X => s.width,
            Self::Y => s.height,
        }
    }

    fn with_pos(self, p: Point, v: f64) -> Point {
        match self {
            Self::X => Point::new(v, p.y),
            Self::Y => Point::new(p.x, v),
        }
    }

    fn with_len(self, s: Size, v: f64) -> Size {
        match self {
            Self::X => Size::new(v, s.height),
            Self::Y => Size::new(s.width, v),
        }
    }

    fn clamp(self, c: &SizeConstraints, v: f64) -> f64 {
        match self {
            Self::X => c.clamp_width(v),
            Self::Y => c.clamp_height(v),
        }
    }

    fn resolve(self, bounds: &ViewportBounds, content: f64) -> f64 {
        match self {
            Self::X => bounds.resolve_width(content),
            Self::Y => bounds.resolve_height(content),
        }
    }
}

/// Positions and sizes items by anchoring their edges to the viewport or to
/// each other.
///
/// Each axis is solved in two passes. The measurement pass works out how large
/// an auto-sized viewport must be to hold every item; the placement pass then
/// assigns concrete sizes and positions inside the resolved viewport. Both
/// passes run in rounds: an item whose anchor target is not resolved yet,
/// including a target later in the list, waits for the next round. A round
/// that resolves nothing means the anchors form a cycle and the layout fails
/// with [`LayoutError::CircularAnchor`].
///
/// Percentage sizes resolve against the viewport in the placement pass only.
/// While an auto-sized viewport is measured, a percentage item counts at its
/// current size, since its share depends on the extent being measured.
///
/// Items without [`AnchorLayoutData`] keep their own position and size.
#[derive(Clone, Debug, Default)]
pub struct AnchorLayout {
    // Scratch state for the current pass.
    resolved: Vec<bool>,
    pending: Vec<usize>,
    extents: Vec<(f64, f64)>,
}

impl AnchorLayout {
    /// Creates an anchor layout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves every laid-out item along `axis`, calling `compute` once per
    /// item after all of its anchor targets have been resolved.
    fn run_rounds<I, F>(
        &mut self,
        items: &mut I,
        axis: Axis,
        mut compute: F,
    ) -> Result<(), LayoutError>
    where
        I: LayoutItems + ?Sized,
        F: FnMut(&mut I::Item, &AxisRules, &[(f64, f64)]) -> (f64, f64),
    {
        let count = items.len();
        self.resolved.clear();
        self.resolved.resize(count, false);
        self.extents.clear();
        self.extents.resize(count, (0.0, 0.0));
        self.pending.clear();
        for i in 0..count {
            if items.get(i).is_some_and(|item| item.include_in_layout()) {
                self.pending.push(i);
            }
        }

        for &i in &self.pending {
            let Some(item) = items.get(i) else {
                continue;
            };
            for target in axis.rules(item.anchors()).targets() {
                let valid = target != i
                    && items
                        .get(target)
                        .is_some_and(|t| t.include_in_layout());
                if !valid {
                    lwarn!(item = i, target, "invalid anchor target");
                    return Err(LayoutError::InvalidAnchorTarget { item: i, target });
                }
            }
        }

        while !self.pending.is_empty() {
            let before = self.pending.len();
            let mut kept = 0;
            for read in 0..before {
                let i = self.pending[read];
                let Some(item) = items.get_mut(i) else {
                    continue;
                };
                let rules = axis.rules(item.anchors());
                if rules.targets().iter().all(|&t| self.resolved[t]) {
                    let extent = compute(item, &rules, &self.extents);
                    self.extents[i] = extent;
                    self.resolved[i] = true;
                } else {
                    self.pending[kept] = i;
                    kept += 1;
                }
            }
            self.pending.truncate(kept);

            if kept == before {
                let item = self.pending[0];
                let target = items
                    .get(item)
                    .and_then(|it| {
                        axis.rules(it.anchors())
                            .targets()
                            .into_iter()
                            .find(|&t| !self.resolved[t])
                    })
                    .unwrap_or(item);
                lwarn!(item, target, "circular anchor reference");
                return Err(LayoutError::CircularAnchor { item, target });
            }
        }
        Ok(())
    }

    /// Returns the viewport extent along `axis`.
    fn measure_axis<I>(
        &mut self,
        items: &mut I,
        axis: Axis,
        bounds: &ViewportBounds,
    ) -> Result<f64, LayoutError>
    where
        I: LayoutItems + ?Sized,
    {
        let mut required = 0.0_f64;
        self.run_rounds(items, axis, |item, rules, extents| {
            let len = axis.len(item.size());
            let start = match (rules.start, rules.end) {
                (Some(a), _) => match a.relative_to {
                    Some(t) => extents[t].1 + a.value,
                    None => a.value,
                },
                (None, Some(Anchor {
                    value,
                    relative_to: Some(t),
                })) => extents[t].0 - value - len,
                (None, Some(_)) => 0.0,
                (None, None) if rules.center.is_some() => 0.0,
                (None, None) => axis.pos(item.origin()),
            };
            let end = start + len;
            let need = match (rules.start, rules.end, rules.center) {
                (_, Some(Anchor {
                    value,
                    relative_to: None,
                }), _) => end + value,
                (None, None, Some(c)) => len + 2.0 * c.abs(),
                _ => end,
            };
            required = required.max(need);
            (start, end)
        })?;
        Ok(axis.resolve(bounds, required))
    }

    /// Sizes and positions items along `axis` inside a viewport of `viewport` extent.
    fn place_axis<I>(
        &mut self,
        items: &mut I,
        axis: Axis,
        viewport: f64,
    ) -> Result<(), LayoutError>
    where
        I: LayoutItems + ?Sized,
    {
        self.run_rounds(items, axis, |item, rules, extents| {
            let size = item.size();
            let origin = item.origin();
            let mut len = axis.len(size);
            if let Some(percent) = rules.percent {
                len = axis.clamp(&item.constraints(), viewport * percent / 100.0);
            }
            let start_edge = rules.start.map(|a| match a.relative_to {
                Some(t) => extents[t].1 + a.value,
                None => a.value,
            });
            let end_edge = rules.end.map(|a| match a.relative_to {
                Some(t) => extents[t].0 - a.value,
                None => viewport - a.value,
            });
            if let (Some(s), Some(e)) = (start_edge, end_edge) {
                len = (e - s).max(0.0);
            }
            let start = match (start_edge, end_edge, rules.center) {
                (Some(s), _, _) => s,
                (None, Some(e), _) => e - len,
                (None, None, Some(c)) => (viewport - len) / 2.0 + c,
                (None, None, None) => axis.pos(origin),
            };
            if len != axis.len(size) {
                item.set_size(axis.with_len(size, len));
            }
            item.set_origin(axis.with_pos(origin, start));
            (start, start + len)
        })
    }
}

impl Layout for AnchorLayout {
    fn layout<I>(
        &mut self,
        items: &mut I,
        bounds: &ViewportBounds,
    ) -> Result<LayoutResult, LayoutError>
    where
        I: LayoutItems + ?Sized,
    {
        bounds.validate()?;
        for i in 0..items.len() {
            if let Some(item) = items.get_mut(i)
                && item.include_in_layout()
            {
                item.validate();
            }
        }

        let width = self.measure_axis(items, Axis::X, bounds)?;
        let height = self.measure_axis(items, Axis::Y, bounds)?;
        self.place_axis(items, Axis::X, width)?;
        let max_x = self.extents.iter().fold(0.0_f64, |m, e| m.max(e.1));
        self.place_axis(items, Axis::Y, height)?;
        let max_y = self.extents.iter().fold(0.0_f64, |m, e| m.max(e.1));

        Ok(LayoutResult {
            content_origin: Point::ZERO,
            content_size: Size::new(width.max(max_x), height.max(max_y)),
            viewport_size: Size::new(width, height),
        })
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use kurbo::{Point, Size};

    use super::{Anchor, AnchorLayout, AnchorLayoutData};
    use crate::{Layout, LayoutError, LayoutItem, ViewportBounds};

    #[derive(Clone, Debug, Default)]
    struct Item {
        size: Size,
        origin: Point,
        anchors: Option<AnchorLayoutData>,
    }

    impl Item {
        fn new(width: f64, height: f64, anchors: AnchorLayoutData) -> Self {
            Self {
                size: Size::new(width, height),
                origin: Point::ZERO,
                anchors: Some(anchors),
            }
        }
    }

    impl LayoutItem for Item {
        fn size(&self) -> Size {
            self.size
        }

        fn set_size(&mut self, size: Size) {
            self.size = size;
        }

        fn origin(&self) -> Point {
            self.origin
        }

        fn set_origin(&mut self, origin: Point) {
            self.origin = origin;
        }

        fn anchors(&self) -> Option<AnchorLayoutData> {
            self.anchors
        }
    }

    fn get(items: &[Option<Item>], i: usize) -> &Item {
        items[i].as_ref().unwrap()
    }

    #[test]
    fn relative_anchor_follows_the_target_edge() {
        let a = AnchorLayoutData {
            left: Some(Anchor::new(0.0)),
            right: Some(Anchor::new(0.0)),
            ..AnchorLayoutData::default()
        };
        let b = AnchorLayoutData {
            left: Some(Anchor::relative(10.0, 0)),
            ..AnchorLayoutData::default()
        };
        let mut items = vec![Some(Item::new(50.0, 10.0, a)), Some(Item::new(30.0, 10.0, b))];
        let bounds = ViewportBounds::fixed(Size::new(200.0, 100.0));
        let result = AnchorLayout::new().layout(&mut items, &bounds).unwrap();

        assert_eq!(get(&items, 0).size.width, 200.0);
        assert_eq!(get(&items, 1).origin.x, 210.0);
        assert_eq!(result.viewport_size, Size::new(200.0, 100.0));
        assert_eq!(result.content_size.width, 240.0);
    }

    #[test]
    fn cycles_are_reported() {
        let a = AnchorLayoutData {
            left: Some(Anchor::relative(0.0, 1)),
            ..AnchorLayoutData::default()
        };
        let b = AnchorLayoutData {
            left: Some(Anchor::relative(0.0, 0)),
            ..AnchorLayoutData::default()
        };
        let mut items = vec![Some(Item::new(10.0, 10.0, a)), Some(Item::new(10.0, 10.0, b))];
        let err = AnchorLayout::new()
            .layout(&mut items, &ViewportBounds::default())
            .unwrap_err();
        assert_eq!(err, LayoutError::CircularAnchor { item: 0, target: 1 });
    }

    #[test]
    fn forward_references_resolve_in_a_later_round() {
        let a = AnchorLayoutData {
            left: Some(Anchor::relative(5.0, 1)),
            ..AnchorLayoutData::default()
        };
        let b = AnchorLayoutData {
            left: Some(Anchor::new(20.0)),
            ..AnchorLayoutData::default()
        };
        let mut items = vec![Some(Item::new(10.0, 10.0, a)), Some(Item::new(30.0, 10.0, b))];
        let result = AnchorLayout::new()
            .layout(&mut items, &ViewportBounds::default())
            .unwrap();
        assert_eq!(get(&items, 0).origin.x, 55.0);
        assert_eq!(result.viewport_size.width, 65.0);
    }

    #[test]
    fn auto_size_accounts_for_both_edges() {
        let data = AnchorLayoutData {
            left: Some(Anchor::new(10.0)),
            right: Some(Anchor::new(5.0)),
            top: Some(Anchor::new(2.0)),
            ..AnchorLayoutData::default()
        };
        let mut items = vec![Some(Item::new(50.0, 20.0, data))];
        let result = AnchorLayout::new()
            .layout(&mut items, &ViewportBounds::default())
            .unwrap();
        assert_eq!(result.viewport_size, Size::new(65.0, 22.0));
        assert_eq!(get(&items, 0).size.width, 50.0);
        assert_eq!(get(&items, 0).origin, Point::new(10.0, 2.0));
    }

    #[test]
    fn percent_size_and_center() {
        let data = AnchorLayoutData {
            percent_width: Some(50.0),
            horizontal_center: Some(0.0),
            bottom: Some(Anchor::new(10.0)),
            ..AnchorLayoutData::default()
        };
        let mut items = vec![Some(Item::new(10.0, 20.0, data))];
        let bounds = ViewportBounds::fixed(Size::new(200.0, 100.0));
        AnchorLayout::new().layout(&mut items, &bounds).unwrap();
        let item = get(&items, 0);
        assert_eq!(item.size, Size::new(100.0, 20.0));
        assert_eq!(item.origin, Point::new(50.0, 70.0));
    }

    #[test]
    fn percent_items_measure_at_their_current_size() {
        let data = AnchorLayoutData {
            left: Some(Anchor::new(10.0)),
            percent_width: Some(50.0),
            ..AnchorLayoutData::default()
        };
        let mut items = vec![Some(Item::new(40.0, 10.0, data))];
        let result = AnchorLayout::new()
            .layout(&mut items, &ViewportBounds::default())
            .unwrap();
        assert_eq!(result.viewport_size, Size::new(50.0, 10.0));
        let item = get(&items, 0);
        assert_eq!(item.size.width, 25.0);
        assert_eq!(item.origin.x, 10.0);
    }

    #[test]
    fn bad_targets_are_rejected() {
        let data = AnchorLayoutData {
            top: Some(Anchor::relative(0.0, 5)),
            ..AnchorLayoutData::default()
        };
        let mut items: Vec<Option<Item>> = vec![Some(Item::new(10.0, 10.0, data)), None];
        let err = AnchorLayout::new()
            .layout(&mut items, &ViewportBounds::default())
            .unwrap_err();
        assert_eq!(err, LayoutError::InvalidAnchorTarget { item: 0, target: 5 });

        let data = AnchorLayoutData {
            left: Some(Anchor::relative(0.0, 1)),
            ..AnchorLayoutData::default()
        };
        items[0] = Some(Item::new(10.0, 10.0, data));
        let err = AnchorLayout::new()
            .layout(&mut items, &ViewportBounds::default())
            .unwrap_err();
        assert_eq!(err, LayoutError::InvalidAnchorTarget { item: 0, target: 1 });
    }
}
