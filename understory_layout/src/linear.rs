// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single row or column layout with optional virtualization.

use alloc::vec::Vec;

use kurbo::{Insets, Point, Size, Vec2};
use understory_virtual_list::{
    ExtentCache, ExtentModel, ScrollAlign, Strip, StripMetrics, compute_visible_range,
    scroll_offset_for_index,
};

use crate::{
    Layout, LayoutError, LayoutEvent, LayoutItem, LayoutItems, LayoutResult, LinearLayoutData,
    NavigationKey, SizeConstraints, ViewportBounds, VirtualLayout,
};

/// Axis along which a [`LinearLayout`] stacks its items.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Items form a row, left to right.
    Horizontal,
    /// Items form a column, top to bottom.
    #[default]
    Vertical,
}

impl Orientation {
    fn main(self, size: Size) -> f64 {
        match self {
            Self::Horizontal => size.width,
            Self::Vertical => size.height,
        }
    }

    fn cross(self, size: Size) -> f64 {
        match self {
            Self::Horizontal => size.height,
            Self::Vertical => size.width,
        }
    }

    fn size(self, main: f64, cross: f64) -> Size {
        match self {
            Self::Horizontal => Size::new(main, cross),
            Self::Vertical => Size::new(cross, main),
        }
    }

    fn point(self, main: f64, cross: f64) -> Point {
        match self {
            Self::Horizontal => Point::new(main, cross),
            Self::Vertical => Point::new(cross, main),
        }
    }

    fn point_main(self, p: Point) -> f64 {
        match self {
            Self::Horizontal => p.x,
            Self::Vertical => p.y,
        }
    }

    fn point_cross(self, p: Point) -> f64 {
        match self {
            Self::Horizontal => p.y,
            Self::Vertical => p.x,
        }
    }

    fn vec(self, main: f64, cross: f64) -> Vec2 {
        self.point(main, cross).to_vec2()
    }

    fn explicit_cross(self, bounds: &ViewportBounds) -> Option<f64> {
        match self {
            Self::Horizontal => bounds.explicit_height,
            Self::Vertical => bounds.explicit_width,
        }
    }

    fn explicit_main(self, bounds: &ViewportBounds) -> Option<f64> {
        match self {
            Self::Horizontal => bounds.explicit_width,
            Self::Vertical => bounds.explicit_height,
        }
    }

    fn max_main(self, bounds: &ViewportBounds) -> f64 {
        match self {
            Self::Horizontal => bounds.max_width,
            Self::Vertical => bounds.max_height,
        }
    }

    fn max_cross(self, bounds: &ViewportBounds) -> f64 {
        match self {
            Self::Horizontal => bounds.max_height,
            Self::Vertical => bounds.max_width,
        }
    }

    fn resolve_main(self, bounds: &ViewportBounds, content: f64) -> f64 {
        match self {
            Self::Horizontal => bounds.resolve_width(content),
            Self::Vertical => bounds.resolve_height(content),
        }
    }

    fn resolve_cross(self, bounds: &ViewportBounds, content: f64) -> f64 {
        match self {
            Self::Horizontal => bounds.resolve_height(content),
            Self::Vertical => bounds.resolve_width(content),
        }
    }

    fn percent_main(self, data: LinearLayoutData) -> Option<f64> {
        match self {
            Self::Horizontal => data.percent_width,
            Self::Vertical => data.percent_height,
        }
    }

    fn percent_cross(self, data: LinearLayoutData) -> Option<f64> {
        match self {
            Self::Horizontal => data.percent_height,
            Self::Vertical => data.percent_width,
        }
    }

    fn clamp_main(self, constraints: &SizeConstraints, value: f64) -> f64 {
        match self {
            Self::Horizontal => constraints.clamp_width(value),
            Self::Vertical => constraints.clamp_height(value),
        }
    }

    fn clamp_cross(self, constraints: &SizeConstraints, value: f64) -> f64 {
        match self {
            Self::Horizontal => constraints.clamp_height(value),
            Self::Vertical => constraints.clamp_width(value),
        }
    }
}

/// Alignment of items within the viewport along one axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Align {
    /// Left or top.
    #[default]
    Start,
    /// Centered.
    Center,
    /// Right or bottom.
    End,
    /// On the cross axis, stretch items to fill the viewport, or to the widest
    /// item when the viewport sizes itself. On the primary axis, spread spare
    /// space evenly into the gaps.
    Justify,
}

/// Stacks items in a single row or column.
///
/// Items keep their measured extent along the primary axis unless they carry a
/// percentage in [`LinearLayoutData`]. Percentages are resolved against the
/// space left after padding, gaps, and fixed items; an item whose share falls
/// outside its [`SizeConstraints`] is clamped and the share of the others is
/// recomputed until nothing changes.
///
/// # Virtualization
///
/// With [`LinearLayout::set_virtual`] enabled, the slot list may contain
/// placeholders for items that have no renderer. Their extent is estimated from
/// an [`ExtentCache`]: the last measured extent at that index when
/// [`LinearLayout::set_variable_extents`] is on, otherwise the typical item
/// extent. Real items in a uniform virtual layout are resized to the typical
/// extent.
///
/// When a measurement disagrees with the cache, the layout records
/// [`LayoutEvent::ExtentsChanged`]; if the item starts before the scroll
/// position it also records [`LayoutEvent::Scroll`] with the delta that keeps
/// the visible content still.
///
/// # Sticky headers
///
/// When [`LinearLayout::sticky_headers`] is set, the last header (see
/// [`Layout::set_header_indices`]) that starts at or before the scroll
/// position is pinned to the leading edge of the viewport until the next
/// header pushes it out. [`VirtualLayout::visible_indices`] always includes
/// that header.
#[derive(Clone, Debug)]
pub struct LinearLayout {
    /// Stacking axis.
    pub orientation: Orientation,
    /// Space between the viewport edges and the items.
    pub padding: Insets,
    /// Space between consecutive items.
    pub gap: f64,
    /// Overrides the gap between the first and second items.
    pub first_gap: Option<f64>,
    /// Overrides the gap between the second-to-last and last items.
    pub last_gap: Option<f64>,
    /// Alignment along the stacking axis when content is smaller than the viewport.
    pub primary_align: Align,
    /// Alignment across the stacking axis.
    pub cross_align: Align,
    /// Extra indices realized on each side of the visible run.
    pub overscan: usize,
    /// Pin the current group header to the leading edge.
    pub sticky_headers: bool,
    virtual_layout: bool,
    variable_extents: bool,
    cache: ExtentCache,
    typical: Option<Size>,
    headers: Vec<usize>,
    events: Vec<LayoutEvent>,
    // Scratch buffers, cleared at the start of each use.
    starts: Vec<f64>,
    pending: Vec<usize>,
}

impl Default for LinearLayout {
    fn default() -> Self {
        Self::new(Orientation::Vertical)
    }
}

impl LinearLayout {
    /// Creates a non-virtual layout along `orientation` with no padding or gaps.
    #[must_use]
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            padding: Insets::ZERO,
            gap: 0.0,
            first_gap: None,
            last_gap: None,
            primary_align: Align::Start,
            cross_align: Align::Start,
            overscan: 1,
            sticky_headers: false,
            virtual_layout: false,
            variable_extents: false,
            cache: ExtentCache::new(),
            typical: None,
            headers: Vec::new(),
            events: Vec::new(),
            starts: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// A vertical layout.
    #[must_use]
    pub fn vertical() -> Self {
        Self::new(Orientation::Vertical)
    }

    /// A horizontal layout.
    #[must_use]
    pub fn horizontal() -> Self {
        Self::new(Orientation::Horizontal)
    }

    /// Enables or disables virtualization. Toggling forgets cached extents.
    pub fn set_virtual(&mut self, enabled: bool) {
        if self.virtual_layout != enabled {
            self.virtual_layout = enabled;
            self.cache.reset();
            self.events.push(LayoutEvent::ExtentsChanged);
        }
    }

    /// Whether virtualization is enabled.
    #[must_use]
    pub const fn virtual_enabled(&self) -> bool {
        self.virtual_layout
    }

    /// Remembers each item's measured extent instead of assuming the typical one.
    pub fn set_variable_extents(&mut self, enabled: bool) {
        if self.variable_extents != enabled {
            self.variable_extents = enabled;
            self.cache.reset();
            self.events.push(LayoutEvent::ExtentsChanged);
        }
    }

    /// Whether items may have differing extents.
    #[must_use]
    pub const fn variable_extents(&self) -> bool {
        self.variable_extents
    }

    /// The per-index extent cache along the stacking axis.
    #[must_use]
    pub const fn cache(&self) -> &ExtentCache {
        &self.cache
    }

    fn metrics(&self) -> StripMetrics {
        let (padding_start, padding_end) = self.main_padding();
        StripMetrics {
            padding_start,
            padding_end,
            gap: self.gap,
            first_gap: self.first_gap,
            last_gap: self.last_gap,
        }
    }

    fn main_padding(&self) -> (f64, f64) {
        match self.orientation {
            Orientation::Horizontal => (self.padding.x0, self.padding.x1),
            Orientation::Vertical => (self.padding.y0, self.padding.y1),
        }
    }

    fn cross_padding(&self) -> (f64, f64) {
        match self.orientation {
            Orientation::Horizontal => (self.padding.y0, self.padding.y1),
            Orientation::Vertical => (self.padding.x0, self.padding.x1),
        }
    }

    fn require_virtual(&self) -> Result<(), LayoutError> {
        if self.virtual_layout {
            Ok(())
        } else {
            Err(LayoutError::NotVirtual)
        }
    }

    fn uniform(&self) -> bool {
        self.virtual_layout && !self.variable_extents && self.typical.is_some()
    }

    fn size_items<I>(&self, items: &mut I, bounds: &ViewportBounds)
    where
        I: LayoutItems + ?Sized,
    {
        let o = self.orientation;
        let (cross_start, cross_end) = self.cross_padding();
        let available_cross = o
            .explicit_cross(bounds)
            .or_else(|| Some(o.max_cross(bounds)).filter(|m| m.is_finite()))
            .map(|c| (c - cross_start - cross_end).max(0.0));
        // Auto-sized cross axis: justify and percentages resolve against the
        // widest item that sizes itself.
        let available_cross = available_cross.or_else(|| {
            let mut widest = self
                .typical
                .filter(|_| self.virtual_layout)
                .map(|t| o.cross(t));
            for i in 0..items.len() {
                let Some(item) = items.get(i) else {
                    continue;
                };
                if !item.include_in_layout()
                    || item.linear_data().and_then(|d| o.percent_cross(d)).is_some()
                {
                    continue;
                }
                let cross = o.cross(item.size());
                widest = Some(widest.map_or(cross, |w| w.max(cross)));
            }
            widest
        });
        let typical_main = self.typical.map(|t| o.main(t));
        let uniform = self.uniform();

        for i in 0..items.len() {
            let Some(item) = items.get_mut(i) else {
                continue;
            };
            if !item.include_in_layout() {
                continue;
            }
            let size = item.size();
            let constraints = item.constraints();
            let mut main = o.main(size);
            let mut cross = o.cross(size);
            if let Some(available) = available_cross {
                if self.cross_align == Align::Justify {
                    cross = o.clamp_cross(&constraints, available);
                } else if let Some(percent) = item.linear_data().and_then(|d| o.percent_cross(d))
                {
                    cross = o.clamp_cross(&constraints, available * percent / 100.0);
                }
            }
            if uniform && let Some(typical) = typical_main {
                main = typical;
            }
            let sized = o.size(main, cross);
            if sized != size {
                item.set_size(sized);
            }
        }
    }

    fn apply_percent_main<I>(&mut self, items: &mut I, bounds: &ViewportBounds)
    where
        I: LayoutItems + ?Sized,
    {
        let o = self.orientation;
        let Some(available) = o
            .explicit_main(bounds)
            .or_else(|| Some(o.max_main(bounds)).filter(|m| m.is_finite()))
        else {
            return;
        };
        let (main_start, main_end) = self.main_padding();
        let metrics = self.metrics();

        let pending = &mut self.pending;
        pending.clear();
        let mut fixed = 0.0;
        let mut total_percent = 0.0;
        let mut included = 0_usize;
        for i in 0..items.len() {
            let Some(item) = items.get(i) else {
                continue;
            };
            if !item.include_in_layout() {
                continue;
            }
            included += 1;
            match item.linear_data().and_then(|d| o.percent_main(d)) {
                Some(percent) if percent > 0.0 => {
                    pending.push(i);
                    total_percent += percent;
                }
                _ => fixed += o.main(item.size()),
            }
        }
        if pending.is_empty() {
            return;
        }

        let gaps = metrics.gaps_before(included.saturating_sub(1), included);
        let mut remaining = (available - main_start - main_end - gaps - fixed).max(0.0);
        // Shares below 100% leave the rest of the space unused.
        let mut total_percent = f64::max(total_percent, 100.0);

        loop {
            let unit = remaining / total_percent;
            let mut clamped = false;
            let mut k = 0;
            while k < pending.len() {
                let i = pending[k];
                let Some(item) = items.get_mut(i) else {
                    pending.swap_remove(k);
                    continue;
                };
                let percent = item
                    .linear_data()
                    .and_then(|d| o.percent_main(d))
                    .unwrap_or(0.0);
                let wanted = unit * percent;
                let got = o.clamp_main(&item.constraints(), wanted);
                if got == wanted {
                    k += 1;
                    continue;
                }
                let cross = o.cross(item.size());
                item.set_size(o.size(got, cross));
                remaining = (remaining - got).max(0.0);
                total_percent -= percent;
                pending.swap_remove(k);
                clamped = true;
            }
            if !clamped || pending.is_empty() || total_percent <= 0.0 {
                break;
            }
        }

        if total_percent <= 0.0 {
            return;
        }
        let unit = remaining / total_percent;
        for &i in pending.iter() {
            if let Some(item) = items.get_mut(i) {
                let percent = item
                    .linear_data()
                    .and_then(|d| o.percent_main(d))
                    .unwrap_or(0.0);
                let cross = o.cross(item.size());
                item.set_size(o.size(unit * percent, cross));
            }
        }
    }

    fn pin_header<I>(&self, items: &mut I, scroll: f64)
    where
        I: LayoutItems + ?Sized,
    {
        let count = self.starts.len();
        let Some(header) = self
            .headers
            .iter()
            .rev()
            .copied()
            .find(|&h| h < count && self.starts[h] <= scroll)
        else {
            return;
        };
        let next = self.headers.iter().copied().find(|&h| h > header && h < count);
        let o = self.orientation;
        let Some(item) = items.get_mut(header) else {
            return;
        };
        let extent = o.main(item.size());
        let natural = self.starts[header];
        let mut pinned = scroll.max(natural);
        if let Some(next) = next {
            pinned = pinned.min(self.starts[next] - extent).max(natural);
        }
        let cross = o.point_cross(item.origin());
        item.set_origin(o.point(pinned, cross));
    }

    fn page(&mut self, current: usize, count: usize, bounds: &ViewportBounds, forward: bool) -> usize {
        let o = self.orientation;
        let last = count - 1;
        self.cache.set_len(count);
        let metrics = self.metrics();
        let mut strip = Strip::new(&mut self.cache, metrics);
        let total = strip.total_extent();
        let viewport = o.resolve_main(bounds, total);
        if forward {
            let target = strip.offset_of(current) + viewport;
            let mut i = strip.index_at_offset(target).min(last);
            // The destination should end within one page of the current item.
            while i > current + 1 && strip.end_of(i) > target {
                i -= 1;
            }
            i.max((current + 1).min(last))
        } else {
            let target = strip.end_of(current) - viewport;
            let mut i = strip.index_at_offset(target.max(0.0));
            if i < current && strip.offset_of(i) < target {
                i += 1;
            }
            i.min(current.saturating_sub(1))
        }
    }
}

impl Layout for LinearLayout {
    fn layout<I>(
        &mut self,
        items: &mut I,
        bounds: &ViewportBounds,
    ) -> Result<LayoutResult, LayoutError>
    where
        I: LayoutItems + ?Sized,
    {
        bounds.validate()?;
        let o = self.orientation;
        let count = items.len();
        self.cache.set_len(count);

        for i in 0..count {
            if let Some(item) = items.get_mut(i)
                && item.include_in_layout()
            {
                item.validate();
            }
        }

        self.size_items(items, bounds);
        if !self.virtual_layout {
            self.apply_percent_main(items, bounds);
        }

        let metrics = self.metrics();
        let (main_start, main_end) = self.main_padding();
        let (cross_start, cross_end) = self.cross_padding();
        let scroll_main = o.point_main(bounds.scroll.to_point());

        self.starts.clear();
        self.starts.resize(count, main_start);
        let mut max_cross = match self.typical {
            Some(typical) if self.virtual_layout => o.cross(typical),
            _ => 0.0,
        };
        let mut pos = main_start;
        let mut prev: Option<usize> = None;
        let mut real = 0_usize;
        let mut extents_changed = false;
        let mut compensation = 0.0;

        for i in 0..count {
            match items.get_mut(i) {
                Some(item) => {
                    if !item.include_in_layout() {
                        self.starts[i] = pos;
                        continue;
                    }
                    if let Some(p) = prev {
                        pos += metrics.gap_after(p, count);
                    }
                    let size = item.size();
                    let extent = o.main(size);
                    item.set_origin(o.point(pos, cross_start));
                    self.starts[i] = pos;
                    max_cross = max_cross.max(o.cross(size));
                    if !self.virtual_layout {
                        self.cache.set(i, extent);
                    } else if self.variable_extents {
                        let previous = self.cache.set(i, extent);
                        if previous != extent {
                            extents_changed = true;
                            if pos < scroll_main {
                                compensation += extent - previous;
                            }
                        }
                    }
                    pos += extent;
                    real += 1;
                }
                None => {
                    if let Some(p) = prev {
                        pos += metrics.gap_after(p, count);
                    }
                    self.starts[i] = pos;
                    pos += self.cache.extent_of(i);
                }
            }
            prev = Some(i);
        }

        let content_main = pos + main_end;
        let content_cross = max_cross + cross_start + cross_end;
        let viewport_main = o.resolve_main(bounds, content_main);
        let viewport_cross = o.resolve_cross(bounds, content_cross);

        // Cross-axis alignment.
        let available_cross = (viewport_cross.max(content_cross) - cross_start - cross_end).max(0.0);
        if matches!(self.cross_align, Align::Center | Align::End) {
            for i in 0..count {
                let Some(item) = items.get_mut(i) else {
                    continue;
                };
                if !item.include_in_layout() {
                    continue;
                }
                let free = available_cross - o.cross(item.size());
                let offset = if self.cross_align == Align::Center {
                    free / 2.0
                } else {
                    free
                };
                let main = o.point_main(item.origin());
                item.set_origin(o.point(main, cross_start + offset));
            }
        }

        // Primary-axis alignment shifts the already placed items.
        if content_main < viewport_main && self.primary_align != Align::Start {
            let free = viewport_main - content_main;
            let justify = self.primary_align == Align::Justify;
            let step = if justify && !self.virtual_layout && real > 1 {
                free / (real - 1) as f64
            } else {
                0.0
            };
            let shift = match self.primary_align {
                Align::Center => free / 2.0,
                Align::End => free,
                _ => 0.0,
            };
            let mut placed = 0.0;
            for i in 0..count {
                let Some(item) = items.get_mut(i) else {
                    self.starts[i] += shift;
                    continue;
                };
                if !item.include_in_layout() {
                    continue;
                }
                let offset = shift + step * placed;
                let origin = item.origin();
                item.set_origin(o.point(o.point_main(origin) + offset, o.point_cross(origin)));
                self.starts[i] += offset;
                placed += 1.0;
            }
        }

        if self.sticky_headers && !self.headers.is_empty() {
            self.pin_header(items, scroll_main);
        }

        if extents_changed {
            ltrace!(count, "cached item extents changed");
            self.events.push(LayoutEvent::ExtentsChanged);
        }
        if compensation != 0.0 {
            ltrace!(compensation, "compensating scroll for resized items");
            self.events.push(LayoutEvent::Scroll(o.vec(compensation, 0.0)));
        }

        Ok(LayoutResult {
            content_origin: Point::ZERO,
            content_size: o.size(content_main, content_cross),
            viewport_size: o.size(viewport_main, viewport_cross),
        })
    }

    fn requires_layout_on_scroll(&self) -> bool {
        self.virtual_layout || (self.sticky_headers && !self.headers.is_empty())
    }

    fn as_virtual(&mut self) -> Option<&mut dyn VirtualLayout> {
        Some(self)
    }

    fn scroll_position_for_index(
        &mut self,
        index: usize,
        item_count: usize,
        bounds: &ViewportBounds,
        align: ScrollAlign,
    ) -> Point {
        let o = self.orientation;
        let current = bounds.scroll.to_point();
        self.cache.set_len(item_count);
        let metrics = self.metrics();
        let mut strip = Strip::new(&mut self.cache, metrics);
        let total = strip.total_extent();
        let viewport = o.resolve_main(bounds, total);
        let main = scroll_offset_for_index(&mut strip, index, viewport, o.point_main(current), align);
        o.point(main, o.point_cross(current))
    }

    fn next_index(
        &mut self,
        current: Option<usize>,
        key: NavigationKey,
        item_count: usize,
        bounds: &ViewportBounds,
    ) -> Option<usize> {
        if item_count == 0 {
            return None;
        }
        let last = item_count - 1;
        let (back, forward) = match self.orientation {
            Orientation::Horizontal => (NavigationKey::Left, NavigationKey::Right),
            Orientation::Vertical => (NavigationKey::Up, NavigationKey::Down),
        };
        let Some(current) = current.map(|c| c.min(last)) else {
            return match key {
                NavigationKey::Home | NavigationKey::PageDown => Some(0),
                NavigationKey::End | NavigationKey::PageUp => Some(last),
                k if k == forward => Some(0),
                k if k == back => Some(last),
                _ => None,
            };
        };
        let next = match key {
            NavigationKey::Home => 0,
            NavigationKey::End => last,
            NavigationKey::PageUp => self.page(current, item_count, bounds, false),
            NavigationKey::PageDown => self.page(current, item_count, bounds, true),
            k if k == back => current.saturating_sub(1),
            k if k == forward => (current + 1).min(last),
            _ => current,
        };
        Some(next)
    }

    fn set_header_indices(&mut self, headers: &[usize]) {
        self.headers.clear();
        self.headers.extend_from_slice(headers);
        self.headers.sort_unstable();
        self.headers.dedup();
    }

    fn drain_events(&mut self, out: &mut Vec<LayoutEvent>) {
        out.append(&mut self.events);
    }
}

impl VirtualLayout for LinearLayout {
    fn is_virtual(&self) -> bool {
        self.virtual_layout
    }

    fn set_typical_item_size(&mut self, size: Option<Size>) {
        self.typical = size;
        let main = size.map_or(0.0, |s| self.orientation.main(s));
        if self.cache.set_typical(main) && self.virtual_layout {
            self.events.push(LayoutEvent::ExtentsChanged);
        }
    }

    fn typical_item_size(&self) -> Option<Size> {
        self.typical
    }

    fn forces_typical_size(&self) -> bool {
        self.uniform()
    }

    fn measure_viewport(
        &mut self,
        item_count: usize,
        bounds: &ViewportBounds,
    ) -> Result<Size, LayoutError> {
        self.require_virtual()?;
        bounds.validate()?;
        let o = self.orientation;
        self.cache.set_len(item_count);
        let metrics = self.metrics();
        let (cross_start, cross_end) = self.cross_padding();
        let content_main = Strip::new(&mut self.cache, metrics).total_extent();
        let content_cross = self.typical.map_or(0.0, |t| o.cross(t)) + cross_start + cross_end;
        Ok(o.size(
            o.resolve_main(bounds, content_main),
            o.resolve_cross(bounds, content_cross),
        ))
    }

    fn visible_indices(
        &mut self,
        item_count: usize,
        bounds: &ViewportBounds,
        out: &mut Vec<usize>,
    ) -> Result<(), LayoutError> {
        self.require_virtual()?;
        bounds.validate()?;
        let o = self.orientation;
        self.cache.set_len(item_count);
        let metrics = self.metrics();
        let scroll = o.point_main(bounds.scroll.to_point());
        let mut strip = Strip::new(&mut self.cache, metrics);
        let total = strip.total_extent();
        let viewport = o.resolve_main(bounds, total);
        let range = compute_visible_range(&mut strip, scroll, viewport, self.overscan);

        if self.sticky_headers {
            let mut sticky = None;
            for &h in self.headers.iter().filter(|&&h| h < item_count) {
                if strip.offset_of(h) <= scroll {
                    sticky = Some(h);
                } else {
                    break;
                }
            }
            if let Some(h) = sticky
                && h < range.start
            {
                out.push(h);
            }
        }
        out.extend(range.indices());
        ltrace!(
            start = range.start,
            end = range.end,
            item_count,
            "computed visible indices"
        );
        Ok(())
    }

    fn reset_cache(&mut self) {
        self.cache.reset();
    }

    fn insert_cache_entry(&mut self, index: usize) {
        self.cache.insert(index);
    }

    fn remove_cache_entry(&mut self, index: usize) {
        self.cache.remove(index);
    }

    fn invalidate_cache_entry(&mut self, index: usize) {
        self.cache.invalidate(index);
    }
}
