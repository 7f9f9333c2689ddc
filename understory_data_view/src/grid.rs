// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grid view port: a list of rows sharing one column layout.

use alloc::vec::Vec;
use core::fmt;
use core::hash::Hash;

use smallvec::SmallVec;
use understory_layout::{Align, LinearLayout};
use understory_recycle::Recycler;

use crate::{
    ColumnSpan, DataCollection, GridRowRenderer, InvalidationFlags, ItemState, ListViewPort,
    MAX_VALIDATION_PASSES, ViewPortError,
};

/// A column definition.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GridColumn {
    /// Fixed width, or `None` to share the remaining width with other
    /// flexible columns.
    pub width: Option<f64>,
    /// Width the column never shrinks below.
    pub min_width: f64,
}

impl GridColumn {
    /// A column of exactly `width`.
    #[must_use]
    pub const fn fixed(width: f64) -> Self {
        Self {
            width: Some(width),
            min_width: 0.0,
        }
    }

    /// A column sharing leftover width, at least `min_width` wide.
    #[must_use]
    pub const fn flexible(min_width: f64) -> Self {
        Self {
            width: None,
            min_width,
        }
    }
}

/// Resolves `columns` against `available` width into `out`.
///
/// Fixed columns take their width first. Flexible columns split what is left
/// evenly; a column whose share would fall below its minimum is pinned at the
/// minimum and the split is recomputed for the rest until it is stable.
pub fn layout_columns(columns: &[GridColumn], available: f64, out: &mut Vec<ColumnSpan>) {
    out.clear();
    let mut widths: SmallVec<[Option<f64>; 8]> = columns
        .iter()
        .map(|c| c.width.map(|w| w.max(c.min_width)))
        .collect();
    let mut remaining = available - widths.iter().flatten().sum::<f64>();
    let mut flexible: SmallVec<[usize; 8]> = (0..columns.len())
        .filter(|&i| widths[i].is_none())
        .collect();

    while !flexible.is_empty() {
        let share = (remaining / flexible.len() as f64).max(0.0);
        let mut pinned = false;
        flexible.retain(|&mut i| {
            let min = columns[i].min_width;
            if share < min {
                widths[i] = Some(min);
                remaining -= min;
                pinned = true;
                false
            } else {
                true
            }
        });
        if !pinned {
            for &i in &flexible {
                widths[i] = Some(share);
            }
            break;
        }
    }

    let mut x = 0.0;
    for width in widths {
        let width = width.unwrap_or(0.0);
        out.push(ColumnSpan { x, width });
        x += width;
    }
}

/// A virtualized grid: one row renderer per item, every row sharing the
/// same [`ColumnSpan`]s.
///
/// Rows are stacked by a vertical [`LinearLayout`] that stretches them to
/// the viewport width. After each layout the columns are resolved against
/// the row width and pushed to every row.
pub struct GridViewPort<C: DataCollection, R> {
    list: ListViewPort<C, R, LinearLayout>,
    columns: Vec<GridColumn>,
    spans: Vec<ColumnSpan>,
}

impl<C, R> fmt::Debug for GridViewPort<C, R>
where
    C: DataCollection + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridViewPort")
            .field("list", &self.list)
            .field("columns", &self.columns)
            .field("spans", &self.spans)
            .finish()
    }
}

impl<C, R> GridViewPort<C, R>
where
    C: DataCollection,
    C::Item: Clone + Eq + Hash,
    R: GridRowRenderer<C::Item>,
{
    /// A grid over `data` with the given columns.
    pub fn new(
        data: C,
        columns: Vec<GridColumn>,
        recycler: Recycler<R, ItemState<C::Item>>,
    ) -> Self {
        let mut layout = LinearLayout::vertical();
        layout.set_virtual(true);
        layout.cross_align = Align::Justify;
        Self {
            list: ListViewPort::with_layout(data, layout, recycler),
            columns,
            spans: Vec::new(),
        }
    }

    /// The rows as a list view port: data, selection, bounds, and renderers.
    #[must_use]
    pub const fn list(&self) -> &ListViewPort<C, R, LinearLayout> {
        &self.list
    }

    /// Mutably borrows the rows.
    pub fn list_mut(&mut self) -> &mut ListViewPort<C, R, LinearLayout> {
        &mut self.list
    }

    /// Column definitions.
    #[must_use]
    pub fn columns(&self) -> &[GridColumn] {
        &self.columns
    }

    /// Replaces the column definitions.
    pub fn set_columns(&mut self, columns: Vec<GridColumn>) {
        self.columns = columns;
        self.list.core_mut().invalidate(InvalidationFlags::LAYOUT);
    }

    /// Columns resolved by the last validation.
    #[must_use]
    pub fn column_spans(&self) -> &[ColumnSpan] {
        &self.spans
    }

    /// Runs one validation pass.
    pub fn validate(&mut self) -> Result<(), ViewPortError> {
        let padding = self.list.core().layout().padding;
        let columns = &self.columns;
        let spans = &mut self.spans;
        self.list.validate_with(|store, slots, result| {
            let width = result.viewport_size.width.max(result.content_size.width);
            layout_columns(columns, (width - padding.x0 - padding.x1).max(0.0), spans);
            for &id in slots.iter().flatten() {
                if let Some(row) = store.get_mut(id) {
                    row.set_columns(spans);
                }
            }
        })
    }

    /// Validates until nothing is left invalid. Returns the number of passes.
    pub fn validate_until_settled(&mut self) -> Result<usize, ViewPortError> {
        for passes in 1..=MAX_VALIDATION_PASSES {
            self.validate()?;
            if self.list.is_settled() {
                return Ok(passes);
            }
        }
        dwarn!(passes = MAX_VALIDATION_PASSES, "grid view port did not settle");
        Err(ViewPortError::ValidationLoop {
            passes: MAX_VALIDATION_PASSES,
        })
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::{GridColumn, layout_columns};
    use crate::ColumnSpan;

    #[test]
    fn flexible_columns_share_leftover_width() {
        let columns = [
            GridColumn::fixed(100.0),
            GridColumn::flexible(50.0),
            GridColumn::flexible(0.0),
        ];
        let mut spans = Vec::new();
        layout_columns(&columns, 300.0, &mut spans);
        assert_eq!(
            spans,
            [
                ColumnSpan { x: 0.0, width: 100.0 },
                ColumnSpan { x: 100.0, width: 100.0 },
                ColumnSpan { x: 200.0, width: 100.0 },
            ]
        );
    }

    #[test]
    fn minimums_are_honored_before_sharing() {
        let columns = [
            GridColumn::fixed(100.0),
            GridColumn::flexible(50.0),
            GridColumn::flexible(0.0),
        ];
        let mut spans = Vec::new();
        layout_columns(&columns, 180.0, &mut spans);
        let widths: Vec<f64> = spans.iter().map(|s| s.width).collect();
        assert_eq!(widths, [100.0, 50.0, 30.0]);
        assert_eq!(spans[2].x, 150.0);

        // Not even the minimums fit: flexible columns keep them anyway.
        layout_columns(&columns, 100.0, &mut spans);
        let widths: Vec<f64> = spans.iter().map(|s| s.width).collect();
        assert_eq!(widths, [100.0, 50.0, 0.0]);
    }
}
