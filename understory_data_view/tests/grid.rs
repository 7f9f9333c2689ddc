// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integration tests for `GridViewPort`.

use kurbo::{Insets, Vec2};
use understory_data_view::{ArrayCollection, ColumnSpan, GridColumn, GridViewPort};

mod common;

use common::{Row, active_indices, rows, viewport};

type Grid = GridViewPort<ArrayCollection<u32>, Row<u32>>;

fn grid() -> Grid {
    let data: ArrayCollection<u32> = (0..100).collect();
    let columns = vec![
        GridColumn::fixed(40.0),
        GridColumn::flexible(0.0),
        GridColumn::flexible(0.0),
    ];
    let mut grid = GridViewPort::new(data, columns, rows(25.0));
    grid.list_mut()
        .core_mut()
        .set_bounds(viewport(200.0, 100.0));
    grid.validate_until_settled().unwrap();
    grid
}

fn widths(spans: &[ColumnSpan]) -> Vec<f64> {
    spans.iter().map(|s| s.width).collect()
}

#[test]
fn rows_share_the_resolved_columns() {
    let grid = grid();
    assert_eq!(widths(grid.column_spans()), vec![40.0, 80.0, 80.0]);
    assert_eq!(grid.column_spans()[2].x, 120.0);

    let core = grid.list().core();
    assert_eq!(active_indices(core), (0..5).collect::<Vec<_>>());
    for (_, id) in core.active_renderers() {
        let row = core.renderer(id).unwrap();
        assert_eq!(row.columns, grid.column_spans());
        assert_eq!(row.size.width, 200.0);
    }
}

#[test]
fn padding_narrows_the_columns() {
    let mut grid = grid();
    grid.list_mut().core_mut().layout_mut().padding = Insets::new(10.0, 0.0, 10.0, 0.0);
    grid.validate_until_settled().unwrap();

    assert_eq!(widths(grid.column_spans()), vec![40.0, 70.0, 70.0]);
    let core = grid.list().core();
    let id = core.renderer_for_index(0).unwrap();
    let row = core.renderer(id).unwrap();
    assert_eq!(row.size.width, 180.0);
    assert_eq!(row.origin.x, 10.0);
}

#[test]
fn new_columns_reach_every_row() {
    let mut grid = grid();
    grid.set_columns(vec![GridColumn::flexible(0.0), GridColumn::flexible(0.0)]);
    grid.validate_until_settled().unwrap();

    assert_eq!(widths(grid.column_spans()), vec![100.0, 100.0]);
    let core = grid.list().core();
    for (_, id) in core.active_renderers() {
        assert_eq!(widths(&core.renderer(id).unwrap().columns), vec![100.0, 100.0]);
    }
}

#[test]
fn rows_bound_while_scrolling_get_columns() {
    let mut grid = grid();
    grid.list_mut()
        .core_mut()
        .set_scroll(Vec2::new(0.0, 1000.0));
    grid.validate_until_settled().unwrap();

    let core = grid.list().core();
    assert_eq!(active_indices(core), (39..45).collect::<Vec<_>>());
    let id = core.renderer_for_index(44).unwrap();
    assert_eq!(core.renderer(id).unwrap().columns, grid.column_spans());
}
