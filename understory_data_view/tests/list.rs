// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integration tests for `ListViewPort`.

use kurbo::{Point, Size, Vec2};
use understory_data_view::{
    ArrayCollection, DataCollection, InvalidationFlags, ItemState, ListViewPort,
    MAX_VALIDATION_PASSES, RendererCaps, RendererSignals, ViewPortError, ViewPortEvent,
};
use understory_layout::{LinearLayout, NavigationKey, ScrollAlign};
use understory_recycle::{RecyclerId, Recycler};

mod common;

use common::{Row, active_indices, added, destroyed, drain, removed, rows, viewport};

type List = ListViewPort<ArrayCollection<u32>, Row<u32>>;

fn list(count: u32, scroll: f64) -> List {
    let data: ArrayCollection<u32> = (0..count).collect();
    let mut list = ListViewPort::new(data, rows(50.0));
    list.core_mut()
        .set_bounds(viewport(100.0, 500.0).with_scroll(Vec2::new(0.0, scroll)));
    list.validate_until_settled().unwrap();
    list
}

#[test]
fn visible_window_follows_scroll_position() {
    let mut list = list(1000, 275.0);

    // Items 5 through 15 intersect the viewport, plus one overscan item per side.
    assert_eq!(active_indices(list.core()), (4..17).collect::<Vec<_>>());
    assert_eq!(list.core().content_size().height, 50_000.0);

    let id = list.core().renderer_for_index(4).unwrap();
    let row = list.core().renderer(id).unwrap();
    assert_eq!(row.data, Some(4));
    assert_eq!(row.index, Some(4));
    assert_eq!(row.origin, Point::new(0.0, 200.0));
    assert!(row.visible);

    let events = drain(list.core_mut());
    assert_eq!(added(&events), 13);
    assert_eq!(destroyed(&events), 0);
    // Thirteen bound rows plus the hidden typical-item renderer.
    assert_eq!(list.core().store().len(), 14);
}

#[test]
fn settled_view_port_does_no_work() {
    let mut list = list(1000, 0.0);
    drain(list.core_mut());

    assert!(!list.core().is_invalid());
    assert_eq!(list.validate_until_settled().unwrap(), 1);
    assert!(drain(list.core_mut()).is_empty());
}

#[test]
fn scrolling_rebinds_renderers_instead_of_rebuilding() {
    let mut list = list(1000, 0.0);
    assert_eq!(active_indices(list.core()), (0..11).collect::<Vec<_>>());
    drain(list.core_mut());

    list.core_mut().set_scroll(Vec2::new(0.0, 1000.0));
    assert!(list.core().flags().contains(InvalidationFlags::SCROLL));
    list.validate_until_settled().unwrap();

    assert_eq!(active_indices(list.core()), (19..31).collect::<Vec<_>>());
    let events = drain(list.core_mut());
    assert_eq!(removed(&events), 11);
    assert_eq!(added(&events), 12);
    assert_eq!(destroyed(&events), 0);
    // Eleven reused renderers, one new one, and the typical-item renderer.
    assert_eq!(list.core().store().len(), 13);

    let id = list.core().renderer_for_item(&25).unwrap();
    assert_eq!(list.core().index_for_renderer(id), Some(25));
    assert_eq!(list.core().renderer_for_item(&3), None);
}

#[test]
fn duplicate_items_fail_validation() {
    let mut list = ListViewPort::new(vec![1_u32, 2, 2, 3], rows(50.0));
    list.core_mut().set_bounds(viewport(100.0, 500.0));

    assert_eq!(
        list.validate(),
        Err(ViewPortError::DuplicateItem { index: 2 })
    );
}

#[test]
fn selection_is_pushed_into_renderers() {
    let mut list = list(20, 0.0);
    list.set_selected_index(Some(3));
    assert!(list.core().flags().contains(InvalidationFlags::SELECTION));
    list.validate_until_settled().unwrap();

    let selected = |list: &List, index: usize| {
        let id = list.core().renderer_for_index(index).unwrap();
        list.core().renderer(id).unwrap().selected
    };
    assert!(selected(&list, 3));
    assert!(!selected(&list, 4));

    list.set_selected_index(Some(5));
    list.validate_until_settled().unwrap();
    assert!(!selected(&list, 3));
    assert!(selected(&list, 5));
    assert_eq!(list.selected_item(), Some(&5));

    let events = drain(list.core_mut());
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, ViewPortEvent::SelectionChanged))
            .count(),
        2
    );
}

#[test]
fn toggles_are_ignored_while_scrolling() {
    let mut list = list(20, 0.0);
    let second = list.core().renderer_for_index(2).unwrap();
    let fourth = list.core().renderer_for_index(4).unwrap();

    list.core_mut().set_scrolling(true);
    list.core_mut().renderer_mut(second).unwrap().toggle();
    list.poll_renderers();
    assert_eq!(list.selected_index(), None);

    list.core_mut().set_scrolling(false);
    list.core_mut().renderer_mut(fourth).unwrap().toggle();
    list.poll_renderers();
    assert_eq!(list.selected_index(), Some(4));

    // Validation pushes the real selection back over the ignored toggle.
    list.validate_until_settled().unwrap();
    assert!(!list.core().renderer(second).unwrap().selected);
    assert!(list.core().renderer(fourth).unwrap().selected);
}

#[test]
fn toggles_are_reverted_when_not_selectable() {
    let mut list = list(20, 0.0);
    list.set_selectable(false);
    let id = list.core().renderer_for_index(1).unwrap();

    list.core_mut().renderer_mut(id).unwrap().toggle();
    list.poll_renderers();
    assert_eq!(list.selected_index(), None);
    assert!(list.core().flags().contains(InvalidationFlags::SELECTION));

    list.validate_until_settled().unwrap();
    assert!(!list.core().renderer(id).unwrap().selected);
}

#[test]
fn triggering_a_renderer_selects_its_item() {
    let mut list = list(20, 0.0);
    drain(list.core_mut());
    let id = list.core().renderer_for_index(1).unwrap();

    list.core_mut().renderer_mut(id).unwrap().trigger();
    list.poll_renderers();

    assert_eq!(list.selected_index(), Some(1));
    let events = drain(list.core_mut());
    assert!(events.contains(&ViewPortEvent::ItemTriggered {
        id,
        index: 1,
        key: 1,
    }));
}

#[test]
fn toggle_renderers_are_not_selected_by_triggering() {
    let mut list = list(20, 0.0);
    let id = list.core().renderer_for_index(1).unwrap();
    let row = list.core_mut().renderer_mut(id).unwrap();
    row.caps |= RendererCaps::TOGGLE;
    row.trigger();
    list.poll_renderers();

    assert_eq!(list.selected_index(), None);
}

#[test]
fn data_changes_shift_the_selection() {
    let mut list = list(50, 0.0);
    list.set_selected_index(Some(5));
    list.validate_until_settled().unwrap();

    list.data_mut().insert(0, 100);
    list.validate_until_settled().unwrap();
    assert_eq!(list.selected_index(), Some(6));
    assert_eq!(list.selected_item(), Some(&5));
    let id = list.core().renderer_for_item(&5).unwrap();
    let row = list.core().renderer(id).unwrap();
    assert_eq!(row.index, Some(6));
    assert!(row.selected);
    assert_eq!(list.core().renderer_for_index(0), list.core().renderer_for_item(&100));

    list.data_mut().remove(0);
    list.validate_until_settled().unwrap();
    assert_eq!(list.selected_index(), Some(5));

    list.data_mut().replace(5, 999);
    list.validate_until_settled().unwrap();
    assert_eq!(list.selected_index(), None);
}

#[test]
fn filtering_clears_the_selection() {
    let mut list = list(50, 0.0);
    list.set_selected_index(Some(3));
    list.validate_until_settled().unwrap();

    list.data_mut().set_filter(Some(|n: &u32| n % 2 == 0));
    list.validate_until_settled().unwrap();

    assert_eq!(list.selected_index(), None);
    assert_eq!(list.data().len(), 25);
    assert_eq!(list.core().content_size().height, 1250.0);
    let id = list.core().renderer_for_index(1).unwrap();
    assert_eq!(list.core().renderer(id).unwrap().data, Some(2));
}

#[test]
fn disabling_reaches_every_renderer() {
    let mut list = list(20, 0.0);
    list.core_mut().set_enabled(false);
    assert_eq!(list.core().flags(), InvalidationFlags::STATE);
    list.validate_until_settled().unwrap();

    assert!(
        list.core()
            .active_renderers()
            .all(|(_, id)| !list.core().renderer(id).unwrap().enabled)
    );
}

#[test]
fn dispose_destroys_every_renderer() {
    let mut list = list(1000, 275.0);
    drain(list.core_mut());

    list.dispose();
    let events = drain(list.core_mut());
    assert_eq!(destroyed(&events), 14);
    assert!(list.core().store().is_empty());
    assert!(list.core().flags().contains(InvalidationFlags::all()));

    list.validate_until_settled().unwrap();
    assert_eq!(active_indices(list.core()), (4..17).collect::<Vec<_>>());
}

#[test]
fn recycler_ids_route_items_to_their_own_renderers() {
    let data: ArrayCollection<u32> = (0..4).collect();
    let mut list = ListViewPort::with_layout(data, LinearLayout::vertical(), rows(50.0));
    let even = RecyclerId(7);
    list.core_mut().set_recycler(even, rows(30.0));
    list.core_mut()
        .set_recycler_id_fn(Some(move |item: &u32, _: usize| {
            if item % 2 == 0 {
                even
            } else {
                RecyclerId::DEFAULT
            }
        }));
    list.core_mut().set_bounds(viewport(100.0, 500.0));
    list.validate_until_settled().unwrap();

    for (index, id) in list.core().active_renderers() {
        let expected = if index % 2 == 0 {
            even
        } else {
            RecyclerId::DEFAULT
        };
        assert_eq!(list.core().store().recycler_of(id), Some(expected));
    }
    assert_eq!(list.core().content_size().height, 160.0);

    // Dropping the recycler rebuilds its items with the default one.
    list.core_mut().remove_recycler(even);
    list.validate_until_settled().unwrap();
    assert!(
        list.core()
            .active_renderers()
            .all(|(_, id)| list.core().store().recycler_of(id) == Some(RecyclerId::DEFAULT))
    );
    assert_eq!(list.core().content_size().height, 200.0);
}

#[test]
fn resized_items_above_the_viewport_compensate_scroll() {
    let data: ArrayCollection<u32> = (0..100).collect();
    let mut layout = LinearLayout::vertical();
    layout.set_virtual(true);
    layout.set_variable_extents(true);
    let recycler = Recycler::new(|| Row::new(Size::new(100.0, 50.0))).with_update(
        |row: &mut Row<u32>, state: &ItemState<u32>| {
            row.size.height = if (1..=3).contains(&state.data) {
                80.0
            } else {
                50.0
            };
        },
    );
    let mut list = ListViewPort::with_layout(data, layout, recycler);
    list.core_mut()
        .set_bounds(viewport(100.0, 300.0).with_scroll(Vec2::new(0.0, 100.0)));
    list.validate_until_settled().unwrap();

    // Item 1 starts above the scroll position and grew by 30.
    let events = drain(list.core_mut());
    let compensations: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            ViewPortEvent::ScrollCompensation(delta) => Some(*delta),
            _ => None,
        })
        .collect();
    assert_eq!(compensations, vec![Vec2::new(0.0, 30.0)]);
    assert_eq!(list.core().scroll(), Vec2::new(0.0, 130.0));
    assert_eq!(list.core().layout().cache().get(2), Some(80.0));
}

#[test]
fn scroll_positions_and_navigation_use_the_layout() {
    let mut list = list(1000, 0.0);
    assert_eq!(
        list.scroll_position_for_index(20, ScrollAlign::Start),
        Point::new(0.0, 1000.0)
    );
    assert_eq!(
        list.next_index(Some(3), NavigationKey::Down),
        Some(4)
    );
    assert_eq!(
        list.next_index(None, NavigationKey::End),
        Some(999)
    );
}

#[test]
fn resize_signals_request_a_layout() {
    let mut list = list(20, 0.0);
    let id = list.core().renderer_for_index(0).unwrap();
    list.core_mut().renderer_mut(id).unwrap().signals |= RendererSignals::RESIZED;
    list.poll_renderers();
    assert_eq!(list.core().flags(), InvalidationFlags::LAYOUT);

    list.validate().unwrap();
    assert!(!list.core().is_invalid());
}

fn height_at(list: &List, index: usize) -> f64 {
    let id = list.core().renderer_for_index(index).unwrap();
    list.core().renderer(id).unwrap().size.height
}

#[test]
fn custom_item_size_reaches_bound_and_rebound_rows() {
    let mut list = list(1000, 0.0);
    list.core_mut()
        .set_custom_item_size(Some(Size::new(100.0, 80.0)));
    list.validate_until_settled().unwrap();

    assert_eq!(height_at(&list, 0), 80.0);
    assert_eq!(active_indices(list.core()), (0..8).collect::<Vec<_>>());
    assert_eq!(list.core().content_size().height, 80_000.0);

    list.core_mut().set_scroll(Vec2::new(0.0, 3000.0));
    list.validate_until_settled().unwrap();
    assert_eq!(active_indices(list.core()), (36..45).collect::<Vec<_>>());
    for index in 36..45 {
        assert_eq!(height_at(&list, index), 80.0);
    }
}

#[test]
fn clearing_the_custom_size_rebuilds_renderers() {
    let mut list = list(1000, 0.0);
    list.core_mut()
        .set_custom_item_size(Some(Size::new(100.0, 80.0)));
    list.validate_until_settled().unwrap();
    let forced: Vec<_> = list.core().active_renderers().map(|(_, id)| id).collect();
    drain(list.core_mut());

    list.core_mut().set_custom_item_size(None);
    assert!(
        list.core()
            .flags()
            .contains(InvalidationFlags::RENDERER_FACTORY)
    );
    list.validate_until_settled().unwrap();

    let events = drain(list.core_mut());
    assert!(destroyed(&events) >= forced.len());
    assert!(forced.iter().all(|&id| list.core().renderer(id).is_none()));
    assert_eq!(active_indices(list.core()), (0..11).collect::<Vec<_>>());
    for index in 0..11 {
        assert_eq!(height_at(&list, index), 50.0);
    }
    assert_eq!(list.core().content_size().height, 50_000.0);
}

#[test]
fn recycled_renderers_drop_their_selection() {
    let mut list = list(1000, 0.0);
    list.set_selected_index(Some(0));
    list.validate_until_settled().unwrap();
    let first = list.core().renderer_for_index(0).unwrap();
    assert!(list.core().renderer(first).unwrap().selected);

    list.core_mut().set_scroll(Vec2::new(0.0, 3000.0));
    list.validate_until_settled().unwrap();
    let index = list.core().index_for_renderer(first).unwrap();
    assert_ne!(index, 0);
    let row = list.core().renderer(first).unwrap();
    assert_eq!(row.data, u32::try_from(index).ok());
    assert!(!row.selected);

    list.core_mut().set_scroll(Vec2::ZERO);
    list.validate_until_settled().unwrap();
    let id = list.core().renderer_for_index(0).unwrap();
    assert!(list.core().renderer(id).unwrap().selected);
    for (index, id) in list.core().active_renderers() {
        assert_eq!(list.core().renderer(id).unwrap().selected, index == 0);
    }
}

#[test]
fn typical_item_override_sets_the_estimate() {
    let data: ArrayCollection<u32> = (0..1000).collect();
    let recycler = rows(50.0).with_update(|row: &mut Row<u32>, state: &ItemState<u32>| {
        row.size.height = if state.data == 999 { 100.0 } else { 50.0 };
    });
    let mut list = ListViewPort::new(data, recycler);
    list.core_mut().set_bounds(viewport(100.0, 500.0));
    list.core_mut().set_typical_item(Some(999));
    list.validate_until_settled().unwrap();

    assert_eq!(list.core().typical_item(), Some(&999));
    assert_eq!(list.core().content_size().height, 100_000.0);
    assert_eq!(active_indices(list.core()), (0..6).collect::<Vec<_>>());
    assert_eq!(height_at(&list, 0), 100.0);
}

#[test]
fn missing_value_at_index_zero_is_a_typical_item() {
    let data: Vec<Option<u32>> = vec![None, Some(1), Some(2)];
    let recycler = rows(50.0).with_update(
        |row: &mut Row<Option<u32>>, state: &ItemState<Option<u32>>| {
            row.size.height = if state.data.is_none() { 30.0 } else { 50.0 };
        },
    );
    let mut list = ListViewPort::new(data, recycler);
    list.core_mut().set_bounds(viewport(100.0, 500.0));
    list.validate_until_settled().unwrap();

    assert_eq!(list.core().content_size().height, 90.0);
    let id = list.core().renderer_for_item(&None).unwrap();
    assert_eq!(list.core().renderer(id).unwrap().data, Some(None));

    // An explicit override still wins over the first item.
    list.core_mut().set_typical_item(Some(Some(2)));
    list.validate_until_settled().unwrap();
    assert_eq!(list.core().content_size().height, 150.0);
}

#[test]
fn endless_resizing_reports_a_validation_loop() {
    let data: ArrayCollection<u32> = (0..100).collect();
    let mut layout = LinearLayout::vertical();
    layout.set_virtual(true);
    layout.set_variable_extents(true);
    let recycler = Recycler::new(|| {
        let mut row = Row::new(Size::new(100.0, 50.0));
        row.growth = 1.0;
        row
    });
    let mut list = ListViewPort::with_layout(data, layout, recycler);
    list.core_mut().set_bounds(viewport(100.0, 300.0));

    assert_eq!(
        list.validate_until_settled(),
        Err(ViewPortError::ValidationLoop {
            passes: MAX_VALIDATION_PASSES
        })
    );
}
