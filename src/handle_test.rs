#![allow(clippy::float_cmp)]

use super::*;
use crate::fake::{CONTAINER, FakeSurface};
use crate::host::Surface;

// =============================================================
// handle_offset
// =============================================================

#[test]
fn offset_centers_on_bottom_right_corner() {
    let at = handle_offset(
        Rect::new(10.0, 20.0, 300.0, 200.0),
        Rect::new(0.0, 0.0, 800.0, 600.0),
        Point::new(0.0, 0.0),
        16.0,
    );
    assert_eq!(at, Point::new(302.0, 212.0));
}

#[test]
fn offset_is_relative_to_container() {
    let at = handle_offset(
        Rect::new(110.0, 70.0, 100.0, 50.0),
        Rect::new(100.0, 50.0, 800.0, 600.0),
        Point::new(0.0, 0.0),
        16.0,
    );
    assert_eq!(at, Point::new(102.0, 62.0));
}

#[test]
fn offset_adds_container_scroll() {
    // Scrolling moves the element up on screen by the same amount, so the
    // handle stays at the same content position.
    let unscrolled = handle_offset(
        Rect::new(10.0, 400.0, 300.0, 200.0),
        Rect::new(0.0, 0.0, 800.0, 600.0),
        Point::new(0.0, 0.0),
        16.0,
    );
    let scrolled = handle_offset(
        Rect::new(10.0, 250.0, 300.0, 200.0),
        Rect::new(0.0, 0.0, 800.0, 600.0),
        Point::new(0.0, 150.0),
        16.0,
    );
    assert_eq!(unscrolled, scrolled);
}

// =============================================================
// position (measured through a Layout)
// =============================================================

#[test]
fn position_measures_through_layout() {
    let surface = FakeSurface::new();
    surface.add_element(7, Rect::new(40.0, 40.0, 100.0, 100.0), None);
    surface.set_scroll(5.0, 10.0);
    assert_eq!(position(&surface, &7, &CONTAINER, 16.0), Point::new(137.0, 142.0));
}

// =============================================================
// Handle
// =============================================================

#[test]
fn handle_starts_hidden() {
    let surface = FakeSurface::new();
    let el = surface.create_handle(&CONTAINER, 16.0).unwrap();
    let handle = Handle::new(el, surface.bind_handle_press(&el));
    assert!(!handle.is_visible());
    assert_eq!(*handle.element(), el);
}

#[test]
fn show_and_hide_toggle_visibility_once() {
    let surface = FakeSurface::new();
    let el = surface.create_handle(&CONTAINER, 16.0).unwrap();
    let mut handle = Handle::new(el, ());

    handle.show(&surface);
    handle.show(&surface);
    assert!(handle.is_visible());
    assert_eq!(surface.state.borrow().handle_visible.get(&el), Some(&true));

    handle.hide(&surface);
    assert!(!handle.is_visible());
    assert_eq!(surface.state.borrow().handle_visible.get(&el), Some(&false));
}

#[test]
fn place_over_writes_handle_position() {
    let surface = FakeSurface::new();
    surface.add_element(7, Rect::new(0.0, 0.0, 300.0, 200.0), None);
    let el = surface.create_handle(&CONTAINER, 16.0).unwrap();
    let handle = Handle::new(el, ());
    handle.place_over(&surface, &7, &CONTAINER, 16.0);
    assert_eq!(surface.handle_at(), Some(Point::new(292.0, 192.0)));
}

#[test]
fn dropping_handle_releases_press_listener() {
    let surface = FakeSurface::new();
    let el = surface.create_handle(&CONTAINER, 16.0).unwrap();
    let handle = Handle::new(el, surface.bind_handle_press(&el));
    assert_eq!(surface.live(crate::fake::Binding::HandlePress), 1);
    drop(handle);
    assert_eq!(surface.live(crate::fake::Binding::HandlePress), 0);
}
