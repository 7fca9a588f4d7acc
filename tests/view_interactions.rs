//! Integration tests simulating whole user sessions against the view state:
//! sequences of pans, zooms, clicks, and searches, checked against the
//! invariants the displayed map relies on.

use mapview::{constants, LonLat, MapStyle, MapViewState, PanDirection, StaticMapSource};

#[test]
fn pan_marathon_keeps_longitude_normalized() {
    let mut view = MapViewState::new(LonLat::new(175.0, 0.0), MapStyle::Scheme, 2);
    for _ in 0..200 {
        view.pan(PanDirection::East);
        assert!(
            view.center.lon >= -180.0 && view.center.lon < 180.0,
            "longitude {} left [-180, 180)",
            view.center.lon
        );
    }
    for _ in 0..400 {
        view.pan(PanDirection::West);
        assert!(view.center.lon >= -180.0 && view.center.lon < 180.0);
    }
}

#[test]
fn polar_panning_saturates_both_poles() {
    let mut view = MapViewState::new(LonLat::new(0.0, 80.0), MapStyle::Satellite, 2);
    for _ in 0..10 {
        view.pan(PanDirection::North);
    }
    assert_eq!(view.center.lat, 85.0);

    for _ in 0..20 {
        view.pan(PanDirection::South);
    }
    assert_eq!(view.center.lat, -85.0);
}

#[test]
fn wheel_and_key_zoom_share_the_same_bounds() {
    let mut view = MapViewState::default();
    view.scroll_zoom(100);
    assert_eq!(view.zoom, constants::MAX_ZOOM);
    for _ in 0..30 {
        view.zoom_out();
    }
    assert_eq!(view.zoom, constants::MIN_ZOOM);
    for _ in 0..30 {
        view.zoom_in();
    }
    assert_eq!(view.zoom, constants::MAX_ZOOM);
}

#[test]
fn click_then_search_then_clear_session() {
    let mut view = MapViewState::default();
    let source = StaticMapSource::new();

    // A click drops the pointer; the map request now carries a marker.
    let clicked = view.click(390.0, 225.0);
    assert!((clicked.lon - 20.522256).abs() < 1e-6);
    let params = source.params(&view);
    assert!(params.iter().any(|(k, _)| *k == "pt"));

    // The reverse geocode confirmed a place there: center follows.
    view.recenter_on_pointer();
    assert_eq!(view.center, clicked);

    // A search jumps both center and pointer to the hit.
    let hit = LonLat::new(37.617, 55.755);
    view.jump_to(hit);
    assert_eq!(view.center, hit);
    assert_eq!(view.pointer, Some(hit));

    // Clearing drops the marker but leaves the view where it was.
    view.clear_pointer();
    assert_eq!(view.pointer, None);
    assert_eq!(view.center, hit);
    let params = source.params(&view);
    assert!(!params.iter().any(|(k, _)| *k == "pt"));
}

#[test]
fn zooming_does_not_move_the_center() {
    let mut view = MapViewState::default();
    let center = view.center;
    view.zoom_in();
    view.scroll_zoom(-3);
    view.zoom_out();
    assert_eq!(view.center, center);
}

#[test]
fn pan_step_shrinks_as_zoom_grows() {
    let mut coarse = MapViewState::new(LonLat::new(0.0, 0.0), MapStyle::Scheme, 10);
    let mut fine = MapViewState::new(LonLat::new(0.0, 0.0), MapStyle::Scheme, 11);
    coarse.pan(PanDirection::East);
    fine.pan(PanDirection::East);
    assert!((coarse.center.lon - 2.0 * fine.center.lon).abs() < 1e-12);
}
