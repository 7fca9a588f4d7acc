use crate::core::constants::{
    MAX_ZOOM, MIN_ZOOM, PAN_STEP_DEGREES, VERTICAL_PAN_FACTOR, VIEWPORT_HEIGHT, VIEWPORT_WIDTH,
};
use crate::core::geo::{self, LonLat};
use serde::{Deserialize, Serialize};

/// Raster style rendered by the static-map provider. Cyclic: `cycle()` walks
/// `Satellite -> Scheme -> Hybrid -> Satellite`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MapStyle {
    Satellite,
    Scheme,
    Hybrid,
}

impl MapStyle {
    /// Style for a given index, modulo the number of styles.
    pub fn from_index(index: usize) -> Self {
        match index % 3 {
            0 => Self::Satellite,
            1 => Self::Scheme,
            _ => Self::Hybrid,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Self::Satellite => 0,
            Self::Scheme => 1,
            Self::Hybrid => 2,
        }
    }

    /// The provider's `l` request parameter for this style.
    pub fn layer_code(&self) -> &'static str {
        match self {
            Self::Satellite => "sat",
            Self::Scheme => "map",
            Self::Hybrid => "sat,skl",
        }
    }

    /// Human-readable label for the UI.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Satellite => "Satellite",
            Self::Scheme => "Scheme",
            Self::Hybrid => "Satellite, roads",
        }
    }

    pub fn next(&self) -> Self {
        Self::from_index(self.index() + 1)
    }
}

/// Direction of a keyboard pan step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanDirection {
    West,
    East,
    North,
    South,
}

/// The current view of the map: center, zoom, style, and an optional pointer
/// marking a searched or clicked place.
///
/// One instance lives for the whole session and is mutated in place by every
/// user interaction. `center` is the authoritative location for the displayed
/// image; `pointer`, when present, is the authoritative location for
/// reverse-geocode and business-search queries. Longitude is always
/// normalized into [-180, 180) and latitude clamped into [-85, 85] after any
/// mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapViewState {
    pub center: LonLat,
    pub zoom: u8,
    pub style: MapStyle,
    /// Present only after a search or click; `None` means no marker is drawn
    /// and the map request carries no `pt` parameter.
    pub pointer: Option<LonLat>,
}

impl MapViewState {
    /// Creates a new view state. Zoom is clamped to the provider range.
    pub fn new(center: LonLat, style: MapStyle, zoom: u8) -> Self {
        Self {
            center,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            style,
            pointer: None,
        }
    }

    /// Moves the center one pan step in `direction`. The geographic step size
    /// halves with every zoom-in; vertical steps are additionally shortened
    /// for the viewport's aspect ratio. Zoom is never affected.
    pub fn pan(&mut self, direction: PanDirection) {
        let step = PAN_STEP_DEGREES * geo::zoom_scale(self.zoom);
        match direction {
            PanDirection::West => self.center = LonLat::new(self.center.lon - step, self.center.lat),
            PanDirection::East => self.center = LonLat::new(self.center.lon + step, self.center.lat),
            PanDirection::North => {
                self.center =
                    LonLat::new(self.center.lon, self.center.lat + step * VERTICAL_PAN_FACTOR)
            }
            PanDirection::South => {
                self.center =
                    LonLat::new(self.center.lon, self.center.lat - step * VERTICAL_PAN_FACTOR)
            }
        }
    }

    /// Increments zoom by one, saturating at the provider maximum.
    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom + 1).min(MAX_ZOOM);
    }

    /// Decrements zoom by one, saturating at the provider minimum.
    pub fn zoom_out(&mut self) {
        self.zoom = self.zoom.saturating_sub(1).max(MIN_ZOOM);
    }

    /// Applies a scroll-wheel delta to the zoom. The resulting value is
    /// clamped, so a large delta cannot overshoot past a bound in one step.
    pub fn scroll_zoom(&mut self, delta: i32) {
        let target = self.zoom as i32 + delta;
        self.zoom = target.clamp(MIN_ZOOM as i32, MAX_ZOOM as i32) as u8;
    }

    /// Switches to the next map style.
    pub fn cycle_style(&mut self) {
        self.style = self.style.next();
    }

    /// Converts a click at viewport pixel coordinates into a pointer.
    ///
    /// Offsets are measured from the viewport center with the screen y axis
    /// flipped to grow northward; the resulting geographic delta (at the
    /// current zoom, referenced to the current center latitude) is added to
    /// the center and stored as the pointer. The center itself does not move
    /// until a reverse geocode confirms a named place there
    /// ([`recenter_on_pointer`](Self::recenter_on_pointer)).
    ///
    /// Callers must filter out clicks outside the viewport; this method
    /// assumes `pixel_x < VIEWPORT_WIDTH` and `pixel_y < VIEWPORT_HEIGHT`.
    pub fn click(&mut self, pixel_x: f64, pixel_y: f64) -> LonLat {
        let offset_x = pixel_x - f64::from(VIEWPORT_WIDTH) / 2.0;
        let offset_y = f64::from(VIEWPORT_HEIGHT) / 2.0 - pixel_y;
        let (dlon, dlat) = geo::pixel_to_geo(offset_x, offset_y, self.zoom, self.center.lat);
        let pointer = LonLat::new(self.center.lon + dlon, self.center.lat + dlat);
        self.pointer = Some(pointer);
        pointer
    }

    /// Centers the view on a search hit and drops the pointer there.
    pub fn jump_to(&mut self, place: LonLat) {
        self.center = place;
        self.pointer = Some(place);
    }

    /// Moves the center onto the current pointer, if one is set. Used after a
    /// reverse geocode confirms the clicked point names a place.
    pub fn recenter_on_pointer(&mut self) {
        if let Some(pointer) = self.pointer {
            self.center = pointer;
        }
    }

    /// Removes the pointer; the next map request carries no marker.
    pub fn clear_pointer(&mut self) {
        self.pointer = None;
    }
}

impl Default for MapViewState {
    fn default() -> Self {
        // Kaliningrad, the reference deployment's starting view.
        Self::new(LonLat::new(20.5, 54.72), MapStyle::Scheme, 12)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::{MAX_ZOOM, MIN_ZOOM};

    #[test]
    fn test_pan_wraps_longitude() {
        let mut view = MapViewState::new(LonLat::new(179.999, 0.0), MapStyle::Scheme, 14);
        // Step at zoom 14 is 0.005 * 2 = 0.01 degrees.
        view.pan(PanDirection::East);
        assert!((view.center.lon - -179.991).abs() < 1e-9);
        assert!(view.center.lon >= -180.0 && view.center.lon < 180.0);
    }

    #[test]
    fn test_pan_sequence_stays_in_range() {
        let mut view = MapViewState::new(LonLat::new(170.0, 10.0), MapStyle::Scheme, 3);
        for _ in 0..50 {
            view.pan(PanDirection::East);
            assert!(view.center.lon >= -180.0 && view.center.lon < 180.0);
        }
    }

    #[test]
    fn test_pan_saturates_at_pole() {
        let mut view = MapViewState::new(LonLat::new(20.5, 84.9), MapStyle::Scheme, 2);
        // Step at zoom 2 is 0.005 * 0.7 * 2^13, far past the bound.
        view.pan(PanDirection::North);
        assert_eq!(view.center.lat, 85.0);
        view.pan(PanDirection::North);
        assert_eq!(view.center.lat, 85.0);
    }

    #[test]
    fn test_pan_does_not_touch_zoom_or_pointer() {
        let mut view = MapViewState::default();
        view.click(400.0, 225.0);
        let pointer = view.pointer;
        view.pan(PanDirection::South);
        assert_eq!(view.zoom, 12);
        assert_eq!(view.pointer, pointer);
    }

    #[test]
    fn test_zoom_clamps_at_bounds() {
        let mut view = MapViewState::new(LonLat::default(), MapStyle::Scheme, 20);
        view.zoom_in();
        view.zoom_in();
        view.zoom_in();
        assert_eq!(view.zoom, MAX_ZOOM);

        let mut view = MapViewState::new(LonLat::default(), MapStyle::Scheme, 2);
        view.zoom_out();
        view.zoom_out();
        view.zoom_out();
        assert_eq!(view.zoom, MIN_ZOOM);
    }

    #[test]
    fn test_scroll_zoom_clamps_result() {
        let mut view = MapViewState::new(LonLat::default(), MapStyle::Scheme, 20);
        view.scroll_zoom(5);
        assert_eq!(view.zoom, MAX_ZOOM);
        view.scroll_zoom(-100);
        assert_eq!(view.zoom, MIN_ZOOM);
        view.scroll_zoom(3);
        assert_eq!(view.zoom, 4);
    }

    #[test]
    fn test_style_cycles_through_all_three() {
        let mut view = MapViewState::default();
        assert_eq!(view.style, MapStyle::Scheme);
        view.cycle_style();
        assert_eq!(view.style, MapStyle::Hybrid);
        view.cycle_style();
        assert_eq!(view.style, MapStyle::Satellite);
        view.cycle_style();
        assert_eq!(view.style, MapStyle::Scheme);
    }

    #[test]
    fn test_click_right_of_center() {
        // 65 px right of the (325, 225) viewport center at zoom 12 moves the
        // pointer east by 65 * 0.0000428 * 2^3 degrees.
        let mut view = MapViewState::default();
        let pointer = view.click(390.0, 225.0);
        assert!((pointer.lon - 20.522256).abs() < 1e-6);
        assert!((pointer.lat - 54.72).abs() < 1e-9);
        // Center stays put until the reverse geocode confirms the place.
        assert_eq!(view.center, LonLat::new(20.5, 54.72));
        view.recenter_on_pointer();
        assert_eq!(view.center, pointer);
    }

    #[test]
    fn test_jump_to_sets_center_and_pointer() {
        let mut view = MapViewState::default();
        let place = LonLat::new(37.62, 55.75);
        view.jump_to(place);
        assert_eq!(view.center, place);
        assert_eq!(view.pointer, Some(place));
        view.clear_pointer();
        assert_eq!(view.pointer, None);
        assert_eq!(view.center, place);
    }
}
