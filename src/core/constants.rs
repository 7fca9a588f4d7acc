//! Calibration constants for the static-map provider's projection and the
//! fixed viewport geometry. Keeping them in one place makes it easier to
//! tweak the magic numbers when pointing at a different renderer.

/// Fixed map viewport width in pixels (request `size` and click math).
pub const VIEWPORT_WIDTH: u32 = 650;

/// Fixed map viewport height in pixels.
pub const VIEWPORT_HEIGHT: u32 = 450;

/// Degrees of longitude covered by one pixel at [`REFERENCE_ZOOM`],
/// calibrated against the static-map renderer's projection.
pub const BASE_DEGREES_PER_PIXEL: f64 = 0.0000428;

/// Zoom level at which [`BASE_DEGREES_PER_PIXEL`] and [`PAN_STEP_DEGREES`]
/// were calibrated; every other zoom scales by `2^(REFERENCE_ZOOM - zoom)`.
pub const REFERENCE_ZOOM: u8 = 15;

/// Horizontal pan step in degrees at [`REFERENCE_ZOOM`].
pub const PAN_STEP_DEGREES: f64 = 0.005;

/// Vertical pan steps are shortened to match the 650x450 viewport's
/// non-square aspect ratio.
pub const VERTICAL_PAN_FACTOR: f64 = 0.7;

/// Hard zoom bounds enforced by the view state. The app restricts its own
/// handlers to [`PREFERRED_MIN_ZOOM`]..=[`PREFERRED_MAX_ZOOM`] for image
/// quality, but the state accepts the full provider range.
pub const MIN_ZOOM: u8 = 1;
pub const MAX_ZOOM: u8 = 21;

/// Tighter zoom range the app's keyboard and wheel handlers stay inside.
pub const PREFERRED_MIN_ZOOM: u8 = 2;
pub const PREFERRED_MAX_ZOOM: u8 = 18;

/// Latitude bound where the provider's projection stops being usable.
/// Latitudes saturate here rather than wrapping.
pub const MAX_LATITUDE: f64 = 85.0;

/// Meters per degree of latitude in the flat-earth local approximation.
pub const METERS_PER_DEGREE: f64 = 111_000.0;

/// A business result is accepted as "nearby" if it lies within this many
/// meters of the queried point.
pub const NEARBY_THRESHOLD_METERS: f64 = 500.0;
