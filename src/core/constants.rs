//! Core constants shared by the projection, layout and interaction code.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// Default square tile size in world-pixel units.
pub const TILE_SIZE: u32 = 256;

/// Latitude limit of the spherical mercator projection, in degrees.
pub const MAX_LATITUDE: f64 = 85.05112878;

/// Most detailed zoom level tried when fitting a route.
pub const DEFAULT_MAX_FIT_ZOOM: u8 = 15;

/// Least detailed zoom level; also the fallback when nothing fits.
pub const DEFAULT_MIN_FIT_ZOOM: u8 = 2;

/// Smallest bounding-box extent used for the fit test (single point case).
pub const MIN_BOUNDS_EXTENT: f64 = 1.0;

/// Reference canvas size in CSS pixels.
pub const DEFAULT_CANVAS_WIDTH: f64 = 360.0;
pub const DEFAULT_CANVAS_HEIGHT: f64 = 280.0;

/// Padding kept free on every side of the canvas.
pub const DEFAULT_CANVAS_PADDING: f64 = 32.0;

/// Viewport scale limits (1.0 = fit).
pub const DEFAULT_MIN_SCALE: f64 = 0.5;
pub const DEFAULT_MAX_SCALE: f64 = 6.0;

/// Multiplicative zoom per wheel notch or button press.
pub const DEFAULT_ZOOM_STEP: f64 = 1.25;

/// Fraction of the current view that must stay over the base map.
pub const DEFAULT_PAN_MARGIN: f64 = 0.25;

/// Movement (view units) after which a mouse drag swallows the next click.
pub const DEFAULT_DRAG_CLICK_THRESHOLD: f64 = 1.0;

/// Movement (view units) after which a touch pan swallows the next click.
pub const DEFAULT_TOUCH_CLICK_THRESHOLD: f64 = 2.0;

/// Scale above which the surface is flagged as zoomed.
pub const ZOOMED_SCALE_THRESHOLD: f64 = 1.01;

/// Default basemap tile template.
pub const DEFAULT_TILE_URL_TEMPLATE: &str = "https://basemaps.cartocdn.com/light_all/{z}/{x}/{y}.png";

/// Upper bound on cached tiles kept for offline use.
pub const DEFAULT_MAX_TILE_ENTRIES: usize = 600;

/// Parallel tile downloads per pre-cache batch.
pub const DEFAULT_PRECACHE_CONCURRENCY: usize = 3;
