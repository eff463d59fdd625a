/// Presentation tuning constants.
///
/// These express intended behavior (breakpoints, frame budgets, timeouts) and
/// keep magic numbers out of the engine and the browser glue.

// Capability probing
pub const MOBILE_BREAKPOINT_PX: f64 = 768.0; // viewport widths below this count as mobile
pub const LOW_END_MAX_CORES: u32 = 4; // hardwareConcurrency at or below this is low-end
pub const SLOW_EFFECTIVE_TYPES: &[&str] = &["slow-2g", "2g"];
pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

// Ambient canvas frame budgets (frames per second)
pub const AMBIENT_FPS: f64 = 30.0;
pub const AMBIENT_FPS_CONSTRAINED: f64 = 15.0;

// Ambient canvas geometry (CSS px)
pub const AMBIENT_FONT_SIZE_PX: f64 = 14.0; // also the vertical step per frame
pub const AMBIENT_COLUMN_WIDTH_PX: f64 = 20.0;
pub const AMBIENT_COLUMN_WIDTH_CONSTRAINED_PX: f64 = 32.0; // fewer columns to draw
pub const AMBIENT_HEIGHT_BUFFER_PX: f64 = 100.0; // added below the measured document height
pub const AMBIENT_HEIGHT_NOISE_PX: f64 = 50.0; // slack above coverage; height deltas within it are ignored
pub const AMBIENT_WRAP_CHANCE: f64 = 0.025; // per-frame chance a column past the bottom restarts
pub const AMBIENT_RESIZE_DEBOUNCE_MS: i32 = 200;
pub const AMBIENT_SETTLE_REMEASURE_MS: i32 = 1000; // one extra measure after late content
pub const AMBIENT_REMEASURE_INTERVAL_MS: f64 = 200.0; // at most one layout measure per interval
pub const AMBIENT_LAYOUT_ATTRIBUTES: &[&str] = &["class", "style", "hidden", "src", "open"];

// Ambient canvas palette
pub const AMBIENT_FADE_FILL: &str = "rgba(0, 0, 0, 0.05)"; // trail fade per drawn frame
pub const AMBIENT_GLYPH_FILL: &str = "#0f4";
pub const AMBIENT_OPACITY: &str = "0.15";
pub const AMBIENT_GLYPHS: &str =
    "アイウエオカキクケコサシスセソタチツテトナニヌネノハヒフヘホマミムメモヤユヨラリルレロワヲン0123456789ABCDEF";

// Typewriter defaults (milliseconds)
pub const TYPEWRITER_SPEED_MS: f64 = 50.0; // per revealed character
pub const TYPEWRITER_MIN_SPEED_MS: f64 = 10.0; // floor after constrained-device halving
pub const TYPEWRITER_SCRAMBLE_MS: f64 = 1000.0;

// Progressive images
pub const IMAGE_ROOT_MARGIN: &str = "100px"; // start loading this far before the viewport
pub const IMAGE_FALLBACK_MS: f64 = 2000.0; // load anyway if no visibility signal arrives
pub const IMAGE_QUALITY_LOW: u8 = 40;
pub const IMAGE_QUALITY_MEDIUM: u8 = 65;
pub const IMAGE_QUALITY_HIGH: u8 = 85;
pub const IMAGE_FADE_MS: u32 = 300;
pub const IMAGE_ERROR_GLYPH: &str = "⚠";

// Viewport reveal
pub const REVEAL_DEFAULT_THRESHOLD: f64 = 0.1; // fraction of the region that must intersect
pub const REVEAL_VISIBLE_CLASS: &str = "is-visible";
