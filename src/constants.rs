//! Stable application-wide constants.
//!
//! Values here are structural invariants of the routine generator, prescription
//! coefficients, and default fallbacks for env-var-based configuration. They
//! should rarely change. Knobs that operators may want to tune per deployment
//! live in [`GeneratorConfig`](crate::config::GeneratorConfig) instead.

// --- Server defaults (used when HOST / PORT env vars are absent) ---

/// Default bind address for the HTTP server.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default port for the HTTP server.
pub const DEFAULT_PORT: &str = "3000";

// --- Catalog cache defaults ---

/// Default catalog snapshot TTL: 5 minutes. Overridden by `CATALOG_CACHE_TTL`.
pub const DEFAULT_CATALOG_CACHE_TTL_SECONDS: u64 = 300;
/// Capacity of the in-memory catalog cache.
pub const DEFAULT_MEMORY_CACHE_MAX_ENTRIES: u64 = 16;

// --- Request limits ---

/// Default plan length when the request omits `totalWeeks`.
pub const DEFAULT_TOTAL_WEEKS: u32 = 4;
/// Upper bound on plan length accepted by request validation.
pub const DEFAULT_MAX_TOTAL_WEEKS: u32 = 52;
/// Shortest session the generator accepts, in minutes.
pub const MIN_SESSION_DURATION_MIN: u32 = 15;
/// Longest session the generator accepts, in minutes.
pub const MAX_SESSION_DURATION_MIN: u32 = 180;

// --- Weekly schedule ---

/// Requested days per week are clamped into `MIN_DAYS_PER_WEEK..=MAX_DAYS_PER_WEEK`.
pub const MIN_DAYS_PER_WEEK: u32 = 2;
pub const MAX_DAYS_PER_WEEK: u32 = 6;

// --- Exercise pool sizing ---

/// Minutes budgeted per exercise slot when converting session time to a count.
pub const AVG_EXERCISE_MINUTES: u32 = 5;
/// Lower bound on exercises per training day. Also the fallback top-up target.
pub const MIN_EXERCISES_PER_DAY: usize = 3;
/// Upper bound on exercises per training day.
pub const MAX_EXERCISES_PER_DAY: usize = 8;
/// Share of a compound-priority day reserved for compound movements (rounded up).
pub const COMPOUND_SHARE: f64 = 0.6;

// --- Progressive overload ---

/// Every Nth week (after week 1) is a deload week.
pub const DELOAD_INTERVAL_WEEKS: u32 = 4;
/// Set volume multiplier applied during deload weeks.
pub const DELOAD_SET_FACTOR: f64 = 0.6;
/// Additional rep multiplier applied during deload weeks.
pub const DELOAD_REP_FACTOR: f64 = 0.8;

// --- Catalog vocabulary ---

/// Equipment values that are always allowed, whatever the user owns.
pub const ALWAYS_AVAILABLE_EQUIPMENT: [&str; 2] = ["bodyweight", "none"];
/// Catalog tag marking multi-joint movements.
pub const COMPOUND_TAG: &str = "compound";
