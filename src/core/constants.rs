//! Engine-wide magic numbers, tuned empirically on mid-range tablets.
//! Keeping them in a single place makes it easier to tweak behavior without
//! hunting through the gesture and loupe code.

/// Lower bound for the viewport scale.
pub const SCALE_MIN: f64 = 0.1;

/// Upper bound for the viewport scale.
pub const SCALE_MAX: f64 = 20.0;

/// Delay before a single touch in mark mode is confirmed as a mark gesture.
/// A pinch lands its first finger slightly before the second; without this
/// delay every pinch would also begin a spurious mark preview.
pub const MARK_CONFIRM_DELAY_MS: u64 = 100;

/// On-screen footprint of a marker badge in pixels, border included.
/// Drives the clustering proximity thresholds.
pub const MARKER_FOOTPRINT_PX: f64 = 22.0;

/// Loupe widget diameter in pixels.
pub const LOUPE_DIAMETER_PX: f64 = 140.0;

/// Intrinsic magnification of the loupe contents.
pub const LOUPE_MAGNIFICATION: f64 = 2.0;

/// Vertical offset from the raw finger position to the aim point, so the
/// magnified crosshair targets a spot the finger is not covering.
pub const LOUPE_AIM_OFFSET_PX: f64 = 48.0;

/// How far above the finger the loupe widget center sits.
pub const LOUPE_WIDGET_RAISE_PX: f64 = 110.0;

/// Minimum badge size when stamping markers onto an export canvas.
pub const EXPORT_BADGE_MIN_PX: f64 = 24.0;

/// Badge size as a fraction of export canvas width.
pub const EXPORT_BADGE_RATIO: f64 = 0.015;

/// Zero-padding width for sequence numbers in export file names.
pub const EXPORT_SEQ_PAD: usize = 3;
