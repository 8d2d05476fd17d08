use crate::types::ScalingParams;

pub const MIN_FONT_SIZE: f64 = 40.0;
pub const MAX_FONT_SIZE: f64 = 360.0;
pub const MIN_SPEED_MULTIPLIER: f64 = 0.5;
pub const MAX_SPEED_MULTIPLIER: f64 = 3.0;

/// Viewports whose short side exceeds this get the doubled font ratio.
const LARGE_SCREEN_MIN_DIM: f64 = 800.0;
/// Long side at which the speed multiplier is exactly 1.
const REFERENCE_DIM: f64 = 800.0;

pub struct ViewportScaler;

impl ViewportScaler {
    /// Derive font size and speed multiplier from viewport dimensions.
    ///
    /// Total over all inputs: degenerate (zero, negative or NaN) dimensions
    /// land on the minimum of each range.
    pub fn compute(width: f64, height: f64) -> ScalingParams {
        let min_dim = width.min(height);
        let max_dim = width.max(height);

        let ratio = if min_dim > LARGE_SCREEN_MIN_DIM { 0.16 } else { 0.08 };
        let font_size = clamp_or_min(min_dim * ratio, MIN_FONT_SIZE, MAX_FONT_SIZE);
        let speed_multiplier = clamp_or_min(
            max_dim / REFERENCE_DIM,
            MIN_SPEED_MULTIPLIER,
            MAX_SPEED_MULTIPLIER,
        );

        ScalingParams {
            font_size,
            speed_multiplier,
        }
    }
}

fn clamp_or_min(v: f64, min: f64, max: f64) -> f64 {
    if v.is_nan() { min } else { v.clamp(min, max) }
}
