//! Angle arithmetic. Angles are degrees and grow clockwise in screen space.

use std::num::NonZeroUsize;

pub const FULL_TURN: f64 = 360.0;

/// Wraps `angle` into `[0, 360)`.
///
/// Inputs any number of turns away are wrapped; exactly 360 maps to 0.
/// Non-finite input is returned as-is.
pub fn normalize(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(FULL_TURN);
    // tiny negative inputs round up to a full turn
    if wrapped >= FULL_TURN { 0.0 } else { wrapped }
}

/// Angular share of one item.
pub fn segment(count: NonZeroUsize) -> f64 {
    FULL_TURN / count.get() as f64
}
