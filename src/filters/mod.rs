pub(crate) mod bloom;
pub(crate) mod drop_shadow;
pub(crate) mod glow;
pub(crate) mod kawase;
pub(crate) mod outline;
pub(crate) mod tilt_shift;

use std::f32::consts::TAU;

const MAX_ANGLE_SAMPLES: f32 = 100.0;
const MIN_ANGLE_SAMPLES: f32 = 1.0;

/// Angle between samples around a circle for a 0..1 sampling `quality`.
pub(crate) fn angle_step(quality: f32) -> f32 {
    TAU / (quality * MAX_ANGLE_SAMPLES).max(MIN_ANGLE_SAMPLES)
}

pub(crate) fn flag(on: bool) -> f32 {
    if on { 1.0 } else { 0.0 }
}
