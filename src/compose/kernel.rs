//! Sampling offsets for multi-pass Kawase blurs.

use smallvec::SmallVec;

use crate::foundation::math::non_negative_or;

/// Per-stage sample offsets, outermost first.
pub type Kernel = SmallVec<[f32; 8]>;

/// Build the offset sequence for a blur of `strength` pixels split over `quality` passes.
///
/// `kernel[0] == strength` and each following entry is `strength / quality` smaller, so the
/// sequence is strictly decreasing for a positive strength. A zero strength collapses to `[0]`
/// whatever the quality. Quality `0` counts as `1`; a negative or non-finite strength counts
/// as `0`.
pub fn generate_kernel(strength: f32, quality: u32) -> Kernel {
    let strength = non_negative_or(strength, 0.0);
    let quality = quality.max(1);
    let mut kernel = Kernel::new();
    kernel.push(strength);
    if strength == 0.0 {
        return kernel;
    }

    let step = strength / quality as f32;
    let mut value = strength;
    for _ in 1..quality {
        value -= step;
        kernel.push(value);
    }
    kernel
}

/// Inverse of [`generate_kernel`]: `(quality, strength) = (len, max)`.
///
/// An empty kernel reads as `(1, 0.0)`.
pub fn quality_and_strength(kernel: &[f32]) -> (u32, f32) {
    if kernel.is_empty() {
        return (1, 0.0);
    }
    let strength = kernel
        .iter()
        .copied()
        .map(|k| non_negative_or(k, 0.0))
        .fold(0.0, f32::max);
    (kernel.len() as u32, strength)
}

/// Clean up a caller-supplied kernel: bad entries become `0`, an empty list becomes `[0]`.
pub fn sanitize_kernel(kernel: &[f32]) -> Kernel {
    if kernel.is_empty() {
        return Kernel::from_slice(&[0.0]);
    }
    kernel.iter().map(|k| non_negative_or(*k, 0.0)).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/compose/kernel.rs"]
mod tests;
