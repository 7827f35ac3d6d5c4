//! Edge-margin math shared by the composite filters.
//!
//! The constants here are tuned against visible clipping at padding-box edges and must not
//! drift.

/// Sample offsets are advanced by half a texel to land on texel centers.
pub const HALF_TEXEL: f32 = 0.5;

/// Extra margin per blur pass for the spread of a drop shadow's ping-pong sampling.
pub const SHADOW_QUALITY_SPREAD: f32 = 4.0;

/// Padding of a Kawase blur: `sum(kernel[i] + 0.5)`.
pub fn kernel_padding(kernel: &[f32]) -> f32 {
    kernel.iter().map(|k| k + HALF_TEXEL).sum()
}

/// Largest absolute axis of a directional offset, `0` for non-finite components.
pub fn offset_padding(offset: [f32; 2]) -> f32 {
    offset
        .iter()
        .map(|v| if v.is_finite() { v.abs() } else { 0.0 })
        .fold(0.0, f32::max)
}

/// Drop-shadow padding: `max(|ox|, |oy|) + blur * 2 + quality * 4`.
pub fn drop_shadow_padding(offset: [f32; 2], blur: f32, quality: u32) -> f32 {
    offset_padding(offset) + blur * 2.0 + quality as f32 * SHADOW_QUALITY_SPREAD
}

/// Padding of stages where each one's output feeds the next.
pub fn sequential(paddings: impl IntoIterator<Item = f32>) -> f32 {
    paddings.into_iter().sum()
}

/// Padding of independent stages over the same region.
pub fn parallel(paddings: impl IntoIterator<Item = f32>) -> f32 {
    paddings.into_iter().fold(0.0, f32::max)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/padding.rs"]
mod tests;
