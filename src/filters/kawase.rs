use crate::{
    compose::{
        Filter,
        kernel::{Kernel, generate_kernel, quality_and_strength, sanitize_kernel},
        padding, run_chain,
    },
    foundation::core::Surface,
    foundation::error::FxResult,
    foundation::math::non_negative_or,
    pass::{
        single::SinglePass,
        uniforms::{UniformLayout, UniformSlot},
    },
    render::context::FilterContext,
    render::host::{ProgramKind, RenderHost},
};

/// Construction options for [`KawaseBlurFilter`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct KawaseBlurOptions {
    /// Blur strength in pixels.
    pub strength: f32,
    /// Number of passes.
    pub quality: u32,
    /// Explicit per-pass offsets; overrides `strength` and `quality` when set.
    pub kernel: Option<Vec<f32>>,
    /// Sample with clamp-to-edge instead of reading transparent outside the input.
    pub clamp: bool,
    /// Per-axis multiplier applied to every offset.
    pub pixel_size: [f32; 2],
}

impl Default for KawaseBlurOptions {
    fn default() -> Self {
        Self {
            strength: 4.0,
            quality: 3,
            kernel: None,
            clamp: false,
            pixel_size: [1.0, 1.0],
        }
    }
}

/// Multi-pass Kawase blur.
///
/// Every pass runs the same four-tap program with its offset taken from the kernel. A one-entry
/// kernel (quality 1 or zero strength) draws straight from input to output.
#[derive(Debug)]
pub struct KawaseBlurFilter {
    pass: SinglePass,
    offset: UniformSlot<[f32; 2]>,
    kernel: Kernel,
    strength: f32,
    quality: u32,
    pixel_size: [f32; 2],
    clamp: bool,
    padding: f32,
}

impl KawaseBlurFilter {
    /// Compile the blur program and apply `opts`.
    pub fn new(host: &mut dyn RenderHost, opts: KawaseBlurOptions) -> FxResult<Self> {
        let kind = if opts.clamp {
            ProgramKind::KawaseBlurClamp
        } else {
            ProgramKind::KawaseBlur
        };
        let mut layout = UniformLayout::new();
        let offset = layout.declare("uOffset", [0.0f32; 2]);
        let pass = SinglePass::new(host, kind, layout.finish())?;

        let mut filter = Self {
            pass,
            offset,
            kernel: Kernel::new(),
            strength: 0.0,
            quality: 1,
            pixel_size: [1.0, 1.0],
            clamp: opts.clamp,
            padding: 0.0,
        };
        filter.set_pixel_size(opts.pixel_size);
        match opts.kernel {
            Some(kernel) => filter.set_kernel(&kernel),
            None => {
                filter.quality = opts.quality.max(1);
                filter.set_strength(opts.strength);
            }
        }
        Ok(filter)
    }

    /// Blur strength in pixels.
    pub fn strength(&self) -> f32 {
        self.strength
    }

    /// Set the strength and regenerate the kernel. Negative or non-finite values become `0`.
    pub fn set_strength(&mut self, strength: f32) {
        self.strength = non_negative_or(strength, 0.0);
        self.regenerate();
    }

    /// Requested number of passes.
    ///
    /// A zero strength still reports the requested quality; [`KawaseBlurFilter::stages`] gives
    /// the passes actually run.
    pub fn quality(&self) -> u32 {
        self.quality
    }

    /// Set the number of passes (`0` counts as `1`) and regenerate the kernel.
    pub fn set_quality(&mut self, quality: u32) {
        self.quality = quality.max(1);
        self.regenerate();
    }

    /// Current per-pass offsets.
    pub fn kernel(&self) -> &[f32] {
        &self.kernel
    }

    /// Use explicit per-pass offsets; quality and strength follow from them.
    pub fn set_kernel(&mut self, kernel: &[f32]) {
        self.kernel = sanitize_kernel(kernel);
        (self.quality, self.strength) = quality_and_strength(&self.kernel);
        self.padding = padding::kernel_padding(&self.kernel);
    }

    /// Passes run per `apply()`.
    pub fn stages(&self) -> usize {
        self.kernel.len()
    }

    /// Offset multiplier per axis.
    pub fn pixel_size(&self) -> [f32; 2] {
        self.pixel_size
    }

    /// Set the offset multiplier. Bad components fall back to `1`.
    pub fn set_pixel_size(&mut self, pixel_size: [f32; 2]) {
        self.pixel_size = pixel_size.map(|v| non_negative_or(v, 1.0));
    }

    /// Whether sampling clamps to the input's edges.
    pub fn clamp(&self) -> bool {
        self.clamp
    }

    fn regenerate(&mut self) {
        self.kernel = generate_kernel(self.strength, self.quality);
        self.padding = padding::kernel_padding(&self.kernel);
    }
}

fn stage_offset(k: f32, pixel_size: [f32; 2]) -> [f32; 2] {
    [
        (k + padding::HALF_TEXEL) * pixel_size[0],
        (k + padding::HALF_TEXEL) * pixel_size[1],
    ]
}

impl Filter for KawaseBlurFilter {
    fn name(&self) -> &'static str {
        "kawase-blur"
    }

    fn padding(&self) -> f32 {
        self.padding
    }

    fn apply(
        &mut self,
        ctx: &mut FilterContext<'_>,
        input: Surface,
        output: Surface,
        clear: bool,
    ) -> FxResult<()> {
        let Self {
            pass,
            offset,
            kernel,
            pixel_size,
            ..
        } = self;
        run_chain(ctx, kernel.len(), input, output, clear, |ctx, i, from, to, clear| {
            pass.uniforms_mut().set(*offset, stage_offset(kernel[i], *pixel_size));
            pass.apply(ctx, from, to, clear)
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filters/kawase.rs"]
mod tests;
