use crate::{
    compose::{Filter, padding},
    filters::kawase::{KawaseBlurFilter, KawaseBlurOptions},
    foundation::color::Rgb,
    foundation::core::Surface,
    foundation::error::FxResult,
    foundation::math::finite_or,
    pass::{
        single::SinglePass,
        uniforms::{UniformLayout, UniformSlot, UniformStore},
    },
    render::context::FilterContext,
    render::host::{ProgramKind, RenderHost},
};

/// Construction options for [`DropShadowFilter`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DropShadowOptions {
    /// Shadow offset in pixels.
    pub offset: [f32; 2],
    /// Shadow color.
    pub color: Rgb,
    /// Shadow opacity (0..1).
    pub alpha: f32,
    /// Draw only the shadow, without the original on top.
    pub shadow_only: bool,
    /// Shadow blur strength.
    pub blur: f32,
    /// Shadow blur passes.
    pub quality: u32,
    /// Explicit blur kernel; overrides `blur` and `quality`.
    pub kernel: Option<Vec<f32>>,
    /// Blur offset multiplier per axis.
    pub pixel_size: [f32; 2],
}

impl Default for DropShadowOptions {
    fn default() -> Self {
        Self {
            offset: [4.0, 4.0],
            color: Rgb::BLACK,
            alpha: 0.5,
            shadow_only: false,
            blur: 2.0,
            quality: 3,
            kernel: None,
            pixel_size: [1.0, 1.0],
        }
    }
}

/// Drop shadow: tinted, offset silhouette, blurred, with the original drawn back on top.
#[derive(Debug)]
pub struct DropShadowFilter {
    tint: SinglePass,
    alpha_slot: UniformSlot<f32>,
    color_slot: UniformSlot<[f32; 3]>,
    offset_slot: UniformSlot<[f32; 2]>,
    blur: KawaseBlurFilter,
    base: SinglePass,
    offset: [f32; 2],
    color: Rgb,
    alpha: f32,
    shadow_only: bool,
    padding: f32,
}

impl DropShadowFilter {
    /// Compile the shadow, blur and base passes and apply `opts`.
    pub fn new(host: &mut dyn RenderHost, opts: DropShadowOptions) -> FxResult<Self> {
        let mut layout = UniformLayout::new();
        let alpha_slot = layout.declare("uAlpha", 1.0f32);
        let color_slot = layout.declare("uColor", [0.0f32; 3]);
        let offset_slot = layout.declare("uOffset", [0.0f32; 2]);
        let tint = SinglePass::new(host, ProgramKind::DropShadow, layout.finish())?;

        let blur = KawaseBlurFilter::new(
            host,
            KawaseBlurOptions {
                strength: opts.blur,
                quality: opts.quality,
                kernel: opts.kernel,
                clamp: false,
                pixel_size: opts.pixel_size,
            },
        )?;
        let base = SinglePass::new(host, ProgramKind::Copy, UniformStore::empty())?;

        let mut filter = Self {
            tint,
            alpha_slot,
            color_slot,
            offset_slot,
            blur,
            base,
            offset: [0.0; 2],
            color: Rgb::BLACK,
            alpha: 1.0,
            shadow_only: opts.shadow_only,
            padding: 0.0,
        };
        filter.set_color(opts.color);
        filter.set_alpha(opts.alpha);
        filter.set_offset(opts.offset);
        Ok(filter)
    }

    /// Shadow offset in pixels.
    pub fn offset(&self) -> [f32; 2] {
        self.offset
    }

    /// Set the offset. Non-finite components become `0`.
    pub fn set_offset(&mut self, offset: [f32; 2]) {
        self.offset = offset.map(|v| finite_or(v, 0.0));
        self.tint.uniforms_mut().set(self.offset_slot, self.offset);
        self.refresh_padding();
    }

    /// Shadow color.
    pub fn color(&self) -> Rgb {
        self.color
    }

    /// Set the shadow color.
    pub fn set_color(&mut self, color: Rgb) {
        self.color = color;
        self.tint
            .uniforms_mut()
            .set(self.color_slot, color.to_uniform());
    }

    /// Shadow opacity.
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Set the opacity, clamped to `0..=1`. Non-finite values fall back to `0.5`.
    pub fn set_alpha(&mut self, alpha: f32) {
        self.alpha = finite_or(alpha, 0.5).clamp(0.0, 1.0);
        self.tint.uniforms_mut().set(self.alpha_slot, self.alpha);
    }

    /// Whether the original is left out.
    pub fn shadow_only(&self) -> bool {
        self.shadow_only
    }

    /// Draw only the shadow.
    pub fn set_shadow_only(&mut self, shadow_only: bool) {
        self.shadow_only = shadow_only;
    }

    /// Shadow blur strength.
    pub fn blur(&self) -> f32 {
        self.blur.strength()
    }

    /// Set the shadow blur strength.
    pub fn set_blur(&mut self, blur: f32) {
        self.blur.set_strength(blur);
        self.refresh_padding();
    }

    /// Shadow blur passes.
    pub fn quality(&self) -> u32 {
        self.blur.quality()
    }

    /// Set the shadow blur passes.
    pub fn set_quality(&mut self, quality: u32) {
        self.blur.set_quality(quality);
        self.refresh_padding();
    }

    /// Shadow blur kernel.
    pub fn kernel(&self) -> &[f32] {
        self.blur.kernel()
    }

    /// Use an explicit shadow blur kernel.
    pub fn set_kernel(&mut self, kernel: &[f32]) {
        self.blur.set_kernel(kernel);
        self.refresh_padding();
    }

    /// Blur offset multiplier.
    pub fn pixel_size(&self) -> [f32; 2] {
        self.blur.pixel_size()
    }

    /// Set the blur offset multiplier.
    pub fn set_pixel_size(&mut self, pixel_size: [f32; 2]) {
        self.blur.set_pixel_size(pixel_size);
    }

    fn refresh_padding(&mut self) {
        self.padding =
            padding::drop_shadow_padding(self.offset, self.blur.strength(), self.blur.quality());
    }
}

impl Filter for DropShadowFilter {
    fn name(&self) -> &'static str {
        "drop-shadow"
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
        let Self { tint, blur, .. } = self;
        ctx.with_scratch(&input, |ctx, shadow| {
            tint.apply(ctx, input, shadow, true)?;
            blur.apply(ctx, shadow, output, clear)
        })?;
        if !self.shadow_only {
            self.base.apply(ctx, input, output, false)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filters/drop_shadow.rs"]
mod tests;
