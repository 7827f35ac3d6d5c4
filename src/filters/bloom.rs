use crate::{
    compose::{Filter, padding},
    filters::kawase::{KawaseBlurFilter, KawaseBlurOptions},
    foundation::core::{Surface, SurfaceId},
    foundation::error::FxResult,
    foundation::math::non_negative_or,
    pass::{
        single::SinglePass,
        uniforms::{UniformLayout, UniformSlot},
    },
    render::context::FilterContext,
    render::host::{ProgramKind, RenderHost},
};

/// Construction options for [`BloomFilter`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BloomOptions {
    /// Brightness (0..1) above which pixels contribute to the bloom.
    pub threshold: f32,
    /// Strength of the blurred bright pixels in the final blend.
    pub bloom_scale: f32,
    /// Multiplier applied to the original image in the final blend.
    pub brightness: f32,
    /// Blur strength of the bright pixels.
    pub blur: f32,
    /// Blur passes.
    pub quality: u32,
    /// Explicit blur kernel; overrides `blur` and `quality`.
    pub kernel: Option<Vec<f32>>,
    /// Blur offset multiplier per axis.
    pub pixel_size: [f32; 2],
}

impl Default for BloomOptions {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            bloom_scale: 1.0,
            brightness: 1.0,
            blur: 8.0,
            quality: 4,
            kernel: None,
            pixel_size: [1.0, 1.0],
        }
    }
}

/// Bloom: extract bright pixels, blur them, screen-blend the result over the original.
///
/// The final pass samples both the original input and the blurred bright pixels.
#[derive(Debug)]
pub struct BloomFilter {
    extract: SinglePass,
    threshold: UniformSlot<f32>,
    blur: KawaseBlurFilter,
    combine: SinglePass,
    bloom_scale: UniformSlot<f32>,
    brightness: UniformSlot<f32>,
    map: UniformSlot<Option<SurfaceId>>,
    padding: f32,
}

impl BloomFilter {
    /// Compile the three stages and apply `opts`.
    pub fn new(host: &mut dyn RenderHost, opts: BloomOptions) -> FxResult<Self> {
        let mut layout = UniformLayout::new();
        let threshold = layout.declare("uThreshold", 0.5f32);
        let extract = SinglePass::new(host, ProgramKind::BrightnessExtract, layout.finish())?;

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

        let mut layout = UniformLayout::new();
        let bloom_scale = layout.declare("uBloomScale", 1.0f32);
        let brightness = layout.declare("uBrightness", 1.0f32);
        let map = layout.declare::<Option<SurfaceId>>("uMapTexture", None);
        let combine = SinglePass::new(host, ProgramKind::BloomCombine, layout.finish())?;

        let mut filter = Self {
            extract,
            threshold,
            blur,
            combine,
            bloom_scale,
            brightness,
            map,
            padding: 0.0,
        };
        filter.set_threshold(opts.threshold);
        filter.set_bloom_scale(opts.bloom_scale);
        filter.set_brightness(opts.brightness);
        filter.refresh_padding();
        Ok(filter)
    }

    /// Brightness threshold.
    pub fn threshold(&self) -> f32 {
        self.extract.uniforms().get(self.threshold)
    }

    /// Set the threshold; clamped to `0..=1`, non-finite values fall back to `0.5`.
    pub fn set_threshold(&mut self, threshold: f32) {
        let v = if threshold.is_finite() {
            threshold.clamp(0.0, 1.0)
        } else {
            0.5
        };
        self.extract.uniforms_mut().set(self.threshold, v);
    }

    /// Bloom contribution in the final blend.
    pub fn bloom_scale(&self) -> f32 {
        self.combine.uniforms().get(self.bloom_scale)
    }

    /// Set the bloom contribution. Bad values fall back to `1`.
    pub fn set_bloom_scale(&mut self, scale: f32) {
        let v = non_negative_or(scale, 1.0);
        self.combine.uniforms_mut().set(self.bloom_scale, v);
    }

    /// Original-image multiplier in the final blend.
    pub fn brightness(&self) -> f32 {
        self.combine.uniforms().get(self.brightness)
    }

    /// Set the original-image multiplier. Bad values fall back to `1`.
    pub fn set_brightness(&mut self, brightness: f32) {
        let v = non_negative_or(brightness, 1.0);
        self.combine.uniforms_mut().set(self.brightness, v);
    }

    /// Blur strength.
    pub fn blur(&self) -> f32 {
        self.blur.strength()
    }

    /// Set the blur strength.
    pub fn set_blur(&mut self, blur: f32) {
        self.blur.set_strength(blur);
        self.refresh_padding();
    }

    /// Blur passes.
    pub fn quality(&self) -> u32 {
        self.blur.quality()
    }

    /// Set the blur passes.
    pub fn set_quality(&mut self, quality: u32) {
        self.blur.set_quality(quality);
        self.refresh_padding();
    }

    /// Blur kernel.
    pub fn kernel(&self) -> &[f32] {
        self.blur.kernel()
    }

    /// Use an explicit blur kernel.
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
        // extract and combine sample in place
        self.padding = padding::sequential([0.0, self.blur.padding(), 0.0]);
    }
}

impl Filter for BloomFilter {
    fn name(&self) -> &'static str {
        "bloom"
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
            extract,
            blur,
            combine,
            map,
            ..
        } = self;
        ctx.with_scratch(&input, |ctx, bright| {
            extract.apply(ctx, input, bright, true)?;
            ctx.with_scratch(&input, |ctx, bloom| {
                blur.apply(ctx, bright, bloom, true)?;
                combine.uniforms_mut().set(*map, Some(bloom.id()));
                let out = combine.apply(ctx, input, output, clear);
                combine.uniforms_mut().set(*map, None);
                out
            })
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filters/bloom.rs"]
mod tests;
