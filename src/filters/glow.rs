use crate::{
    compose::Filter,
    filters::{angle_step, flag},
    foundation::color::Rgb,
    foundation::core::Surface,
    foundation::error::FxResult,
    foundation::math::{finite_or, non_negative_or},
    pass::{
        single::SinglePass,
        uniforms::{UniformLayout, UniformSlot},
    },
    render::context::FilterContext,
    render::host::{ProgramKind, RenderHost},
};

/// Construction options for [`GlowFilter`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GlowOptions {
    /// Glow reach in pixels.
    pub distance: f32,
    /// Strength outside the content.
    pub outer_strength: f32,
    /// Strength inside the content.
    pub inner_strength: f32,
    /// Glow color.
    pub color: Rgb,
    /// Glow opacity (0..1).
    pub alpha: f32,
    /// Angular sampling density (0..1).
    pub quality: f32,
    /// Draw only the glow, without the content.
    pub knockout: bool,
}

impl Default for GlowOptions {
    fn default() -> Self {
        Self {
            distance: 10.0,
            outer_strength: 4.0,
            inner_strength: 0.0,
            color: Rgb::WHITE,
            alpha: 1.0,
            quality: 0.1,
            knockout: false,
        }
    }
}

/// Soft inner/outer glow, single pass.
#[derive(Debug)]
pub struct GlowFilter {
    pass: SinglePass,
    distance_slot: UniformSlot<f32>,
    strength_slot: UniformSlot<[f32; 2]>,
    color_slot: UniformSlot<[f32; 3]>,
    alpha_slot: UniformSlot<f32>,
    angle_step_slot: UniformSlot<f32>,
    knockout_slot: UniformSlot<f32>,
    opts: GlowOptions,
}

impl GlowFilter {
    /// Compile the glow program and apply `opts`.
    pub fn new(host: &mut dyn RenderHost, opts: GlowOptions) -> FxResult<Self> {
        let mut layout = UniformLayout::new();
        let distance_slot = layout.declare("uDistance", 0.0f32);
        let strength_slot = layout.declare("uStrength", [0.0f32; 2]);
        let color_slot = layout.declare("uColor", [1.0f32; 3]);
        let alpha_slot = layout.declare("uAlpha", 1.0f32);
        let angle_step_slot = layout.declare("uAngleStep", 0.0f32);
        let knockout_slot = layout.declare("uKnockout", 0.0f32);
        let pass = SinglePass::new(host, ProgramKind::Glow, layout.finish())?;

        let mut filter = Self {
            pass,
            distance_slot,
            strength_slot,
            color_slot,
            alpha_slot,
            angle_step_slot,
            knockout_slot,
            opts: GlowOptions::default(),
        };
        filter.set_distance(opts.distance);
        filter.set_outer_strength(opts.outer_strength);
        filter.set_inner_strength(opts.inner_strength);
        filter.set_color(opts.color);
        filter.set_alpha(opts.alpha);
        filter.set_quality(opts.quality);
        filter.set_knockout(opts.knockout);
        Ok(filter)
    }

    /// Current settings.
    pub fn options(&self) -> &GlowOptions {
        &self.opts
    }

    /// Set the glow reach. Bad values become `0`.
    pub fn set_distance(&mut self, distance: f32) {
        self.opts.distance = non_negative_or(distance, 0.0);
        let d = self.opts.distance;
        self.pass.uniforms_mut().set(self.distance_slot, d);
    }

    /// Set the strength outside the content. Bad values become `0`.
    pub fn set_outer_strength(&mut self, strength: f32) {
        self.opts.outer_strength = non_negative_or(strength, 0.0);
        self.write_strength();
    }

    /// Set the strength inside the content. Bad values become `0`.
    pub fn set_inner_strength(&mut self, strength: f32) {
        self.opts.inner_strength = non_negative_or(strength, 0.0);
        self.write_strength();
    }

    /// Set the glow color.
    pub fn set_color(&mut self, color: Rgb) {
        self.opts.color = color;
        self.pass
            .uniforms_mut()
            .set(self.color_slot, color.to_uniform());
    }

    /// Set the opacity, clamped to `0..=1`.
    pub fn set_alpha(&mut self, alpha: f32) {
        self.opts.alpha = finite_or(alpha, 1.0).clamp(0.0, 1.0);
        let a = self.opts.alpha;
        self.pass.uniforms_mut().set(self.alpha_slot, a);
    }

    /// Set the sampling density, clamped to `0..=1`.
    pub fn set_quality(&mut self, quality: f32) {
        self.opts.quality = finite_or(quality, 0.1).clamp(0.0, 1.0);
        let step = angle_step(self.opts.quality);
        self.pass.uniforms_mut().set(self.angle_step_slot, step);
    }

    /// Draw only the glow.
    pub fn set_knockout(&mut self, knockout: bool) {
        self.opts.knockout = knockout;
        self.pass
            .uniforms_mut()
            .set(self.knockout_slot, flag(knockout));
    }

    fn write_strength(&mut self) {
        let v = [self.opts.inner_strength, self.opts.outer_strength];
        self.pass.uniforms_mut().set(self.strength_slot, v);
    }
}

impl Filter for GlowFilter {
    fn name(&self) -> &'static str {
        "glow"
    }

    fn padding(&self) -> f32 {
        self.opts.distance
    }

    fn apply(
        &mut self,
        ctx: &mut FilterContext<'_>,
        input: Surface,
        output: Surface,
        clear: bool,
    ) -> FxResult<()> {
        self.pass.apply(ctx, input, output, clear)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filters/glow.rs"]
mod tests;
