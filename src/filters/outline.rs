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

/// Construction options for [`OutlineFilter`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OutlineOptions {
    /// Outline width in pixels.
    pub thickness: f32,
    /// Outline color.
    pub color: Rgb,
    /// Outline opacity (0..1).
    pub alpha: f32,
    /// Angular sampling density (0..1).
    pub quality: f32,
    /// Draw only the outline, without the content.
    pub knockout: bool,
}

impl Default for OutlineOptions {
    fn default() -> Self {
        Self {
            thickness: 1.0,
            color: Rgb::BLACK,
            alpha: 1.0,
            quality: 0.1,
            knockout: false,
        }
    }
}

/// Solid outline around opaque content, single pass.
#[derive(Debug)]
pub struct OutlineFilter {
    pass: SinglePass,
    thickness_slot: UniformSlot<[f32; 2]>,
    color_slot: UniformSlot<[f32; 3]>,
    alpha_slot: UniformSlot<f32>,
    angle_step_slot: UniformSlot<f32>,
    knockout_slot: UniformSlot<f32>,
    thickness: f32,
    color: Rgb,
    alpha: f32,
    quality: f32,
    knockout: bool,
}

impl OutlineFilter {
    /// Compile the outline program and apply `opts`.
    pub fn new(host: &mut dyn RenderHost, opts: OutlineOptions) -> FxResult<Self> {
        let mut layout = UniformLayout::new();
        let thickness_slot = layout.declare("uThickness", [0.0f32; 2]);
        let color_slot = layout.declare("uColor", [0.0f32; 3]);
        let alpha_slot = layout.declare("uAlpha", 1.0f32);
        let angle_step_slot = layout.declare("uAngleStep", 0.0f32);
        let knockout_slot = layout.declare("uKnockout", 0.0f32);
        let pass = SinglePass::new(host, ProgramKind::Outline, layout.finish())?;

        let mut filter = Self {
            pass,
            thickness_slot,
            color_slot,
            alpha_slot,
            angle_step_slot,
            knockout_slot,
            thickness: 0.0,
            color: Rgb::BLACK,
            alpha: 1.0,
            quality: 0.0,
            knockout: false,
        };
        filter.set_thickness(opts.thickness);
        filter.set_color(opts.color);
        filter.set_alpha(opts.alpha);
        filter.set_quality(opts.quality);
        filter.set_knockout(opts.knockout);
        Ok(filter)
    }

    /// Outline width.
    pub fn thickness(&self) -> f32 {
        self.thickness
    }

    /// Set the outline width. Bad values become `0`.
    pub fn set_thickness(&mut self, thickness: f32) {
        self.thickness = non_negative_or(thickness, 0.0);
        let t = self.thickness;
        self.pass.uniforms_mut().set(self.thickness_slot, [t, t]);
    }

    /// Outline color.
    pub fn color(&self) -> Rgb {
        self.color
    }

    /// Set the outline color.
    pub fn set_color(&mut self, color: Rgb) {
        self.color = color;
        self.pass
            .uniforms_mut()
            .set(self.color_slot, color.to_uniform());
    }

    /// Outline opacity.
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Set the opacity, clamped to `0..=1`.
    pub fn set_alpha(&mut self, alpha: f32) {
        self.alpha = finite_or(alpha, 1.0).clamp(0.0, 1.0);
        self.pass.uniforms_mut().set(self.alpha_slot, self.alpha);
    }

    /// Sampling density.
    pub fn quality(&self) -> f32 {
        self.quality
    }

    /// Set the sampling density, clamped to `0..=1`.
    pub fn set_quality(&mut self, quality: f32) {
        self.quality = finite_or(quality, 0.1).clamp(0.0, 1.0);
        let step = angle_step(self.quality);
        self.pass.uniforms_mut().set(self.angle_step_slot, step);
    }

    /// Whether the content is knocked out.
    pub fn knockout(&self) -> bool {
        self.knockout
    }

    /// Draw only the outline.
    pub fn set_knockout(&mut self, knockout: bool) {
        self.knockout = knockout;
        self.pass
            .uniforms_mut()
            .set(self.knockout_slot, flag(knockout));
    }
}

impl Filter for OutlineFilter {
    fn name(&self) -> &'static str {
        "outline"
    }

    fn padding(&self) -> f32 {
        self.thickness
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
#[path = "../../tests/unit/filters/outline.rs"]
mod tests;
