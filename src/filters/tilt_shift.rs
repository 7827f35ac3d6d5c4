use crate::{
    compose::{Filter, padding},
    foundation::core::{Point, Surface, Vec2},
    foundation::error::FxResult,
    foundation::math::non_negative_or,
    pass::{
        single::SinglePass,
        uniforms::{UniformLayout, UniformSlot},
    },
    render::context::FilterContext,
    render::host::{ProgramKind, RenderHost},
};

/// Direction of one tilt-shift pass relative to the focus line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Blur along the focus line.
    Horizontal,
    /// Blur across the focus line.
    Vertical,
}

/// Unit sampling direction for `axis` given the focus line from `start` to `end`.
///
/// Horizontal follows `end - start`; vertical is that direction rotated by +90°. A degenerate
/// or non-finite line yields a zero delta, which turns the pass into a plain copy.
pub fn axis_delta(axis: Axis, start: Point, end: Point) -> Vec2 {
    let d = end - start;
    let len = d.hypot();
    if !(len > 0.0) || !len.is_finite() {
        return Vec2::ZERO;
    }
    let (dx, dy) = (d.x / len, d.y / len);
    match axis {
        Axis::Horizontal => Vec2::new(dx, dy),
        Axis::Vertical => Vec2::new(-dy, dx),
    }
}

/// Construction options for [`TiltShiftFilter`] and [`TiltShiftAxisFilter`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TiltShiftOptions {
    /// Maximum blur radius in pixels.
    pub blur: f32,
    /// Distance from the focus line over which the blur ramps up.
    pub gradient_blur: f32,
    /// Focus line start.
    pub start: Point,
    /// Focus line end.
    pub end: Point,
}

impl Default for TiltShiftOptions {
    fn default() -> Self {
        Self {
            blur: 100.0,
            gradient_blur: 600.0,
            start: Point::new(0.0, 300.0),
            end: Point::new(600.0, 300.0),
        }
    }
}

fn sanitize_point(p: Point) -> Point {
    Point::new(
        if p.x.is_finite() { p.x } else { 0.0 },
        if p.y.is_finite() { p.y } else { 0.0 },
    )
}

fn to_uniform(p: impl Into<(f64, f64)>) -> [f32; 2] {
    let (x, y) = p.into();
    [x as f32, y as f32]
}

/// One directional pass of a tilt-shift blur.
#[derive(Debug)]
pub struct TiltShiftAxisFilter {
    axis: Axis,
    pass: SinglePass,
    blur_slot: UniformSlot<[f32; 2]>,
    start_slot: UniformSlot<[f32; 2]>,
    end_slot: UniformSlot<[f32; 2]>,
    delta_slot: UniformSlot<[f32; 2]>,
    tex_size_slot: UniformSlot<[f32; 2]>,
    blur: f32,
    gradient_blur: f32,
    start: Point,
    end: Point,
    delta: Vec2,
}

impl TiltShiftAxisFilter {
    /// Compile the axis program and apply `opts`.
    pub fn new(host: &mut dyn RenderHost, axis: Axis, opts: &TiltShiftOptions) -> FxResult<Self> {
        let mut layout = UniformLayout::new();
        let blur_slot = layout.declare("uBlur", [0.0f32; 2]);
        let start_slot = layout.declare("uStart", [0.0f32; 2]);
        let end_slot = layout.declare("uEnd", [0.0f32; 2]);
        let delta_slot = layout.declare("uDelta", [0.0f32; 2]);
        let tex_size_slot = layout.declare("uTexSize", [0.0f32; 2]);
        let pass = SinglePass::new(host, ProgramKind::TiltShiftAxis, layout.finish())?;

        let mut filter = Self {
            axis,
            pass,
            blur_slot,
            start_slot,
            end_slot,
            delta_slot,
            tex_size_slot,
            blur: 0.0,
            gradient_blur: 0.0,
            start: Point::ORIGIN,
            end: Point::ORIGIN,
            delta: Vec2::ZERO,
        };
        filter.set_blur(opts.blur);
        filter.set_gradient_blur(opts.gradient_blur);
        filter.set_start(opts.start);
        filter.set_end(opts.end);
        Ok(filter)
    }

    /// Direction this pass blurs in.
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Maximum blur radius.
    pub fn blur(&self) -> f32 {
        self.blur
    }

    /// Set the blur radius. Bad values become `0`.
    pub fn set_blur(&mut self, blur: f32) {
        self.blur = non_negative_or(blur, 0.0);
        self.write_blur();
    }

    /// Blur ramp distance.
    pub fn gradient_blur(&self) -> f32 {
        self.gradient_blur
    }

    /// Set the ramp distance. Bad values become `0` (full blur everywhere off the line).
    pub fn set_gradient_blur(&mut self, gradient_blur: f32) {
        self.gradient_blur = non_negative_or(gradient_blur, 0.0);
        self.write_blur();
    }

    /// Focus line start.
    pub fn start(&self) -> Point {
        self.start
    }

    /// Move the focus line start; the sampling delta follows.
    pub fn set_start(&mut self, start: Point) {
        self.start = sanitize_point(start);
        let v = to_uniform(self.start);
        self.pass.uniforms_mut().set(self.start_slot, v);
        self.update_delta();
    }

    /// Focus line end.
    pub fn end(&self) -> Point {
        self.end
    }

    /// Move the focus line end; the sampling delta follows.
    pub fn set_end(&mut self, end: Point) {
        self.end = sanitize_point(end);
        let v = to_uniform(self.end);
        self.pass.uniforms_mut().set(self.end_slot, v);
        self.update_delta();
    }

    /// Current unit sampling direction.
    pub fn delta(&self) -> Vec2 {
        self.delta
    }

    fn write_blur(&mut self) {
        let v = [self.blur, self.gradient_blur];
        self.pass.uniforms_mut().set(self.blur_slot, v);
    }

    fn update_delta(&mut self) {
        self.delta = axis_delta(self.axis, self.start, self.end);
        let v = to_uniform(self.delta);
        self.pass.uniforms_mut().set(self.delta_slot, v);
    }
}

impl Filter for TiltShiftAxisFilter {
    fn name(&self) -> &'static str {
        "tilt-shift-axis"
    }

    fn padding(&self) -> f32 {
        self.blur
    }

    fn apply(
        &mut self,
        ctx: &mut FilterContext<'_>,
        input: Surface,
        output: Surface,
        clear: bool,
    ) -> FxResult<()> {
        let size = [input.width() as f32, input.height() as f32];
        self.pass.uniforms_mut().set(self.tex_size_slot, size);
        self.pass.apply(ctx, input, output, clear)
    }
}

/// Tilt-shift: a horizontal then a vertical pass sharing one focus line.
#[derive(Debug)]
pub struct TiltShiftFilter {
    horizontal: TiltShiftAxisFilter,
    vertical: TiltShiftAxisFilter,
}

impl TiltShiftFilter {
    /// Build both axis passes from `opts`.
    pub fn new(host: &mut dyn RenderHost, opts: TiltShiftOptions) -> FxResult<Self> {
        Ok(Self {
            horizontal: TiltShiftAxisFilter::new(host, Axis::Horizontal, &opts)?,
            vertical: TiltShiftAxisFilter::new(host, Axis::Vertical, &opts)?,
        })
    }

    /// The pass along the focus line.
    pub fn horizontal(&self) -> &TiltShiftAxisFilter {
        &self.horizontal
    }

    /// Mutable pass along the focus line.
    pub fn horizontal_mut(&mut self) -> &mut TiltShiftAxisFilter {
        &mut self.horizontal
    }

    /// The pass across the focus line.
    pub fn vertical(&self) -> &TiltShiftAxisFilter {
        &self.vertical
    }

    /// Mutable pass across the focus line.
    pub fn vertical_mut(&mut self) -> &mut TiltShiftAxisFilter {
        &mut self.vertical
    }

    /// Maximum blur radius.
    pub fn blur(&self) -> f32 {
        self.horizontal.blur()
    }

    /// Set the blur radius on both passes.
    pub fn set_blur(&mut self, blur: f32) {
        self.horizontal.set_blur(blur);
        self.vertical.set_blur(blur);
    }

    /// Blur ramp distance.
    pub fn gradient_blur(&self) -> f32 {
        self.horizontal.gradient_blur()
    }

    /// Set the ramp distance on both passes.
    pub fn set_gradient_blur(&mut self, gradient_blur: f32) {
        self.horizontal.set_gradient_blur(gradient_blur);
        self.vertical.set_gradient_blur(gradient_blur);
    }

    /// Focus line start.
    pub fn start(&self) -> Point {
        self.horizontal.start()
    }

    /// Move the focus line start on both passes.
    pub fn set_start(&mut self, start: Point) {
        self.horizontal.set_start(start);
        self.vertical.set_start(start);
    }

    /// Focus line end.
    pub fn end(&self) -> Point {
        self.horizontal.end()
    }

    /// Move the focus line end on both passes.
    pub fn set_end(&mut self, end: Point) {
        self.horizontal.set_end(end);
        self.vertical.set_end(end);
    }
}

impl Filter for TiltShiftFilter {
    fn name(&self) -> &'static str {
        "tilt-shift"
    }

    fn padding(&self) -> f32 {
        padding::parallel([self.horizontal.padding(), self.vertical.padding()])
    }

    fn apply(
        &mut self,
        ctx: &mut FilterContext<'_>,
        input: Surface,
        output: Surface,
        clear: bool,
    ) -> FxResult<()> {
        let Self {
            horizontal,
            vertical,
        } = self;
        ctx.with_scratch(&input, |ctx, scratch| {
            horizontal.apply(ctx, input, scratch, true)?;
            vertical.apply(ctx, scratch, output, clear)
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filters/tilt_shift.rs"]
mod tests;
