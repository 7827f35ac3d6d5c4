use crate::{
    foundation::core::{Surface, SurfaceDesc},
    foundation::error::FxResult,
    pass::uniforms::UniformStore,
};

/// Fragment programs the built-in filters draw with.
///
/// Shader source is owned by the host: a GPU host maps each kind to its own compiled program, the
/// CPU reference host maps it to a native shading routine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProgramKind {
    /// Pass-through copy of the input.
    Copy,
    /// Four-tap Kawase blur; samples outside the input read as transparent.
    KawaseBlur,
    /// Four-tap Kawase blur with clamp-to-edge sampling.
    KawaseBlurClamp,
    /// Keep pixels whose brightness exceeds `uThreshold`.
    BrightnessExtract,
    /// Screen-blend `uMapTexture` over the input.
    BloomCombine,
    /// Offset, tinted silhouette of the input.
    DropShadow,
    /// One directional pass of a tilt-shift blur.
    TiltShiftAxis,
    /// Solid outline around opaque content.
    Outline,
    /// Soft inner/outer glow around opaque content.
    Glow,
}

impl ProgramKind {
    /// Stable label used for logging and host-side shader lookup.
    pub fn label(self) -> &'static str {
        match self {
            Self::Copy => "copy",
            Self::KawaseBlur => "kawase-blur",
            Self::KawaseBlurClamp => "kawase-blur-clamp",
            Self::BrightnessExtract => "brightness-extract",
            Self::BloomCombine => "bloom-combine",
            Self::DropShadow => "drop-shadow",
            Self::TiltShiftAxis => "tilt-shift-axis",
            Self::Outline => "outline",
            Self::Glow => "glow",
        }
    }
}

/// Host-assigned handle to a compiled program.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ProgramHandle(pub u32);

/// One draw submission: run `program` over `input`, writing `output`.
#[derive(Clone, Copy, Debug)]
pub struct DrawCall<'a> {
    /// Program to run.
    pub program: ProgramHandle,
    /// Uniform values, including extra sampler bindings.
    pub uniforms: &'a UniformStore,
    /// Surface bound as the primary input texture.
    pub input: Surface,
    /// Surface written by the draw.
    pub output: Surface,
    /// Clear `output` to transparent before drawing; otherwise blend over existing content.
    pub clear: bool,
}

/// Services a host renderer provides to the filter pipeline.
///
/// Implementations wrap a real GPU device or, like [`crate::CpuHost`], a software rasterizer.
pub trait RenderHost {
    /// Compile and link the program for `kind`. Failure is fatal at filter construction.
    fn compile_program(&mut self, kind: ProgramKind) -> FxResult<ProgramHandle>;

    /// Allocate a surface. Failure is fatal for the current `apply()`.
    fn create_surface(&mut self, desc: &SurfaceDesc) -> FxResult<Surface>;

    /// Free a surface previously returned by [`RenderHost::create_surface`].
    fn destroy_surface(&mut self, surface: Surface);

    /// Submit one draw.
    fn draw(&mut self, call: &DrawCall<'_>) -> FxResult<()>;
}
