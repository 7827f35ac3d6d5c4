use crate::{
    foundation::core::Surface,
    foundation::error::FxResult,
    pass::uniforms::UniformStore,
    render::context::FilterContext,
    render::host::{DrawCall, ProgramHandle, ProgramKind, RenderHost},
};

/// One compiled program bound to its uniform store.
///
/// Built once when a filter is constructed and reused every frame; only uniform values change.
#[derive(Clone, Debug)]
pub struct SinglePass {
    kind: ProgramKind,
    program: ProgramHandle,
    uniforms: UniformStore,
}

impl SinglePass {
    /// Compile `kind` on `host` and bind `uniforms` to it.
    pub fn new(
        host: &mut dyn RenderHost,
        kind: ProgramKind,
        uniforms: UniformStore,
    ) -> FxResult<Self> {
        let program = host.compile_program(kind)?;
        tracing::debug!(program = kind.label(), ?program, "compiled pass");
        Ok(Self {
            kind,
            program,
            uniforms,
        })
    }

    /// Program this pass runs.
    pub fn kind(&self) -> ProgramKind {
        self.kind
    }

    /// Host handle of the compiled program.
    pub fn program(&self) -> ProgramHandle {
        self.program
    }

    /// Current uniform values.
    pub fn uniforms(&self) -> &UniformStore {
        &self.uniforms
    }

    /// Mutable uniform values.
    pub fn uniforms_mut(&mut self) -> &mut UniformStore {
        &mut self.uniforms
    }

    /// Draw `input` into `output`, clearing `output` first when `clear` is set.
    pub fn apply(
        &self,
        ctx: &mut FilterContext<'_>,
        input: Surface,
        output: Surface,
        clear: bool,
    ) -> FxResult<()> {
        ctx.draw(&DrawCall {
            program: self.program,
            uniforms: &self.uniforms,
            input,
            output,
            clear,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pass/single.rs"]
mod tests;
