use std::collections::HashSet;

use crate::{
    foundation::core::{Surface, SurfaceDesc, SurfaceId},
    foundation::error::{FxError, FxResult},
    pass::uniforms::UniformStore,
    render::host::{DrawCall, ProgramHandle, ProgramKind, RenderHost},
};

/// One draw captured by [`RecordingHost`].
#[derive(Clone, Debug, PartialEq)]
pub struct DrawRecord {
    /// Program the draw ran.
    pub kind: ProgramKind,
    /// Primary input surface.
    pub input: Surface,
    /// Output surface.
    pub output: Surface,
    /// Clear flag passed with the draw.
    pub clear: bool,
    /// Uniform values at submission time.
    pub uniforms: UniformStore,
}

/// Host that executes nothing and records every call.
///
/// Useful for asserting pass order, uniform values and surface lifetimes without pixels.
/// Failures can be injected to exercise error paths.
#[derive(Debug, Default)]
pub struct RecordingHost {
    programs: Vec<ProgramKind>,
    next_surface: u32,
    live: HashSet<SurfaceId>,
    created: usize,
    destroyed: usize,
    draws: Vec<DrawRecord>,

    fail_compile: Option<ProgramKind>,
    fail_alloc_after: Option<usize>,
    fail_draw_at: Option<usize>,
    draw_attempts: usize,
}

impl RecordingHost {
    /// Host with no injected failures.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make compilation of `kind` fail.
    pub fn fail_compile(mut self, kind: ProgramKind) -> Self {
        self.fail_compile = Some(kind);
        self
    }

    /// Let `n` more surface allocations succeed, then fail every following one.
    pub fn fail_allocations_after(mut self, n: usize) -> Self {
        self.fail_alloc_after = Some(self.created + n);
        self
    }

    /// Fail the draw with 0-based submission index `index`.
    pub fn fail_draw_at(mut self, index: usize) -> Self {
        self.fail_draw_at = Some(index);
        self
    }

    /// Allocate a caller-owned surface (input/output of a filter).
    pub fn surface(&mut self, width: u32, height: u32) -> Surface {
        self.alloc(SurfaceDesc::rgba8(width, height))
    }

    /// Draws recorded so far, in submission order.
    pub fn draws(&self) -> &[DrawRecord] {
        &self.draws
    }

    /// Take and clear the recorded draws.
    pub fn take_draws(&mut self) -> Vec<DrawRecord> {
        std::mem::take(&mut self.draws)
    }

    /// Surfaces created and not yet destroyed.
    pub fn live_surfaces(&self) -> usize {
        self.live.len()
    }

    /// Surfaces created over the host's lifetime.
    pub fn surfaces_created(&self) -> usize {
        self.created
    }

    /// Surfaces destroyed over the host's lifetime.
    pub fn surfaces_destroyed(&self) -> usize {
        self.destroyed
    }

    fn alloc(&mut self, desc: SurfaceDesc) -> Surface {
        self.next_surface += 1;
        self.created += 1;
        let id = SurfaceId(self.next_surface);
        self.live.insert(id);
        Surface::new(id, desc)
    }
}

impl RenderHost for RecordingHost {
    fn compile_program(&mut self, kind: ProgramKind) -> FxResult<ProgramHandle> {
        if self.fail_compile == Some(kind) {
            return Err(FxError::construction(format!(
                "failed to link program '{}'",
                kind.label()
            )));
        }
        let handle = ProgramHandle(self.programs.len() as u32);
        self.programs.push(kind);
        Ok(handle)
    }

    fn create_surface(&mut self, desc: &SurfaceDesc) -> FxResult<Surface> {
        if self.fail_alloc_after.is_some_and(|limit| self.created >= limit) {
            return Err(FxError::allocation(format!(
                "cannot allocate {}x{} surface",
                desc.width, desc.height
            )));
        }
        Ok(self.alloc(*desc))
    }

    fn destroy_surface(&mut self, surface: Surface) {
        if self.live.remove(&surface.id()) {
            self.destroyed += 1;
        }
    }

    fn draw(&mut self, call: &DrawCall<'_>) -> FxResult<()> {
        let attempt = self.draw_attempts;
        self.draw_attempts += 1;
        if self.fail_draw_at == Some(attempt) {
            return Err(FxError::host(format!("draw {attempt} rejected")));
        }

        let kind = self
            .programs
            .get(call.program.0 as usize)
            .copied()
            .ok_or_else(|| FxError::host(format!("unknown program {:?}", call.program)))?;
        for s in [call.input, call.output] {
            if !self.live.contains(&s.id()) {
                return Err(FxError::host(format!("surface {:?} is not live", s.id())));
            }
        }

        self.draws.push(DrawRecord {
            kind,
            input: call.input,
            output: call.output,
            clear: call.clear,
            uniforms: call.uniforms.clone(),
        });
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/recording.rs"]
mod tests;
