use crate::{
    compose::Filter,
    foundation::core::Surface,
    foundation::error::{FxError, FxResult},
    render::host::{DrawCall, RenderHost},
    render::surface_pool::SurfacePool,
};

/// Everything a filter needs during one `apply()`: the host and the scratch pool.
///
/// Scratch surfaces are borrowed and returned through this context so that every loan is
/// matched by exactly one release before `apply()` returns.
pub struct FilterContext<'a> {
    host: &'a mut dyn RenderHost,
    pool: &'a mut SurfacePool,
}

impl<'a> FilterContext<'a> {
    /// Bind a host and a pool for a batch of filter applications.
    pub fn new(host: &'a mut dyn RenderHost, pool: &'a mut SurfacePool) -> Self {
        Self { host, pool }
    }

    /// Direct access to the host.
    pub fn host(&mut self) -> &mut dyn RenderHost {
        &mut *self.host
    }

    /// Read-only access to the pool.
    pub fn pool(&self) -> &SurfacePool {
        &*self.pool
    }

    /// Submit one draw.
    pub fn draw(&mut self, call: &DrawCall<'_>) -> FxResult<()> {
        if call.input.id() == call.output.id() {
            return Err(FxError::host(format!(
                "draw input and output alias surface {:?}",
                call.input.id()
            )));
        }
        self.host.draw(call)
    }

    /// Borrow a scratch surface sized like `reference`.
    ///
    /// Prefer [`FilterContext::with_scratch`]; manual acquisition must be paired with
    /// [`FilterContext::release`] on every exit path.
    pub fn acquire_like(&mut self, reference: &Surface) -> FxResult<Surface> {
        self.pool.acquire_like(&mut *self.host, reference)
    }

    /// Return a scratch surface to the pool.
    ///
    /// Misuse (foreign surface, double release) panics in debug builds and is logged and ignored
    /// in release builds.
    pub fn release(&mut self, surface: Surface) {
        match self.pool.release(surface) {
            Ok(None) => {}
            Ok(Some(evicted)) => self.host.destroy_surface(evicted),
            Err(err) => {
                if cfg!(debug_assertions) {
                    panic!("{err}");
                }
                tracing::warn!(%err, "ignoring surface pool misuse");
            }
        }
    }

    /// Borrow a scratch surface for the duration of `f`, returning it on every exit path.
    pub fn with_scratch<R>(
        &mut self,
        reference: &Surface,
        f: impl FnOnce(&mut Self, Surface) -> FxResult<R>,
    ) -> FxResult<R> {
        let scratch = self.acquire_like(reference)?;
        let out = f(self, scratch);
        self.release(scratch);
        out
    }

    /// Top-level entry point: apply `filter` from `input` into `output`.
    ///
    /// In debug builds this asserts that the filter returned every scratch surface it borrowed.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(filter = filter.name(), width = input.width(), height = input.height(), clear = clear)
    )]
    pub fn apply_filter(
        &mut self,
        filter: &mut dyn Filter,
        input: Surface,
        output: Surface,
        clear: bool,
    ) -> FxResult<()> {
        let before = self.pool.outstanding();
        let out = filter.apply(self, input, output, clear);
        debug_assert_eq!(
            self.pool.outstanding(),
            before,
            "filter `{}` leaked scratch surfaces",
            filter.name()
        );
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/context.rs"]
mod tests;
