pub(crate) mod chain;
pub(crate) mod kernel;
pub(crate) mod padding;

use crate::{
    foundation::core::Surface, foundation::error::FxResult, render::context::FilterContext,
};

/// An image-space effect that reads `input` and writes `output`.
///
/// Implementations borrow scratch surfaces from the context and must return all of them before
/// `apply` returns, on success and on error.
pub trait Filter {
    /// Short stable name used in logs.
    fn name(&self) -> &'static str;

    /// Edge margin in pixels the effect needs around its content.
    ///
    /// Always current: setters recompute it eagerly.
    fn padding(&self) -> f32;

    /// Run the effect. `clear` applies to the final write into `output`.
    fn apply(
        &mut self,
        ctx: &mut FilterContext<'_>,
        input: Surface,
        output: Surface,
        clear: bool,
    ) -> FxResult<()>;
}

/// Thread an image through `stages` sequential stages.
///
/// Stage `i` is called as `stage(ctx, i, from, to, clear)`. A single stage writes `input` to
/// `output` directly. Otherwise intermediate results ping-pong through scratch surfaces sized
/// like `input`, always cleared, and only the last stage sees the caller's `clear`. At most two
/// scratch surfaces are on loan at once and none is left on loan when this returns.
pub fn run_chain<'a, F>(
    ctx: &mut FilterContext<'a>,
    stages: usize,
    input: Surface,
    output: Surface,
    clear: bool,
    mut stage: F,
) -> FxResult<()>
where
    F: FnMut(&mut FilterContext<'a>, usize, Surface, Surface, bool) -> FxResult<()>,
{
    let last = stages.saturating_sub(1);
    if last == 0 {
        return stage(ctx, 0, input, output, clear);
    }

    let mut current = ctx.acquire_like(&input)?;
    let mut result = stage(ctx, 0, input, current, true);

    let mut i = 1;
    while result.is_ok() && i < last {
        match ctx.acquire_like(&input) {
            Ok(next) => {
                tracing::trace!(stage = i, "chain stage");
                result = stage(ctx, i, current, next, true);
                ctx.release(current);
                current = next;
            }
            Err(err) => result = Err(err),
        }
        i += 1;
    }

    if result.is_ok() {
        result = stage(ctx, last, current, output, clear);
    }
    ctx.release(current);
    result
}

#[cfg(test)]
#[path = "../../tests/unit/compose/chain_run.rs"]
mod tests;
