use crate::{
    compose::{Filter, padding, run_chain},
    foundation::core::Surface,
    foundation::error::FxResult,
    pass::{single::SinglePass, uniforms::UniformStore},
    render::context::FilterContext,
    render::host::{ProgramKind, RenderHost},
};

/// Ordered list of filters applied one after another.
///
/// Each filter's output feeds the next through pooled scratch surfaces, so the chain's padding
/// is the sum of its members' current paddings. An empty chain copies input to output.
pub struct FilterChain {
    filters: Vec<Box<dyn Filter>>,
    passthrough: SinglePass,
}

impl std::fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterChain")
            .field("filters", &self.names())
            .field("padding", &self.padding())
            .finish()
    }
}

impl FilterChain {
    /// Empty chain.
    pub fn new(host: &mut dyn RenderHost) -> FxResult<Self> {
        Ok(Self {
            filters: Vec::new(),
            passthrough: SinglePass::new(host, ProgramKind::Copy, UniformStore::empty())?,
        })
    }

    /// Append a filter.
    pub fn push(&mut self, filter: Box<dyn Filter>) {
        self.filters.push(filter);
    }

    /// Builder-style [`FilterChain::push`].
    pub fn with(mut self, filter: impl Filter + 'static) -> Self {
        self.push(Box::new(filter));
        self
    }

    /// Number of filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Return `true` when the chain has no filters.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Member names in application order.
    pub fn names(&self) -> Vec<&'static str> {
        self.filters.iter().map(|f| f.name()).collect()
    }
}

impl Filter for FilterChain {
    fn name(&self) -> &'static str {
        "chain"
    }

    fn padding(&self) -> f32 {
        padding::sequential(self.filters.iter().map(|f| f.padding()))
    }

    fn apply(
        &mut self,
        ctx: &mut FilterContext<'_>,
        input: Surface,
        output: Surface,
        clear: bool,
    ) -> FxResult<()> {
        if self.filters.is_empty() {
            return self.passthrough.apply(ctx, input, output, clear);
        }
        let filters = &mut self.filters;
        run_chain(ctx, filters.len(), input, output, clear, |ctx, i, from, to, clear| {
            filters[i].apply(ctx, from, to, clear)
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/chain.rs"]
mod tests;
