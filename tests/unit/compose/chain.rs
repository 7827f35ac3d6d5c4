use super::*;
use crate::foundation::error::FxError;
use crate::render::recording::RecordingHost;
use crate::render::surface_pool::SurfacePool;

struct Probe {
    pass: SinglePass,
    padding: f32,
}

impl Probe {
    fn new(host: &mut dyn RenderHost, padding: f32) -> Self {
        Self {
            pass: SinglePass::new(host, ProgramKind::Copy, UniformStore::empty()).unwrap(),
            padding,
        }
    }
}

impl Filter for Probe {
    fn name(&self) -> &'static str {
        "probe"
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
        self.pass.apply(ctx, input, output, clear)
    }
}

#[test]
fn empty_chain_copies_input() {
    let mut host = RecordingHost::new();
    let mut chain = FilterChain::new(&mut host).unwrap();
    assert!(chain.is_empty());
    assert_eq!(chain.padding(), 0.0);

    let (input, output) = (host.surface(3, 3), host.surface(3, 3));
    let mut pool = SurfacePool::default();
    let mut ctx = FilterContext::new(&mut host, &mut pool);
    ctx.apply_filter(&mut chain, input, output, true).unwrap();

    let draws = host.draws();
    assert_eq!(draws.len(), 1);
    assert_eq!(draws[0].kind, ProgramKind::Copy);
    assert_eq!((draws[0].input, draws[0].output), (input, output));
}

#[test]
fn padding_is_sum_of_members() {
    let mut host = RecordingHost::new();
    let a = Probe::new(&mut host, 2.0);
    let b = Probe::new(&mut host, 3.5);
    let chain = FilterChain::new(&mut host).unwrap().with(a).with(b);
    assert_eq!(chain.len(), 2);
    assert_eq!(chain.padding(), 5.5);
    assert_eq!(chain.names(), vec!["probe", "probe"]);
}

#[test]
fn members_run_in_order_through_scratch() {
    let mut host = RecordingHost::new();
    let mut chain = FilterChain::new(&mut host).unwrap();
    for _ in 0..3 {
        let p = Probe::new(&mut host, 1.0);
        chain.push(Box::new(p));
    }
    let (input, output) = (host.surface(5, 5), host.surface(5, 5));
    let mut pool = SurfacePool::default();
    let mut ctx = FilterContext::new(&mut host, &mut pool);
    ctx.apply_filter(&mut chain, input, output, false).unwrap();
    assert_eq!(ctx.pool().outstanding(), 0);

    let draws = host.draws();
    assert_eq!(draws.len(), 3);
    assert_eq!(draws[0].input, input);
    assert_eq!(draws[1].input, draws[0].output);
    assert_eq!(draws[2].input, draws[1].output);
    assert_eq!(draws[2].output, output);
    assert!(!draws[2].clear);
}

#[test]
fn nested_chains_return_all_scratch() {
    let mut host = RecordingHost::new();
    let inner = FilterChain::new(&mut host)
        .unwrap()
        .with(Probe::new(&mut host, 1.0))
        .with(Probe::new(&mut host, 1.0));
    let mut outer = FilterChain::new(&mut host)
        .unwrap()
        .with(Probe::new(&mut host, 1.0))
        .with(inner);
    assert_eq!(outer.padding(), 3.0);

    let (input, output) = (host.surface(4, 4), host.surface(4, 4));
    let mut pool = SurfacePool::default();
    let mut ctx = FilterContext::new(&mut host, &mut pool);
    ctx.apply_filter(&mut outer, input, output, true).unwrap();
    assert_eq!(ctx.pool().outstanding(), 0);
    assert_eq!(host.draws().len(), 3);
}

#[test]
fn member_failure_releases_scratch() {
    let mut host = RecordingHost::new().fail_draw_at(1);
    let mut chain = FilterChain::new(&mut host)
        .unwrap()
        .with(Probe::new(&mut host, 0.0))
        .with(Probe::new(&mut host, 0.0))
        .with(Probe::new(&mut host, 0.0));
    let (input, output) = (host.surface(4, 4), host.surface(4, 4));
    let mut pool = SurfacePool::default();
    let mut ctx = FilterContext::new(&mut host, &mut pool);
    let err = ctx
        .apply_filter(&mut chain, input, output, true)
        .unwrap_err();
    assert!(matches!(err, FxError::Host(_)));
    assert_eq!(ctx.pool().outstanding(), 0);
}
