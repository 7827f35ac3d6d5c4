use super::*;
use crate::foundation::error::FxError;
use crate::pass::{single::SinglePass, uniforms::UniformStore};
use crate::render::host::ProgramKind;
use crate::render::recording::RecordingHost;
use crate::render::surface_pool::SurfacePool;

#[test]
fn single_stage_goes_straight_to_output() {
    let mut host = RecordingHost::new();
    let pass = SinglePass::new(&mut host, ProgramKind::Copy, UniformStore::empty()).unwrap();
    let (input, output) = (host.surface(4, 4), host.surface(4, 4));
    let mut pool = SurfacePool::default();
    let mut ctx = FilterContext::new(&mut host, &mut pool);

    run_chain(&mut ctx, 1, input, output, false, |ctx, _, from, to, clear| {
        pass.apply(ctx, from, to, clear)
    })
    .unwrap();
    assert_eq!(ctx.pool().stats().acquired_total, 0);

    let draws = host.draws();
    assert_eq!(draws.len(), 1);
    assert_eq!((draws[0].input, draws[0].output, draws[0].clear), (input, output, false));
}

#[test]
fn zero_stages_behaves_like_one() {
    let mut host = RecordingHost::new();
    let pass = SinglePass::new(&mut host, ProgramKind::Copy, UniformStore::empty()).unwrap();
    let (input, output) = (host.surface(4, 4), host.surface(4, 4));
    let mut pool = SurfacePool::default();
    let mut ctx = FilterContext::new(&mut host, &mut pool);

    run_chain(&mut ctx, 0, input, output, true, |ctx, _, from, to, clear| {
        pass.apply(ctx, from, to, clear)
    })
    .unwrap();
    assert_eq!(host.draws().len(), 1);
}

#[test]
fn stages_ping_pong_through_scratch() {
    let mut host = RecordingHost::new();
    let pass = SinglePass::new(&mut host, ProgramKind::Copy, UniformStore::empty()).unwrap();
    let (input, output) = (host.surface(6, 3), host.surface(6, 3));
    let mut pool = SurfacePool::default();
    let mut ctx = FilterContext::new(&mut host, &mut pool);

    let mut seen = Vec::new();
    run_chain(&mut ctx, 4, input, output, false, |ctx, i, from, to, clear| {
        seen.push(i);
        pass.apply(ctx, from, to, clear)
    })
    .unwrap();
    assert_eq!(seen, vec![0, 1, 2, 3]);
    assert_eq!(ctx.pool().outstanding(), 0);
    // Two surfaces suffice for any chain length.
    assert_eq!(ctx.pool().stats().alloc_surfaces, 2);

    let draws = host.draws();
    assert_eq!(draws.len(), 4);
    assert_eq!(draws[0].input, input);
    assert_eq!(draws[3].output, output);
    for w in draws.windows(2) {
        assert_eq!(w[0].output, w[1].input);
    }
    for d in &draws[..3] {
        assert!(d.clear);
        assert!(d.output.same_shape(&input));
    }
    assert!(!draws[3].clear);
}

#[test]
fn stage_error_releases_scratch() {
    let mut host = RecordingHost::new().fail_draw_at(1);
    let pass = SinglePass::new(&mut host, ProgramKind::Copy, UniformStore::empty()).unwrap();
    let (input, output) = (host.surface(4, 4), host.surface(4, 4));
    let mut pool = SurfacePool::default();
    let mut ctx = FilterContext::new(&mut host, &mut pool);

    let err = run_chain(&mut ctx, 3, input, output, true, |ctx, _, from, to, clear| {
        pass.apply(ctx, from, to, clear)
    })
    .unwrap_err();
    assert!(matches!(err, FxError::Host(_)));
    assert_eq!(ctx.pool().outstanding(), 0);
    // The failing stage stops the chain.
    assert_eq!(host.draws().len(), 1);
}

#[test]
fn allocation_failure_mid_chain_releases_scratch() {
    let mut host = RecordingHost::new();
    let pass = SinglePass::new(&mut host, ProgramKind::Copy, UniformStore::empty()).unwrap();
    let (input, output) = (host.surface(4, 4), host.surface(4, 4));
    let mut host = host.fail_allocations_after(1);
    let mut pool = SurfacePool::default();
    let mut ctx = FilterContext::new(&mut host, &mut pool);

    let err = run_chain(&mut ctx, 3, input, output, true, |ctx, _, from, to, clear| {
        pass.apply(ctx, from, to, clear)
    })
    .unwrap_err();
    assert!(matches!(err, FxError::Allocation(_)));
    assert_eq!(ctx.pool().outstanding(), 0);
    assert_eq!(host.draws().len(), 1);
}
