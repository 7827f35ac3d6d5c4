use super::*;
use crate::pass::uniforms::UniformStore;
use crate::render::host::{ProgramKind, RenderHost};
use crate::render::recording::RecordingHost;

#[test]
fn with_scratch_releases_on_success_and_error() {
    let mut host = RecordingHost::new();
    let input = host.surface(8, 8);
    let mut pool = SurfacePool::default();
    let mut ctx = FilterContext::new(&mut host, &mut pool);

    let seen = ctx
        .with_scratch(&input, |ctx, s| {
            assert_eq!(ctx.pool().outstanding(), 1);
            Ok(s)
        })
        .unwrap();
    assert!(seen.same_shape(&input));
    assert_eq!(ctx.pool().outstanding(), 0);

    let err = ctx
        .with_scratch(&input, |_, _| -> FxResult<()> {
            Err(FxError::host("device lost"))
        })
        .unwrap_err();
    assert!(matches!(err, FxError::Host(_)));
    assert_eq!(ctx.pool().outstanding(), 0);
}

#[test]
fn nested_scratch_surfaces_are_distinct() {
    let mut host = RecordingHost::new();
    let input = host.surface(4, 4);
    let mut pool = SurfacePool::default();
    let mut ctx = FilterContext::new(&mut host, &mut pool);

    ctx.with_scratch(&input, |ctx, a| {
        ctx.with_scratch(&input, |ctx, b| {
            assert_ne!(a.id(), b.id());
            assert_eq!(ctx.pool().outstanding(), 2);
            Ok(())
        })
    })
    .unwrap();
    assert_eq!(ctx.pool().outstanding(), 0);
    assert_eq!(pool.stats().retained_surfaces, 2);
}

#[test]
fn draw_rejects_aliased_surfaces() {
    let mut host = RecordingHost::new();
    let program = host.compile_program(ProgramKind::Copy).unwrap();
    let s = host.surface(4, 4);
    let mut pool = SurfacePool::default();
    let mut ctx = FilterContext::new(&mut host, &mut pool);
    let uniforms = UniformStore::empty();

    let err = ctx
        .draw(&DrawCall {
            program,
            uniforms: &uniforms,
            input: s,
            output: s,
            clear: true,
        })
        .unwrap_err();
    assert!(matches!(err, FxError::Host(_)));
    assert!(host.draws().is_empty());
}

#[test]
fn evicted_scratch_is_destroyed_through_host() {
    let mut host = RecordingHost::new();
    let input = host.surface(4, 4);
    let mut pool = SurfacePool::new(crate::render::surface_pool::SurfacePoolOpts {
        max_pool_bytes: 0,
        max_surfaces_per_bucket: 0,
    });
    let mut ctx = FilterContext::new(&mut host, &mut pool);
    ctx.with_scratch(&input, |_, _| Ok(())).unwrap();

    assert_eq!(host.surfaces_destroyed(), 1);
    assert_eq!(host.live_surfaces(), 1);
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "released twice")]
fn double_release_panics_in_debug() {
    let mut host = RecordingHost::new();
    let input = host.surface(4, 4);
    let mut pool = SurfacePool::default();
    let mut ctx = FilterContext::new(&mut host, &mut pool);
    let s = ctx.acquire_like(&input).unwrap();
    ctx.release(s);
    ctx.release(s);
}
