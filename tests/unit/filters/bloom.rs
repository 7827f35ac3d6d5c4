use super::*;
use crate::foundation::error::FxError;
use crate::render::recording::RecordingHost;
use crate::render::surface_pool::SurfacePool;

#[test]
fn defaults_and_padding() {
    let mut host = RecordingHost::new();
    let f = BloomFilter::new(&mut host, BloomOptions::default()).unwrap();
    assert_eq!(f.threshold(), 0.5);
    assert_eq!(f.bloom_scale(), 1.0);
    assert_eq!(f.brightness(), 1.0);
    assert_eq!((f.blur(), f.quality()), (8.0, 4));
    assert_eq!(f.padding(), padding::kernel_padding(f.kernel()));
}

#[test]
fn borrows_exactly_two_scratch_surfaces() {
    let mut host = RecordingHost::new();
    let mut f = BloomFilter::new(
        &mut host,
        BloomOptions {
            quality: 1,
            ..Default::default()
        },
    )
    .unwrap();
    let (input, output) = (host.surface(16, 9), host.surface(16, 9));
    let mut pool = SurfacePool::default();
    let mut ctx = FilterContext::new(&mut host, &mut pool);
    ctx.apply_filter(&mut f, input, output, true).unwrap();
    assert_eq!(pool.stats().acquired_total, 2);
    assert_eq!(pool.outstanding(), 0);

    let draws = host.draws();
    let kinds: Vec<_> = draws.iter().map(|d| d.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ProgramKind::BrightnessExtract,
            ProgramKind::KawaseBlur,
            ProgramKind::BloomCombine
        ]
    );
    let (bright, bloom) = (draws[0].output, draws[1].output);
    assert_ne!(bright.id(), bloom.id());
    assert_eq!(draws[1].input, bright);
    assert_eq!((draws[2].input, draws[2].output), (input, output));
    assert_eq!(
        draws[2].uniforms.typed::<Option<SurfaceId>>("uMapTexture"),
        Some(Some(bloom.id()))
    );
    assert!(draws[2].clear);
}

#[test]
fn map_binding_is_cleared_after_apply() {
    let mut host = RecordingHost::new();
    let mut f = BloomFilter::new(&mut host, BloomOptions::default()).unwrap();
    let (input, output) = (host.surface(4, 4), host.surface(4, 4));
    let mut pool = SurfacePool::default();
    let mut ctx = FilterContext::new(&mut host, &mut pool);
    ctx.apply_filter(&mut f, input, output, false).unwrap();
    assert_eq!(f.combine.uniforms().get(f.map), None);
    assert_eq!(host.draws().len(), 1 + 4 + 1);
}

#[test]
fn failing_combine_returns_all_scratch() {
    let mut host = RecordingHost::new().fail_draw_at(2);
    let mut f = BloomFilter::new(
        &mut host,
        BloomOptions {
            quality: 1,
            ..Default::default()
        },
    )
    .unwrap();
    let (input, output) = (host.surface(4, 4), host.surface(4, 4));
    let mut pool = SurfacePool::default();
    let mut ctx = FilterContext::new(&mut host, &mut pool);
    let err = ctx.apply_filter(&mut f, input, output, true).unwrap_err();
    assert!(matches!(err, FxError::Host(_)));
    assert_eq!(pool.outstanding(), 0);
    assert_eq!(f.combine.uniforms().get(f.map), None);
}

#[test]
fn setters_sanitize_and_refresh_padding() {
    let mut host = RecordingHost::new();
    let mut f = BloomFilter::new(&mut host, BloomOptions::default()).unwrap();
    f.set_threshold(3.0);
    assert_eq!(f.threshold(), 1.0);
    f.set_threshold(f32::NAN);
    assert_eq!(f.threshold(), 0.5);
    f.set_bloom_scale(-1.0);
    assert_eq!(f.bloom_scale(), 1.0);
    f.set_brightness(2.0);
    assert_eq!(f.brightness(), 2.0);

    let before = f.padding();
    f.set_blur(16.0);
    assert!(f.padding() > before);
    f.set_kernel(&[3.0, 1.0]);
    assert_eq!(f.quality(), 2);
    assert_eq!(f.padding(), 5.0);
}
