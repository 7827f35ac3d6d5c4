use super::*;
use crate::render::recording::RecordingHost;
use crate::render::surface_pool::SurfacePool;
use std::f32::consts::TAU;

#[test]
fn defaults_map_to_uniforms() {
    let mut host = RecordingHost::new();
    let f = OutlineFilter::new(&mut host, OutlineOptions::default()).unwrap();
    assert_eq!(f.padding(), 1.0);
    let u = f.pass.uniforms();
    assert_eq!(u.typed::<[f32; 2]>("uThickness"), Some([1.0, 1.0]));
    assert_eq!(u.typed::<[f32; 3]>("uColor"), Some([0.0, 0.0, 0.0]));
    assert_eq!(u.typed::<f32>("uAngleStep"), Some(TAU / 10.0));
    assert_eq!(u.typed::<f32>("uKnockout"), Some(0.0));
}

#[test]
fn thickness_drives_padding() {
    let mut host = RecordingHost::new();
    let mut f = OutlineFilter::new(&mut host, OutlineOptions::default()).unwrap();
    f.set_thickness(6.0);
    assert_eq!(f.padding(), 6.0);
    f.set_thickness(f32::NAN);
    assert_eq!(f.padding(), 0.0);
}

#[test]
fn zero_quality_still_samples_once_per_turn() {
    let mut host = RecordingHost::new();
    let mut f = OutlineFilter::new(&mut host, OutlineOptions::default()).unwrap();
    f.set_quality(0.0);
    assert_eq!(f.pass.uniforms().get(f.angle_step_slot), TAU);
    f.set_quality(5.0);
    assert_eq!(f.quality(), 1.0);
}

#[test]
fn applies_as_one_draw() {
    let mut host = RecordingHost::new();
    let mut f = OutlineFilter::new(
        &mut host,
        OutlineOptions {
            knockout: true,
            ..Default::default()
        },
    )
    .unwrap();
    assert!(f.knockout());
    let (input, output) = (host.surface(4, 4), host.surface(4, 4));
    let mut pool = SurfacePool::default();
    let mut ctx = FilterContext::new(&mut host, &mut pool);
    ctx.apply_filter(&mut f, input, output, true).unwrap();
    assert_eq!(pool.stats().acquired_total, 0);
    let draws = host.draws();
    assert_eq!(draws.len(), 1);
    assert_eq!(draws[0].kind, ProgramKind::Outline);
    assert_eq!(draws[0].uniforms.typed::<f32>("uKnockout"), Some(1.0));
}
