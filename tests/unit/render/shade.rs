use super::*;
use crate::pass::uniforms::UniformLayout;

fn solid(w: u32, h: u32, px: [u8; 4]) -> Vec<u8> {
    px.repeat((w * h) as usize)
}

fn run(shader: &Shader, src: &[u8], w: u32, h: u32) -> Vec<u8> {
    let tex = Texture::new(src, w, h);
    let mut out = vec![0u8; src.len()];
    shade_into(shader, &tex, None, &mut out, w, h);
    out
}

#[test]
fn bilinear_sample_hits_texel_centers_and_midpoints() {
    let data = [0u8, 0, 0, 0, 255, 255, 255, 255];
    let tex = Texture::new(&data, 2, 1);
    assert_eq!(tex.sample(0.5, 0.5, AddressMode::ClampToEdge), [0.0; 4]);
    assert_eq!(tex.sample(1.5, 0.5, AddressMode::ClampToEdge), [1.0; 4]);
    let mid = tex.sample(1.0, 0.5, AddressMode::ClampToEdge);
    assert!((mid[3] - 0.5).abs() < 1e-6);
}

#[test]
fn address_modes_differ_outside_the_texture() {
    let data = solid(2, 2, [255, 255, 255, 255]);
    let tex = Texture::new(&data, 2, 2);
    assert_eq!(tex.sample(-10.0, 0.5, AddressMode::ClampToEdge), [1.0; 4]);
    assert_eq!(tex.sample(-10.0, 0.5, AddressMode::Transparent), [0.0; 4]);
}

#[test]
fn far_out_of_range_samples_read_the_border() {
    let data = solid(2, 2, [255, 255, 255, 255]);
    let tex = Texture::new(&data, 2, 2);
    for v in [1e20f32, -1e20, f32::MAX, f32::MIN] {
        assert_eq!(tex.sample(v, 0.5, AddressMode::Transparent), [0.0; 4]);
        assert_eq!(tex.sample(0.5, v, AddressMode::Transparent), [0.0; 4]);
        assert_eq!(tex.sample(v, v, AddressMode::ClampToEdge), [1.0; 4]);
    }
}

#[test]
fn huge_offsets_shade_without_overflow() {
    let src = solid(4, 4, [255, 255, 255, 255]);
    let shadow = Shader::DropShadow {
        offset: [-1e20, 0.0],
        color: [0.0, 0.0, 0.0],
        alpha: 1.0,
    };
    assert_eq!(run(&shadow, &src, 4, 4), vec![0u8; src.len()]);

    let kawase = Shader::Kawase {
        offset: [1e20, 1e20],
        mode: AddressMode::ClampToEdge,
    };
    assert_eq!(run(&kawase, &src, 4, 4), src);
}

#[test]
fn copy_is_identity_at_equal_size() {
    let src: Vec<u8> = (0..4 * 4 * 4).map(|v| (v * 3) as u8).collect();
    assert_eq!(run(&Shader::Copy, &src, 4, 4), src);
}

#[test]
fn kawase_with_zero_offset_matches_copy() {
    let src: Vec<u8> = (0..3 * 3 * 4).map(|v| (v * 7) as u8).collect();
    let shader = Shader::Kawase {
        offset: [0.0, 0.0],
        mode: AddressMode::Transparent,
    };
    assert_eq!(run(&shader, &src, 3, 3), src);
}

#[test]
fn kawase_spreads_a_single_texel() {
    let mut src = solid(5, 5, [0, 0, 0, 0]);
    let center = (2 * 5 + 2) * 4;
    src[center..center + 4].copy_from_slice(&[255, 255, 255, 255]);
    let shader = Shader::Kawase {
        offset: [1.0, 1.0],
        mode: AddressMode::Transparent,
    };
    let out = run(&shader, &src, 5, 5);
    assert_eq!(out[center + 3], 0);
    let corner = (5 + 1) * 4;
    assert_eq!(out[corner + 3], 64);
}

#[test]
fn brightness_extract_keeps_only_bright_pixels() {
    let src = [255u8, 255, 255, 255, 20, 20, 20, 255];
    let out = run(&Shader::Extract { threshold: 0.5 }, &src, 2, 1);
    assert_eq!(&out[0..4], &[255, 255, 255, 255]);
    assert_eq!(&out[4..8], &[0, 0, 0, 0]);
}

#[test]
fn drop_shadow_moves_alpha_by_offset_and_tints() {
    let mut src = solid(4, 1, [0, 0, 0, 0]);
    src[0..4].copy_from_slice(&[255, 255, 255, 255]);
    let shader = Shader::DropShadow {
        offset: [2.0, 0.0],
        color: [1.0, 0.0, 0.0],
        alpha: 1.0,
    };
    let out = run(&shader, &src, 4, 1);
    assert_eq!(&out[8..12], &[255, 0, 0, 255]);
    assert_eq!(&out[0..4], &[0, 0, 0, 0]);
}

#[test]
fn tilt_shift_without_blur_is_identity() {
    let src: Vec<u8> = (0..4 * 4 * 4).map(|v| (v * 5) as u8).collect();
    let shader = Shader::TiltShift {
        blur: 0.0,
        gradient_blur: 10.0,
        start: [0.0, 2.0],
        end: [4.0, 2.0],
        delta: [1.0, 0.0],
    };
    assert_eq!(run(&shader, &src, 4, 4), src);
}

#[test]
fn outline_knockout_leaves_only_the_ring() {
    let mut src = solid(5, 5, [0, 0, 0, 0]);
    let center = (2 * 5 + 2) * 4;
    src[center..center + 4].copy_from_slice(&[255, 255, 255, 255]);
    let shader = Shader::Outline {
        thickness: [1.0, 1.0],
        color: [0.0, 0.0, 1.0],
        alpha: 1.0,
        angle_step: std::f32::consts::TAU / 16.0,
        knockout: true,
    };
    let out = run(&shader, &src, 5, 5);
    assert_eq!(out[center + 3], 0);
    let right = (2 * 5 + 3) * 4;
    assert_eq!(&out[right..right + 4], &[0, 0, 255, 255]);
}

#[test]
fn resolve_reports_missing_uniforms() {
    let err = Shader::resolve(ProgramKind::KawaseBlur, &UniformStore::empty()).unwrap_err();
    assert!(err.to_string().contains("uOffset"));
}

#[test]
fn resolve_picks_address_mode_from_program() {
    let mut layout = UniformLayout::new();
    layout.declare("uOffset", [1.5f32, 1.5]);
    let store = layout.finish();
    assert_eq!(
        Shader::resolve(ProgramKind::KawaseBlurClamp, &store).unwrap(),
        Shader::Kawase {
            offset: [1.5, 1.5],
            mode: AddressMode::ClampToEdge
        }
    );
}

#[test]
fn bloom_combine_requires_a_bound_map() {
    let mut layout = UniformLayout::new();
    layout.declare("uBloomScale", 1.0f32);
    layout.declare("uBrightness", 1.0f32);
    let map = layout.declare::<Option<SurfaceId>>("uMapTexture", None);
    let mut store = layout.finish();
    assert!(matches!(
        Shader::resolve(ProgramKind::BloomCombine, &store),
        Err(FxError::Host(_))
    ));

    store.set(map, Some(SurfaceId(9)));
    let shader = Shader::resolve(ProgramKind::BloomCombine, &store).unwrap();
    assert_eq!(shader.map_texture(), Some(SurfaceId(9)));
}

#[test]
fn bloom_combine_screens_map_over_base() {
    let base = [128u8, 0, 0, 255];
    let bloom = [128u8, 0, 0, 255];
    let shader = Shader::BloomCombine {
        map: SurfaceId(0),
        bloom_scale: 1.0,
        brightness: 1.0,
    };
    let src = Texture::new(&base, 1, 1);
    let map = Texture::new(&bloom, 1, 1);
    let mut out = [0u8; 4];
    shade_into(&shader, &src, Some(&map), &mut out, 1, 1);
    // a + b - ab with a = b = 128/255
    assert_eq!(out, [192, 0, 0, 255]);
}
