use super::*;

#[test]
fn desc_byte_len_is_rgba8() {
    assert_eq!(SurfaceDesc::rgba8(8, 4).byte_len(), 8 * 4 * 4);
    assert_eq!(SurfaceDesc::rgba8(0, 4).byte_len(), 0);
}

#[test]
fn byte_len_saturates_instead_of_overflowing() {
    let d = SurfaceDesc::rgba8(u32::MAX, u32::MAX);
    assert!(d.byte_len() > 0);
}

#[test]
fn surface_shape_ignores_id() {
    let a = Surface::new(SurfaceId(1), SurfaceDesc::rgba8(16, 9));
    let b = Surface::new(SurfaceId(2), SurfaceDesc::rgba8(16, 9));
    let c = Surface::new(SurfaceId(3), SurfaceDesc::rgba8(9, 16));
    assert!(a.same_shape(&b));
    assert!(!a.same_shape(&c));
    assert_eq!((a.width(), a.height()), (16, 9));
}
