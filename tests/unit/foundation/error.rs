use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        FxError::construction("x")
            .to_string()
            .contains("construction error:")
    );
    assert!(
        FxError::allocation("x")
            .to_string()
            .contains("allocation error:")
    );
    assert!(FxError::host("x").to_string().contains("host error:"));
    assert!(
        FxError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        FxError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn pool_misuse_converts_and_keeps_surface_id() {
    let err: FxError = PoolMisuseError::DoubleRelease(SurfaceId(7)).into();
    assert!(matches!(
        err,
        FxError::PoolMisuse(PoolMisuseError::DoubleRelease(SurfaceId(7)))
    ));
    assert!(err.to_string().contains("released twice"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = FxError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
