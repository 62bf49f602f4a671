use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        LeafletError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        LeafletError::surface("x")
            .to_string()
            .contains("surface error:")
    );
    assert!(LeafletError::font("x").to_string().contains("font error:"));
    assert!(
        LeafletError::evaluation("x")
            .to_string()
            .contains("evaluation error:")
    );
    assert!(
        LeafletError::encode("x")
            .to_string()
            .contains("encode error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = LeafletError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
