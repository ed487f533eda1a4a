use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        GarbleError::font_asset("x")
            .to_string()
            .contains("font asset error:")
    );
    assert!(
        GarbleError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        GarbleError::evaluation("x")
            .to_string()
            .contains("evaluation error:")
    );
    assert!(GarbleError::encode("x").to_string().contains("encode error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = GarbleError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn font_asset_is_classified() {
    assert!(GarbleError::font_asset("none").is_font_asset());
    assert!(!GarbleError::validation("bad").is_font_asset());
}
