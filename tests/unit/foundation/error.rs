use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        StudioError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        StudioError::selection("x")
            .to_string()
            .contains("selection error:")
    );
    assert!(StudioError::import("x").to_string().contains("import error:"));
    assert!(StudioError::render("x").to_string().contains("render error:"));
    assert!(StudioError::codegen("x").to_string().contains("codegen error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = StudioError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
