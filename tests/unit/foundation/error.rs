use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ChalkboardError::malformed("x")
            .to_string()
            .contains("malformed response:")
    );
    assert!(
        ChalkboardError::generation("x")
            .to_string()
            .contains("generation failure:")
    );
    assert!(
        ChalkboardError::empty_input("x")
            .to_string()
            .contains("empty input:")
    );
    assert!(
        ChalkboardError::render("x")
            .to_string()
            .contains("render callback failure:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ChalkboardError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn only_generation_boundary_errors_are_recoverable() {
    assert!(ChalkboardError::malformed("x").is_recoverable_generation());
    assert!(ChalkboardError::generation("x").is_recoverable_generation());
    assert!(!ChalkboardError::empty_input("x").is_recoverable_generation());
    assert!(!ChalkboardError::render("x").is_recoverable_generation());
}
