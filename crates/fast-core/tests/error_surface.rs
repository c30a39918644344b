use fast_core::errors::{ErrorInfo, FastError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("iterations", 10)
        .with_context("reason", "example")
}

#[test]
fn convergence_error_surface() {
    let err = FastError::Convergence(sample_info("not-converged", "iteration cap reached"));
    assert_eq!(err.info().code, "not-converged");
    assert_eq!(err.info().context.get("iterations"), Some(&"10".to_string()));
}

#[test]
fn validation_error_surface() {
    let err = FastError::validation("alpha-out-of-range", "alpha must lie in [0, 1]");
    assert_eq!(err.info().code, "alpha-out-of-range");
    assert!(err.info().context.is_empty());
}

#[test]
fn display_includes_context_and_hint() {
    let err = FastError::Shape(
        ErrorInfo::new("operand-length", "length mismatch")
            .with_context("cols", 3)
            .with_hint("restrict the prior to discovered states"),
    );
    let rendered = err.to_string();
    assert!(rendered.starts_with("shape error: length mismatch (code: operand-length)"));
    assert!(rendered.contains("cols=3"));
    assert!(rendered.contains("hint: restrict the prior"));
}

#[test]
fn errors_serialize_with_family_tag() {
    let err = FastError::Pathway(ErrorInfo::new("no-path", "start and end are disconnected"));
    let json = serde_json::to_value(&err).expect("serialize");
    assert_eq!(json["family"], "Pathway");
    assert_eq!(json["detail"]["code"], "no-path");
    let decoded: FastError = serde_json::from_value(json).expect("deserialize");
    assert_eq!(decoded, err);
}
