//! Shared helpers for the end-to-end test suite.

/// Runs the full pipeline and unwraps the result; panics with the rendered
/// diagnostic on failure, so a failing `#[test]` shows the actual message.
pub(crate) fn compile_ok(source: &str) -> (Vec<u8>, String) {
    walang::compile(source, "test.wl").unwrap_or_else(|e| panic!("expected success, got: {e}"))
}

/// Runs the full pipeline and returns the rendered error message,
/// panicking if compilation unexpectedly succeeds.
pub(crate) fn compile_err(source: &str) -> String {
    match walang::compile(source, "test.wl") {
        Ok(_) => panic!("expected compilation to fail for: {source}"),
        Err(e) => e.to_string(),
    }
}
