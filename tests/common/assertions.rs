//! Custom assertion utilities for tests.

use sui_ptb::{Error, ErrorKind};

/// Assert that a result is Ok and return the inner value.
#[allow(dead_code)]
pub fn assert_ok<T, E: std::fmt::Debug>(result: Result<T, E>, context: &str) -> T {
    match result {
        Ok(v) => v,
        Err(e) => panic!("{} failed: {:?}", context, e),
    }
}

/// Assert that a result is Err and return the error.
#[allow(dead_code)]
pub fn assert_err<T: std::fmt::Debug, E>(result: Result<T, E>, context: &str) -> E {
    match result {
        Ok(v) => panic!("{} should have failed but got: {:?}", context, v),
        Err(e) => e,
    }
}

/// Assert that an error has the expected kind.
#[allow(dead_code)]
pub fn assert_error_kind<T: std::fmt::Debug>(
    result: Result<T, Error>,
    expected: ErrorKind,
    context: &str,
) -> Error {
    let err = assert_err(result, context);
    assert_eq!(
        err.kind(),
        expected,
        "{}: expected {:?} error, got: {}",
        context,
        expected,
        err
    );
    err
}

/// Assert that an error message contains expected text.
#[allow(dead_code)]
pub fn assert_error_contains<E: std::fmt::Display>(error: &E, expected_text: &str, context: &str) {
    let msg = error.to_string();
    assert!(
        msg.contains(expected_text),
        "{}: expected error to contain '{}', got: {}",
        context,
        expected_text,
        msg
    );
}
