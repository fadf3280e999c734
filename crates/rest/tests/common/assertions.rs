//! HTTP response assertions.

use axum_test::TestResponse;
use serde_json::Value;

/// Asserts that the response has the expected status code.
pub fn assert_status(response: &TestResponse, expected: u16) {
    let actual = response.status_code().as_u16();
    assert_eq!(
        actual,
        expected,
        "Expected status {}, got {}: {}",
        expected,
        actual,
        response.text()
    );
}

/// Asserts a success envelope and returns its `data`.
pub fn data(response: &TestResponse) -> Value {
    let body: Value = response.json();
    assert!(body.get("error").is_none(), "Unexpected error body: {}", body);
    body.get("data")
        .cloned()
        .unwrap_or_else(|| panic!("Expected a data envelope, got {}", body))
}

/// Asserts an error body with the given code.
pub fn assert_error_code(response: &TestResponse, expected: &str) {
    let body: Value = response.json();
    let code = body
        .pointer("/error/code")
        .and_then(Value::as_str)
        .unwrap_or_else(|| panic!("Expected an error body, got {}", body));
    assert_eq!(code, expected, "Unexpected error code in {}", body);
    assert!(
        body.pointer("/error/message").is_some_and(Value::is_string),
        "Error body must carry a message: {}",
        body
    );
}

/// Asserts that the response has a Location header with the expected value.
pub fn assert_location(response: &TestResponse, expected: &str) {
    let location = response
        .headers()
        .get("location")
        .unwrap_or_else(|| panic!("Expected Location header"));
    assert_eq!(location.to_str().unwrap(), expected);
}
