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

/// Asserts a 400 response whose `fields` lists `field` with `message`.
pub fn assert_field_error(response: &TestResponse, field: &str, message: &str) {
    assert_status(response, 400);
    let body: Value = response.json();
    assert_eq!(body["code"], "invalid");
    let messages = body["fields"][field]
        .as_array()
        .unwrap_or_else(|| panic!("no error for field '{}' in {}", field, body));
    assert!(
        messages.iter().any(|m| m == message),
        "Expected '{}' for field '{}', got {:?}",
        message,
        field,
        messages
    );
}

/// Asserts an error response with the given status and error code.
pub fn assert_error_code(response: &TestResponse, status: u16, code: &str) {
    assert_status(response, status);
    let body: Value = response.json();
    assert_eq!(body["code"], code, "unexpected body: {}", body);
}

/// Asserts that the response has a Location header.
pub fn assert_has_location(response: &TestResponse) {
    assert!(
        response.headers().contains_key("location"),
        "Expected Location header"
    );
}
