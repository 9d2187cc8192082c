//! Turning a status + body into an outcome.

use cardparse_core::{ParsedResult, SubmitError};
use reqwest::StatusCode;
use serde_json::Value;

/// Decode the body as JSON first, whatever the status; the service always
/// answers with a JSON body. A body that is not JSON is a transport failure
/// even when the status is an error.
pub fn interpret(status: StatusCode, body: &[u8]) -> Result<ParsedResult, SubmitError> {
    let value: Value = serde_json::from_slice(body).map_err(SubmitError::transport)?;

    if !status.is_success() {
        return Err(match reported_error(&value) {
            Some(message) => SubmitError::Service(message),
            None => SubmitError::ServiceUnspecified,
        });
    }

    Ok(ParsedResult::new(value))
}

/// The body's `error` field, if it holds something worth showing.
fn reported_error(body: &Value) -> Option<String> {
    match body.get("error")? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_keeps_body() {
        let body = br#"{"transactions":[{"amount":100}]}"#;
        let result = interpret(StatusCode::OK, body).unwrap();
        assert_eq!(result.value(), &json!({"transactions": [{"amount": 100}]}));
    }

    #[test]
    fn test_error_status_uses_reported_message() {
        let body = br#"{"error":"Unsupported statement format"}"#;
        let err = interpret(StatusCode::UNPROCESSABLE_ENTITY, body).unwrap_err();
        assert_eq!(err, SubmitError::Service("Unsupported statement format".into()));
    }

    #[test]
    fn test_error_status_without_message_falls_back() {
        let bodies: [&[u8]; 4] = [b"{}", br#"{"error":null}"#, br#"{"error":""}"#, b"[]"];
        for body in bodies {
            let err = interpret(StatusCode::INTERNAL_SERVER_ERROR, body).unwrap_err();
            assert_eq!(err, SubmitError::ServiceUnspecified);
            assert_eq!(err.to_string(), "Something went wrong");
        }
    }

    #[test]
    fn test_non_string_error_is_shown_as_json() {
        let err = interpret(StatusCode::BAD_REQUEST, br#"{"error":42}"#).unwrap_err();
        assert_eq!(err.to_string(), "42");
    }

    #[test]
    fn test_undecodable_body_is_transport_error() {
        let err = interpret(StatusCode::OK, b"<html>oops</html>").unwrap_err();
        assert!(matches!(err, SubmitError::Transport(_)));

        // decoding happens before the status is looked at
        let err = interpret(StatusCode::BAD_GATEWAY, b"Bad Gateway").unwrap_err();
        assert!(matches!(err, SubmitError::Transport(_)));
    }

    #[test]
    fn test_success_status_ignores_error_field() {
        let result = interpret(StatusCode::OK, br#"{"error":"ignored","ok":true}"#).unwrap();
        assert_eq!(result.value()["ok"], json!(true));
    }
}
