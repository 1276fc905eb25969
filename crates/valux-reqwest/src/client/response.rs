//! Turning HTTP responses into JSON values or classified errors.

use reqwest::{Response, StatusCode};
use serde_json::Value;
use valux_core::{Envelope, Error, Result};

use crate::error::Error as HttpError;

/// Reads the whole body of `response` as JSON.
///
/// An empty body reads as `null`; a body that is not JSON reads as a string.
pub(crate) async fn read_body(response: Response) -> Result<Value> {
    let bytes = response.bytes().await.map_err(HttpError::from)?;
    Ok(parse_body(&bytes))
}

pub(crate) fn parse_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }

    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

/// Applies the envelope and status rules to a received body.
pub(crate) fn interpret(status: StatusCode, body: Value) -> Result<Value> {
    if !status.is_success() {
        return Err(status_error(status, body));
    }

    match Envelope::detect(&body) {
        Some(envelope) if !envelope.success => {
            let message = envelope
                .error
                .filter(|error| !error.is_empty())
                .unwrap_or_else(|| "API request failed".to_owned());
            Err(Error::api(status.as_u16())
                .with_message(message)
                .with_details(body))
        }
        Some(envelope) => Ok(envelope.data.unwrap_or(Value::Null)),
        None => Ok(body),
    }
}

/// Builds the error for a non-2xx response.
///
/// The server's `message` wins over the generic `HTTP {status}: {reason}`.
/// `code` and `details` are copied when the body carries them; an object
/// body without `details` becomes the details itself.
fn status_error(status: StatusCode, body: Value) -> Error {
    let reason = status.canonical_reason().unwrap_or("Unknown Status");
    let mut error = Error::api(status.as_u16())
        .with_message(format!("HTTP {}: {reason}", status.as_u16()));

    let Some(object) = body.as_object() else {
        return error;
    };

    if let Some(message) = object
        .get("message")
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
    {
        error = error.with_message(message);
    }

    match object.get("code") {
        Some(Value::String(code)) => error = error.with_code(code.clone()),
        Some(Value::Number(code)) => error = error.with_code(code.to_string()),
        _ => {}
    }

    let details = object
        .get("details")
        .filter(|details| !details.is_null())
        .cloned()
        .unwrap_or_else(|| body.clone());

    error.with_details(details)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_body_empty_and_text() {
        assert_eq!(parse_body(b""), Value::Null);
        assert_eq!(parse_body(b"  \n"), Value::Null);
        assert_eq!(parse_body(b"OK"), json!("OK"));
        assert_eq!(parse_body(br#"{"a":1}"#), json!({"a": 1}));
    }

    #[test]
    fn test_envelope_success_unwraps_data() {
        let body = json!({"success": true, "data": {"id": "1"}, "timestamp": "t"});
        assert_eq!(interpret(StatusCode::OK, body).unwrap(), json!({"id": "1"}));
    }

    #[test]
    fn test_envelope_success_without_data_is_null() {
        let body = json!({"success": true, "timestamp": "t"});
        assert_eq!(interpret(StatusCode::OK, body).unwrap(), Value::Null);
    }

    #[test]
    fn test_envelope_failure_is_api_error() {
        let body = json!({"success": false, "error": "Vault paused", "timestamp": "t"});
        let error = interpret(StatusCode::OK, body.clone()).unwrap_err();

        assert!(error.is_api_error());
        assert_eq!(error.message(), "Vault paused");
        assert_eq!(error.status, Some(200));
        assert_eq!(error.details, Some(body));
    }

    #[test]
    fn test_envelope_failure_without_error_text() {
        let body = json!({"success": false, "timestamp": "t"});
        let error = interpret(StatusCode::OK, body).unwrap_err();
        assert_eq!(error.message(), "API request failed");
    }

    #[test]
    fn test_non_envelope_body_passes_through() {
        let body = json!({"success": "yes", "items": []});
        assert_eq!(interpret(StatusCode::OK, body.clone()).unwrap(), body);

        let list = json!([1, 2, 3]);
        assert_eq!(interpret(StatusCode::OK, list.clone()).unwrap(), list);
    }

    #[test]
    fn test_status_error_prefers_server_message() {
        let body = json!({"message": "Rule not found", "code": "RULE_404"});
        let error = interpret(StatusCode::NOT_FOUND, body.clone()).unwrap_err();

        assert!(error.has_status(404));
        assert_eq!(error.message(), "Rule not found");
        assert_eq!(error.code.as_deref(), Some("RULE_404"));
        assert_eq!(error.details, Some(body));
    }

    #[test]
    fn test_status_error_falls_back_to_reason() {
        let error = interpret(StatusCode::SERVICE_UNAVAILABLE, Value::Null).unwrap_err();
        assert_eq!(error.message(), "HTTP 503: Service Unavailable");
        assert!(error.code.is_none());
        assert!(error.details.is_none());
    }

    #[test]
    fn test_status_error_uses_details_field() {
        let body = json!({"message": "Invalid", "details": {"field": "name"}});
        let error = interpret(StatusCode::BAD_REQUEST, body).unwrap_err();
        assert_eq!(error.details, Some(json!({"field": "name"})));
    }
}
