use crate::error::{ProbeError, ProbeResult};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Status and body of any API call, successful or not.
///
/// Most assertions in API tests are about status codes and `{"error": ...}`
/// bodies, so the raw client methods never turn a 4xx/5xx into `Err`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// `content-type` header, if present
    pub content_type: Option<String>,
    /// Parsed JSON body, or `Value::Null` when the body was not JSON
    pub body: Value,
    /// Raw body text
    pub text: String,
}

impl ApiResponse {
    pub fn new(status: u16, content_type: Option<String>, text: String) -> Self {
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self {
            status,
            content_type,
            body,
            text,
        }
    }

    /// Check if the response indicates success (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The `error` string of an error body.
    pub fn error_message(&self) -> Option<&str> {
        self.body.get("error").and_then(Value::as_str)
    }

    /// Deserialize the body.
    pub fn json<T: DeserializeOwned>(&self) -> ProbeResult<T> {
        Ok(serde_json::from_value(self.body.clone())?)
    }

    /// Deserialize the body of a 2xx response, or turn the response into a
    /// `ServerError`.
    pub fn into_result<T: DeserializeOwned>(self) -> ProbeResult<T> {
        if !self.is_success() {
            return Err(ProbeError::from_response(self.status, &self.text));
        }
        self.json()
    }
}
