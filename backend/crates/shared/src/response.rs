//! Response Envelope
//!
//! Every endpoint answers with `{code, message, data}`.
//! `code == 0` means success; failures carry the HTTP status as `code`.

use serde::Serialize;

/// Message used by every successful response
pub const SUCCESS_MESSAGE: &str = "success";

/// Uniform response body
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub code: u16,
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Successful response carrying `data`
    pub fn ok(data: T) -> Self {
        Self {
            code: 0,
            message: SUCCESS_MESSAGE.to_string(),
            data: Some(data),
        }
    }

    /// Failed response; `data` is always `null`
    pub fn failure(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

/// Payload for mutations that return no entity (update/delete)
#[derive(Debug, Clone, Serialize)]
pub struct MessageData {
    pub message: &'static str,
}

impl MessageData {
    pub const UPDATED: Self = Self { message: "updated" };
    pub const DELETED: Self = Self { message: "deleted" };
    pub const LOGGED_OUT: Self = Self {
        message: "logged out",
    };
}

#[cfg(feature = "axum")]
impl<T: Serialize> axum::response::IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        axum::Json(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope() {
        let body = serde_json::to_value(ApiResponse::ok(MessageData::UPDATED)).unwrap();
        assert_eq!(body["code"], 0);
        assert_eq!(body["message"], "success");
        assert_eq!(body["data"]["message"], "updated");
    }

    #[test]
    fn test_failure_envelope_has_null_data() {
        let response = ApiResponse::<()>::failure(404, "device not found");
        assert!(!response.is_success());

        let body = serde_json::to_value(response).unwrap();
        assert_eq!(body["code"], 404);
        assert!(body["data"].is_null());
    }
}
