//! Response envelope returned by every CMS API endpoint.

use serde::{Deserialize, Serialize};

/// Successful (or failed) API response wrapper.
///
/// Error bodies use the same fields minus `data`, so `data` is optional.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    pub success: bool,
    pub status_code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// Build a successful envelope around `data`.
    pub fn ok(status_code: u16, path: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            status_code,
            message: "Success".to_owned(),
            path: path.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            data: Some(data),
        }
    }
}

/// Error response body, read leniently.
///
/// Only `message` is used; the status comes from the HTTP response itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub status_code: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

impl ApiErrorBody {
    /// Build an error body the way the CMS shapes them.
    pub fn new(status_code: u16, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            success: false,
            status_code: Some(status_code),
            message: Some(message.into()),
            path: Some(path.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_success_envelope() {
        let json = r#"{
            "success": true,
            "statusCode": 200,
            "message": "OK",
            "path": "/api/site-sections",
            "timestamp": "2024-05-01T10:00:00.000Z",
            "data": [1, 2, 3]
        }"#;
        let envelope: ApiEnvelope<Vec<u8>> = serde_json::from_str(json).unwrap();
        assert!(envelope.success);
        assert_eq!(envelope.status_code, 200);
        assert_eq!(envelope.data, Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_decode_error_envelope_without_data() {
        let json = r#"{
            "success": false,
            "statusCode": 404,
            "message": "Section not found",
            "path": "/api/site-sections/9",
            "timestamp": "2024-05-01T10:00:00.000Z"
        }"#;
        let envelope: ApiEnvelope<String> = serde_json::from_str(json).unwrap();
        assert!(!envelope.success);
        assert!(envelope.data.is_none());

        let body: ApiErrorBody = serde_json::from_str(json).unwrap();
        assert_eq!(body.message.as_deref(), Some("Section not found"));
    }

    #[test]
    fn test_error_body_tolerates_missing_fields() {
        let body: ApiErrorBody = serde_json::from_str("{}").unwrap();
        assert_eq!(body, ApiErrorBody::default());
    }

    #[test]
    fn test_ok_serializes_camel_case() {
        let envelope = ApiEnvelope::ok(201, "/api/settings", "x");
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["statusCode"], 201);
        assert_eq!(value["data"], "x");
    }
}
