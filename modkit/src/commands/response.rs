//! Command responses.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CatalogError, ErrorCode};

/// Outcome of a command, as sent back to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

/// Error details of a failed command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
    /// Diagnostic trace, only for internal errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,
}

impl CommandResponse {
    pub fn ok(message: impl Into<String>, data: Value) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            error: None,
        }
    }

    pub fn from_error(error: &CatalogError) -> Self {
        let message = error.to_string();
        Self {
            success: false,
            message: message.clone(),
            data: None,
            error: Some(ErrorBody {
                code: error.code(),
                message,
                trace: error.trace().map(str::to_string),
            }),
        }
    }

    /// Serialize as pretty JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| {
            format!(
                r#"{{"success":false,"message":"failed to encode response: {}"}}"#,
                e
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::Identifier;
    use serde_json::json;

    #[test]
    fn test_ok_response_json() {
        let response = CommandResponse::ok("Created package Jane.ExampleMod", json!({"identifier": "Jane.ExampleMod"}));
        let value: Value = serde_json::from_str(&response.to_json()).unwrap();
        assert_eq!(value["success"], true);
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_error_response_json() {
        let id = Identifier::parse("Jane.ExampleMod").unwrap();
        let response = CommandResponse::from_error(&CatalogError::DuplicateIdentifier(id));
        let value: Value = serde_json::from_str(&response.to_json()).unwrap();

        assert_eq!(value["success"], false);
        assert_eq!(value["error"]["code"], "DUPLICATE_IDENTIFIER");
        assert!(value["error"].get("trace").is_none());
    }

    #[test]
    fn test_internal_error_carries_trace() {
        let response = CommandResponse::from_error(&CatalogError::internal("boom"));
        let error = response.error.unwrap();
        assert_eq!(error.code, ErrorCode::Internal);
        assert!(error.trace.is_some());
    }
}
