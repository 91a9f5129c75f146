use serde::Deserialize;
use serde_json::Value;

use super::errors::ERR_LINK_BUTTON_NOT_PRESSED;
use crate::error::AppError;

/// One error object from the bridge's response envelope.
///
/// Write-style calls answer with a JSON list of `{"success": {...}}` /
/// `{"error": {...}}` entries; this is the payload under an `"error"` key.
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeError {
    #[serde(rename = "type", default)]
    pub error_type: u16,
    #[serde(default)]
    pub address: String,
    pub description: String,
}

impl From<BridgeError> for AppError {
    fn from(err: BridgeError) -> Self {
        if err.error_type == ERR_LINK_BUTTON_NOT_PRESSED {
            return AppError::LinkButtonNotPressed;
        }
        AppError::Bridge {
            error_type: err.error_type,
            address: err.address,
            description: err.description,
        }
    }
}

/// Scan a decoded response for the bridge's error envelope.
///
/// Returns the first error entry found, or `None` when the body is not an
/// envelope list or carries only success entries.
pub fn first_error(value: &Value) -> Option<BridgeError> {
    for entry in value.as_array()? {
        if let Some(err) = entry.get("error") {
            return Some(serde_json::from_value(err.clone()).unwrap_or_else(|_| BridgeError {
                error_type: 0,
                address: String::new(),
                description: err.to_string(),
            }));
        }
    }
    None
}

/// The payload of the first `{"success": {...}}` entry, if the body is an
/// envelope list.
pub fn success_value(value: &Value) -> Option<&Value> {
    value.as_array()?.iter().find_map(|entry| entry.get("success"))
}
