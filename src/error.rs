#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bridge unreachable: {message}")]
    BridgeUnreachable { message: String },

    #[error("Bridge returned HTTP {status}: {reason}")]
    Protocol { status: u16, reason: String },

    #[error("Bridge error {error_type} at {address}: {description}")]
    Bridge {
        error_type: u16,
        address: String,
        description: String,
    },

    #[error("Link button not pressed. Press the button on the bridge and retry.")]
    LinkButtonNotPressed,

    #[error("Attribute '{attribute}' has no value on {entity}")]
    AttributeNotFound { entity: String, attribute: String },

    #[error("Operation not supported: {0}")]
    UnsupportedOperation(String),

    #[error("Light not found: {0}")]
    LightNotFound(String),

    #[error("Group not found: {0}")]
    GroupNotFound(String),

    #[error("Scene not found: {0}")]
    SceneNotFound(String),

    #[error("No bridge credentials. Run 'huec authorize' first.")]
    NotAuthorized,

    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::NotAuthorized | AppError::LinkButtonNotPressed => 2,
            AppError::LightNotFound(_)
            | AppError::GroupNotFound(_)
            | AppError::SceneNotFound(_)
            | AppError::AttributeNotFound { .. } => 3,
            AppError::BridgeUnreachable { .. } => 4,
            _ => 1,
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::BridgeUnreachable { .. } => "bridge_unreachable",
            AppError::Protocol { .. } => "protocol",
            AppError::Bridge { .. } => "bridge",
            AppError::LinkButtonNotPressed => "link_button_not_pressed",
            AppError::AttributeNotFound { .. } => "attribute_not_found",
            AppError::UnsupportedOperation(_) => "unsupported_operation",
            AppError::LightNotFound(_) => "light_not_found",
            AppError::GroupNotFound(_) => "group_not_found",
            AppError::SceneNotFound(_) => "scene_not_found",
            AppError::NotAuthorized => "not_authorized",
            AppError::InvalidInput(_) => "invalid_input",
            AppError::Http(_) => "http",
            AppError::Json(_) => "json",
            AppError::Io(_) => "io",
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        let mut obj = serde_json::json!({
            "error": self.error_type(),
            "message": self.to_string(),
        });
        if let Some(code) = self.bridge_error_type() {
            obj["error_code"] = serde_json::json!(code);
        }
        obj
    }

    fn bridge_error_type(&self) -> Option<u16> {
        match self {
            AppError::Bridge { error_type, .. } => Some(*error_type),
            AppError::LinkButtonNotPressed => Some(crate::api::errors::ERR_LINK_BUTTON_NOT_PRESSED),
            _ => None,
        }
    }
}
