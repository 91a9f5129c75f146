use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A stored scene: a named snapshot of light states kept on the bridge.
///
/// Scenes are read-only here; they are applied by writing the scene id to a
/// group's action endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    /// Bridge-assigned id, injected from the scene map key after decode.
    #[serde(skip_deserializing)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub lights: Vec<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub recycle: bool,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub version: Option<u8>,
    #[serde(default)]
    pub lastupdated: Option<String>,
}

impl Scene {
    /// Parse the bridge's `lastupdated` timestamp. The bridge reports local
    /// time without an offset, and `"none"` for scenes never updated.
    pub fn last_updated(&self) -> Option<NaiveDateTime> {
        self.lastupdated
            .as_deref()
            .and_then(|s| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").ok())
    }
}
