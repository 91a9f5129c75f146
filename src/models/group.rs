use serde::Serialize;
use serde_json::{json, Value};

use crate::api::client::BridgeClient;
use crate::error::AppError;
use crate::models::attribute::{AttributeProxy, NullWritePolicy, GROUP_ATTRIBUTES};
use crate::models::light_state::LightState;

/// The on/off summary the bridge computes over a group's members.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct GroupState {
    pub any_on: bool,
    pub all_on: bool,
}

impl GroupState {
    pub fn from_json(value: &Value) -> Self {
        Self {
            any_on: value
                .get("any_on")
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
            all_on: value
                .get("all_on")
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
        }
    }
}

/// A group of lights (a room, a zone, or the implicit all-lights group 0).
///
/// Writes go to the group's action endpoint and fan out to every member.
/// The cached attributes mirror the group's last action object, which the
/// bridge reports as the state of the most recently commanded member.
#[derive(Debug)]
pub struct Group {
    pub id: u32,
    pub lights: Vec<u32>,
    pub group_type: Option<String>,
    state: GroupState,
    proxy: AttributeProxy,
}

impl Group {
    pub(crate) fn from_descriptor(
        client: BridgeClient,
        id: u32,
        descriptor: &Value,
        null_policy: NullWritePolicy,
    ) -> Self {
        let mut proxy = AttributeProxy::new(
            client,
            format!("group {}", id),
            format!("/groups/{}", id),
            format!("/groups/{}/action", id),
            "action",
            GROUP_ATTRIBUTES,
            null_policy,
        );
        proxy.seed("id", json!(id));
        if let Some(name) = descriptor.get("name").and_then(|v| v.as_str()) {
            proxy.seed("name", json!(name));
        }
        if let Some(action) = descriptor.get("action") {
            proxy.fold(action);
        }
        let lights = descriptor
            .get("lights")
            .and_then(|v| v.as_array())
            .map(|members| {
                members
                    .iter()
                    .filter_map(|v| v.as_str())
                    .filter_map(|s| s.parse::<u32>().ok())
                    .collect()
            })
            .unwrap_or_default();
        let state = descriptor
            .get("state")
            .map(GroupState::from_json)
            .unwrap_or_default();
        Self {
            id,
            lights,
            group_type: descriptor
                .get("type")
                .and_then(|v| v.as_str())
                .map(String::from),
            state,
            proxy,
        }
    }

    pub fn name(&self) -> &str {
        self.proxy
            .cached("name")
            .and_then(|v| v.as_str())
            .unwrap_or("")
    }

    /// The membership summary captured when this group was fetched.
    pub fn state(&self) -> &GroupState {
        &self.state
    }

    // -- Attribute access --

    pub async fn get(&mut self, name: &str) -> Result<Value, AppError> {
        self.proxy.get(name).await
    }

    pub async fn set(&mut self, name: &str, value: Value) -> Result<(), AppError> {
        self.proxy.set(name, value).await
    }

    pub fn cached(&self, name: &str) -> Option<&Value> {
        self.proxy.cached(name)
    }

    /// The locally known action object, without touching the bridge. The
    /// bridge reports a group's action in the same shape as a light state.
    pub fn cached_action(&self) -> LightState {
        LightState::from_json(&self.proxy.snapshot())
    }

    // -- Action shortcuts --

    pub async fn turn_on(&mut self) -> Result<(), AppError> {
        self.set("on", json!(true)).await
    }

    pub async fn turn_off(&mut self) -> Result<(), AppError> {
        self.set("on", json!(false)).await
    }

    pub async fn set_brightness(&mut self, brightness: u8) -> Result<(), AppError> {
        self.set("bri", json!(brightness)).await
    }

    /// Apply a stored scene to this group's members.
    pub async fn recall_scene(&mut self, scene_id: &str) -> Result<(), AppError> {
        self.set("scene", json!(scene_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_group() -> Group {
        let client = BridgeClient::new("127.0.0.1", "testuser").unwrap();
        let descriptor = json!({
            "name": "Living room",
            "type": "Room",
            "lights": ["1", "2", "oops", "5"],
            "state": {"any_on": true, "all_on": false},
            "action": {"on": true, "bri": 254, "ct": 366}
        });
        Group::from_descriptor(client, 3, &descriptor, NullWritePolicy::Reject)
    }

    #[test]
    fn test_descriptor_parse() {
        let group = sample_group();
        assert_eq!(group.id, 3);
        assert_eq!(group.name(), "Living room");
        assert_eq!(group.group_type.as_deref(), Some("Room"));
        assert_eq!(group.lights, vec![1, 2, 5]);
        assert!(group.state().any_on);
        assert!(!group.state().all_on);
        assert_eq!(group.cached("bri"), Some(&json!(254)));

        let action = group.cached_action();
        assert_eq!(action.on, Some(true));
        assert_eq!(action.ct, Some(366));
    }

    #[test]
    fn test_empty_descriptor_defaults() {
        let client = BridgeClient::new("127.0.0.1", "testuser").unwrap();
        let group = Group::from_descriptor(client, 0, &json!({}), NullWritePolicy::Reject);
        assert_eq!(group.name(), "");
        assert!(group.lights.is_empty());
        assert!(!group.state().any_on);
    }

    #[tokio::test]
    async fn test_light_only_attribute_rejected() {
        let mut group = sample_group();
        let err = group.set("reachable", json!(true)).await.unwrap_err();
        assert!(matches!(err, AppError::UnsupportedOperation(_)));
    }
}
