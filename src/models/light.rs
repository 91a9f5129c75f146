use serde_json::{json, Value};

use crate::api::client::BridgeClient;
use crate::error::AppError;
use crate::models::attribute::{AttributeProxy, NullWritePolicy, LIGHT_ATTRIBUTES};
use crate::models::light_state::LightState;

/// One light paired to the bridge.
///
/// Attribute reads and writes go through the shared proxy engine: `state`
/// and `reachable` hit the bridge on every read, everything else answers
/// from the cache seeded at discovery and kept current by writes.
#[derive(Debug)]
pub struct Light {
    pub id: u32,
    pub model_id: Option<String>,
    pub unique_id: Option<String>,
    proxy: AttributeProxy,
}

impl Light {
    pub(crate) fn from_descriptor(
        client: BridgeClient,
        id: u32,
        descriptor: &Value,
        null_policy: NullWritePolicy,
    ) -> Self {
        let mut proxy = AttributeProxy::new(
            client,
            format!("light {}", id),
            format!("/lights/{}", id),
            format!("/lights/{}/state", id),
            "state",
            LIGHT_ATTRIBUTES,
            null_policy,
        );
        proxy.seed("id", json!(id));
        if let Some(name) = descriptor.get("name").and_then(|v| v.as_str()) {
            proxy.seed("name", json!(name));
        }
        if let Some(state) = descriptor.get("state") {
            proxy.fold(state);
        }
        Self {
            id,
            model_id: descriptor
                .get("modelid")
                .and_then(|v| v.as_str())
                .map(String::from),
            unique_id: descriptor
                .get("uniqueid")
                .and_then(|v| v.as_str())
                .map(String::from),
            proxy,
        }
    }

    /// The light's name as last seen, tracking renames made through this
    /// handle.
    pub fn name(&self) -> &str {
        self.proxy
            .cached("name")
            .and_then(|v| v.as_str())
            .unwrap_or("")
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

    /// The locally known state, without touching the bridge.
    pub fn cached_state(&self) -> LightState {
        LightState::from_json(&self.proxy.snapshot())
    }

    /// Fetch the current state from the bridge.
    pub async fn state(&mut self) -> Result<LightState, AppError> {
        let state = self.proxy.get("state").await?;
        Ok(LightState::from_json(&state))
    }

    pub async fn reachable(&mut self) -> Result<bool, AppError> {
        let value = self.proxy.get("reachable").await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    // -- State shortcuts --

    pub async fn turn_on(&mut self) -> Result<(), AppError> {
        self.set("on", json!(true)).await
    }

    pub async fn turn_off(&mut self) -> Result<(), AppError> {
        self.set("on", json!(false)).await
    }

    /// Brightness on the bridge's 1-254 scale.
    pub async fn set_brightness(&mut self, brightness: u8) -> Result<(), AppError> {
        self.set("bri", json!(brightness)).await
    }

    /// Color temperature in mireds (153 cold to 500 warm).
    pub async fn set_color_temp(&mut self, mireds: u16) -> Result<(), AppError> {
        self.set("ct", json!(mireds)).await
    }

    /// CIE xy chromaticity coordinates.
    pub async fn set_xy(&mut self, x: f64, y: f64) -> Result<(), AppError> {
        self.set("xy", json!([x, y])).await
    }

    pub async fn rename(&mut self, name: &str) -> Result<(), AppError> {
        self.set("name", json!(name)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_light() -> Light {
        let client = BridgeClient::new("127.0.0.1", "testuser").unwrap();
        let descriptor = json!({
            "name": "Kitchen",
            "modelid": "LCT007",
            "uniqueid": "00:17:88:01:00:d4:12:08-0a",
            "state": {"on": true, "bri": 144, "reachable": true}
        });
        Light::from_descriptor(client, 1, &descriptor, NullWritePolicy::Reject)
    }

    #[test]
    fn test_descriptor_seeds_cache() {
        let light = sample_light();
        assert_eq!(light.id, 1);
        assert_eq!(light.name(), "Kitchen");
        assert_eq!(light.model_id.as_deref(), Some("LCT007"));
        assert_eq!(light.cached("bri"), Some(&json!(144)));
        assert_eq!(light.cached("id"), Some(&json!(1)));
    }

    #[test]
    fn test_cached_state() {
        let light = sample_light();
        let state = light.cached_state();
        assert_eq!(state.on, Some(true));
        assert_eq!(state.bri, Some(144));
        assert_eq!(state.reachable, Some(true));
        assert_eq!(state.hue, None);
    }

    #[test]
    fn test_missing_descriptor_fields() {
        let client = BridgeClient::new("127.0.0.1", "testuser").unwrap();
        let light = Light::from_descriptor(client, 7, &json!({}), NullWritePolicy::Reject);
        assert_eq!(light.name(), "");
        assert_eq!(light.model_id, None);
        assert_eq!(light.unique_id, None);
    }

    #[tokio::test]
    async fn test_identity_write_keeps_id() {
        let mut light = sample_light();
        light.set("id", json!(42)).await.unwrap();
        assert_eq!(light.id, 1);
        assert_eq!(light.cached("id"), Some(&json!(1)));
    }

    #[tokio::test]
    async fn test_unknown_attribute_rejected_without_network() {
        let mut light = sample_light();
        let err = light.set("scene", json!("abc")).await.unwrap_err();
        assert!(matches!(err, AppError::UnsupportedOperation(_)));
    }
}
