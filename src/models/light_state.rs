use serde::Serialize;
use serde_json::Value;

/// A light's state object as the bridge reports it.
///
/// Every field is optional: color-only models omit `ct`, white-ambiance
/// models omit `hue`/`sat`/`xy`, and a cached snapshot may hold only the
/// fields written so far.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LightState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bri: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hue: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sat: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xy: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ct: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effect: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colormode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reachable: Option<bool>,
}

impl LightState {
    /// Extract whatever state fields are present, ignoring anything the
    /// bridge added that we don't model.
    pub fn from_json(value: &Value) -> Self {
        Self {
            on: value.get("on").and_then(|v| v.as_bool()),
            bri: value
                .get("bri")
                .and_then(|v| v.as_u64())
                .and_then(|n| u8::try_from(n).ok()),
            hue: value
                .get("hue")
                .and_then(|v| v.as_u64())
                .and_then(|n| u16::try_from(n).ok()),
            sat: value
                .get("sat")
                .and_then(|v| v.as_u64())
                .and_then(|n| u8::try_from(n).ok()),
            xy: value.get("xy").and_then(|v| v.as_array()).and_then(|pair| {
                match (pair.first().and_then(|v| v.as_f64()), pair.get(1).and_then(|v| v.as_f64())) {
                    (Some(x), Some(y)) => Some([x, y]),
                    _ => None,
                }
            }),
            ct: value
                .get("ct")
                .and_then(|v| v.as_u64())
                .and_then(|n| u16::try_from(n).ok()),
            alert: value
                .get("alert")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string()),
            effect: value
                .get("effect")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string()),
            colormode: value
                .get("colormode")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string()),
            reachable: value.get("reachable").and_then(|v| v.as_bool()),
        }
    }
}
