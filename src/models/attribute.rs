//! Attribute registry and the read/write engine shared by lights and groups.
//!
//! Every controllable attribute maps 1:1 to a bridge API field name. The
//! per-entity tables below fix, at construction time, how each attribute is
//! read (live against the bridge or from the local cache) and where a write
//! goes. Dispatch is purely table-driven; the engine never inspects what
//! kind of entity it is serving.

use log::debug;
use serde_json::{Map, Value};

use crate::api::client::BridgeClient;
use crate::error::AppError;

/// Where a write to an attribute is routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteTarget {
    /// Identity field. Accepted and dropped; never issues a network call.
    Identity,
    /// Single-key PUT `{name: value}` to the entity's state URI.
    StateField,
    /// The whole mapping PUT as one body to the entity's state URI.
    StateBulk,
    /// PUT `{"name": value}` to the entity root URI (the rename endpoint).
    Rename,
    /// Reported by the bridge but not writable.
    ReadOnly,
}

/// One attribute the entity understands.
#[derive(Debug, Clone, Copy)]
pub struct AttributeSpec {
    pub name: &'static str,
    /// Live attributes are re-fetched from the bridge on every read.
    pub live: bool,
    pub target: WriteTarget,
}

const fn attr(name: &'static str, live: bool, target: WriteTarget) -> AttributeSpec {
    AttributeSpec { name, live, target }
}

pub const LIGHT_ATTRIBUTES: &[AttributeSpec] = &[
    attr("id", false, WriteTarget::Identity),
    attr("name", false, WriteTarget::Rename),
    attr("state", true, WriteTarget::StateBulk),
    attr("on", false, WriteTarget::StateField),
    attr("bri", false, WriteTarget::StateField),
    attr("hue", false, WriteTarget::StateField),
    attr("sat", false, WriteTarget::StateField),
    attr("xy", false, WriteTarget::StateField),
    attr("ct", false, WriteTarget::StateField),
    attr("alert", false, WriteTarget::StateField),
    attr("effect", false, WriteTarget::StateField),
    attr("transitiontime", false, WriteTarget::StateField),
    attr("colormode", false, WriteTarget::ReadOnly),
    attr("reachable", true, WriteTarget::ReadOnly),
];

pub const GROUP_ATTRIBUTES: &[AttributeSpec] = &[
    attr("id", false, WriteTarget::Identity),
    attr("name", false, WriteTarget::Rename),
    attr("state", true, WriteTarget::StateBulk),
    attr("on", false, WriteTarget::StateField),
    attr("bri", false, WriteTarget::StateField),
    attr("hue", false, WriteTarget::StateField),
    attr("sat", false, WriteTarget::StateField),
    attr("xy", false, WriteTarget::StateField),
    attr("ct", false, WriteTarget::StateField),
    attr("alert", false, WriteTarget::StateField),
    attr("effect", false, WriteTarget::StateField),
    attr("transitiontime", false, WriteTarget::StateField),
    attr("scene", false, WriteTarget::StateField),
    attr("colormode", false, WriteTarget::ReadOnly),
];

pub fn spec_for(table: &'static [AttributeSpec], name: &str) -> Option<&'static AttributeSpec> {
    table.iter().find(|spec| spec.name == name)
}

/// How a JSON `null` write is treated.
///
/// The bridge has no use for nulls on numeric fields, so the default refuses
/// them. `NoneString` coerces `null` to the literal string `"none"`, which
/// the bridge accepts for the `alert` and `effect` attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NullWritePolicy {
    #[default]
    Reject,
    NoneString,
}

/// The read/write engine behind an entity's attribute surface.
///
/// Holds the entity's routes, its attribute table, and the local cache
/// seeded from the discovery snapshot. Reads serve live attributes with a
/// GET against the entity root and everything else from the cache; writes
/// PUT against the route the table names and fold into the cache only after
/// the bridge accepts the write, so a failed call leaves the cache as it
/// was.
#[derive(Debug)]
pub struct AttributeProxy {
    client: BridgeClient,
    entity: String,
    root_path: String,
    write_path: String,
    /// Key of the attribute object in the entity root document
    /// ("state" for lights, "action" for groups).
    state_key: &'static str,
    table: &'static [AttributeSpec],
    cache: Map<String, Value>,
    null_policy: NullWritePolicy,
}

impl AttributeProxy {
    pub(crate) fn new(
        client: BridgeClient,
        entity: String,
        root_path: String,
        write_path: String,
        state_key: &'static str,
        table: &'static [AttributeSpec],
        null_policy: NullWritePolicy,
    ) -> Self {
        Self {
            client,
            entity,
            root_path,
            write_path,
            state_key,
            table,
            cache: Map::new(),
            null_policy,
        }
    }

    pub(crate) fn seed(&mut self, name: &str, value: Value) {
        self.cache.insert(name.to_string(), value);
    }

    /// Copy every key of a state object into the cache.
    pub(crate) fn fold(&mut self, object: &Value) {
        if let Some(map) = object.as_object() {
            for (key, value) in map {
                self.cache.insert(key.clone(), value.clone());
            }
        }
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn cached(&self, name: &str) -> Option<&Value> {
        self.cache.get(name)
    }

    /// The cache as one JSON object.
    pub fn snapshot(&self) -> Value {
        Value::Object(self.cache.clone())
    }

    /// Read an attribute.
    ///
    /// Live attributes fetch the entity root, refresh the cache from its
    /// state object and answer from the fresh data; everything else answers
    /// from the cache, failing with `AttributeNotFound` when the attribute
    /// was never populated.
    pub async fn get(&mut self, name: &str) -> Result<Value, AppError> {
        if let Some(spec) = spec_for(self.table, name) {
            if spec.live {
                let fresh = self.refresh().await?;
                if spec.target == WriteTarget::StateBulk {
                    return Ok(fresh);
                }
                // fall through to the freshly folded cache
            }
        }
        self.cache
            .get(name)
            .cloned()
            .ok_or_else(|| AppError::AttributeNotFound {
                entity: self.entity.clone(),
                attribute: name.to_string(),
            })
    }

    /// Write an attribute. One bridge request per call, none at all for the
    /// identity field.
    pub async fn set(&mut self, name: &str, value: Value) -> Result<(), AppError> {
        let value = match (value, self.null_policy) {
            (Value::Null, NullWritePolicy::Reject) => {
                return Err(AppError::InvalidInput(format!(
                    "refusing to write null to '{}' on {}; see NullWritePolicy",
                    name, self.entity
                )));
            }
            (Value::Null, NullWritePolicy::NoneString) => Value::String("none".into()),
            (value, _) => value,
        };

        let spec = spec_for(self.table, name).ok_or_else(|| {
            AppError::UnsupportedOperation(format!(
                "{} has no attribute '{}'",
                self.entity, name
            ))
        })?;

        match spec.target {
            WriteTarget::Identity => {
                // Identity is fixed at construction; the write is dropped.
                debug!("{}: ignoring write to identity field", self.entity);
                Ok(())
            }
            WriteTarget::ReadOnly => Err(AppError::UnsupportedOperation(format!(
                "'{}' is read-only on {}",
                spec.name, self.entity
            ))),
            WriteTarget::StateBulk => {
                if !value.is_object() {
                    return Err(AppError::InvalidInput(format!(
                        "'{}' takes a JSON object, got {}",
                        spec.name, value
                    )));
                }
                self.client.put(&self.write_path, &value).await?;
                self.fold(&value);
                Ok(())
            }
            WriteTarget::StateField => {
                let mut body = Map::new();
                body.insert(spec.name.to_string(), value.clone());
                self.client
                    .put(&self.write_path, &Value::Object(body))
                    .await?;
                self.cache.insert(spec.name.to_string(), value);
                Ok(())
            }
            WriteTarget::Rename => {
                let mut body = Map::new();
                body.insert("name".to_string(), value.clone());
                self.client
                    .put(&self.root_path, &Value::Object(body))
                    .await?;
                self.cache.insert("name".to_string(), value);
                Ok(())
            }
        }
    }

    /// GET the entity root, fold its state object into the cache and return
    /// that object.
    async fn refresh(&mut self) -> Result<Value, AppError> {
        let document = self.client.get(&self.root_path).await?;
        let state = document
            .get(self.state_key)
            .cloned()
            .ok_or_else(|| AppError::Protocol {
                status: 200,
                reason: format!(
                    "response for {} is missing its '{}' object",
                    self.entity, self.state_key
                ),
            })?;
        self.fold(&state);
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn light_proxy(policy: NullWritePolicy) -> AttributeProxy {
        let client = BridgeClient::new("127.0.0.1", "testuser").unwrap();
        let mut proxy = AttributeProxy::new(
            client,
            "light 1".into(),
            "/lights/1".into(),
            "/lights/1/state".into(),
            "state",
            LIGHT_ATTRIBUTES,
            policy,
        );
        proxy.seed("id", json!(1));
        proxy.seed("name", json!("Kitchen"));
        proxy.fold(&json!({"on": true, "bri": 100}));
        proxy
    }

    #[test]
    fn test_table_lookup() {
        let bri = spec_for(LIGHT_ATTRIBUTES, "bri").unwrap();
        assert!(!bri.live);
        assert_eq!(bri.target, WriteTarget::StateField);

        let state = spec_for(LIGHT_ATTRIBUTES, "state").unwrap();
        assert!(state.live);
        assert_eq!(state.target, WriteTarget::StateBulk);

        assert!(spec_for(LIGHT_ATTRIBUTES, "scene").is_none());
        assert!(spec_for(GROUP_ATTRIBUTES, "scene").is_some());
        assert!(spec_for(GROUP_ATTRIBUTES, "reachable").is_none());
    }

    #[tokio::test]
    async fn test_cached_read() {
        let mut proxy = light_proxy(NullWritePolicy::Reject);
        assert_eq!(proxy.get("bri").await.unwrap(), json!(100));
        assert_eq!(proxy.get("name").await.unwrap(), json!("Kitchen"));
    }

    #[tokio::test]
    async fn test_unpopulated_read_fails() {
        let mut proxy = light_proxy(NullWritePolicy::Reject);
        let err = proxy.get("effect").await.unwrap_err();
        match err {
            AppError::AttributeNotFound { entity, attribute } => {
                assert_eq!(entity, "light 1");
                assert_eq!(attribute, "effect");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_identity_write_is_dropped() {
        let mut proxy = light_proxy(NullWritePolicy::Reject);
        // No server is listening; if this issued a request it would fail.
        proxy.set("id", json!(99)).await.unwrap();
        assert_eq!(proxy.cached("id"), Some(&json!(1)));
    }

    #[tokio::test]
    async fn test_unknown_attribute_write_fails() {
        let mut proxy = light_proxy(NullWritePolicy::Reject);
        let err = proxy.set("banana", json!(1)).await.unwrap_err();
        assert!(matches!(err, AppError::UnsupportedOperation(_)));
    }

    #[tokio::test]
    async fn test_read_only_write_fails() {
        let mut proxy = light_proxy(NullWritePolicy::Reject);
        let err = proxy.set("colormode", json!("hs")).await.unwrap_err();
        assert!(matches!(err, AppError::UnsupportedOperation(_)));
    }

    #[tokio::test]
    async fn test_null_write_rejected_by_default() {
        let mut proxy = light_proxy(NullWritePolicy::Reject);
        let err = proxy.set("alert", Value::Null).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert_eq!(proxy.cached("alert"), None);
    }

    #[tokio::test]
    async fn test_bulk_write_requires_object() {
        let mut proxy = light_proxy(NullWritePolicy::Reject);
        let err = proxy.set("state", json!(42)).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_snapshot_reflects_cache() {
        let proxy = light_proxy(NullWritePolicy::Reject);
        let snapshot = proxy.snapshot();
        assert_eq!(snapshot["on"], json!(true));
        assert_eq!(snapshot["bri"], json!(100));
        assert_eq!(snapshot["name"], json!("Kitchen"));
    }
}
