//! Bridge connection, discovery, and entity lookup.

use std::collections::BTreeMap;

use log::{debug, warn};
use serde_json::{json, Map, Value};

use crate::api::client::BridgeClient;
use crate::api::errors::ERR_RESOURCE_UNAVAILABLE;
use crate::api::response;
use crate::error::AppError;
use crate::models::attribute::NullWritePolicy;
use crate::models::group::Group;
use crate::models::light::Light;
use crate::models::scene::Scene;

#[derive(Debug, Clone, Copy, Default)]
pub struct BridgeOptions {
    pub null_writes: NullWritePolicy,
}

/// A connected bridge and its discovered lights.
///
/// `connect` performs one GET against the bridge root and materializes a
/// `Light` per discovered entry. Groups and scenes are fetched on demand.
#[derive(Debug)]
pub struct Bridge {
    client: BridgeClient,
    ip: String,
    username: String,
    name: String,
    lights: BTreeMap<u32, Light>,
    options: BridgeOptions,
}

impl Bridge {
    pub async fn connect(ip: &str, username: &str) -> Result<Self, AppError> {
        Self::connect_with(ip, username, BridgeOptions::default()).await
    }

    pub async fn connect_with(
        ip: &str,
        username: &str,
        options: BridgeOptions,
    ) -> Result<Self, AppError> {
        let client = BridgeClient::new(ip, username)?;
        let datastore = client.get("").await?;

        let name = datastore
            .get("config")
            .and_then(|config| config.get("name"))
            .and_then(|v| v.as_str())
            .unwrap_or("Hue Bridge")
            .to_string();

        let mut lights = BTreeMap::new();
        if let Some(map) = datastore.get("lights").and_then(|v| v.as_object()) {
            for (key, descriptor) in map {
                match key.parse::<u32>() {
                    Ok(id) => {
                        lights.insert(
                            id,
                            Light::from_descriptor(
                                client.clone(),
                                id,
                                descriptor,
                                options.null_writes,
                            ),
                        );
                    }
                    Err(_) => warn!("skipping light with non-numeric id '{}'", key),
                }
            }
        }
        debug!("discovered {} lights on '{}'", lights.len(), name);

        Ok(Self {
            client,
            ip: ip.to_string(),
            username: username.to_string(),
            name,
            lights,
            options,
        })
    }

    /// Pair with the bridge: POST the devicetype to `/api` and return the
    /// username the bridge issues. Requires the link button to have been
    /// pressed within the last 30 seconds, otherwise the bridge answers
    /// with error 101 and this fails with `LinkButtonNotPressed`.
    pub async fn authorize(
        ip: &str,
        devicetype: &str,
        proposed_username: Option<&str>,
    ) -> Result<String, AppError> {
        let client = BridgeClient::unauthenticated(ip)?;
        let mut body = Map::new();
        body.insert("devicetype".to_string(), json!(devicetype));
        if let Some(username) = proposed_username {
            body.insert("username".to_string(), json!(username));
        }
        let reply = client.post("/api", &Value::Object(body)).await?;
        response::success_value(&reply)
            .and_then(|success| success.get("username"))
            .and_then(|v| v.as_str())
            .map(String::from)
            .ok_or_else(|| AppError::Protocol {
                status: 200,
                reason: "pairing response did not include a username".to_string(),
            })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ip(&self) -> &str {
        &self.ip
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    // -- Lights --

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    pub fn lights(&self) -> &BTreeMap<u32, Light> {
        &self.lights
    }

    pub fn lights_mut(&mut self) -> &mut BTreeMap<u32, Light> {
        &mut self.lights
    }

    pub fn light(&self, id: u32) -> Option<&Light> {
        self.lights.get(&id)
    }

    pub fn light_mut(&mut self, id: u32) -> Option<&mut Light> {
        self.lights.get_mut(&id)
    }

    /// Case-insensitive scan over display names; first match wins.
    pub fn light_by_name(&self, name: &str) -> Option<&Light> {
        let wanted = name.to_lowercase();
        self.lights
            .values()
            .find(|light| light.name().to_lowercase() == wanted)
    }

    /// Resolve a CLI selector: an all-digits selector is an id, anything
    /// else a case-insensitive name.
    pub fn find_light(&self, selector: &str) -> Result<&Light, AppError> {
        let id = self.resolve_light_id(selector)?;
        self.lights
            .get(&id)
            .ok_or_else(|| AppError::LightNotFound(selector.to_string()))
    }

    pub fn find_light_mut(&mut self, selector: &str) -> Result<&mut Light, AppError> {
        let id = self.resolve_light_id(selector)?;
        self.lights
            .get_mut(&id)
            .ok_or_else(|| AppError::LightNotFound(selector.to_string()))
    }

    fn resolve_light_id(&self, selector: &str) -> Result<u32, AppError> {
        if !selector.is_empty() && selector.chars().all(|c| c.is_ascii_digit()) {
            return selector
                .parse::<u32>()
                .ok()
                .filter(|id| self.lights.contains_key(id))
                .ok_or_else(|| AppError::LightNotFound(selector.to_string()));
        }
        self.light_by_name(selector)
            .map(|light| light.id)
            .ok_or_else(|| AppError::LightNotFound(selector.to_string()))
    }

    pub async fn rename_light(&mut self, id: u32, name: &str) -> Result<(), AppError> {
        let light = self
            .lights
            .get_mut(&id)
            .ok_or_else(|| AppError::LightNotFound(id.to_string()))?;
        light.rename(name).await
    }

    // -- Groups --

    pub async fn groups(&self) -> Result<BTreeMap<u32, Group>, AppError> {
        let reply = self.client.get("/groups").await?;
        let mut groups = BTreeMap::new();
        if let Some(map) = reply.as_object() {
            for (key, descriptor) in map {
                match key.parse::<u32>() {
                    Ok(id) => {
                        groups.insert(
                            id,
                            Group::from_descriptor(
                                self.client.clone(),
                                id,
                                descriptor,
                                self.options.null_writes,
                            ),
                        );
                    }
                    Err(_) => warn!("skipping group with non-numeric id '{}'", key),
                }
            }
        }
        Ok(groups)
    }

    /// Fetch one group. Id 0 is the implicit all-lights group.
    pub async fn group(&self, id: u32) -> Result<Group, AppError> {
        let descriptor = self.client.get(&format!("/groups/{}", id)).await?;
        Ok(Group::from_descriptor(
            self.client.clone(),
            id,
            &descriptor,
            self.options.null_writes,
        ))
    }

    pub async fn group_by_name(&self, name: &str) -> Result<Option<Group>, AppError> {
        let wanted = name.to_lowercase();
        Ok(self
            .groups()
            .await?
            .into_values()
            .find(|group| group.name().to_lowercase() == wanted))
    }

    pub async fn find_group(&self, selector: &str) -> Result<Group, AppError> {
        if !selector.is_empty() && selector.chars().all(|c| c.is_ascii_digit()) {
            let id = selector
                .parse::<u32>()
                .map_err(|_| AppError::GroupNotFound(selector.to_string()))?;
            return match self.group(id).await {
                Err(AppError::Bridge {
                    error_type: ERR_RESOURCE_UNAVAILABLE,
                    ..
                }) => Err(AppError::GroupNotFound(selector.to_string())),
                other => other,
            };
        }
        self.group_by_name(selector)
            .await?
            .ok_or_else(|| AppError::GroupNotFound(selector.to_string()))
    }

    // -- Scenes --

    pub async fn scenes(&self) -> Result<Vec<Scene>, AppError> {
        let reply = self.client.get("/scenes").await?;
        let mut scenes = Vec::new();
        if let Some(map) = reply.as_object() {
            for (id, descriptor) in map {
                match serde_json::from_value::<Scene>(descriptor.clone()) {
                    Ok(mut scene) => {
                        scene.id = id.clone();
                        scenes.push(scene);
                    }
                    Err(err) => warn!("skipping malformed scene '{}': {}", id, err),
                }
            }
        }
        Ok(scenes)
    }

    pub async fn scene_by_name(&self, name: &str) -> Result<Option<Scene>, AppError> {
        let wanted = name.to_lowercase();
        Ok(self
            .scenes()
            .await?
            .into_iter()
            .find(|scene| scene.name.to_lowercase() == wanted))
    }

    /// Resolve a scene selector: exact id match first, then a
    /// case-insensitive name scan.
    pub async fn find_scene(&self, selector: &str) -> Result<Scene, AppError> {
        let scenes = self.scenes().await?;
        let wanted = selector.to_lowercase();
        scenes
            .iter()
            .find(|scene| scene.id == selector)
            .or_else(|| scenes.iter().find(|scene| scene.name.to_lowercase() == wanted))
            .cloned()
            .ok_or_else(|| AppError::SceneNotFound(selector.to_string()))
    }
}
