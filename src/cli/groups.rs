use clap::Subcommand;
use serde_json::{json, Value};
use tabled::Tabled;

use crate::auth::credentials::resolve_target;
use crate::bridge::Bridge;
use crate::cli::output::{print_json, print_table};
use crate::config::{OutputMode, RuntimeConfig};
use crate::error::AppError;

#[derive(Subcommand)]
pub enum GroupsCommand {
    /// List all groups
    List,

    /// Fetch one group (0 is the all-lights group)
    Get {
        /// Group name or id
        group: String,
    },

    /// Turn every light in a group on
    On {
        /// Group name or id
        group: String,
    },

    /// Turn every light in a group off
    Off {
        /// Group name or id
        group: String,
    },

    /// Write a raw attribute to the group's action endpoint
    Set {
        /// Group name or id
        group: String,
        /// Attribute name (on, bri, hue, sat, xy, ct, scene, ...)
        attribute: String,
        /// Attribute value
        value: String,
    },

    /// Recall a scene on a group
    Scene {
        /// Group name or id
        group: String,
        /// Scene name or id
        scene: String,
    },
}

#[derive(Tabled)]
struct GroupRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "TYPE")]
    group_type: String,
    #[tabled(rename = "LIGHTS")]
    lights: usize,
    #[tabled(rename = "ANY ON")]
    any_on: bool,
}

pub async fn handle(cmd: &GroupsCommand, config: &RuntimeConfig) -> Result<(), AppError> {
    let target = resolve_target(config)?;
    let bridge = Bridge::connect(&target.ip, &target.username).await?;

    match cmd {
        GroupsCommand::List => handle_list(&bridge, config).await,
        GroupsCommand::Get { group } => {
            let group = bridge.find_group(group).await?;
            print_json(&json!({
                "id": group.id,
                "name": group.name(),
                "type": group.group_type,
                "lights": group.lights,
                "state": group.state(),
                "action": group.cached_action(),
            }));
            Ok(())
        }
        GroupsCommand::On { group } => {
            let mut group = bridge.find_group(group).await?;
            group.turn_on().await?;
            print_json(&json!({"group": group.name(), "on": true}));
            Ok(())
        }
        GroupsCommand::Off { group } => {
            let mut group = bridge.find_group(group).await?;
            group.turn_off().await?;
            print_json(&json!({"group": group.name(), "on": false}));
            Ok(())
        }
        GroupsCommand::Set {
            group,
            attribute,
            value,
        } => {
            let parsed = super::lights::parse_value(value);
            let mut group = bridge.find_group(group).await?;
            group.set(attribute, parsed.clone()).await?;
            print_json(&json!({
                "group": group.name(),
                "attribute": attribute,
                "value": parsed,
            }));
            Ok(())
        }
        GroupsCommand::Scene { group, scene } => {
            let scene = bridge.find_scene(scene).await?;
            let mut group = bridge.find_group(group).await?;
            group.recall_scene(&scene.id).await?;
            print_json(&json!({
                "group": group.name(),
                "scene": scene.name,
                "scene_id": scene.id,
            }));
            Ok(())
        }
    }
}

async fn handle_list(bridge: &Bridge, config: &RuntimeConfig) -> Result<(), AppError> {
    let groups = bridge.groups().await?;

    if config.output_mode == OutputMode::Table {
        let rows: Vec<GroupRow> = groups
            .values()
            .map(|group| GroupRow {
                id: group.id,
                name: group.name().to_string(),
                group_type: group
                    .group_type
                    .clone()
                    .unwrap_or_else(|| "-".to_string()),
                lights: group.lights.len(),
                any_on: group.state().any_on,
            })
            .collect();
        print_table(&rows);
    } else {
        let entries: Vec<Value> = groups
            .values()
            .map(|group| {
                json!({
                    "id": group.id,
                    "name": group.name(),
                    "type": group.group_type,
                    "lights": group.lights,
                    "state": group.state(),
                })
            })
            .collect();
        print_json(&json!(entries));
    }
    Ok(())
}
