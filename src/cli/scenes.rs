use clap::Subcommand;
use tabled::Tabled;

use crate::auth::credentials::resolve_target;
use crate::bridge::Bridge;
use crate::cli::output::{print_json, print_table};
use crate::config::{OutputMode, RuntimeConfig};
use crate::error::AppError;

#[derive(Subcommand)]
pub enum ScenesCommand {
    /// List all stored scenes
    List,

    /// Show one scene's details
    Show {
        /// Scene name or id
        scene: String,
    },
}

#[derive(Tabled)]
struct SceneRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "LIGHTS")]
    lights: usize,
    #[tabled(rename = "UPDATED")]
    updated: String,
}

pub async fn handle(cmd: &ScenesCommand, config: &RuntimeConfig) -> Result<(), AppError> {
    let target = resolve_target(config)?;
    let bridge = Bridge::connect(&target.ip, &target.username).await?;

    match cmd {
        ScenesCommand::List => {
            let scenes = bridge.scenes().await?;
            if config.output_mode == OutputMode::Table {
                let rows: Vec<SceneRow> = scenes
                    .iter()
                    .map(|scene| SceneRow {
                        id: scene.id.clone(),
                        name: scene.name.clone(),
                        lights: scene.lights.len(),
                        updated: scene
                            .last_updated()
                            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                            .unwrap_or_else(|| "-".to_string()),
                    })
                    .collect();
                print_table(&rows);
            } else {
                print_json(&serde_json::to_value(&scenes)?);
            }
            Ok(())
        }
        ScenesCommand::Show { scene } => {
            let scene = bridge.find_scene(scene).await?;
            print_json(&serde_json::to_value(&scene)?);
            Ok(())
        }
    }
}
