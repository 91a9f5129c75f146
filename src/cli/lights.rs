use clap::Subcommand;
use serde_json::{json, Value};
use tabled::Tabled;

use crate::auth::credentials::resolve_target;
use crate::bridge::Bridge;
use crate::cli::output::{print_json, print_table};
use crate::config::{OutputMode, RuntimeConfig};
use crate::error::AppError;

#[derive(Subcommand)]
pub enum LightsCommand {
    /// List all lights with their discovery-time state
    List,

    /// Fetch a light's current state from the bridge
    Get {
        /// Light name or id
        light: String,
    },

    /// Turn a light on
    On {
        /// Light name or id
        light: String,
    },

    /// Turn a light off
    Off {
        /// Light name or id
        light: String,
    },

    /// Set brightness (1-254)
    Brightness {
        /// Light name or id
        light: String,
        /// Brightness level
        #[arg(value_parser = clap::value_parser!(u8).range(1..=254))]
        level: u8,
    },

    /// Set color temperature in mireds (153 cold - 500 warm)
    Ct {
        /// Light name or id
        light: String,
        /// Color temperature in mireds
        #[arg(value_parser = clap::value_parser!(u16).range(153..=500))]
        mireds: u16,
    },

    /// Set color as CIE xy chromaticity coordinates
    Color {
        /// Light name or id
        light: String,
        /// x coordinate (0.0-1.0)
        x: f64,
        /// y coordinate (0.0-1.0)
        y: f64,
    },

    /// Rename a light
    Rename {
        /// Light name or id
        light: String,
        /// New name
        name: String,
    },

    /// Write a raw attribute (value parsed as JSON, else taken as a string)
    Set {
        /// Light name or id
        light: String,
        /// Attribute name (on, bri, hue, sat, xy, ct, alert, effect, ...)
        attribute: String,
        /// Attribute value
        value: String,
    },
}

#[derive(Tabled)]
struct LightRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "ON")]
    on: String,
    #[tabled(rename = "BRI")]
    bri: String,
    #[tabled(rename = "REACHABLE")]
    reachable: String,
}

pub async fn handle(cmd: &LightsCommand, config: &RuntimeConfig) -> Result<(), AppError> {
    let target = resolve_target(config)?;
    let mut bridge = Bridge::connect(&target.ip, &target.username).await?;

    match cmd {
        LightsCommand::List => handle_list(&bridge, config),
        LightsCommand::Get { light } => {
            let light = bridge.find_light_mut(light)?;
            let state = light.state().await?;
            print_json(&json!({
                "id": light.id,
                "name": light.name(),
                "model_id": light.model_id,
                "state": state,
            }));
            Ok(())
        }
        LightsCommand::On { light } => {
            let light = bridge.find_light_mut(light)?;
            light.turn_on().await?;
            print_json(&json!({"light": light.name(), "on": true}));
            Ok(())
        }
        LightsCommand::Off { light } => {
            let light = bridge.find_light_mut(light)?;
            light.turn_off().await?;
            print_json(&json!({"light": light.name(), "on": false}));
            Ok(())
        }
        LightsCommand::Brightness { light, level } => {
            let light = bridge.find_light_mut(light)?;
            light.set_brightness(*level).await?;
            print_json(&json!({"light": light.name(), "bri": level}));
            Ok(())
        }
        LightsCommand::Ct { light, mireds } => {
            let light = bridge.find_light_mut(light)?;
            light.set_color_temp(*mireds).await?;
            print_json(&json!({"light": light.name(), "ct": mireds}));
            Ok(())
        }
        LightsCommand::Color { light, x, y } => {
            let light = bridge.find_light_mut(light)?;
            light.set_xy(*x, *y).await?;
            print_json(&json!({"light": light.name(), "xy": [x, y]}));
            Ok(())
        }
        LightsCommand::Rename { light, name } => {
            let light = bridge.find_light_mut(light)?;
            light.rename(name).await?;
            print_json(&json!({"light": light.id, "name": name}));
            Ok(())
        }
        LightsCommand::Set {
            light,
            attribute,
            value,
        } => {
            let parsed = parse_value(value);
            let light = bridge.find_light_mut(light)?;
            light.set(attribute, parsed.clone()).await?;
            print_json(&json!({
                "light": light.name(),
                "attribute": attribute,
                "value": parsed,
            }));
            Ok(())
        }
    }
}

fn handle_list(bridge: &Bridge, config: &RuntimeConfig) -> Result<(), AppError> {
    if config.output_mode == OutputMode::Table {
        let rows: Vec<LightRow> = bridge
            .lights()
            .values()
            .map(|light| {
                let state = light.cached_state();
                LightRow {
                    id: light.id,
                    name: light.name().to_string(),
                    on: flag(state.on),
                    bri: state
                        .bri
                        .map(|v| v.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    reachable: flag(state.reachable),
                }
            })
            .collect();
        print_table(&rows);
    } else {
        let lights: Vec<Value> = bridge
            .lights()
            .values()
            .map(|light| {
                json!({
                    "id": light.id,
                    "name": light.name(),
                    "model_id": light.model_id,
                    "state": light.cached_state(),
                })
            })
            .collect();
        print_json(&json!(lights));
    }
    Ok(())
}

fn flag(value: Option<bool>) -> String {
    match value {
        Some(true) => "yes".to_string(),
        Some(false) => "no".to_string(),
        None => "-".to_string(),
    }
}

/// A raw value from the command line: valid JSON is passed through, anything
/// else becomes a string (so `on true` and `alert select` both work).
pub(super) fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("true"), json!(true));
        assert_eq!(parse_value("200"), json!(200));
        assert_eq!(parse_value("[0.3, 0.4]"), json!([0.3, 0.4]));
        assert_eq!(parse_value("select"), json!("select"));
        assert_eq!(parse_value("null"), Value::Null);
    }
}
