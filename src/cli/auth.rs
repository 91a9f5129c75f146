use dialoguer::Confirm;
use serde_json::json;
use uuid::Uuid;

use crate::auth::store::{self, BridgeCredentials};
use crate::bridge::Bridge;
use crate::cli::output::print_json;
use crate::config::RuntimeConfig;
use crate::error::AppError;

pub async fn handle_authorize(
    ip: Option<&str>,
    username: Option<&str>,
    yes: bool,
    config: &RuntimeConfig,
) -> Result<(), AppError> {
    let ip = ip
        .map(String::from)
        .or_else(|| config.bridge.clone())
        .ok_or_else(|| {
            AppError::InvalidInput("no bridge address given; pass one or use --bridge".to_string())
        })?;

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Press the link button on the bridge at {}, then continue",
                ip
            ))
            .default(true)
            .interact()
            .map_err(|e| AppError::InvalidInput(e.to_string()))?;
        if !confirmed {
            print_json(&json!({"status": "cancelled"}));
            return Ok(());
        }
    }

    let devicetype = format!("huec#{}", Uuid::new_v4().simple());
    let issued = Bridge::authorize(&ip, &devicetype, username).await?;

    store::store_credentials(&BridgeCredentials {
        bridge: ip.clone(),
        username: issued.clone(),
    })?;

    print_json(&json!({
        "status": "authorized",
        "bridge": ip,
        "username": issued,
    }));

    Ok(())
}

pub async fn handle_status(_config: &RuntimeConfig) -> Result<(), AppError> {
    match store::get_credentials()? {
        Some(creds) => {
            print_json(&json!({
                "status": "authorized",
                "bridge": creds.bridge,
                "username": creds.username,
            }));
        }
        None => {
            print_json(&json!({
                "status": "not_authorized",
            }));
        }
    }
    Ok(())
}

pub async fn handle_forget(_config: &RuntimeConfig) -> Result<(), AppError> {
    store::clear_credentials()?;
    print_json(&json!({"status": "forgotten"}));
    Ok(())
}
