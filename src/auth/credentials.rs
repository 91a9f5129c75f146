use crate::auth::store::{self, BridgeCredentials};
use crate::config::RuntimeConfig;
use crate::error::AppError;

/// The bridge a command talks to, after flag/env/store resolution.
#[derive(Debug)]
pub struct BridgeTarget {
    pub ip: String,
    pub username: String,
}

/// Resolve the bridge address and username: explicit flags (clap already
/// folded the env fallbacks in) win, stored credentials fill the gaps,
/// and anything still missing means the user never authorized.
pub fn resolve_target(config: &RuntimeConfig) -> Result<BridgeTarget, AppError> {
    let stored = if config.bridge.is_none() || config.user.is_none() {
        store::get_credentials()?
    } else {
        None
    };
    resolve_with(config, stored)
}

fn resolve_with(
    config: &RuntimeConfig,
    stored: Option<BridgeCredentials>,
) -> Result<BridgeTarget, AppError> {
    let ip = config
        .bridge
        .clone()
        .or_else(|| stored.as_ref().map(|creds| creds.bridge.clone()));
    let username = config
        .user
        .clone()
        .or_else(|| stored.as_ref().map(|creds| creds.username.clone()));
    match (ip, username) {
        (Some(ip), Some(username)) => Ok(BridgeTarget { ip, username }),
        _ => Err(AppError::NotAuthorized),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputMode;

    fn config(bridge: Option<&str>, user: Option<&str>) -> RuntimeConfig {
        RuntimeConfig {
            output_mode: OutputMode::Json,
            verbose: false,
            bridge: bridge.map(String::from),
            user: user.map(String::from),
        }
    }

    fn stored() -> Option<BridgeCredentials> {
        Some(BridgeCredentials {
            bridge: "10.0.0.5".to_string(),
            username: "storeduser".to_string(),
        })
    }

    #[test]
    fn test_flags_win() {
        let target = resolve_with(&config(Some("1.2.3.4"), Some("flaguser")), stored()).unwrap();
        assert_eq!(target.ip, "1.2.3.4");
        assert_eq!(target.username, "flaguser");
    }

    #[test]
    fn test_store_fills_gaps() {
        let target = resolve_with(&config(None, None), stored()).unwrap();
        assert_eq!(target.ip, "10.0.0.5");
        assert_eq!(target.username, "storeduser");

        let target = resolve_with(&config(Some("1.2.3.4"), None), stored()).unwrap();
        assert_eq!(target.ip, "1.2.3.4");
        assert_eq!(target.username, "storeduser");
    }

    #[test]
    fn test_missing_pieces_mean_not_authorized() {
        let err = resolve_with(&config(None, None), None).unwrap_err();
        assert!(matches!(err, AppError::NotAuthorized));

        let err = resolve_with(&config(Some("1.2.3.4"), None), None).unwrap_err();
        assert!(matches!(err, AppError::NotAuthorized));
    }
}
