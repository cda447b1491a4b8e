//! Settings persistence in `localStorage`.
//!
//! The whole `AppConfig` is stored as one JSON document. A missing or
//! unreadable entry falls back to the defaults.

use web_sys::Storage;

use cards_types::{CardsError, Result, config::AppConfig};

pub const SETTINGS_KEY: &str = "knowledge_cards.settings";

fn local_storage() -> Result<Storage> {
    web_sys::window()
        .ok_or_else(|| CardsError::Config("No window object".to_string()))?
        .local_storage()
        .map_err(|e| CardsError::Config(format!("{:?}", e)))?
        .ok_or_else(|| CardsError::Config("localStorage not available".to_string()))
}

/// Parse and validate a stored settings document
pub fn decode_config(json: &str) -> Result<AppConfig> {
    let config: AppConfig = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
}

pub fn encode_config(config: &AppConfig) -> Result<String> {
    Ok(serde_json::to_string(config)?)
}

/// Stored settings, or the defaults when none are usable
pub fn load_config() -> AppConfig {
    let stored = local_storage().and_then(|storage| {
        storage
            .get_item(SETTINGS_KEY)
            .map_err(|e| CardsError::Config(format!("{:?}", e)))
    });

    match stored {
        Ok(Some(json)) => decode_config(&json).unwrap_or_else(|e| {
            log::warn!("ignoring stored settings: {}", e);
            AppConfig::default()
        }),
        Ok(None) => AppConfig::default(),
        Err(e) => {
            log::warn!("settings unavailable, using defaults: {}", e);
            AppConfig::default()
        }
    }
}

/// Validate and persist. Invalid settings are rejected without being stored.
pub fn save_config(config: &AppConfig) -> Result<()> {
    config.validate()?;
    let json = encode_config(config)?;
    local_storage()?
        .set_item(SETTINGS_KEY, &json)
        .map_err(|e| CardsError::Config(format!("{:?}", e)))?;
    log::info!("settings saved");
    Ok(())
}
