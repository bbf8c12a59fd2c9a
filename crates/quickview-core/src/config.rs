//! `QUICKVIEW_*` environment variables to [`AppConfig`].

use std::path::PathBuf;
use std::time::Duration;

use crate::app_config::{AppConfig, CatalogFormat};
use crate::ConfigError;

/// Reads `.env` (if present) and then the process environment.
///
/// # Errors
///
/// Returns `ConfigError` when `QUICKVIEW_STORE_URL` is unset or any value
/// fails to parse.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Reads the process environment only; `.env` files are ignored.
///
/// # Errors
///
/// Same as [`load_app_config`].
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|var| std::env::var(var))
}

/// Assembles the config from `lookup`, which tests back with a `HashMap`.
fn build_app_config<L>(lookup: L) -> Result<AppConfig, ConfigError>
where
    L: Fn(&str) -> Result<String, std::env::VarError>,
{
    let non_blank = |var: &str| lookup(var).ok().filter(|v| !v.trim().is_empty());

    let text = |var: &str, fallback: &str| non_blank(var).unwrap_or_else(|| fallback.to_owned());

    let number = |var: &str, fallback: u64| -> Result<u64, ConfigError> {
        match non_blank(var) {
            None => Ok(fallback),
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                ConfigError::InvalidEnvVar {
                    var: var.to_owned(),
                    reason: format!("'{raw}' is not a whole number: {e}"),
                }
            }),
        }
    };

    let store_url = non_blank("QUICKVIEW_STORE_URL")
        .ok_or_else(|| ConfigError::MissingEnvVar("QUICKVIEW_STORE_URL".to_owned()))?;
    if !(store_url.starts_with("http://") || store_url.starts_with("https://")) {
        return Err(ConfigError::InvalidEnvVar {
            var: "QUICKVIEW_STORE_URL".to_owned(),
            reason: format!("'{store_url}' must start with http:// or https://"),
        });
    }

    Ok(AppConfig {
        store_url,
        log_level: text("QUICKVIEW_LOG_LEVEL", "info"),
        request_timeout_secs: number("QUICKVIEW_REQUEST_TIMEOUT_SECS", 30)?,
        user_agent: text("QUICKVIEW_USER_AGENT", "quickview/0.1 (storefront-quick-view)"),
        catalog_format: parse_catalog_format(&text("QUICKVIEW_CATALOG_FORMAT", "js"))?,
        money_format: text("QUICKVIEW_MONEY_FORMAT", "${{amount}}"),
        auto_close_delay: Duration::from_millis(number("QUICKVIEW_AUTO_CLOSE_MS", 1500)?),
        promotions_path: non_blank("QUICKVIEW_PROMOTIONS_PATH").map(PathBuf::from),
    })
}

fn parse_catalog_format(s: &str) -> Result<CatalogFormat, ConfigError> {
    match s.trim().to_lowercase().as_str() {
        "json" => Ok(CatalogFormat::Json),
        "js" => Ok(CatalogFormat::Js),
        other => Err(ConfigError::InvalidEnvVar {
            var: "QUICKVIEW_CATALOG_FORMAT".to_owned(),
            reason: format!("'{other}' is not one of: json, js"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
