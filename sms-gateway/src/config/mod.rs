use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub twilio: TwilioConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
    pub api_base_url: String,
    pub enabled: bool,
}

impl GatewayConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        let is_prod = common.is_prod();

        Ok(GatewayConfig {
            common,
            twilio: TwilioConfig {
                account_sid: get_env("TWILIO_ACCOUNT_SID", Some(""), is_prod)?,
                auth_token: get_env("TWILIO_AUTH_TOKEN", Some(""), is_prod)?,
                from_number: get_env("TWILIO_FROM_NUMBER", Some(""), is_prod)?,
                api_base_url: get_env(
                    "TWILIO_API_BASE_URL",
                    Some("https://api.twilio.com"),
                    is_prod,
                )?,
                enabled: env::var("TWILIO_ENABLED")
                    .unwrap_or_else(|_| "false".to_string())
                    .parse()
                    .unwrap_or(false),
            },
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
