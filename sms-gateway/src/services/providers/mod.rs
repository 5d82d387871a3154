pub mod sms;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use thiserror::Error;

pub use sms::{MockSmsProvider, TwilioProvider};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider not enabled: {0}")]
    NotEnabled(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Send error: {0}")]
    SendFailed(String),

    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Authentication error: {0}")]
    Authentication(String),
}

/// Provider failures carry their own HTTP semantics: recipient problems are
/// the caller's fault, credential and config faults are ours, everything else
/// is the upstream's.
impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::InvalidRecipient(msg) => {
                AppError::BadRequest(anyhow::anyhow!("invalid recipient: {}", msg))
            }
            ProviderError::NotEnabled(msg) => AppError::ServiceUnavailable(msg),
            ProviderError::Configuration(msg) => {
                AppError::ConfigError(anyhow::anyhow!("provider configuration: {}", msg))
            }
            ProviderError::Authentication(msg) => {
                AppError::InternalError(anyhow::anyhow!("provider authentication: {}", msg))
            }
            ProviderError::Connection(msg)
            | ProviderError::SendFailed(msg)
            | ProviderError::RateLimited(msg) => AppError::BadGateway(msg),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResponse {
    pub provider_id: Option<String>,
    pub success: bool,
    pub message: Option<String>,
}

impl ProviderResponse {
    pub fn success(provider_id: Option<String>) -> Self {
        Self {
            provider_id,
            success: true,
            message: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SmsMessage {
    pub to: String,
    pub body: String,
}

#[async_trait]
pub trait SmsProvider: Send + Sync {
    async fn send(&self, sms: &SmsMessage) -> Result<ProviderResponse, ProviderError>;
    async fn health_check(&self) -> Result<(), ProviderError>;
    fn is_enabled(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    fn status_for(err: ProviderError) -> StatusCode {
        AppError::from(err).into_response().status()
    }

    #[test]
    fn recipient_errors_are_client_errors() {
        assert_eq!(
            status_for(ProviderError::InvalidRecipient("bad number".into())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn upstream_errors_are_bad_gateway() {
        assert_eq!(
            status_for(ProviderError::Connection("timeout".into())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(ProviderError::SendFailed("boom".into())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(ProviderError::RateLimited("slow down".into())),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn our_faults_are_internal_errors() {
        assert_eq!(
            status_for(ProviderError::Authentication("401".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_for(ProviderError::Configuration("no sid".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn disabled_provider_is_service_unavailable() {
        assert_eq!(
            status_for(ProviderError::NotEnabled("disabled".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
