use super::{ProviderError, ProviderResponse, SmsMessage, SmsProvider};
use crate::config::TwilioConfig;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::sync::atomic::{AtomicU64, Ordering};

// Error codes Twilio returns for unusable destination numbers.
const INVALID_RECIPIENT_CODES: [i64; 3] = [21211, 21608, 21614];

pub struct TwilioProvider {
    config: TwilioConfig,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct TwilioMessageResponse {
    sid: String,
    status: String,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TwilioApiError {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: String,
}

impl TwilioProvider {
    pub fn new(config: TwilioConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.account_sid
        )
    }
}

#[async_trait]
impl SmsProvider for TwilioProvider {
    async fn send(&self, sms: &SmsMessage) -> Result<ProviderResponse, ProviderError> {
        if !self.config.enabled {
            return Err(ProviderError::NotEnabled(
                "Twilio SMS provider is not enabled".to_string(),
            ));
        }

        // Normalize phone number (remove non-digits except leading +)
        let normalized_phone = sms
            .to
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '+')
            .collect::<String>();

        if normalized_phone.is_empty() {
            return Err(ProviderError::InvalidRecipient(
                "Phone number is empty".to_string(),
            ));
        }

        let params = [
            ("To", normalized_phone.as_str()),
            ("From", self.config.from_number.as_str()),
            ("Body", sms.body.as_str()),
        ];

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                ProviderError::Connection(format!("Failed to connect to Twilio: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let api_error: TwilioApiError = response.json().await.unwrap_or(TwilioApiError {
                code: None,
                message: "Unknown error".to_string(),
            });

            let err = if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                ProviderError::Authentication(format!(
                    "Twilio rejected credentials: {}",
                    api_error.message
                ))
            } else if status == StatusCode::TOO_MANY_REQUESTS {
                ProviderError::RateLimited(format!(
                    "Twilio throttled the request: {}",
                    api_error.message
                ))
            } else if api_error
                .code
                .is_some_and(|code| INVALID_RECIPIENT_CODES.contains(&code))
            {
                ProviderError::InvalidRecipient(api_error.message)
            } else {
                ProviderError::SendFailed(format!(
                    "Twilio API returned error status {}: {}",
                    status, api_error.message
                ))
            };
            return Err(err);
        }

        let message: TwilioMessageResponse = response.json().await.map_err(|e| {
            ProviderError::SendFailed(format!("Failed to parse Twilio response: {}", e))
        })?;

        if message.status == "failed" || message.status == "undelivered" {
            return Err(ProviderError::SendFailed(format!(
                "Twilio reported message {} as {}: {}",
                message.sid,
                message.status,
                message.error_message.unwrap_or_default()
            )));
        }

        tracing::info!(
            to = %sms.to,
            message_sid = %message.sid,
            "SMS sent successfully via Twilio"
        );

        Ok(ProviderResponse::success(Some(message.sid)))
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        if !self.config.enabled {
            return Ok(());
        }

        // Twilio has no cheap ping endpoint, so we just check if config is valid
        if self.config.account_sid.is_empty() {
            return Err(ProviderError::Configuration(
                "Twilio account_sid is not configured".to_string(),
            ));
        }

        if self.config.auth_token.is_empty() {
            return Err(ProviderError::Configuration(
                "Twilio auth_token is not configured".to_string(),
            ));
        }

        if self.config.from_number.is_empty() {
            return Err(ProviderError::Configuration(
                "Twilio from_number is not configured".to_string(),
            ));
        }

        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.config.enabled
    }
}

/// Mock SMS provider for testing and disabled-provider deployments
pub struct MockSmsProvider {
    enabled: bool,
    send_count: AtomicU64,
}

impl MockSmsProvider {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            send_count: AtomicU64::new(0),
        }
    }

    pub fn send_count(&self) -> u64 {
        self.send_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SmsProvider for MockSmsProvider {
    async fn send(&self, sms: &SmsMessage) -> Result<ProviderResponse, ProviderError> {
        if !self.enabled {
            return Err(ProviderError::NotEnabled(
                "Mock SMS provider is not enabled".to_string(),
            ));
        }

        self.send_count.fetch_add(1, Ordering::SeqCst);

        tracing::info!(
            to = %sms.to,
            body_length = %sms.body.len(),
            "[MOCK] SMS would be sent"
        );

        Ok(ProviderResponse::success(Some(format!(
            "mock-sms-{}",
            self.send_count.load(Ordering::SeqCst)
        ))))
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}
