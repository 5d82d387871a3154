use async_trait::async_trait;
use service_core::config::Config as CoreConfig;
use sms_gateway::config::{GatewayConfig, TwilioConfig};
use sms_gateway::services::{ProviderError, ProviderResponse, SmsMessage, SmsProvider};
use sms_gateway::startup::Application;
use std::sync::{Arc, Mutex};

pub struct TestApp {
    pub address: String,
    pub port: u16,
}

pub fn test_config() -> GatewayConfig {
    GatewayConfig {
        common: CoreConfig {
            // Random port for testing
            port: 0,
            environment: "dev".to_string(),
        },
        twilio: TwilioConfig {
            account_sid: "ACtest".to_string(),
            auth_token: "test-token".to_string(),
            from_number: "+15550001111".to_string(),
            api_base_url: "https://api.twilio.com".to_string(),
            enabled: false, // Use mock
        },
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        let app = Application::build(test_config())
            .await
            .expect("Failed to build test application");
        Self::run(app).await
    }

    pub async fn spawn_with_provider(provider: Arc<dyn SmsProvider>) -> Self {
        let app = Application::build_with_provider(test_config(), provider)
            .await
            .expect("Failed to build test application");
        Self::run(app).await
    }

    async fn run(app: Application) -> Self {
        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to be ready by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp { address, port }
    }
}

/// Records every message it is asked to send and answers with a fixed SID.
pub struct RecordingProvider {
    sid: String,
    sent: Mutex<Vec<SmsMessage>>,
}

impl RecordingProvider {
    pub fn new(sid: &str) -> Self {
        Self {
            sid: sid.to_string(),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent_messages(&self) -> Vec<SmsMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl SmsProvider for RecordingProvider {
    async fn send(&self, sms: &SmsMessage) -> Result<ProviderResponse, ProviderError> {
        self.sent.lock().unwrap().push(sms.clone());
        Ok(ProviderResponse::success(Some(self.sid.clone())))
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        true
    }
}

/// Fails every send with the error produced by `kind`.
pub struct FailingProvider {
    kind: fn() -> ProviderError,
}

impl FailingProvider {
    pub fn new(kind: fn() -> ProviderError) -> Self {
        Self { kind }
    }
}

#[async_trait]
impl SmsProvider for FailingProvider {
    async fn send(&self, _sms: &SmsMessage) -> Result<ProviderResponse, ProviderError> {
        Err((self.kind)())
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        Err((self.kind)())
    }

    fn is_enabled(&self) -> bool {
        true
    }
}
