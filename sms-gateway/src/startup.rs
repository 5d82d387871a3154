//! Application startup and lifecycle management.

use crate::config::GatewayConfig;
use crate::handlers;
use crate::services::{MockSmsProvider, SmsProvider, TwilioProvider};
use axum::{
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: GatewayConfig,
    pub sms_provider: Arc<dyn SmsProvider>,
}

pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application, selecting the provider from configuration.
    pub async fn build(config: GatewayConfig) -> Result<Self, AppError> {
        let sms_provider: Arc<dyn SmsProvider> = if config.twilio.enabled {
            tracing::info!("Twilio SMS provider initialized");
            Arc::new(TwilioProvider::new(config.twilio.clone()))
        } else {
            tracing::info!("Twilio provider disabled, using mock SMS provider");
            Arc::new(MockSmsProvider::new(true))
        };

        Self::build_with_provider(config, sms_provider).await
    }

    /// Build the application around an explicit provider. Tests use this to
    /// inject stub providers.
    pub async fn build_with_provider(
        config: GatewayConfig,
        sms_provider: Arc<dyn SmsProvider>,
    ) -> Result<Self, AppError> {
        let state = AppState {
            config: config.clone(),
            sms_provider,
        };

        // Bind listener (port 0 = random port for testing)
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("SMS gateway listening on port {}", port);

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped by SIGINT/SIGTERM.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let app = Router::new()
            .route("/send-sms/", post(handlers::send_sms))
            .route("/health", get(handlers::health_check))
            .route("/ready", get(handlers::readiness_check))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state);

        axum::serve(self.listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
