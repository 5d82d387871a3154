use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::services::SmsMessage;
use crate::startup::AppState;
use service_core::error::AppError;

#[derive(Debug, Deserialize, Validate)]
pub struct SendSmsRequest {
    #[validate(length(min = 10, message = "Phone number must be at least 10 characters"))]
    pub to: String,
    #[validate(length(
        min = 1,
        max = 1600,
        message = "SMS body must be between 1 and 1600 characters"
    ))]
    pub body: String,
}

#[derive(Debug, Serialize)]
pub struct SendSmsResponse {
    pub status: String,
    pub message_sid: String,
}

#[tracing::instrument(skip(state, request))]
pub async fn send_sms(
    State(state): State<AppState>,
    Json(request): Json<SendSmsRequest>,
) -> Result<(StatusCode, Json<SendSmsResponse>), AppError> {
    request.validate()?;

    let sms_message = SmsMessage {
        to: request.to,
        body: request.body,
    };

    let response = match state.sms_provider.send(&sms_message).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(
                to = %sms_message.to,
                error = %e,
                "Failed to send SMS"
            );
            return Err(e.into());
        }
    };

    let message_sid = response
        .provider_id
        .ok_or_else(|| AppError::BadGateway("Provider returned no message SID".to_string()))?;

    tracing::info!(
        to = %sms_message.to,
        message_sid = %message_sid,
        "SMS sent successfully"
    );

    Ok((
        StatusCode::OK,
        Json(SendSmsResponse {
            status: "success".to_string(),
            message_sid,
        }),
    ))
}
