//! Form mail dispatch endpoint.
//!
//! Provider failures are reported in the body rather than failing the
//! request: the forms retry or apologize client-side.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};

use crate::services::email::{self, FormKind};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EmailRequest {
    pub form_type: FormKind,
    pub data: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct EmailResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EmailResponse {
    fn sent(message_id: String) -> Self {
        Self { success: true, message_id: Some(message_id), error: None }
    }

    fn failed(error: String) -> Self {
        Self { success: false, message_id: None, error: Some(error) }
    }
}

/// `POST /api/email` — dispatch a contact/quote/booking/custom form.
pub async fn dispatch(State(state): State<AppState>, Json(req): Json<EmailRequest>) -> Response {
    let Some(config) = &state.email else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(EmailResponse::failed("email dispatch not configured".into())),
        )
            .into_response();
    };

    match email::send_form(config, req.form_type, &req.data).await {
        Ok(message_id) => Json(EmailResponse::sent(message_id)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, form = ?req.form_type, "form mail dispatch failed");
            Json(EmailResponse::failed(e.to_string())).into_response()
        }
    }
}

#[cfg(test)]
#[path = "email_test.rs"]
mod tests;
