//! Webhook endpoint handlers.
//!
//! The events endpoint verifies the request signature over the raw body
//! before anything else touches it, then parses, classifies, and notifies
//! inline. There is no queue; the outbound calls block the request.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::classify::{first_user_mention, is_help_request, TriggerSet};
use crate::event::{EventEnvelope, InboundEvent};
use crate::slack::Notifier;
use crate::web::signature::verify_slack_signature;
use crate::Config;

/// Header carrying the request signature.
pub const SIGNATURE_HEADER: &str = "X-Slack-Signature";

/// Header carrying the request timestamp.
pub const TIMESTAMP_HEADER: &str = "X-Slack-Request-Timestamp";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub notifier: Notifier,
    pub triggers: TriggerSet,
}

impl AppState {
    pub fn new(config: Config, notifier: Notifier) -> Self {
        let triggers = TriggerSet::from_config(config.trigger_phrases.as_deref());
        Self {
            config: Arc::new(config),
            notifier,
            triggers,
        }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Slack Events
// =============================================================================

/// Webhook response.
#[derive(Serialize)]
pub struct WebhookResponse {
    pub status: &'static str,
}

fn respond(status: StatusCode, label: &'static str) -> Response {
    (status, Json(WebhookResponse { status: label })).into_response()
}

/// GET on the events endpoint is not supported.
pub async fn slack_events_get() -> impl IntoResponse {
    (StatusCode::BAD_REQUEST, "GET method not supported")
}

/// Slack events endpoint.
///
/// This endpoint:
/// 1. Verifies the HMAC signature over the raw body
/// 2. Answers the `url_verification` handshake
/// 3. Classifies message events and runs the denial workflow on a trigger
pub async fn slack_events(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let signature = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok());
    let timestamp = headers.get(TIMESTAMP_HEADER).and_then(|v| v.to_str().ok());

    let (Some(signature), Some(timestamp)) = (signature, timestamp) else {
        warn!(
            has_signature = signature.is_some(),
            has_timestamp = timestamp.is_some(),
            "slack_headers_missing"
        );
        return respond(StatusCode::UNAUTHORIZED, "unauthorized");
    };

    if !verify_slack_signature(
        &state.config.signing_secret,
        timestamp,
        &body,
        signature,
        state.config.signature_max_age,
    ) {
        warn!("slack_signature_invalid");
        return respond(StatusCode::UNAUTHORIZED, "unauthorized");
    }

    let envelope: EventEnvelope = match serde_json::from_slice(&body) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!(error = %e, body_length = body.len(), "slack_payload_malformed");
            return respond(StatusCode::BAD_REQUEST, "malformed");
        }
    };

    match envelope.kind.as_str() {
        "url_verification" => {
            let challenge = envelope.challenge.unwrap_or_default();
            info!("slack_url_verification");
            (StatusCode::OK, challenge).into_response()
        }
        "event_callback" => handle_event_callback(&state, envelope).await,
        other => {
            info!(kind = %other, "slack_event_ignored");
            respond(StatusCode::OK, "ignored")
        }
    }
}

async fn handle_event_callback(state: &AppState, envelope: EventEnvelope) -> Response {
    let Some(event) = envelope.event else {
        warn!(event_id = %envelope.event_id, "slack_event_callback_empty");
        return respond(StatusCode::OK, "ignored");
    };

    let inbound = InboundEvent::from_event(&event);

    info!(
        event_id = %envelope.event_id,
        channel = %inbound.channel,
        ts = %inbound.ts,
        subtype = event.subtype.as_deref().unwrap_or(""),
        text_length = inbound.text.len(),
        attachment_count = inbound.attachment_text.len(),
        "slack_event_received"
    );

    if is_help_request(&inbound.text) {
        info!(text = %inbound.text, "help_requested");
    }

    if !state.triggers.matches_any(inbound.texts()) {
        return respond(StatusCode::OK, "ok");
    }

    let Some(requester) = first_user_mention(&inbound.text) else {
        warn!(
            channel = %inbound.channel,
            ts = %inbound.ts,
            "invite_requester_missing"
        );
        return respond(StatusCode::OK, "ok");
    };

    match state.notifier.notify_denied(requester, &inbound).await {
        Ok(()) => {
            info!(
                requester = %requester,
                channel = %inbound.channel,
                "invite_denial_sent"
            );
            respond(StatusCode::OK, "ok")
        }
        Err(e) => {
            error!(error = %e, requester = %requester, "invite_denial_failed");
            respond(StatusCode::BAD_GATEWAY, "error")
        }
    }
}
