//! Conversational AI service adapter.
//!
//! `GET /health`, `POST /chat`, `POST|DELETE /sessions/{id}/focused-card`.

use async_trait::async_trait;
use gloo_net::http::Request;
use serde::{Deserialize, Serialize};

use cards_core::ports::AiPort;
use cards_types::{
    CardsError, Result,
    card::{CardId, FocusedCardContext},
    chat::{AiHealth, ChatReply, ChatRequest, Intent},
    config::BackendConfig,
};
use super::{backend_error, is_success, read_body, transport};

pub struct HttpAiApi {
    base_url: String,
}

impl HttpAiApi {
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            base_url: config.ai_base().to_string(),
        }
    }

    fn focus_url(&self, session_id: &str) -> String {
        format!("{}/sessions/{}/focused-card", self.base_url, session_id)
    }
}

#[async_trait(?Send)]
impl AiPort for HttpAiApi {
    async fn health(&self) -> Option<AiHealth> {
        let url = format!("{}/health", self.base_url);
        let response = match Request::get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                log::debug!("health probe failed: {}", e);
                return None;
            }
        };
        let (status, body) = read_body(response).await.ok()?;
        parse_health(status, &body)
    }

    async fn chat(&self, req: &ChatRequest) -> Result<ChatReply> {
        let url = format!("{}/chat", self.base_url);
        let response = Request::post(&url)
            .json(req)
            .map_err(transport)?
            .send()
            .await
            .map_err(transport)?;
        let (status, body) = read_body(response).await?;
        parse_chat_reply(status, &body)
    }

    async fn set_session_focus(&self, session_id: &str, card: &FocusedCardContext) -> Result<()> {
        let response = Request::post(&self.focus_url(session_id))
            .json(&FocusBody { card })
            .map_err(transport)?
            .send()
            .await
            .map_err(transport)?;
        let (status, body) = read_body(response).await?;
        parse_ack(status, &body)
    }

    async fn clear_session_focus(&self, session_id: &str) -> Result<()> {
        let response = Request::delete(&self.focus_url(session_id))
            .send()
            .await
            .map_err(transport)?;
        let (status, body) = read_body(response).await?;
        parse_ack(status, &body)
    }
}

// ─── Wire types ──────────────────────────────────────────────

#[derive(Serialize)]
struct FocusBody<'a> {
    card: &'a FocusedCardContext,
}

#[derive(Deserialize)]
struct HealthResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    redis_enabled: bool,
}

#[derive(Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    data: Option<T>,
    #[serde(default)]
    error: Option<String>,
}

/// Reply payload as the service emits it; most fields may be null
#[derive(Deserialize)]
struct WireReply {
    #[serde(default)]
    session_id: Option<String>,
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    intent: Option<Intent>,
    #[serde(default)]
    confidence: Option<f32>,
    #[serde(default)]
    reasoning: Option<String>,
    #[serde(default)]
    card_id: Option<CardId>,
    #[serde(default)]
    timestamp: Option<String>,
}

impl From<WireReply> for ChatReply {
    fn from(w: WireReply) -> Self {
        ChatReply {
            session_id: w.session_id,
            response: w.response.unwrap_or_default(),
            intent: w.intent.unwrap_or(Intent::NoAction),
            confidence: w.confidence.unwrap_or(0.0),
            reasoning: w.reasoning.unwrap_or_default(),
            card_id: w.card_id,
            timestamp: w.timestamp.unwrap_or_default(),
        }
    }
}

// ─── Parsing ─────────────────────────────────────────────────

/// `None` unless the service answered 2xx with `status: "healthy"`
pub fn parse_health(status: u16, body: &str) -> Option<AiHealth> {
    if !is_success(status) {
        return None;
    }
    let data: HealthResponse = serde_json::from_str(body).ok()?;
    Some(AiHealth {
        available: data.status == "healthy",
        remote_memory_enabled: data.redis_enabled,
    })
}

pub fn parse_chat_reply(status: u16, body: &str) -> Result<ChatReply> {
    let envelope: Envelope<WireReply> = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(_) if !is_success(status) => return Err(backend_error(status, body)),
        Err(e) => return Err(e.into()),
    };
    if !is_success(status) || !envelope.success {
        return Err(CardsError::Backend(
            envelope
                .error
                .unwrap_or_else(|| format!("HTTP {}: chat request failed", status)),
        ));
    }
    envelope
        .data
        .map(ChatReply::from)
        .ok_or_else(|| CardsError::Backend("chat reply without data".to_string()))
}

/// `{success: true}` acknowledgement of a session focus push
pub fn parse_ack(status: u16, body: &str) -> Result<()> {
    if !is_success(status) {
        return Err(backend_error(status, body));
    }
    let envelope: Envelope<serde_json::Value> = serde_json::from_str(body)?;
    if envelope.success {
        Ok(())
    } else {
        Err(CardsError::Backend(
            envelope.error.unwrap_or_else(|| "request not acknowledged".to_string()),
        ))
    }
}
