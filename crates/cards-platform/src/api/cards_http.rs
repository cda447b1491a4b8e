//! Card service adapter.
//!
//! `GET /cards`, `POST /add-text`, `PUT /cards/{id}`, `DELETE /cards/{id}`.
//! Uses browser `fetch()` via gloo-net.

use async_trait::async_trait;
use gloo_net::http::Request;
use serde::{Deserialize, Serialize};

use cards_core::ports::CardPort;
use cards_types::{
    CardsError, Result,
    card::{Card, CardId, CardPatch},
    config::BackendConfig,
};
use super::{backend_error, is_success, read_body, transport};

pub struct HttpCardApi {
    base_url: String,
}

impl HttpCardApi {
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            base_url: config.cards_base().to_string(),
        }
    }

    fn card_url(&self, id: CardId) -> String {
        format!("{}/cards/{}", self.base_url, id)
    }
}

#[async_trait(?Send)]
impl CardPort for HttpCardApi {
    async fn list_cards(&self) -> Result<Vec<Card>> {
        let url = format!("{}/cards", self.base_url);
        let response = Request::get(&url).send().await.map_err(transport)?;
        let (status, body) = read_body(response).await?;
        parse_card_list(status, &body)
    }

    async fn create_card(&self, text: &str, title: Option<&str>) -> Result<CardId> {
        let url = format!("{}/add-text", self.base_url);
        let response = Request::post(&url)
            .json(&AddTextRequest { text, title })
            .map_err(transport)?
            .send()
            .await
            .map_err(transport)?;
        let (status, body) = read_body(response).await?;
        parse_created(status, &body)
    }

    async fn update_card(&self, id: CardId, patch: &CardPatch) -> Result<Card> {
        let response = Request::put(&self.card_url(id))
            .json(patch)
            .map_err(transport)?
            .send()
            .await
            .map_err(transport)?;
        let (status, body) = read_body(response).await?;
        parse_updated(id, status, &body)
    }

    async fn delete_card(&self, id: CardId) -> Result<()> {
        let response = Request::delete(&self.card_url(id))
            .send()
            .await
            .map_err(transport)?;
        let (status, body) = read_body(response).await?;
        parse_deleted(id, status, &body)
    }
}

// ─── Wire types ──────────────────────────────────────────────

#[derive(Serialize)]
struct AddTextRequest<'a> {
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
}

#[derive(Deserialize)]
struct CardListResponse {
    #[serde(default)]
    cards: Vec<Card>,
}

#[derive(Deserialize)]
struct AddTextResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    card_id: Option<CardId>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct UpdateResponse {
    updated_card: Card,
}

// ─── Parsing ─────────────────────────────────────────────────

pub fn parse_card_list(status: u16, body: &str) -> Result<Vec<Card>> {
    if !is_success(status) {
        return Err(backend_error(status, body));
    }
    let data: CardListResponse = serde_json::from_str(body)?;
    Ok(data.cards)
}

/// Id of the card `/add-text` created. The service answers 500 with
/// `success: false` when generation fails.
pub fn parse_created(status: u16, body: &str) -> Result<CardId> {
    let data: AddTextResponse = match serde_json::from_str(body) {
        Ok(data) => data,
        Err(_) if !is_success(status) => return Err(backend_error(status, body)),
        Err(e) => return Err(e.into()),
    };
    match (data.success, data.card_id) {
        (true, Some(id)) if is_success(status) => Ok(id),
        _ => Err(CardsError::Backend(data.error.unwrap_or_else(|| {
            format!("HTTP {}: card service did not return a card id", status)
        }))),
    }
}

pub fn parse_updated(id: CardId, status: u16, body: &str) -> Result<Card> {
    if status == 404 {
        return Err(CardsError::NotFound(id));
    }
    if !is_success(status) {
        return Err(backend_error(status, body));
    }
    let data: UpdateResponse = serde_json::from_str(body)?;
    Ok(data.updated_card)
}

pub fn parse_deleted(id: CardId, status: u16, body: &str) -> Result<()> {
    match status {
        404 => Err(CardsError::NotFound(id)),
        s if is_success(s) => Ok(()),
        s => Err(backend_error(s, body)),
    }
}
