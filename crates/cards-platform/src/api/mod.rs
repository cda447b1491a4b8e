//! HTTP adapters for the card service and the conversational AI service.
//!
//! Each adapter reads the body as text and hands status + body to a pure
//! `parse_*` function, so the wire handling is testable off the browser.

pub mod ai_http;
pub mod cards_http;

pub use ai_http::HttpAiApi;
pub use cards_http::HttpCardApi;

use gloo_net::http::Response;
use serde::Deserialize;

use cards_types::{CardsError, Result};

pub(crate) fn transport(e: gloo_net::Error) -> CardsError {
    CardsError::Transport(e.to_string())
}

/// Status code and raw body of a response
pub(crate) async fn read_body(response: Response) -> Result<(u16, String)> {
    let status = response.status();
    let body = response.text().await.map_err(transport)?;
    Ok((status, body))
}

pub(crate) fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// Backend error for a non-2xx response, using the `error` field when present
pub fn backend_error(status: u16, body: &str) -> CardsError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .unwrap_or_else(|| body.trim().to_string());
    if message.is_empty() {
        CardsError::Backend(format!("HTTP {}", status))
    } else {
        CardsError::Backend(format!("HTTP {}: {}", status, message))
    }
}
