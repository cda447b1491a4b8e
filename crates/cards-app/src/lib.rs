//! Knowledge Cards: WASM entry point.
//!
//! This crate is the composition root (DI wiring layer).
//! It assembles the browser adapters, the cards runtime and the egui UI.

mod app;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

const CANVAS_ID: &str = "cards_canvas";

fn canvas() -> Result<web_sys::HtmlCanvasElement, JsValue> {
    let document = web_sys::window()
        .ok_or_else(|| JsValue::from_str("No window"))?
        .document()
        .ok_or_else(|| JsValue::from_str("No document"))?;
    document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| JsValue::from_str(&format!("No canvas element with id '{}'", CANVAS_ID)))?
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .map_err(|_| JsValue::from_str("Element is not a canvas"))
}

/// WASM entry point: called from index.html
#[wasm_bindgen(start)]
pub async fn main() -> Result<(), JsValue> {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("Knowledge Cards starting...");

    let canvas = canvas()?;
    let web_options = eframe::WebOptions::default();

    wasm_bindgen_futures::spawn_local(async move {
        let started = eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(|cc| Ok(Box::new(app::CardsApp::new(cc)))),
            )
            .await;
        if let Err(e) = started {
            log::error!("Failed to start eframe: {:?}", e);
        }
    });
    Ok(())
}
