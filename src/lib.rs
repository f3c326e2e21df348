/// Chat Folders - drag-and-drop folder overlay for a chat-history sidebar
/// Built with Rust + WASM

pub mod dom;
pub mod identity;
pub mod persist;
pub mod store;

use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Start watching the host page for the chat-history list
#[wasm_bindgen]
pub fn start() {
    dom::boot();
}

// Re-export the identifier extractor for JavaScript access
#[wasm_bindgen]
pub fn extract_chat_id(payload: &str) -> String {
    identity::extract_chat_id(payload).unwrap_or_default()
}
