/// Async persistence of the folder store through the extension storage bridge
use crate::store::FolderStore;
use wasm_bindgen::prelude::*;

/// Single storage key holding the whole serialized folder store.
pub const STORAGE_KEY: &str = "chat_folders_data";

// Import JS bridge functions
#[wasm_bindgen(module = "/storage.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn getStorage(key: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setStorage(key: &str, value: JsValue) -> Result<(), JsValue>;
}

/// Load the folder store, substituting an empty store on absence, load
/// failure, or a payload that no longer parses. Never fails.
pub async fn load_store() -> FolderStore {
    let value = match getStorage(STORAGE_KEY).await {
        Ok(value) => value,
        Err(e) => {
            log::warn!("failed to load folder store, starting empty: {e:?}");
            return FolderStore::new();
        }
    };

    if value.is_null() || value.is_undefined() {
        return FolderStore::new();
    }

    match serde_wasm_bindgen::from_value(value) {
        Ok(store) => store,
        Err(e) => {
            log::warn!("stored folder data did not parse, starting empty: {e}");
            FolderStore::new()
        }
    }
}

/// Write the folder store. Failures are logged and not retried; the next
/// mutation triggers the next save attempt.
pub async fn save_store(store: &FolderStore) {
    let value = match serde_wasm_bindgen::to_value(store) {
        Ok(value) => value,
        Err(e) => {
            log::error!("failed to serialize folder store: {e}");
            return;
        }
    };

    if let Err(e) = setStorage(STORAGE_KEY, value).await {
        log::warn!("failed to save folder store: {e:?}");
    }
}
