/// Visibility filtering of chat elements by folder membership
use super::{ACTIVE_CLASS, App, CHAT_ID_ATTR, CHAT_ITEM_SELECTOR, ENTRY_CLASS};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlElement};

/// Make `selection` the active filter and reconcile the DOM: active classes
/// on the panel entries, show/hide on every chat element. `None` selects the
/// "All Chats" pseudo-entry and lifts every restriction.
pub fn apply(app: &Rc<App>, selection: Option<String>) -> Result<(), JsValue> {
    *app.selected.borrow_mut() = selection.clone();

    let entries = app
        .document()
        .query_selector_all(&format!(".{ENTRY_CLASS}"))?;
    for i in 0..entries.length() {
        let Some(node) = entries.get(i) else { continue };
        let Ok(entry) = node.dyn_into::<Element>() else {
            continue;
        };
        let active = entry.get_attribute("data-folder-id").as_deref() == selection.as_deref();
        entry.class_list().toggle_with_force(ACTIVE_CLASS, active)?;
    }

    let Some(chat_list) = app.chat_list.borrow().clone() else {
        return Ok(());
    };
    let chats = chat_list.query_selector_all(CHAT_ITEM_SELECTOR)?;
    for i in 0..chats.length() {
        let Some(node) = chats.get(i) else { continue };
        let Ok(chat) = node.dyn_into::<HtmlElement>() else {
            continue;
        };
        apply_to_chat(app, &chat)?;
    }
    Ok(())
}

/// Show or hide one chat element under the current selection. A chat with no
/// resolved identifier stays hidden while any restriction is active.
pub fn apply_to_chat(app: &App, chat: &HtmlElement) -> Result<(), JsValue> {
    let selected = app.selected.borrow().clone();
    let visible = match selected.as_deref() {
        None => true,
        Some(folder_id) => {
            let store = app.store.borrow();
            match store.folder(folder_id) {
                // Stale selection (folder already gone): unrestricted.
                None => true,
                Some(folder) => chat
                    .get_attribute(CHAT_ID_ATTR)
                    .map(|id| folder.chats.iter().any(|c| *c == id))
                    .unwrap_or(false),
            }
        }
    };

    if visible {
        chat.style().remove_property("display")?;
    } else {
        chat.style().set_property("display", "none")?;
    }
    Ok(())
}
