/// Idempotent upgrade of chat elements into drag sources
use super::{App, CHAT_ID_ATTR, CHAT_ITEM_SELECTOR, LOG_ATTR, filter};
use crate::identity;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{DragEvent, Element, Event, HtmlElement};

/// Bind `root` if it is itself a chat element, then every matching
/// descendant. Used for the initial sweep and for each subtree stage 2
/// reports as added.
pub fn bind_tree(app: &Rc<App>, root: &Element) {
    if root.matches(CHAT_ITEM_SELECTOR).unwrap_or(false) {
        if let Err(e) = bind_chat(app, root) {
            log::warn!("failed to bind chat element: {e:?}");
        }
    }

    let found = match root.query_selector_all(CHAT_ITEM_SELECTOR) {
        Ok(list) => list,
        Err(e) => {
            log::warn!("chat element scan failed: {e:?}");
            return;
        }
    };
    for i in 0..found.length() {
        let Some(node) = found.get(i) else { continue };
        if let Ok(el) = node.dyn_into::<Element>() {
            if let Err(e) = bind_chat(app, &el) {
                log::warn!("failed to bind chat element: {e:?}");
            }
        }
    }
}

/// Make a chat element draggable once its identifier is known.
///
/// No-op for elements already marked draggable. Elements whose identifying
/// attribute does not yield an identifier yet are skipped silently; stage 2
/// retries them when the attribute mutates.
pub fn bind_chat(app: &Rc<App>, el: &Element) -> Result<(), JsValue> {
    let Some(html) = el.dyn_ref::<HtmlElement>() else {
        return Ok(());
    };
    if html.draggable() {
        return Ok(());
    }
    let Some(payload) = el.get_attribute(LOG_ATTR) else {
        return Ok(());
    };
    let Some(chat_id) = identity::extract_chat_id(&payload) else {
        return Ok(());
    };

    html.set_draggable(true);
    el.set_attribute(CHAT_ID_ATTR, &chat_id)?;

    let dragstart = Closure::<dyn FnMut(Event)>::new({
        let html = html.clone();
        let chat_id = chat_id.clone();
        move |event: Event| {
            let Some(event) = event.dyn_ref::<DragEvent>() else {
                return;
            };
            if let Some(transfer) = event.data_transfer() {
                if let Err(e) = transfer.set_data("text/plain", &chat_id) {
                    log::warn!("failed to set drag payload: {e:?}");
                }
                transfer.set_effect_allowed("move");
            }
            dim_after_drag_image(&html);
        }
    });
    el.add_event_listener_with_callback("dragstart", dragstart.as_ref().unchecked_ref())?;
    dragstart.forget();

    let dragend = Closure::<dyn FnMut(Event)>::new({
        let html = html.clone();
        move |_event: Event| {
            // Unconditional: fires for cancelled and failed drops too.
            let _ = html.style().remove_property("opacity");
        }
    });
    el.add_event_listener_with_callback("dragend", dragend.as_ref().unchecked_ref())?;
    dragend.forget();

    // A chat that appears while a restricting filter is active must obey it
    // right away, not on the next filter change.
    filter::apply_to_chat(app, html)
}

/// Dim the drag source only after the browser has captured its drag image;
/// dimming synchronously can blank the image in some engines.
fn dim_after_drag_image(html: &HtmlElement) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let html = html.clone();
    let dim = Closure::once_into_js(move || {
        let _ = html.style().set_property("opacity", "0.5");
    });
    if let Err(e) =
        window.set_timeout_with_callback_and_timeout_and_arguments_0(dim.unchecked_ref(), 0)
    {
        log::warn!("failed to schedule drag-source dim: {e:?}");
    }
}
