/// Two-stage observation of the host page's chat list
use super::{App, CHAT_ITEM_SELECTOR, CHAT_LIST_SELECTOR, LOG_ATTR, bind};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, MutationObserver, MutationObserverInit, MutationRecord};

/// Stage 1: wait for the chat-list container to appear, then attach once.
///
/// The observer disconnects permanently on the first hit. If the host page
/// later tears the container down the overlay does not come back; stage 1
/// never restarts.
pub fn wait_for_chat_list(app: &Rc<App>) -> Result<(), JsValue> {
    // Already rendered before the script ran: no need to wait for a mutation.
    if let Some(chat_list) = app.document().query_selector(CHAT_LIST_SELECTOR)? {
        return app.attach(chat_list);
    }

    let callback = Closure::<dyn FnMut(js_sys::Array, MutationObserver)>::new({
        let app = app.clone();
        move |_records: js_sys::Array, observer: MutationObserver| {
            let chat_list = match app.document().query_selector(CHAT_LIST_SELECTOR) {
                Ok(Some(el)) => el,
                Ok(None) => return,
                Err(e) => {
                    log::warn!("chat-list lookup failed: {e:?}");
                    return;
                }
            };
            observer.disconnect();
            if let Err(e) = app.attach(chat_list) {
                log::error!("failed to attach to chat list: {e:?}");
            }
        }
    });

    let observer = MutationObserver::new(callback.as_ref().unchecked_ref())?;
    let init = MutationObserverInit::new();
    init.set_child_list(true);
    init.set_subtree(true);
    observer.observe_with_options(app.document(), &init)?;
    // Lives until the container shows up; leaked deliberately.
    callback.forget();
    Ok(())
}

/// Stage 2: track the container for added chat elements and for in-place
/// population of the identifying attribute. The host may insert an element
/// before filling the attribute in, so both triggers are needed; binding is
/// idempotent, so the overlap is harmless. Runs until page unload.
pub fn track_chat_list(app: &Rc<App>, chat_list: &Element) -> Result<(), JsValue> {
    let callback = Closure::<dyn FnMut(js_sys::Array, MutationObserver)>::new({
        let app = app.clone();
        move |records: js_sys::Array, _observer: MutationObserver| {
            for record in records.iter() {
                let record: MutationRecord = record.unchecked_into();
                handle_record(&app, &record);
            }
        }
    });

    let observer = MutationObserver::new(callback.as_ref().unchecked_ref())?;
    let init = MutationObserverInit::new();
    init.set_child_list(true);
    init.set_subtree(true);
    init.set_attributes(true);
    let watched_attrs = js_sys::Array::of1(&JsValue::from_str(LOG_ATTR));
    init.set_attribute_filter(&watched_attrs);
    observer.observe_with_options(chat_list, &init)?;
    callback.forget();
    Ok(())
}

fn handle_record(app: &Rc<App>, record: &MutationRecord) {
    match record.type_().as_str() {
        "childList" => {
            let added = record.added_nodes();
            for i in 0..added.length() {
                let Some(node) = added.get(i) else { continue };
                if let Ok(el) = node.dyn_into::<Element>() {
                    bind::bind_tree(app, &el);
                }
            }
        }
        "attributes" => {
            if record.attribute_name().as_deref() != Some(LOG_ATTR) {
                return;
            }
            let Some(target) = record.target() else { return };
            if let Ok(el) = target.dyn_into::<Element>() {
                if el.matches(CHAT_ITEM_SELECTOR).unwrap_or(false) {
                    if let Err(e) = bind::bind_chat(app, &el) {
                        log::warn!("failed to bind chat element: {e:?}");
                    }
                }
            }
        }
        _ => {}
    }
}
