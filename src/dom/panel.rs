/// Folder panel: one-time injection, full-replace rendering, lifecycle
/// prompts, and drop handling on the entries
use super::{App, DRAG_OVER_CLASS, ENTRY_CLASS, PANEL_ID, filter};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{DragEvent, Element, Event};

const PANEL_CSS: &str = "\
#chat-folders-panel { padding: 8px; font-size: 13px; }\n\
.chat-folders-header { display: flex; justify-content: space-between; align-items: center; margin-bottom: 4px; font-weight: 600; }\n\
.chat-folders-add { border: none; background: none; cursor: pointer; font-size: 16px; }\n\
.chat-folders-entry { display: flex; justify-content: space-between; align-items: center; padding: 4px 6px; border-radius: 4px; cursor: pointer; }\n\
.chat-folders-entry:hover { background: rgba(0, 0, 0, 0.06); }\n\
.chat-folders-entry.chat-folders-active { background: rgba(0, 0, 0, 0.1); font-weight: 600; }\n\
.chat-folders-entry.chat-folders-drag-over { outline: 1px dashed currentColor; }\n\
.chat-folders-delete { border: none; background: none; cursor: pointer; opacity: 0.6; }\n";

/// Build the static panel shell (styles, title, "+" button) and prepend it
/// into the chat-list container. Idempotent; the entries themselves come
/// from [`render`].
pub fn inject(app: &Rc<App>, chat_list: &Element) -> Result<(), JsValue> {
    let document = app.document();
    if document.get_element_by_id(PANEL_ID).is_some() {
        return Ok(());
    }

    let style = document.create_element("style")?;
    style.set_text_content(Some(PANEL_CSS));

    let panel = document.create_element("div")?;
    panel.set_id(PANEL_ID);
    panel.append_child(&style)?;

    let header = document.create_element("div")?;
    header.set_class_name("chat-folders-header");
    let title = document.create_element("span")?;
    title.set_text_content(Some("Folders"));
    header.append_child(&title)?;

    let add = document.create_element("button")?;
    add.set_class_name("chat-folders-add");
    add.set_attribute("title", "New folder")?;
    add.set_text_content(Some("+"));
    let on_add = Closure::<dyn FnMut(Event)>::new({
        let app = app.clone();
        move |_event: Event| prompt_create(&app)
    });
    add.add_event_listener_with_callback("click", on_add.as_ref().unchecked_ref())?;
    // The header survives every render; its handler lives as long as the page.
    on_add.forget();
    header.append_child(&add)?;
    panel.append_child(&header)?;

    chat_list.insert_before(&panel, chat_list.first_child().as_ref())?;
    Ok(())
}

/// Rebuild every folder entry from scratch: the "All Chats" pseudo-entry
/// first, then one entry per folder in store order. Full replacement over
/// diffing; folder counts are small.
pub fn render(app: &Rc<App>) -> Result<(), JsValue> {
    let document = app.document();
    let Some(panel) = document.get_element_by_id(PANEL_ID) else {
        return Ok(());
    };

    let old = panel.query_selector_all(&format!(".{ENTRY_CLASS}"))?;
    for i in 0..old.length() {
        let Some(node) = old.get(i) else { continue };
        if let Ok(el) = node.dyn_into::<Element>() {
            el.remove();
        }
    }
    app.entry_listeners.borrow_mut().clear();

    let all_chats = build_entry(app, None, "All Chats", None)?;
    panel.append_child(&all_chats)?;

    let store = app.store.borrow();
    for (id, folder) in store.folders() {
        let label = format!("{} ({})", folder.name, folder.chats.len());
        let entry = build_entry(app, Some(id.clone()), &label, Some(folder.name.clone()))?;
        panel.append_child(&entry)?;
    }
    Ok(())
}

/// One selector entry: click-to-filter trigger, drop target, and (for real
/// folders) a delete control.
fn build_entry(
    app: &Rc<App>,
    folder_id: Option<String>,
    label: &str,
    folder_name: Option<String>,
) -> Result<Element, JsValue> {
    let document = app.document();
    let entry = document.create_element("div")?;
    entry.set_class_name(ENTRY_CLASS);
    if let Some(id) = &folder_id {
        entry.set_attribute("data-folder-id", id)?;
    }

    let text = document.create_element("span")?;
    text.set_text_content(Some(label));
    entry.append_child(&text)?;

    if let (Some(id), Some(name)) = (folder_id.clone(), folder_name) {
        let delete = document.create_element("button")?;
        delete.set_class_name("chat-folders-delete");
        delete.set_attribute("title", "Delete folder")?;
        delete.set_text_content(Some("\u{00d7}"));
        add_entry_listener(app, &delete, "click", {
            let app = app.clone();
            move |event: Event| {
                // Keep the click from also selecting the folder as a filter.
                event.stop_propagation();
                confirm_delete(&app, &id, &name);
            }
        })?;
        entry.append_child(&delete)?;
    }

    add_entry_listener(app, &entry, "click", {
        let app = app.clone();
        let folder_id = folder_id.clone();
        move |_event: Event| {
            if let Err(e) = filter::apply(&app, folder_id.clone()) {
                log::error!("failed to apply folder filter: {e:?}");
            }
        }
    })?;

    add_entry_listener(app, &entry, "dragover", {
        let entry = entry.clone();
        move |event: Event| {
            // Default would forbid the drop.
            event.prevent_default();
            if let Some(transfer) = event.dyn_ref::<DragEvent>().and_then(|d| d.data_transfer()) {
                transfer.set_drop_effect("move");
            }
            let _ = entry.class_list().add_1(DRAG_OVER_CLASS);
        }
    })?;

    add_entry_listener(app, &entry, "dragleave", {
        let entry = entry.clone();
        move |_event: Event| {
            let _ = entry.class_list().remove_1(DRAG_OVER_CLASS);
        }
    })?;

    add_entry_listener(app, &entry, "drop", {
        let app = app.clone();
        let entry = entry.clone();
        move |event: Event| {
            event.prevent_default();
            event.stop_propagation();
            let _ = entry.class_list().remove_1(DRAG_OVER_CLASS);
            let payload = event
                .dyn_ref::<DragEvent>()
                .and_then(|d| d.data_transfer())
                .and_then(|t| t.get_data("text/plain").ok())
                .unwrap_or_default();
            app.drop_chat(&payload, folder_id.clone());
        }
    })?;

    Ok(entry)
}

/// Attach a handler whose closure is retained until the next render.
fn add_entry_listener<F>(
    app: &Rc<App>,
    target: &Element,
    event: &str,
    handler: F,
) -> Result<(), JsValue>
where
    F: FnMut(Event) + 'static,
{
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    app.entry_listeners.borrow_mut().push(closure);
    Ok(())
}

fn prompt_create(app: &Rc<App>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    match window.prompt_with_message("Folder name:") {
        Ok(Some(name)) => app.create_folder(&name),
        Ok(None) => {}
        Err(e) => log::warn!("folder name prompt failed: {e:?}"),
    }
}

fn confirm_delete(app: &Rc<App>, id: &str, name: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let message = format!("Delete folder \"{name}\"? Chats stay in the history list.");
    match window.confirm_with_message(&message) {
        Ok(true) => app.delete_folder(id),
        Ok(false) => {}
        Err(e) => log::warn!("delete confirmation failed: {e:?}"),
    }
}
