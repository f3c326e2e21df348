//! Browser-side tests for the DOM overlay: run with `wasm-pack test --chrome`.
#![cfg(target_arch = "wasm32")]

use chat_folders::dom::{self, App};
use chat_folders::store::FolderStore;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Document, Element, HtmlElement};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

/// Let queued observer callbacks run: one macrotask turn is enough, since
/// MutationObserver delivery is a microtask.
async fn tick() {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        web_sys::window()
            .unwrap()
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, 0)
            .unwrap();
    });
    wasm_bindgen_futures::JsFuture::from(promise).await.unwrap();
}

fn chat_element(document: &Document, token: Option<&str>) -> Element {
    let el = document.create_element("div").unwrap();
    el.set_attribute("data-testid", "history-item").unwrap();
    if let Some(token) = token {
        let payload = format!(r#"{{"event":"render","target":"{token}"}}"#);
        el.set_attribute(dom::LOG_ATTR, &payload).unwrap();
    }
    el
}

#[wasm_bindgen_test]
fn bind_is_idempotent() {
    let document = document();
    let app = Rc::new(App::new(document.clone(), FolderStore::new()));
    let el = chat_element(&document, Some("c_4af9"));

    dom::bind::bind_chat(&app, &el).unwrap();
    let html = el.dyn_ref::<HtmlElement>().unwrap();
    assert!(html.draggable());
    assert_eq!(
        el.get_attribute(dom::CHAT_ID_ATTR).as_deref(),
        Some("/app/c_4af9")
    );

    dom::bind::bind_chat(&app, &el).unwrap();
    assert!(html.draggable());
    assert_eq!(
        el.get_attribute(dom::CHAT_ID_ATTR).as_deref(),
        Some("/app/c_4af9")
    );
}

#[wasm_bindgen_test]
fn binds_once_attribute_is_populated() {
    let document = document();
    let app = Rc::new(App::new(document.clone(), FolderStore::new()));

    // Host pages insert the element first and fill the attribute in later.
    let el = chat_element(&document, None);
    dom::bind::bind_chat(&app, &el).unwrap();
    let html = el.dyn_ref::<HtmlElement>().unwrap();
    assert!(!html.draggable());
    assert!(el.get_attribute(dom::CHAT_ID_ATTR).is_none());

    el.set_attribute(dom::LOG_ATTR, r#"log("open", "c_00ff12")"#)
        .unwrap();
    dom::bind::bind_chat(&app, &el).unwrap();
    assert!(html.draggable());
    assert_eq!(
        el.get_attribute(dom::CHAT_ID_ATTR).as_deref(),
        Some("/app/c_00ff12")
    );
}

#[wasm_bindgen_test]
fn attribute_without_token_leaves_element_unbound() {
    let document = document();
    let app = Rc::new(App::new(document.clone(), FolderStore::new()));
    let el = chat_element(&document, None);
    el.set_attribute(dom::LOG_ATTR, r#"{"event":"render"}"#)
        .unwrap();

    dom::bind::bind_chat(&app, &el).unwrap();
    assert!(!el.dyn_ref::<HtmlElement>().unwrap().draggable());
}

#[wasm_bindgen_test]
fn attach_drop_filter_and_delete_flow() {
    let document = document();
    let container = document.create_element("div").unwrap();
    document.body().unwrap().append_child(&container).unwrap();

    let chat_a = chat_element(&document, Some("c_aa01"));
    let chat_b = chat_element(&document, Some("c_bb02"));
    container.append_child(&chat_a).unwrap();
    container.append_child(&chat_b).unwrap();

    let app = Rc::new(App::new(document.clone(), FolderStore::new()));
    app.attach(container.clone()).unwrap();

    // Both chats bound by the initial sweep.
    assert_eq!(
        chat_a.get_attribute(dom::CHAT_ID_ATTR).as_deref(),
        Some("/app/c_aa01")
    );
    assert_eq!(
        chat_b.get_attribute(dom::CHAT_ID_ATTR).as_deref(),
        Some("/app/c_bb02")
    );

    // Panel injected with the "All Chats" pseudo-entry.
    let panel = document.get_element_by_id(dom::PANEL_ID).unwrap();
    assert_eq!(
        panel
            .query_selector_all(&format!(".{}", dom::ENTRY_CLASS))
            .unwrap()
            .length(),
        1
    );

    app.create_folder("  Work  ");
    let store = app.store_snapshot();
    let (folder_id, folder) = store.folders().next().unwrap();
    assert_eq!(folder.name, "Work");
    assert!(folder.chats.is_empty());
    assert_eq!(
        panel
            .query_selector_all(&format!(".{}", dom::ENTRY_CLASS))
            .unwrap()
            .length(),
        2
    );

    // Drop chat A onto the folder: membership moves and the drop target
    // becomes the active filter, hiding chat B.
    app.drop_chat("/app/c_aa01", Some(folder_id.clone()));
    let store = app.store_snapshot();
    assert_eq!(store.folder(folder_id).unwrap().chats, vec!["/app/c_aa01"]);
    assert_eq!(app.selected_folder().as_deref(), Some(folder_id.as_str()));

    let style_a = chat_a.dyn_ref::<HtmlElement>().unwrap().style();
    let style_b = chat_b.dyn_ref::<HtmlElement>().unwrap().style();
    assert_eq!(style_a.get_property_value("display").unwrap(), "");
    assert_eq!(style_b.get_property_value("display").unwrap(), "none");

    // Deleting the active folder resets the filter; the chats themselves
    // stay on the page.
    let folder_id = folder_id.clone();
    app.delete_folder(&folder_id);
    assert!(app.store_snapshot().is_empty());
    assert_eq!(app.selected_folder(), None);
    assert_eq!(style_b.get_property_value("display").unwrap(), "");
    assert_eq!(
        container
            .query_selector_all("[data-testid=\"history-item\"]")
            .unwrap()
            .length(),
        2
    );
}

#[wasm_bindgen_test]
async fn tracking_binds_added_and_late_identified_chats() {
    let document = document();
    let container = document.create_element("div").unwrap();
    document.body().unwrap().append_child(&container).unwrap();

    let app = Rc::new(App::new(document.clone(), FolderStore::new()));
    app.attach(container.clone()).unwrap();

    // Inserted without the identifying attribute: observed, not yet bindable.
    let chat = chat_element(&document, None);
    container.append_child(&chat).unwrap();
    tick().await;
    let html = chat.dyn_ref::<HtmlElement>().unwrap();
    assert!(!html.draggable());

    // The host fills the attribute in afterwards; the attribute trigger must
    // bind the element without any further insertion.
    chat.set_attribute(dom::LOG_ATTR, r#"{"target":"c_77aa"}"#)
        .unwrap();
    tick().await;
    assert!(html.draggable());
    assert_eq!(
        chat.get_attribute(dom::CHAT_ID_ATTR).as_deref(),
        Some("/app/c_77aa")
    );

    // An element arriving with the attribute already present binds off the
    // childList trigger, even as a nested descendant of the added node.
    let wrapper = document.create_element("div").unwrap();
    let nested = chat_element(&document, Some("c_88bb"));
    wrapper.append_child(&nested).unwrap();
    container.append_child(&wrapper).unwrap();
    tick().await;
    assert!(nested.dyn_ref::<HtmlElement>().unwrap().draggable());
    assert_eq!(
        nested.get_attribute(dom::CHAT_ID_ATTR).as_deref(),
        Some("/app/c_88bb")
    );
}

#[wasm_bindgen_test]
async fn searching_attaches_once_container_appears() {
    let document = document();
    let app = Rc::new(App::new(document.clone(), FolderStore::new()));
    dom::watcher::wait_for_chat_list(&app).unwrap();

    // The container shows up only after observation started.
    let nav = document.create_element("nav").unwrap();
    let chat_list = document.create_element("div").unwrap();
    chat_list.set_attribute("data-testid", "chat-history").unwrap();
    let chat = chat_element(&document, Some("c_99cc"));
    chat_list.append_child(&chat).unwrap();
    nav.append_child(&chat_list).unwrap();
    document.body().unwrap().append_child(&nav).unwrap();
    tick().await;

    // The hookup ran: the chat already inside the container was bound by the
    // initial sweep...
    assert!(chat.dyn_ref::<HtmlElement>().unwrap().draggable());
    assert_eq!(
        chat.get_attribute(dom::CHAT_ID_ATTR).as_deref(),
        Some("/app/c_99cc")
    );

    // ...and the container is now tracked, so later arrivals bind too.
    let late = chat_element(&document, Some("c_aadd"));
    chat_list.append_child(&late).unwrap();
    tick().await;
    assert!(late.dyn_ref::<HtmlElement>().unwrap().draggable());
}
