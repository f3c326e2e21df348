/// DOM-side wiring: app context, selectors, and the attributes/classes the
/// overlay owns on the host page
pub mod bind;
pub mod filter;
pub mod panel;
pub mod watcher;

use crate::persist;
use crate::store::FolderStore;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, Event};

/// Host-page selector for the chat-history list container.
pub const CHAT_LIST_SELECTOR: &str = "nav [data-testid=\"chat-history\"]";
/// Host-page selector for individual chat entries.
pub const CHAT_ITEM_SELECTOR: &str = "[data-testid=\"history-item\"]";
/// Host-page attribute carrying the serialized log payload the chat
/// identifier is extracted from.
pub const LOG_ATTR: &str = "data-interaction-log";

/// Attribute this overlay writes on bound chat elements.
pub const CHAT_ID_ATTR: &str = "data-chat-folders-id";
pub const PANEL_ID: &str = "chat-folders-panel";
pub const ENTRY_CLASS: &str = "chat-folders-entry";
pub const ACTIVE_CLASS: &str = "chat-folders-active";
pub const DRAG_OVER_CLASS: &str = "chat-folders-drag-over";

/// Shared application context. Event closures hold an `Rc<App>`; all store
/// mutations run synchronously inside a single handler invocation, so
/// `RefCell` borrows never overlap.
pub struct App {
    document: Document,
    chat_list: RefCell<Option<Element>>,
    store: RefCell<FolderStore>,
    selected: RefCell<Option<String>>,
    // Closures behind the rebuilt panel entries; cleared on each render so
    // they drop together with the nodes they were attached to.
    entry_listeners: RefCell<Vec<Closure<dyn FnMut(Event)>>>,
}

impl App {
    pub fn new(document: Document, store: FolderStore) -> Self {
        App {
            document,
            chat_list: RefCell::new(None),
            store: RefCell::new(store),
            selected: RefCell::new(None),
            entry_listeners: RefCell::new(Vec::new()),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Current store contents, cloned. Mainly for tests and persistence.
    pub fn store_snapshot(&self) -> FolderStore {
        self.store.borrow().clone()
    }

    /// The active filter, or `None` for "All Chats".
    pub fn selected_folder(&self) -> Option<String> {
        self.selected.borrow().clone()
    }

    /// One-time hookup once the chat-list container exists: inject the panel,
    /// bind everything already present, render, and start stage-2 tracking.
    pub fn attach(self: &Rc<Self>, chat_list: Element) -> Result<(), JsValue> {
        log::info!("chat list found; installing folder panel");
        *self.chat_list.borrow_mut() = Some(chat_list.clone());
        panel::inject(self, &chat_list)?;
        bind::bind_tree(self, &chat_list);
        panel::render(self)?;
        filter::apply(self, None)?;
        watcher::track_chat_list(self, &chat_list)
    }

    /// Create a folder named `name` (trimmed; blank aborts silently).
    pub fn create_folder(self: &Rc<Self>, name: &str) {
        let created = self
            .store
            .borrow_mut()
            .create_folder(name, js_sys::Date::now() as u64);
        if let Some(id) = created {
            log::info!("created folder {id}");
            self.commit();
        }
    }

    /// Delete a folder and reset the active filter to "All Chats".
    pub fn delete_folder(self: &Rc<Self>, id: &str) {
        if self.store.borrow_mut().delete_folder(id) {
            log::info!("deleted folder {id}");
            *self.selected.borrow_mut() = None;
            self.commit();
        }
    }

    /// Reconcile a drop of `chat_id` onto `target` (a folder, or `None` for
    /// "All Chats"). The drop target also becomes the active filter.
    pub fn drop_chat(self: &Rc<Self>, chat_id: &str, target: Option<String>) {
        if chat_id.is_empty() {
            return;
        }
        self.store
            .borrow_mut()
            .reconcile_drop(chat_id, target.as_deref());
        *self.selected.borrow_mut() = target;
        self.commit();
    }

    /// Persist-and-render step shared by every mutation: fire the async save
    /// without awaiting it, rebuild the panel, re-apply the filter. In-memory
    /// state is truth; a failed save is only logged.
    fn commit(self: &Rc<Self>) {
        let snapshot = self.store.borrow().clone();
        spawn_local(async move {
            persist::save_store(&snapshot).await;
        });

        if let Err(e) = panel::render(self) {
            log::error!("failed to render folder panel: {e:?}");
        }
        let selected = self.selected.borrow().clone();
        if let Err(e) = filter::apply(self, selected) {
            log::error!("failed to apply folder filter: {e:?}");
        }
    }
}

/// Entry point: load the persisted store, then start watching for the
/// chat-list container.
pub fn boot() {
    let Some(window) = web_sys::window() else {
        log::error!("no window object; not running in a browser");
        return;
    };
    let Some(document) = window.document() else {
        log::error!("no document on window");
        return;
    };

    spawn_local(async move {
        let store = persist::load_store().await;
        let app = Rc::new(App::new(document, store));
        if let Err(e) = watcher::wait_for_chat_list(&app) {
            log::error!("failed to start chat-list watcher: {e:?}");
        }
    });
}
