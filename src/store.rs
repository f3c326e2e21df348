/// Folder store: named groups of chat identifiers
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A user-created folder holding chat identifiers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Folder {
    pub name: String,
    pub chats: Vec<String>,
}

/// The full folder mapping, persisted as one storage value shaped
/// `folder identifier → { name, chats }`.
///
/// Invariant: a chat identifier appears in at most one folder's member list.
/// Enforced by [`FolderStore::reconcile_drop`], not by storage.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct FolderStore {
    folders: BTreeMap<String, Folder>,
}

impl FolderStore {
    pub fn new() -> Self {
        FolderStore {
            folders: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.folders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    /// Folders in identifier order. Render order follows this iteration.
    pub fn folders(&self) -> impl Iterator<Item = (&String, &Folder)> {
        self.folders.iter()
    }

    pub fn folder(&self, id: &str) -> Option<&Folder> {
        self.folders.get(id)
    }

    /// Identifier of the folder currently holding `chat_id`, if any.
    pub fn folder_of(&self, chat_id: &str) -> Option<&str> {
        self.folders
            .iter()
            .find(|(_, folder)| folder.chats.iter().any(|c| c == chat_id))
            .map(|(id, _)| id.as_str())
    }

    /// Create an empty folder named `name`, with an identifier derived from
    /// the creation timestamp in milliseconds.
    ///
    /// The name is trimmed; an empty or whitespace-only name aborts with
    /// `None`. The timestamp is bumped until the identifier is unused, so two
    /// creations in the same millisecond still get distinct folders.
    pub fn create_folder(&mut self, name: &str, now_ms: u64) -> Option<String> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let mut stamp = now_ms;
        while self.folders.contains_key(&folder_id(stamp)) {
            stamp += 1;
        }

        let id = folder_id(stamp);
        self.folders.insert(
            id.clone(),
            Folder {
                name: name.to_string(),
                chats: Vec::new(),
            },
        );
        Some(id)
    }

    /// Remove a folder. Its members are dropped, not migrated; the chats
    /// themselves live on the host page and are untouched.
    pub fn delete_folder(&mut self, id: &str) -> bool {
        self.folders.remove(id).is_some()
    }

    /// Move `chat_id`'s membership to the folder named by `target`, or out of
    /// all folders when `target` is `None` ("All Chats"). Returns whether the
    /// store changed.
    ///
    /// The removal scan breaks after the first match. That leans on the
    /// one-folder-per-chat invariant already holding; keep it that way.
    pub fn reconcile_drop(&mut self, chat_id: &str, target: Option<&str>) -> bool {
        if chat_id.is_empty() {
            return false;
        }

        let mut changed = false;
        for folder in self.folders.values_mut() {
            if let Some(pos) = folder.chats.iter().position(|c| c == chat_id) {
                folder.chats.remove(pos);
                changed = true;
                break;
            }
        }

        if let Some(target) = target {
            if let Some(folder) = self.folders.get_mut(target) {
                // Re-check membership: a drop onto the folder already holding
                // the chat must not duplicate it.
                if !folder.chats.iter().any(|c| c == chat_id) {
                    folder.chats.push(chat_id.to_string());
                    changed = true;
                }
            }
        }

        changed
    }
}

fn folder_id(stamp_ms: u64) -> String {
    format!("folder-{stamp_ms}")
}
