//! Link collection store
//!
//! `LinkStore` is the single owner of the ordered link collection and the
//! only code that writes it to storage.
//!
//! ## Persistence
//!
//! The whole collection is serialized as a JSON array of
//! `{id, title, urlString}` under one storage key and rewritten on every
//! mutation. Nothing is written incrementally.
//!
//! ## Failure policy
//!
//! - A missing value loads as an empty collection.
//! - A value that fails to parse is logged and replaced by an empty
//!   collection. No backup is taken.
//! - A failed write is logged; the store keeps serving its in-memory
//!   collection and `is_durable()` reports false until a write succeeds.
//! - Updating or deleting an unknown id does nothing.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = LinkStore::load(storage, "savedLinks");
//! store.set_render_hook(|links| println!("{} tiles", links.len()));
//!
//! let id = store.add("Mail", "https://mail.example.com");
//! store.update(&id, "Webmail", "https://mail.example.com");
//! store.delete(&id);
//! ```

use tracing::{debug, error, info};
use crate::models::{Link, LinkId};
use crate::storage::{KeyValueStore, StorageError, StorageResult};

/// Callback invoked with the full collection after every change
pub type RenderHook = Box<dyn FnMut(&[Link])>;

/// What `LinkStore::load` found in storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Nothing stored under the key yet
    Fresh,
    /// Stored collection parsed successfully
    Loaded { count: usize },
    /// Stored value was unusable; started empty
    Recovered { reason: String },
}

/// Owner of the ordered link collection
pub struct LinkStore<S: KeyValueStore> {
    links: Vec<Link>,
    storage: S,
    key: String,
    render_hook: Option<RenderHook>,
    durable: bool,
    last_error: Option<String>,
    load_outcome: LoadOutcome,
}

impl<S: KeyValueStore> LinkStore<S> {
    /// Load the collection stored under `key`
    ///
    /// Never fails: absent, unreadable or corrupt values all produce an
    /// empty collection. See `load_outcome()` for what happened.
    pub fn load(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let (links, load_outcome) = match read_collection(&storage, &key) {
            Ok(Some(links)) => {
                let count = links.len();
                debug!("Loaded {} links from '{}'", count, key);
                (links, LoadOutcome::Loaded { count })
            }
            Ok(None) => {
                debug!("No links stored under '{}', starting empty", key);
                (Vec::new(), LoadOutcome::Fresh)
            }
            Err(e) => {
                error!("Failed to load links: {}", e);
                (
                    Vec::new(),
                    LoadOutcome::Recovered {
                        reason: e.to_string(),
                    },
                )
            }
        };

        let mut store = Self {
            links,
            storage,
            key,
            render_hook: None,
            durable: true,
            last_error: None,
            load_outcome,
        };
        store.render();
        store
    }

    /// Install the render callback and invoke it once with the current
    /// collection
    pub fn set_render_hook(&mut self, hook: impl FnMut(&[Link]) + 'static) {
        self.render_hook = Some(Box::new(hook));
        self.render();
    }

    /// Append a new link and return its ID
    pub fn add(&mut self, title: impl Into<String>, url_string: impl Into<String>) -> LinkId {
        let link = Link::new(title, url_string);
        let id = link.id.clone();
        info!("Adding link {} ({})", id, link.title);
        self.links.push(link);
        self.persist();
        id
    }

    /// Overwrite the title and URL of an existing link
    ///
    /// Returns false (and does nothing) if the ID is unknown.
    pub fn update(
        &mut self,
        id: &LinkId,
        title: impl Into<String>,
        url_string: impl Into<String>,
    ) -> bool {
        let Some(link) = self.links.iter_mut().find(|l| l.id == *id) else {
            debug!("Ignoring update of unknown link {}", id);
            return false;
        };

        link.title = title.into();
        link.url_string = url_string.into();
        info!("Updated link {}", id);
        self.persist();
        true
    }

    /// Remove a link
    ///
    /// The collection is persisted and rendered even when the ID is
    /// unknown. Returns whether a link was removed.
    pub fn delete(&mut self, id: &LinkId) -> bool {
        let before = self.links.len();
        self.links.retain(|l| l.id != *id);
        let removed = self.links.len() != before;

        if removed {
            info!("Deleted link {}", id);
        } else {
            debug!("Delete of unknown link {}", id);
        }
        self.persist();
        removed
    }

    /// Write the whole collection to storage, then render
    ///
    /// Write failures are logged and remembered, never returned.
    pub fn persist(&mut self) {
        match self.try_persist() {
            Ok(()) => {
                self.durable = true;
                self.last_error = None;
            }
            Err(e) => {
                error!("Failed to save links, keeping in-memory state: {}", e);
                if let Some(hint) = e.recovery_suggestion() {
                    error!("{}", hint);
                }
                self.durable = false;
                self.last_error = Some(e.to_string());
            }
        }
        self.render();
    }

    fn try_persist(&mut self) -> StorageResult<()> {
        let blob = serde_json::to_string(&self.links)?;
        self.storage.set(&self.key, &blob)?;
        debug!("Persisted {} links ({} bytes)", self.links.len(), blob.len());
        Ok(())
    }

    fn render(&mut self) {
        if let Some(hook) = self.render_hook.as_mut() {
            hook(&self.links);
        }
    }

    /// All links in display order
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Get a link by ID
    pub fn get(&self, id: &LinkId) -> Option<&Link> {
        self.links.iter().find(|l| l.id == *id)
    }

    /// Number of links
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Whether the collection is empty
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Whether the last write reached storage
    pub fn is_durable(&self) -> bool {
        self.durable
    }

    /// Message of the last failed write, cleared by the next success
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// What was found in storage at load time
    pub fn load_outcome(&self) -> &LoadOutcome {
        &self.load_outcome
    }

    /// The storage key in use
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get mutable access to the underlying storage
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Give back the underlying storage
    pub fn into_storage(self) -> S {
        self.storage
    }
}

/// Read and parse the stored collection
fn read_collection<S: KeyValueStore>(storage: &S, key: &str) -> StorageResult<Option<Vec<Link>>> {
    let Some(blob) = storage.get(key)? else {
        return Ok(None);
    };
    // An empty value counts as nothing stored
    if blob.trim().is_empty() {
        return Ok(None);
    }

    serde_json::from_str(&blob)
        .map(Some)
        .map_err(|e| StorageError::CorruptBlob {
            key: key.to_string(),
            details: e.to_string(),
        })
}
