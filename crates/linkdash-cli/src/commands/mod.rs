//! Command handlers

pub mod config;
pub mod link;
pub mod status;

use anyhow::{Context, Result};
use linkdash_core::{open_backend, Config, KeyValueStore, LinkStore, LoadOutcome};

use crate::output::Output;

/// Store type shared by every command
pub type Store = LinkStore<Box<dyn KeyValueStore>>;

/// Open the configured backend and load the link collection
pub fn open_store(config: &Config, output: &Output) -> Result<Store> {
    let storage = open_backend(config).with_context(|| {
        format!(
            "Failed to open {} storage in {:?}",
            config.backend, config.data_dir
        )
    })?;
    let store = LinkStore::load(storage, config.storage_key.clone());

    if let LoadOutcome::Recovered { reason } = store.load_outcome() {
        output.warn(&format!("Stored links were unreadable, starting empty: {}", reason));
    }

    Ok(store)
}
