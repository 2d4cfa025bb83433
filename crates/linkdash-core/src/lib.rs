//! linkdash Core Library
//!
//! This crate provides the core functionality for linkdash, an on-device
//! dashboard of named URL shortcuts shown as tiles.
//!
//! # Architecture
//!
//! - **LinkStore**: sole owner of the ordered link collection; rewrites the
//!   whole collection to key-value storage after every change and notifies
//!   a render hook
//! - **Dashboard**: reducer-style state machine turning user intents into
//!   store mutations, modal state and navigation effects
//!
//! Everything runs on one thread; storage calls block.
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let storage = open_backend(&config)?;
//! let mut dashboard = Dashboard::new(LinkStore::load(storage, &config.storage_key));
//!
//! dashboard.dispatch(Intent::OpenCreate);
//! dashboard.dispatch(Intent::SetTitle("Mail".into()));
//! dashboard.dispatch(Intent::SetUrl("mail.example.com".into()));
//! dashboard.dispatch(Intent::Save);
//! ```
//!
//! # Modules
//!
//! - `store`: the link collection and its persistence
//! - `dashboard`: interaction state machine
//! - `models`: the `Link` record and URL normalization
//! - `storage`: key-value storage adapters
//! - `config`: application configuration

pub mod config;
pub mod dashboard;
pub mod models;
pub mod storage;
pub mod store;

pub use config::Config;
pub use dashboard::{Dashboard, DashboardView, Effect, Intent, Modal, Mode, UiState};
pub use models::{normalize_url, Link, LinkId};
pub use storage::{open_backend, Backend, KeyValueStore, StorageError};
pub use store::{LinkStore, LoadOutcome};
