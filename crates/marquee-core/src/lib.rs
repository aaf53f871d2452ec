//! Marquee Core Library
//!
//! This crate provides the typed real-time content layer for Marquee, a
//! content-managed marketing site: named content sections are stored as
//! documents, observed live through bindings, and written back through a
//! generic write facade.
//!
//! # Architecture
//!
//! - **Store**: the backing document store behind the [`store::ContentStore`]
//!   trait: load, query, write, and a change feed
//! - **Bindings**: per-consumer live subscriptions that publish decoded
//!   snapshots with a loading flag and an error slot
//! - **Writer**: create/update/set/remove with server-assigned timestamps
//!
//! # Quick Start
//!
//! ```text
//! let store: Arc<dyn ContentStore> = Arc::new(MemoryStore::new());
//! let writer = ContentWriter::new(store.clone());
//!
//! // Save the hero section from admin form state
//! writer.save_section(&hero).await?;
//!
//! // Observe it live
//! let mut binding: DocumentBinding<Hero> =
//!     DocumentBinding::bind(store, Hero::COLLECTION, SINGLETON_ID);
//! let snapshot = binding.wait_settled().await;
//! ```
//!
//! # Modules
//!
//! - `sections`: section schemas and the name -> collection registry
//! - `binding`: live document and collection subscriptions
//! - `writer`: the write facade
//! - `visibility`: the section visibility gate
//! - `store`: store trait plus in-memory and SQLite implementations
//! - `config`: tooling configuration

pub mod auth;
pub mod binding;
pub mod config;
pub mod document;
pub mod error;
pub mod media;
pub mod query;
pub mod sections;
pub mod store;
pub mod visibility;
pub mod writer;

pub use binding::{CollectionBinding, DocumentBinding, ListSnapshot, Snapshot};
pub use config::Config;
pub use document::{Document, FieldMap};
pub use error::{BindingError, DecodeError, StoreError, StoreResult};
pub use query::{Direction, Query};
pub use sections::{Section, SectionKind, SINGLETON_ID};
pub use store::{ChangeEvent, ContentStore, MemoryStore, SqliteStore};
pub use visibility::{is_visible, VisibilityGate, VisibilityMap};
pub use writer::ContentWriter;
