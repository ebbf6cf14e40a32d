//! Full-text search over tasks and notes.
//!
//! Two Tantivy indices are kept alongside the primary store: one holds a document
//! per task (its title plus the text of every attached note), the other a document
//! per independent note. The pieces, leaf first:
//!
//! - [`encode_task`] / [`encode_note`] project entities into [`IndexedDocument`]s
//! - [`IndexStore`] owns one index: upsert, delete, owner-scoped search
//! - [`Reindexer`] follows primary-store writes through per-entity lanes
//! - [`QueryEngine`] applies limits and the blank-query short-circuit
//! - [`reconcile`] turns ranked ids back into canonical rows, in rank order
//! - [`SearchService`] ties the last two to an [`EntitySource`](tasknote_model::EntitySource)
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use tasknote_config::Config;
//! use tasknote_index::{QueryEngine, SearchIndices, SearchLimits, SearchService};
//! use tasknote_store::SqliteStore;
//!
//! let config = Config::defaults_in("./data".as_ref());
//! let store = Arc::new(SqliteStore::open(&config.storage.database).unwrap());
//! let indices = SearchIndices::open_with_config(&config).unwrap();
//! let engine = QueryEngine::new(indices.clone(), SearchLimits::from_settings(&config.search));
//! let service = SearchService::new(engine, store);
//!
//! for ranked in service.search_tasks(1, "milk", None).unwrap() {
//!     println!("{} {:?}", ranked.item.title, ranked.highlights);
//! }
//! indices.close().unwrap();
//! ```

#![warn(missing_docs)]

mod analyzer;
mod document;
mod error;
mod indices;
mod query;
mod reconcile;
mod reindex;
mod schema;
mod service;
mod snippets;
mod store;

#[cfg(test)]
mod tests;

pub use analyzer::{TASKNOTE_TOKENIZER, build_analyzer, parse_language};
pub use document::{IndexedDocument, NoteDocument, TaskDocument, encode_note, encode_task};
pub use error::IndexError;
pub use indices::SearchIndices;
pub use query::{QueryEngine, SearchLimits};
pub use reconcile::{Ranked, reconcile};
pub use reindex::{LaneKey, Mutation, RebuildStats, Reindexer, rebuild};
pub use schema::{IndexSchema, TextField, boost, fields};
pub use service::SearchService;
pub use snippets::Fragments;
pub use store::{IndexHit, IndexStore, StoreOptions};
