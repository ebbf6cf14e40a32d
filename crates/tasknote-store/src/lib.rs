//! SQLite primary store for tasknote.
//!
//! The store holds the canonical task and note rows. Every write commits before it
//! returns; keeping the search indices in step is the caller's job. Reads used by
//! the search subsystem go through the [`EntitySource`](tasknote_model::EntitySource)
//! implementation on [`SqliteStore`].

#![warn(missing_docs)]

mod error;
mod records;
mod repo;
mod schema;
mod source;

pub use error::StoreError;
pub use records::{NewNote, NewTask, NoteUpdate, TaskUpdate, TimeRange};
pub use repo::SqliteStore;
