//! Domain entities shared across tasknote crates.
//!
//! Tasks and notes live in the primary store; the search index only ever holds
//! derived copies of them. This crate defines the entity shapes both sides agree
//! on, plus the [`EntitySource`] trait through which the index reads canonical
//! records back out of the primary store.

#![warn(missing_docs)]

mod entity;
mod error;
mod source;

pub use entity::{DEFAULT_TIME_UNIT, EntityKind, Note, OwnerId, Task};
pub use error::SourceError;
pub use source::EntitySource;
