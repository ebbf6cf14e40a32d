//! The per-kind index store.
//!
//! An [`IndexStore`] owns one Tantivy index for the lifetime of the process. Writes
//! go through a single writer behind a mutex and are committed immediately; the
//! reader is reloaded after each commit. Searches run against the reader and never
//! take the writer lock.
//!
//! The writer, and with it Tantivy's directory lock, is only acquired by the first
//! write. A store that is only searched can be opened while another process holds
//! the same index for writing.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::atomic::{AtomicBool, Ordering},
};

use parking_lot::Mutex;
use serde::Serialize;
use tantivy::{
    Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term,
    collector::TopDocs,
    directory::MmapDirectory,
    query::{BooleanQuery, ConstScoreQuery, Occur, Query, QueryParser, TermQuery},
    schema::{IndexRecordOption, Value},
};
use tasknote_config::Config;
use tasknote_model::{EntityKind, OwnerId};
use tracing::{debug, info};

use crate::{
    IndexError,
    analyzer::{TASKNOTE_TOKENIZER, build_analyzer},
    document::IndexedDocument,
    schema::IndexSchema,
    snippets::{FieldSnippets, Fragments},
};

/// Options applied when opening an index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// Stemmer language name.
    pub stemmer: String,
    /// Writer memory budget in bytes.
    pub writer_heap_size: usize,
    /// Maximum characters per highlight fragment.
    pub snippet_max_chars: usize,
}

impl StoreOptions {
    /// Takes the index and snippet settings from a loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            stemmer: config.index.stemmer.clone(),
            writer_heap_size: config.index.writer_heap_size,
            snippet_max_chars: config.search.snippet_max_chars,
        }
    }
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            stemmer: String::from("english"),
            writer_heap_size: 50_000_000,
            snippet_max_chars: 150,
        }
    }
}

/// One ranked match from an index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexHit {
    /// Primary key of the matched entity.
    pub id: String,
    /// BM25 relevance score.
    pub score: f32,
    /// Highlight fragments keyed by field name.
    pub fragments: Fragments,
}

/// A single-kind search index.
pub struct IndexStore {
    /// Entity kind held by this index.
    kind: EntityKind,
    /// Index directory.
    path: PathBuf,
    /// The Tantivy index.
    index: Index,
    /// Field handles.
    schema: IndexSchema,
    /// Reader, reloaded after every commit.
    reader: IndexReader,
    /// The writer; `None` until the first write and again once closed.
    writer: Mutex<Option<IndexWriter>>,
    /// Writer memory budget in bytes.
    writer_heap_size: usize,
    /// Set by [`close`](Self::close).
    closed: AtomicBool,
    /// Maximum characters per highlight fragment.
    snippet_max_chars: usize,
}

impl IndexStore {
    /// Opens the index for `kind` at `path`, creating it if the directory holds none.
    ///
    /// Fails if an existing index is unreadable or was built with a different field
    /// mapping.
    pub fn open(path: &Path, kind: EntityKind, options: &StoreOptions) -> Result<Self, IndexError> {
        let schema = IndexSchema::for_kind(kind);

        fs::create_dir_all(path)?;

        let dir = MmapDirectory::open(path).map_err(|e| {
            let err: tantivy::TantivyError = e.into();
            IndexError::open_index(path.to_path_buf(), &err)
        })?;

        let index = Index::open_or_create(dir, schema.schema().clone())
            .map_err(|e| IndexError::open_index(path.to_path_buf(), &e))?;

        index
            .tokenizers()
            .register(TASKNOTE_TOKENIZER, build_analyzer(&options.stemmer)?);

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()
            .map_err(|e| IndexError::open_index(path.to_path_buf(), &e))?;

        info!(%kind, path = %path.display(), "opened index");

        Ok(Self {
            kind,
            path: path.to_path_buf(),
            index,
            schema,
            reader,
            writer: Mutex::new(None),
            writer_heap_size: options.writer_heap_size,
            closed: AtomicBool::new(false),
            snippet_max_chars: options.snippet_max_chars,
        })
    }

    /// The entity kind this index holds.
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// The index directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true once [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Replaces the document stored under `id`, or adds it if absent.
    ///
    /// Rejects documents of the other entity kind.
    pub fn upsert(&self, id: &str, doc: &IndexedDocument) -> Result<(), IndexError> {
        if doc.kind() != self.kind {
            return Err(IndexError::KindMismatch {
                expected: self.kind,
                found: doc.kind(),
            });
        }
        let document = self.schema.to_document(id, doc);
        self.write(id, |writer, id_term| {
            writer.delete_term(id_term);
            writer
                .add_document(document)
                .map_err(|e| IndexError::write(&e))?;
            Ok(())
        })?;
        debug!(kind = %self.kind, id, "upserted document");
        Ok(())
    }

    /// Removes the document stored under `id`. Removing a missing id is not an error.
    pub fn delete(&self, id: &str) -> Result<(), IndexError> {
        self.write(id, |writer, id_term| {
            writer.delete_term(id_term);
            Ok(())
        })?;
        debug!(kind = %self.kind, id, "deleted document");
        Ok(())
    }

    /// Removes every document.
    pub fn clear(&self) -> Result<(), IndexError> {
        self.replace_all(&[])
    }

    /// Replaces the whole index content with `docs` in a single commit.
    pub fn replace_all(&self, docs: &[IndexedDocument]) -> Result<(), IndexError> {
        if let Some(doc) = docs.iter().find(|doc| doc.kind() != self.kind) {
            return Err(IndexError::KindMismatch {
                expected: self.kind,
                found: doc.kind(),
            });
        }
        let count = docs.len();
        self.with_writer(|writer| {
            writer
                .delete_all_documents()
                .map_err(|e| IndexError::write(&e))?;
            for doc in docs {
                writer
                    .add_document(self.schema.to_document(doc.id(), doc))
                    .map_err(|e| IndexError::write(&e))?;
            }
            Ok(())
        })?;
        info!(kind = %self.kind, count, "replaced index content");
        Ok(())
    }

    /// Runs the owner-scoped free-text query and returns at most `limit` hits,
    /// best first.
    ///
    /// Whitespace-only text matches nothing. Syntax errors in `text` are recovered
    /// from rather than reported.
    pub fn search(
        &self,
        owner: OwnerId,
        text: &str,
        limit: usize,
    ) -> Result<Vec<IndexHit>, IndexError> {
        if self.is_closed() {
            return Err(IndexError::Unavailable(self.kind));
        }
        if text.trim().is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let query = self.build_query(owner, text);
        let searcher = self.reader.searcher();
        let top_docs = searcher
            .search(&query, &TopDocs::with_limit(limit))
            .map_err(|e| IndexError::search(&e))?;

        let snippets = FieldSnippets::new(&searcher, &query, &self.schema, self.snippet_max_chars)?;

        let mut hits = Vec::with_capacity(top_docs.len());
        for (score, address) in top_docs {
            let doc: TantivyDocument = searcher.doc(address).map_err(|e| IndexError::search(&e))?;
            let Some(id) = doc.get_first(self.schema.id).and_then(|v| v.as_str()) else {
                continue;
            };
            hits.push(IndexHit {
                id: id.to_string(),
                score,
                fragments: snippets.fragments(&doc),
            });
        }
        Ok(hits)
    }

    /// Returns the number of committed documents.
    pub fn num_docs(&self) -> u64 {
        self.reader.searcher().num_docs()
    }

    /// Commits outstanding work and releases the writer.
    ///
    /// Subsequent searches and writes fail with [`IndexError::Unavailable`].
    /// Closing twice is a no-op.
    pub fn close(&self) -> Result<(), IndexError> {
        self.closed.store(true, Ordering::Release);
        let Some(mut writer) = self.writer.lock().take() else {
            return Ok(());
        };
        writer.commit().map_err(|e| IndexError::commit(&e))?;
        writer
            .wait_merging_threads()
            .map_err(|e| IndexError::commit(&e))?;
        info!(kind = %self.kind, "closed index");
        Ok(())
    }

    /// Builds `owner_id = owner AND (text)`.
    ///
    /// The owner clause contributes no score, so ranking is decided by the text
    /// alone. Text fields are searched with OR semantics and per-field boosts.
    fn build_query(&self, owner: OwnerId, text: &str) -> BooleanQuery {
        let fields = self
            .schema
            .text_fields()
            .iter()
            .map(|tf| tf.field)
            .collect();
        let mut parser = QueryParser::for_index(&self.index, fields);
        for tf in self.schema.text_fields() {
            parser.set_field_boost(tf.field, tf.boost);
        }
        let (text_query, errors) = parser.parse_query_lenient(text);
        if !errors.is_empty() {
            debug!(kind = %self.kind, ?errors, "recovered from query syntax errors");
        }

        let owner_term = Term::from_field_text(self.schema.owner_id, &owner.to_string());
        let owner_query: Box<dyn Query> = Box::new(ConstScoreQuery::new(
            Box::new(TermQuery::new(owner_term, IndexRecordOption::Basic)),
            0.0,
        ));
        BooleanQuery::new(vec![(Occur::Must, owner_query), (Occur::Must, text_query)])
    }

    /// Runs `op` with the writer and the id term, then commits and reloads.
    fn write<F>(&self, id: &str, op: F) -> Result<(), IndexError>
    where
        F: FnOnce(&mut IndexWriter, Term) -> Result<(), IndexError>,
    {
        let id_term = Term::from_field_text(self.schema.id, id);
        self.with_writer(|writer| op(writer, id_term))
    }

    /// Runs `op` with the writer, creating it on first use, then commits and reloads.
    fn with_writer<F>(&self, op: F) -> Result<(), IndexError>
    where
        F: FnOnce(&mut IndexWriter) -> Result<(), IndexError>,
    {
        {
            let mut guard = self.writer.lock();
            if self.is_closed() {
                return Err(IndexError::Unavailable(self.kind));
            }
            if guard.is_none() {
                let writer = self
                    .index
                    .writer_with_num_threads(1, self.writer_heap_size)
                    .map_err(|e| IndexError::write(&e))?;
                debug!(kind = %self.kind, "acquired index writer");
                *guard = Some(writer);
            }
            let Some(writer) = guard.as_mut() else {
                return Err(IndexError::Unavailable(self.kind));
            };
            op(writer)?;
            writer.commit().map_err(|e| IndexError::commit(&e))?;
        }
        self.reload()
    }

    /// Makes the latest commit visible to searches.
    fn reload(&self) -> Result<(), IndexError> {
        self.reader.reload().map_err(|e| IndexError::commit(&e))
    }
}
