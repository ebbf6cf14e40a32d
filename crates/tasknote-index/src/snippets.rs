//! Highlight fragments.
//!
//! One `SnippetGenerator` is built per text field for each search. A field only
//! contributes a fragment when at least one query term matched inside it; matched
//! spans are wrapped in `<mark>` tags and the rest of the fragment is HTML-escaped.

use std::collections::BTreeMap;

use tantivy::{Searcher, TantivyDocument, query::Query, snippet::SnippetGenerator};

use crate::{IndexError, schema::IndexSchema};

/// Opening highlight tag.
const MARK_OPEN: &str = "<mark>";

/// Closing highlight tag.
const MARK_CLOSE: &str = "</mark>";

/// Field name to fragments, as returned with each hit.
pub type Fragments = BTreeMap<String, Vec<String>>;

/// Snippet generators for every text field of an index.
pub(crate) struct FieldSnippets {
    /// Field name and its generator.
    generators: Vec<(&'static str, SnippetGenerator)>,
}

impl FieldSnippets {
    /// Builds generators for `query` over every text field of `schema`.
    pub(crate) fn new(
        searcher: &Searcher,
        query: &dyn Query,
        schema: &IndexSchema,
        max_chars: usize,
    ) -> Result<Self, IndexError> {
        let mut generators = Vec::with_capacity(schema.text_fields().len());
        for text_field in schema.text_fields() {
            let mut generator = SnippetGenerator::create(searcher, query, text_field.field)
                .map_err(|e| IndexError::search(&e))?;
            generator.set_max_num_chars(max_chars);
            generators.push((text_field.name, generator));
        }
        Ok(Self { generators })
    }

    /// Returns the highlighted fragments of `doc`, omitting fields without matches.
    pub(crate) fn fragments(&self, doc: &TantivyDocument) -> Fragments {
        let mut out = Fragments::new();
        for (name, generator) in &self.generators {
            let mut snippet = generator.snippet_from_doc(doc);
            if snippet.highlighted().is_empty() {
                continue;
            }
            snippet.set_snippet_prefix_postfix(MARK_OPEN, MARK_CLOSE);
            out.entry((*name).to_string())
                .or_default()
                .push(snippet.to_html());
        }
        out
    }
}
