//! Field mappings for the task and note indices.
//!
//! Both indices share the same two key fields:
//! - `id`: primary key (raw string, stored), the delete-by-id term
//! - `owner_id`: owning user (raw string, stored), matched exactly
//!
//! Text fields are tokenized with [`TASKNOTE_TOKENIZER`] and stored so that
//! highlight fragments can be cut from them:
//! - task index: `title` (boosted 2.0x), `content` (aggregated note text)
//! - note index: `content`, `label` (boosted 1.5x)

use tantivy::{
    TantivyDocument,
    schema::{
        Field, IndexRecordOption, STORED, STRING, Schema, TextFieldIndexing, TextOptions,
    },
};
use tasknote_model::EntityKind;

use crate::{analyzer::TASKNOTE_TOKENIZER, document::IndexedDocument};

/// Field names.
pub mod fields {
    /// Primary key.
    pub const ID: &str = "id";
    /// Owning user.
    pub const OWNER_ID: &str = "owner_id";
    /// Task title.
    pub const TITLE: &str = "title";
    /// Note body, or a task's aggregated note text.
    pub const CONTENT: &str = "content";
    /// Note label.
    pub const LABEL: &str = "label";
}

/// Field boost weights for search ranking.
pub mod boost {
    /// Title field boost (2.0x).
    pub const TITLE: f32 = 2.0;
    /// Label field boost (1.5x).
    pub const LABEL: f32 = 1.5;
    /// Content field boost (1.0x).
    pub const CONTENT: f32 = 1.0;
}

/// A tokenized, stored text field.
#[derive(Debug, Clone, Copy)]
pub struct TextField {
    /// Field name, used as the key of highlight fragment maps.
    pub name: &'static str,
    /// Tantivy field handle.
    pub field: Field,
    /// Query-time boost.
    pub boost: f32,
}

/// Handles to the fields of one index.
#[derive(Debug, Clone)]
pub struct IndexSchema {
    /// The underlying Tantivy schema.
    schema: Schema,
    /// Which entity kind the index holds.
    kind: EntityKind,
    /// Primary key field.
    pub id: Field,
    /// Owner field.
    pub owner_id: Field,
    /// Searchable text fields, in declaration order.
    text_fields: Vec<TextField>,
}

impl IndexSchema {
    /// Builds the field mapping for `kind`.
    pub fn for_kind(kind: EntityKind) -> Self {
        let mut builder = Schema::builder();

        let id = builder.add_text_field(fields::ID, STRING | STORED);
        let owner_id = builder.add_text_field(fields::OWNER_ID, STRING | STORED);

        let text_options = TextOptions::default()
            .set_indexing_options(
                TextFieldIndexing::default()
                    .set_tokenizer(TASKNOTE_TOKENIZER)
                    .set_index_option(IndexRecordOption::WithFreqsAndPositions),
            )
            .set_stored();

        let layout: &[(&'static str, f32)] = match kind {
            EntityKind::Task => &[(fields::TITLE, boost::TITLE), (fields::CONTENT, boost::CONTENT)],
            EntityKind::Note => &[(fields::CONTENT, boost::CONTENT), (fields::LABEL, boost::LABEL)],
        };
        let text_fields = layout
            .iter()
            .map(|&(name, weight)| TextField {
                name,
                field: builder.add_text_field(name, text_options.clone()),
                boost: weight,
            })
            .collect();

        Self {
            schema: builder.build(),
            kind,
            id,
            owner_id,
            text_fields,
        }
    }

    /// Returns a reference to the underlying Tantivy schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The entity kind this mapping is for.
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Searchable text fields.
    pub fn text_fields(&self) -> &[TextField] {
        &self.text_fields
    }

    /// Converts a document into a Tantivy document keyed by `id`.
    ///
    /// The caller is responsible for checking that the document kind matches.
    pub fn to_document(&self, id: &str, doc: &IndexedDocument) -> TantivyDocument {
        let mut out = TantivyDocument::new();
        out.add_text(self.id, id);
        out.add_text(self.owner_id, doc.owner_id().to_string());
        for (name, value) in doc.text_values() {
            if let Some(text_field) = self.text_fields.iter().find(|tf| tf.name == name) {
                out.add_text(text_field.field, value);
            }
        }
        out
    }
}

#[cfg(test)]
mod test {
    use tantivy::schema::{FieldType, Value};

    use super::*;
    use crate::document::NoteDocument;

    #[test]
    fn key_fields_are_raw_strings() {
        let schema = IndexSchema::for_kind(EntityKind::Task);
        for field in [schema.id, schema.owner_id] {
            let entry = schema.schema().get_field_entry(field);
            let FieldType::Str(options) = entry.field_type() else {
                panic!("expected text field");
            };
            let indexing = options.get_indexing_options().unwrap();
            assert_eq!(indexing.tokenizer(), "raw");
            assert!(entry.is_stored());
        }
    }

    #[test]
    fn text_fields_use_custom_tokenizer() {
        let schema = IndexSchema::for_kind(EntityKind::Note);
        let names: Vec<_> = schema.text_fields().iter().map(|tf| tf.name).collect();
        assert_eq!(names, [fields::CONTENT, fields::LABEL]);
        for tf in schema.text_fields() {
            let entry = schema.schema().get_field_entry(tf.field);
            let FieldType::Str(options) = entry.field_type() else {
                panic!("expected text field");
            };
            assert_eq!(
                options.get_indexing_options().unwrap().tokenizer(),
                TASKNOTE_TOKENIZER
            );
        }
    }

    #[test]
    fn task_schema_boosts_title() {
        let schema = IndexSchema::for_kind(EntityKind::Task);
        let title = schema.text_fields()[0];
        assert_eq!(title.name, fields::TITLE);
        assert!(title.boost > boost::CONTENT);
    }

    #[test]
    fn to_document_stringifies_owner() {
        let schema = IndexSchema::for_kind(EntityKind::Note);
        let doc = IndexedDocument::Note(NoteDocument {
            id: "n1".into(),
            owner_id: 42,
            content: "budget".into(),
            label: "work".into(),
        });
        let tantivy_doc = schema.to_document("n1", &doc);
        let owner = tantivy_doc.get_first(schema.owner_id).and_then(|v| v.as_str());
        assert_eq!(owner, Some("42"));
    }
}
