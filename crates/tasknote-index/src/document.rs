//! Document encoding: the derived, searchable projection of tasks and notes.

use tasknote_model::{EntityKind, Note, OwnerId, Task};

use crate::schema::fields;

/// Searchable projection of a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDocument {
    /// Task primary key.
    pub id: String,
    /// Owning user.
    pub owner_id: OwnerId,
    /// Task title.
    pub title: String,
    /// Content of every attached note, each followed by a single space.
    pub aggregated_note_text: String,
}

/// Searchable projection of an independent note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDocument {
    /// Note primary key.
    pub id: String,
    /// Owning user.
    pub owner_id: OwnerId,
    /// Note body.
    pub content: String,
    /// Note label, empty when the note has none.
    pub label: String,
}

/// A document destined for one of the two indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexedDocument {
    /// Goes to the task index.
    Task(TaskDocument),
    /// Goes to the note index.
    Note(NoteDocument),
}

impl IndexedDocument {
    /// The index this document belongs in.
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Task(_) => EntityKind::Task,
            Self::Note(_) => EntityKind::Note,
        }
    }

    /// The entity's primary key.
    pub fn id(&self) -> &str {
        match self {
            Self::Task(doc) => &doc.id,
            Self::Note(doc) => &doc.id,
        }
    }

    /// The owning user.
    pub fn owner_id(&self) -> OwnerId {
        match self {
            Self::Task(doc) => doc.owner_id,
            Self::Note(doc) => doc.owner_id,
        }
    }

    /// Tokenized field values, by schema field name.
    pub(crate) fn text_values(&self) -> Vec<(&'static str, &str)> {
        match self {
            Self::Task(doc) => vec![
                (fields::TITLE, doc.title.as_str()),
                (fields::CONTENT, doc.aggregated_note_text.as_str()),
            ],
            Self::Note(doc) => vec![
                (fields::CONTENT, doc.content.as_str()),
                (fields::LABEL, doc.label.as_str()),
            ],
        }
    }
}

impl From<TaskDocument> for IndexedDocument {
    fn from(doc: TaskDocument) -> Self {
        Self::Task(doc)
    }
}

impl From<NoteDocument> for IndexedDocument {
    fn from(doc: NoteDocument) -> Self {
        Self::Note(doc)
    }
}

/// Encodes a task together with its current notes.
pub fn encode_task(task: &Task, notes: &[Note]) -> TaskDocument {
    let aggregated_note_text = notes
        .iter()
        .map(|note| format!("{} ", note.content))
        .collect();
    TaskDocument {
        id: task.id.clone(),
        owner_id: task.owner_id,
        title: task.title.clone(),
        aggregated_note_text,
    }
}

/// Encodes an independent note.
pub fn encode_note(note: &Note) -> NoteDocument {
    NoteDocument {
        id: note.id.clone(),
        owner_id: note.owner_id,
        content: note.content.clone(),
        label: note.label.clone().unwrap_or_default(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn note(content: &str) -> Note {
        Note {
            id: format!("n-{content}"),
            task_id: Some("t1".into()),
            owner_id: 7,
            content: content.into(),
            label: None,
            created_at: 0,
        }
    }

    fn task() -> Task {
        Task {
            id: "t1".into(),
            owner_id: 7,
            title: "Buy milk".into(),
            completed: false,
            created_at: 0,
            completed_at: None,
            time_spent: 0,
            time_unit: "minute".into(),
            task_time: 0,
            notes: Vec::new(),
        }
    }

    #[test]
    fn task_notes_are_space_terminated() {
        let doc = encode_task(&task(), &[note("oat"), note("2 liters")]);
        assert_eq!(doc.aggregated_note_text, "oat 2 liters ");
        assert_eq!(doc.title, "Buy milk");
        assert_eq!(doc.owner_id, 7);
    }

    #[test]
    fn task_without_notes_has_empty_text() {
        let doc = encode_task(&task(), &[]);
        assert!(doc.aggregated_note_text.is_empty());
    }

    #[test]
    fn missing_label_becomes_empty() {
        let mut n = note("budget");
        n.task_id = None;
        let doc = encode_note(&n);
        assert_eq!(doc.label, "");
        assert_eq!(doc.content, "budget");

        n.label = Some("work".into());
        assert_eq!(encode_note(&n).label, "work");
    }

    #[test]
    fn kind_follows_variant() {
        let doc: IndexedDocument = encode_task(&task(), &[]).into();
        assert_eq!(doc.kind(), EntityKind::Task);
        assert_eq!(doc.id(), "t1");
        assert_eq!(doc.text_values()[0], (fields::TITLE, "Buy milk"));
    }
}
