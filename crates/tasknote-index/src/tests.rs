//! End-to-end behavior: primary-store writes, background reindexing, and searches
//! reconciled against the store.

use std::sync::Arc;

use tasknote_model::{EntityKind, EntitySource, Note, SourceError, Task};
use tasknote_store::{NewNote, NewTask, NoteUpdate, SqliteStore};
use tempfile::TempDir;

use crate::{
    IndexError, Mutation, QueryEngine, Reindexer, SearchIndices, SearchLimits, SearchService,
    StoreOptions, encode_task,
};

/// Delegates to the store but returns batch lookups in reverse order.
struct ReversedBatches(Arc<SqliteStore>);

impl EntitySource for ReversedBatches {
    fn task_with_notes(&self, id: &str) -> Result<Option<Task>, SourceError> {
        EntitySource::task_with_notes(self.0.as_ref(), id)
    }

    fn tasks_by_ids(&self, ids: &[String]) -> Result<Vec<Task>, SourceError> {
        let mut tasks = EntitySource::tasks_by_ids(self.0.as_ref(), ids)?;
        tasks.reverse();
        Ok(tasks)
    }

    fn notes_by_ids(&self, ids: &[String]) -> Result<Vec<Note>, SourceError> {
        let mut notes = EntitySource::notes_by_ids(self.0.as_ref(), ids)?;
        notes.reverse();
        Ok(notes)
    }

    fn all_tasks(&self) -> Result<Vec<Task>, SourceError> {
        EntitySource::all_tasks(self.0.as_ref())
    }

    fn all_independent_notes(&self) -> Result<Vec<Note>, SourceError> {
        EntitySource::all_independent_notes(self.0.as_ref())
    }
}

/// A store, both indices, a reindexer and a search service over a temp directory.
struct Harness {
    _temp: TempDir,
    store: Arc<SqliteStore>,
    indices: SearchIndices,
    reindexer: Reindexer,
    service: SearchService,
}

impl Harness {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(SqliteStore::open(&temp.path().join("tasks.db")).unwrap());
        let indices = SearchIndices::open(
            &temp.path().join("task_index"),
            &temp.path().join("note_index"),
            &StoreOptions::default(),
        )
        .unwrap();
        let source: Arc<dyn EntitySource> = store.clone();
        let reindexer = Reindexer::new(&indices, Arc::clone(&source)).unwrap();
        let engine = QueryEngine::new(indices.clone(), SearchLimits::default());
        let service = SearchService::new(engine, source);
        Self {
            _temp: temp,
            store,
            indices,
            reindexer,
            service,
        }
    }

    fn task_titles(&self, owner: u64, text: &str) -> Vec<String> {
        self.service
            .search_tasks(owner, text, None)
            .unwrap()
            .into_iter()
            .map(|ranked| ranked.item.title)
            .collect()
    }

    fn note_contents(&self, owner: u64, text: &str) -> Vec<String> {
        self.service
            .search_notes(owner, text, None)
            .unwrap()
            .into_iter()
            .map(|ranked| ranked.item.content)
            .collect()
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn new_task_becomes_searchable_for_its_owner_only() {
    let h = Harness::new();
    let task = h.store.create_task(1, NewTask::titled("Buy milk")).unwrap();
    h.reindexer.submit(Mutation::TaskSaved {
        task_id: task.id.clone(),
    });
    h.reindexer.wait_idle().await;

    let results = h.service.search_tasks(1, "milk", None).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].item.id, task.id);
    assert_eq!(results[0].highlights["title"], ["Buy <mark>milk</mark>"]);

    assert!(h.service.search_tasks(2, "milk", None).unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn edited_note_is_found_by_new_text_only() {
    let h = Harness::new();
    let note = h
        .store
        .create_note(
            1,
            NewNote {
                task_id: None,
                content: "quarterly budget".into(),
                label: None,
            },
        )
        .unwrap();
    h.reindexer.submit(Mutation::for_note_change(&note, false));
    h.reindexer.wait_idle().await;
    assert_eq!(h.note_contents(1, "budget"), ["quarterly budget"]);

    let note = h
        .store
        .update_note(
            1,
            &note.id,
            NoteUpdate {
                content: "product roadmap".into(),
                label: None,
            },
        )
        .unwrap();
    h.reindexer.submit(Mutation::for_note_change(&note, false));
    h.reindexer.wait_idle().await;

    assert!(h.note_contents(1, "budget").is_empty());
    assert_eq!(h.note_contents(1, "roadmap"), ["product roadmap"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn task_notes_search_through_parent_task() {
    let h = Harness::new();
    let task = h.store.create_task(1, NewTask::titled("Groceries")).unwrap();
    let note = h
        .store
        .create_note(
            1,
            NewNote {
                task_id: Some(task.id.clone()),
                content: "oat milk".into(),
                label: None,
            },
        )
        .unwrap();
    h.reindexer.submit(Mutation::for_note_change(&note, false));
    h.reindexer.wait_idle().await;

    let results = h.service.search_tasks(1, "oat", None).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].item.notes.len(), 1);
    assert!(results[0].highlights["content"][0].contains("<mark>oat</mark>"));
    assert!(h.note_contents(1, "oat").is_empty());

    let deleted = h.store.delete_note(1, &note.id).unwrap();
    h.reindexer.submit(Mutation::for_note_change(&deleted, true));
    h.reindexer.wait_idle().await;
    assert!(h.task_titles(1, "oat").is_empty());
    assert_eq!(h.task_titles(1, "groceries"), ["Groceries"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn deleted_task_disappears() {
    let h = Harness::new();
    let task = h.store.create_task(1, NewTask::titled("Call plumber")).unwrap();
    h.reindexer.submit(Mutation::TaskSaved {
        task_id: task.id.clone(),
    });
    h.reindexer.wait_idle().await;
    assert_eq!(h.task_titles(1, "plumber"), ["Call plumber"]);

    h.store.delete_task(1, &task.id).unwrap();
    h.reindexer.submit(Mutation::TaskDeleted { task_id: task.id });
    h.reindexer.wait_idle().await;
    assert!(h.task_titles(1, "plumber").is_empty());
    assert_eq!(h.indices.tasks.num_docs(), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn results_follow_rank_order() {
    let h = Harness::new();
    for title in ["report", "report report draft", "weekly report summary notes"] {
        let task = h.store.create_task(1, NewTask::titled(title)).unwrap();
        h.reindexer.submit(Mutation::TaskSaved { task_id: task.id });
    }
    h.reindexer.wait_idle().await;

    let hits = h
        .indices
        .tasks
        .search(1, "report", 10)
        .unwrap()
        .into_iter()
        .map(|hit| hit.id)
        .collect::<Vec<_>>();
    let results = h.service.search_tasks(1, "report", None).unwrap();
    let ids: Vec<_> = results.iter().map(|r| r.item.id.clone()).collect();

    assert_eq!(ids.len(), 3);
    assert_eq!(ids, hits);

    let fetched: Vec<_> = EntitySource::tasks_by_ids(h.store.as_ref(), &hits)
        .unwrap()
        .into_iter()
        .map(|task| task.id)
        .collect();
    let reversed = ReversedBatches(Arc::clone(&h.store));
    assert_ne!(reversed.tasks_by_ids(&hits).unwrap()[0].id, fetched[0]);

    let service = SearchService::new(
        QueryEngine::new(h.indices.clone(), SearchLimits::default()),
        Arc::new(reversed),
    );
    let reordered: Vec<_> = service
        .search_tasks(1, "report", None)
        .unwrap()
        .into_iter()
        .map(|r| r.item.id)
        .collect();
    assert_eq!(reordered, hits);
    assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
}

#[tokio::test(flavor = "multi_thread")]
async fn stale_and_foreign_hits_are_dropped() {
    let h = Harness::new();
    let kept = h.store.create_task(1, NewTask::titled("Pay rent")).unwrap();
    let removed = h.store.create_task(1, NewTask::titled("Pay taxes")).unwrap();
    let foreign = h.store.create_task(2, NewTask::titled("Pay fines")).unwrap();
    for task in [&kept, &removed] {
        h.reindexer.submit(Mutation::TaskSaved {
            task_id: task.id.clone(),
        });
    }
    h.reindexer.wait_idle().await;

    // Index entry claiming user 1 owns user 2's task.
    let mut forged = foreign.clone();
    forged.owner_id = 1;
    h.indices
        .tasks
        .upsert(&foreign.id, &encode_task(&forged, &[]).into())
        .unwrap();
    // Row removed without telling the index.
    h.store.delete_task(1, &removed.id).unwrap();

    assert_eq!(h.task_titles(1, "pay"), ["Pay rent"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn blank_query_skips_closed_index() {
    let h = Harness::new();
    h.indices.close().unwrap();

    assert!(h.service.search_tasks(1, "", None).unwrap().is_empty());
    assert!(h.service.search_notes(1, "  ", None).unwrap().is_empty());
    assert!(matches!(
        h.service.search_tasks(1, "milk", None),
        Err(IndexError::Unavailable(EntityKind::Task))
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn limit_caps_results() {
    let h = Harness::new();
    for i in 0..5 {
        let note = h
            .store
            .create_note(
                1,
                NewNote {
                    task_id: None,
                    content: format!("standup {i}"),
                    label: None,
                },
            )
            .unwrap();
        h.reindexer.submit(Mutation::for_note_change(&note, false));
    }
    h.reindexer.wait_idle().await;

    assert_eq!(h.service.search_notes(1, "standup", Some(2)).unwrap().len(), 2);
    assert_eq!(h.service.search_notes(1, "standup", None).unwrap().len(), 5);
}
