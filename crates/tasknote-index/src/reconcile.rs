//! Result reconciliation: ranked ids back to canonical rows, in rank order.

use std::collections::HashMap;

use serde::Serialize;

use crate::{snippets::Fragments, store::IndexHit};

/// A canonical record paired with its search relevance and highlights.
///
/// Serializes as the record's own fields plus `score` and `highlights`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranked<T> {
    /// The record.
    #[serde(flatten)]
    pub item: T,
    /// Relevance score.
    pub score: f32,
    /// Highlight fragments keyed by field name.
    pub highlights: Fragments,
}

/// Orders `rows` by `hits`.
///
/// `rows` may arrive in any order. Hits without a row are dropped; rows without a
/// hit are ignored. The output is never re-sorted.
pub fn reconcile<T, K>(hits: Vec<IndexHit>, rows: Vec<T>, key: K) -> Vec<Ranked<T>>
where
    K: Fn(&T) -> &str,
{
    let mut by_id: HashMap<String, T> = rows
        .into_iter()
        .map(|row| (key(&row).to_string(), row))
        .collect();

    hits.into_iter()
        .filter_map(|hit| {
            by_id.remove(&hit.id).map(|item| Ranked {
                item,
                score: hit.score,
                highlights: hit.fragments,
            })
        })
        .collect()
}
