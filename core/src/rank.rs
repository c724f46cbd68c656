use crate::cost::TravelCategory;
use crate::index::{QueryVector, TermIndex};
use crate::{same_country, Destination, DestinationId};
use serde::Serialize;
use std::cmp::Ordering;

/// Cosine similarity of `query` against every destination, in catalog order.
///
/// Document vectors are unit length, so accumulating `q_w * posting.weight`
/// over the query's terms yields the cosine directly. A zero query (or a
/// destination with no indexed terms) scores exactly 0.
pub fn score(query: &QueryVector, index: &TermIndex) -> Vec<f32> {
    let mut scores = vec![0.0f32; index.len()];
    for &(tid, q_w) in query.vector().entries() {
        for p in index.postings(tid) {
            scores[p.doc_id as usize] += p.weight * q_w;
        }
    }
    for s in scores.iter_mut() {
        *s = s.clamp(0.0, 1.0);
    }
    scores
}

/// Similarity of `query` against a single destination.
pub fn similarity(query: &QueryVector, index: &TermIndex, id: DestinationId) -> f32 {
    index
        .document(id)
        .map(|d| query.vector().dot(d).clamp(0.0, 1.0))
        .unwrap_or(0.0)
}

/// A destination paired with its similarity to the current query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scored<'a> {
    pub destination: &'a Destination,
    pub similarity: f32,
}

/// Order destinations by similarity (stable, descending), then move every
/// destination in `user_country` ahead of the rest.
pub fn partition<'a>(destinations: &'a [Destination], similarities: &[f32], user_country: &str) -> Vec<Scored<'a>> {
    let mut sorted: Vec<Scored<'a>> = destinations
        .iter()
        .zip(similarities.iter().copied())
        .map(|(destination, similarity)| Scored { destination, similarity })
        .collect();
    // sort_by is stable: ties keep catalog order
    sorted.sort_by(|a, b| b.similarity.partial_cmp(&a.similarity).unwrap_or(Ordering::Equal));
    let (mut local, other): (Vec<_>, Vec<_>) = sorted
        .into_iter()
        .partition(|s| same_country(&s.destination.country, user_country));
    local.extend(other);
    local
}

/// One ranked, priced destination. Created per query and never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult {
    pub destination: Destination,
    pub similarity: f32,
    pub estimated_cost: f64,
    pub cost_category: TravelCategory,
}
