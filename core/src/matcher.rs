use crate::catalog::IndexedEntry;
use crate::error::EngineError;
use crate::model::SparseVector;

/// Cosine similarity, defined as 0.0 when either vector has zero magnitude.
/// A query that vanishes after stopword removal, or a catalog entry with an
/// empty combined text, must not divide by zero.
pub fn cosine(a: &SparseVector, b: &SparseVector) -> f32 {
    let denom = a.norm() * b.norm();
    if denom == 0.0 {
        return 0.0;
    }
    a.dot(b) / denom
}

/// Exhaustive scan for the most similar candidate. Ties keep the earliest
/// candidate in catalog order, so results are deterministic.
pub fn best_match<'a>(
    query: &SparseVector,
    candidates: &[&'a IndexedEntry],
) -> Result<(&'a IndexedEntry, f32), EngineError> {
    let mut best: Option<(&IndexedEntry, f32)> = None;
    for ie in candidates {
        let score = cosine(query, &ie.vector);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((ie, score)),
        }
    }
    best.ok_or(EngineError::NoCandidates)
}
