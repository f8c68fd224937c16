use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::catalog::{CatalogEntry, CatalogIndex};
use crate::error::EngineError;
use crate::matcher::best_match;
use crate::model::VectorSpaceModel;
use crate::normalize::normalize;
use crate::persist::{save_model, try_load_model, CachePaths};

/// The outcome of a successful match: the winning entry and its cosine
/// similarity against the query.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub entry: CatalogEntry,
    pub score: f32,
}

/// The listing projection: catalog metadata without matching state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceSummary {
    pub grade_level: String,
    pub subject: String,
    pub url: String,
}

/// An immutable, internally consistent model+catalog pair. Everything in a
/// snapshot is read-only after construction, so concurrent queries need no
/// coordination.
pub struct Snapshot {
    pub model: VectorSpaceModel,
    pub index: CatalogIndex,
}

impl Snapshot {
    /// Fit the model over the catalog and index the entries.
    pub fn build(entries: Vec<CatalogEntry>) -> Snapshot {
        let (model, index) = CatalogIndex::from_entries(entries);
        Snapshot { model, index }
    }

    /// Cache-first construction: restore persisted artifacts when they exist
    /// and still line up with the catalog, otherwise rebuild and write the
    /// cache back on a best-effort basis. Cache trouble is never fatal.
    pub fn from_cache_or_build(entries: Vec<CatalogEntry>, cache: &CachePaths) -> Snapshot {
        if let Some((model, vectors)) = try_load_model(cache) {
            if vectors.len() == entries.len() {
                match CatalogIndex::from_parts(entries.clone(), vectors) {
                    Ok(index) => {
                        tracing::info!(
                            resources = index.len(),
                            terms = model.vocab_size(),
                            "restored model from cache"
                        );
                        return Snapshot { model, index };
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "cached vectors rejected, rebuilding")
                    }
                }
            } else {
                tracing::warn!(
                    cached = vectors.len(),
                    catalog = entries.len(),
                    "cached vector count disagrees with catalog, rebuilding"
                );
            }
        }
        let snapshot = Snapshot::build(entries);
        let vectors: Vec<_> = snapshot.index.all().iter().map(|ie| ie.vector.clone()).collect();
        if let Err(e) = save_model(cache, &snapshot.model, &vectors) {
            tracing::warn!(error = %e, "failed to write model cache");
        }
        snapshot
    }

    fn match_resource(
        &self,
        description: &str,
        grade_level: Option<&str>,
    ) -> Result<MatchResult, EngineError> {
        if self.index.is_empty() {
            return Err(EngineError::EmptyCatalog);
        }
        let keywords = normalize(description);
        let query = self.model.embed(&keywords);

        let candidates = match grade_level {
            Some(grade) => {
                let filtered = self.index.filter(|e| e.grade_level == grade);
                if filtered.is_empty() {
                    return Err(EngineError::NoMatchForGradeLevel(grade.to_string()));
                }
                filtered
            }
            None => self.index.all().iter().collect(),
        };

        let (hit, score) = best_match(&query, &candidates)?;
        Ok(MatchResult { entry: hit.entry.clone(), score })
    }

    fn list_all(&self) -> Vec<ResourceSummary> {
        self.index
            .all()
            .iter()
            .map(|ie| ResourceSummary {
                grade_level: ie.entry.grade_level.clone(),
                subject: ie.entry.subject.clone(),
                url: ie.entry.url.clone(),
            })
            .collect()
    }
}

/// Handle to the active snapshot. Queries grab an `Arc` clone and run
/// lock-free against it; `reload` publishes a replacement atomically, so
/// in-flight queries keep observing the snapshot they started with.
pub struct Engine {
    current: RwLock<Arc<Snapshot>>,
}

impl Engine {
    pub fn new(snapshot: Snapshot) -> Engine {
        Engine { current: RwLock::new(Arc::new(snapshot)) }
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.current.read().clone()
    }

    /// Build a fresh snapshot from new catalog entries and swap it in.
    pub fn reload(&self, entries: Vec<CatalogEntry>) {
        let snapshot = Arc::new(Snapshot::build(entries));
        *self.current.write() = snapshot;
    }

    /// Match a free-text description to the most relevant catalog entry,
    /// optionally restricted to one grade level.
    pub fn match_resource(
        &self,
        description: &str,
        grade_level: Option<&str>,
    ) -> Result<MatchResult, EngineError> {
        self.snapshot().match_resource(description, grade_level)
    }

    /// Project the full catalog as `{grade_level, subject, url}` records.
    pub fn list_all(&self) -> Vec<ResourceSummary> {
        self.snapshot().list_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(grade: &str, subject: &str, topics: &str, url: &str) -> CatalogEntry {
        CatalogEntry {
            grade_level: grade.into(),
            subject: subject.into(),
            topic_keywords: topics.into(),
            url: url.into(),
        }
    }

    #[test]
    fn reload_swaps_the_active_snapshot() {
        let engine = Engine::new(Snapshot::build(vec![entry("5", "Math", "fractions", "u1")]));
        let held = engine.snapshot();

        engine.reload(vec![
            entry("6", "Math", "algebra", "u2"),
            entry("6", "Science", "cells", "u3"),
        ]);

        // The held snapshot still sees the old catalog.
        assert_eq!(held.index.len(), 1);
        assert_eq!(engine.snapshot().index.len(), 2);
        let m = engine.match_resource("intro to algebra", None).unwrap();
        assert_eq!(m.entry.url, "u2");
    }

    #[test]
    fn empty_catalog_is_an_explicit_not_found() {
        let engine = Engine::new(Snapshot::build(vec![]));
        let err = engine.match_resource("anything", None).unwrap_err();
        assert!(matches!(err, EngineError::EmptyCatalog));
        assert!(err.is_not_found());
        assert!(engine.list_all().is_empty());
    }
}
