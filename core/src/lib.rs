//! Matching engine for educational resource recommendation: normalize
//! assignment text, embed it in a TF-IDF vector space fitted over the
//! resource catalog, and pick the nearest entry by cosine similarity.

pub mod catalog;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod model;
pub mod normalize;
pub mod persist;

pub use catalog::{load_catalog, CatalogEntry, CatalogIndex, IndexedEntry};
pub use engine::{Engine, MatchResult, ResourceSummary, Snapshot};
pub use error::EngineError;
pub use matcher::{best_match, cosine};
pub use model::{SparseVector, TermId, VectorSpaceModel};
pub use persist::{save_model, try_load_model, CachePaths};
