use thiserror::Error;

/// Failure taxonomy for the matching engine.
///
/// Load-time `DataSource` failures are fatal to startup. The two "not found"
/// variants are ordinary query outcomes, distinct from internal faults.
/// Cache read failures never appear here; they are recovered locally by
/// rebuilding from the catalog.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Catalog source missing or malformed at load time.
    #[error("catalog data source error: {0}")]
    DataSource(String),

    /// A grade-level filter matched no catalog entries.
    #[error("no resources found for grade level: {0}")]
    NoMatchForGradeLevel(String),

    /// The catalog holds no entries at all; every query is "not found".
    #[error("the resource catalog is empty")]
    EmptyCatalog,

    /// The matcher was invoked with zero candidates. Reaching this with a
    /// non-empty unfiltered catalog is an invariant violation.
    #[error("no candidate vectors to match against")]
    NoCandidates,

    /// Unexpected internal fault.
    #[error("internal error: {0}")]
    Internal(String),
}

impl EngineError {
    /// True for the "not found" class of outcomes, which callers surface as
    /// ordinary misses rather than faults.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            EngineError::NoMatchForGradeLevel(_) | EngineError::EmptyCatalog
        )
    }
}
