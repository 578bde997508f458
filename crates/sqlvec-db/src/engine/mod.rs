//! ANN engine contract and the bundled flat engine.
//!
//! The vector index layer never searches vectors itself; it forwards every
//! operation to an [`AnnEngine`]. Production deployments plug in a graph
//! index here. [`FlatEngine`] is an exact linear-scan implementation that
//! keeps its rows in the index's shadow table.

mod flat;
mod meta;

pub use flat::{FlatEngine, FlatIndex, META_TABLE};
pub use meta::{check_index_compatibility, IndexCompatibility, IndexMeta};

use crate::error::DbResult;
use serde::{Deserialize, Serialize};
use sqlvec_core::{ElementType, Vector};

// ============================================================================
// DistanceMetric
// ============================================================================

/// Distance metric an index is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// Cosine distance (default).
    #[default]
    Cosine,
}

impl DistanceMetric {
    /// Numeric identifier passed to engines.
    pub fn id(&self) -> u32 {
        match self {
            DistanceMetric::Cosine => 0,
        }
    }

    /// Get the metric name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceMetric::Cosine => "cosine",
        }
    }
}

impl std::fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// AnnEngine Trait
// ============================================================================

/// Contract between a vector index and the ANN engine backing it.
///
/// ## Implementation Notes
///
/// - A handle is owned by exactly one cursor; engines must not hand out
///   shared handles.
/// - Errors are propagated to the caller unchanged; the index layer never
///   retries.
/// - `search` returns row ids ordered best match first. Tie-breaking is up
///   to the engine.
pub trait AnnEngine {
    /// An open index.
    type Handle;

    /// Create the engine's structures for `name`.
    fn create_index(&self, name: &str, dims: usize, metric: DistanceMetric) -> DbResult<()>;

    /// Open an index created earlier.
    fn open_index(&self, name: &str) -> DbResult<Self::Handle>;

    /// Release an open index.
    fn close_index(&self, handle: Self::Handle);

    /// Element type of the vectors stored in an open index.
    fn element_type(&self, handle: &Self::Handle) -> ElementType;

    /// Add `vector` under `rowid`, replacing any previous entry.
    fn insert(&self, handle: &mut Self::Handle, vector: &Vector<'_>, rowid: i64) -> DbResult<()>;

    /// Up to `k` row ids nearest to `query`.
    fn search(&self, handle: &Self::Handle, query: &Vector<'_>, k: usize) -> DbResult<Vec<i64>>;
}
