//! Persisted index metadata and compatibility checks.

use super::DistanceMetric;
use serde::{Deserialize, Serialize};
use sqlvec_core::ElementType;

/// Current metadata schema version.
const SCHEMA_VERSION: u32 = 1;

// ============================================================================
// IndexMeta
// ============================================================================

/// Metadata stored for every index the flat engine knows about.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexMeta {
    /// Element encoding of stored vectors.
    #[serde(default)]
    pub element_type: ElementType,

    /// Dimension of vectors.
    pub dimension: usize,

    /// Distance metric.
    #[serde(default)]
    pub metric: DistanceMetric,

    /// Schema version for future migrations.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Creation timestamp (RFC 3339).
    #[serde(default)]
    pub created_at: Option<String>,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl IndexMeta {
    /// Create new metadata stamped with the current time.
    pub fn new(element_type: ElementType, dimension: usize, metric: DistanceMetric) -> Self {
        Self {
            element_type,
            dimension,
            metric,
            schema_version: SCHEMA_VERSION,
            created_at: Some(chrono::Utc::now().to_rfc3339()),
        }
    }
}

// ============================================================================
// IndexCompatibility
// ============================================================================

/// Result of comparing stored metadata with a requested index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexCompatibility {
    /// Index exists with the same parameters.
    Compatible,

    /// No index with that name.
    NotFound,

    /// Index exists with a different dimension.
    IncompatibleDimension { expected: usize, actual: usize },

    /// Index exists with a different element type.
    IncompatibleElementType {
        expected: ElementType,
        actual: ElementType,
    },

    /// Index exists with a different metric.
    IncompatibleMetric {
        expected: DistanceMetric,
        actual: DistanceMetric,
    },

    /// Stored metadata could not be read.
    Corrupted(String),
}

impl IndexCompatibility {
    /// Check if the index is compatible.
    pub fn is_compatible(&self) -> bool {
        matches!(self, IndexCompatibility::Compatible)
    }

    /// Check if the index doesn't exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, IndexCompatibility::NotFound)
    }

    /// Human readable reason for an incompatible result.
    pub fn reason(&self) -> Option<String> {
        match self {
            IndexCompatibility::Compatible | IndexCompatibility::NotFound => None,
            IndexCompatibility::IncompatibleDimension { expected, actual } => Some(format!(
                "dimension mismatch: expected {}, found {}",
                expected, actual
            )),
            IndexCompatibility::IncompatibleElementType { expected, actual } => Some(format!(
                "element type mismatch: expected '{}', found '{}'",
                expected, actual
            )),
            IndexCompatibility::IncompatibleMetric { expected, actual } => Some(format!(
                "metric mismatch: expected '{}', found '{}'",
                expected, actual
            )),
            IndexCompatibility::Corrupted(msg) => Some(format!("index corrupted: {}", msg)),
        }
    }
}

/// Compare the stored metadata JSON (if any) with the requested index.
pub fn check_index_compatibility(
    stored: Option<&str>,
    requested: &IndexMeta,
) -> IndexCompatibility {
    let Some(json) = stored else {
        return IndexCompatibility::NotFound;
    };

    let meta: IndexMeta = match serde_json::from_str(json) {
        Ok(meta) => meta,
        Err(e) => return IndexCompatibility::Corrupted(e.to_string()),
    };

    if meta.dimension != requested.dimension {
        return IndexCompatibility::IncompatibleDimension {
            expected: requested.dimension,
            actual: meta.dimension,
        };
    }

    if meta.element_type != requested.element_type {
        return IndexCompatibility::IncompatibleElementType {
            expected: requested.element_type,
            actual: meta.element_type,
        };
    }

    if meta.metric != requested.metric {
        return IndexCompatibility::IncompatibleMetric {
            expected: requested.metric,
            actual: meta.metric,
        };
    }

    IndexCompatibility::Compatible
}

// ============================================================================
// Tests
// ============================================================================
