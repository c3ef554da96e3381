//! DOM mutation records produced by in-page instrumentation.

use serde::{Deserialize, Serialize};

use crate::geometry::DimensionSnapshot;
use crate::path::StructuralPath;

/// An argument of a mutating DOM call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WriteArgument {
    /// A DOM node, measured alongside the target.
    Node { path: StructuralPath },
    /// Any other value, already serialized by the instrumentation.
    Value { summary: String },
}

impl WriteArgument {
    pub fn node(path: impl Into<StructuralPath>) -> Self {
        WriteArgument::Node { path: path.into() }
    }

    pub fn value(summary: impl Into<String>) -> Self {
        WriteArgument::Value {
            summary: summary.into(),
        }
    }

    pub fn node_path(&self) -> Option<&StructuralPath> {
        match self {
            WriteArgument::Node { path } => Some(path),
            WriteArgument::Value { .. } => None,
        }
    }

    /// Short textual form kept in processed write-log entries.
    pub fn summary(&self) -> String {
        match self {
            WriteArgument::Node { path } => format!("node:{}", path),
            WriteArgument::Value { summary } => summary.clone(),
        }
    }
}

/// One recorded mutating call.
///
/// `id` is a monotonically increasing ordinal assigned at dispatch time and is
/// the only ordering that matters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationRecord {
    pub id: u64,
    pub path: StructuralPath,
    pub method: String,
    #[serde(default)]
    pub args: Vec<WriteArgument>,
    #[serde(default)]
    pub before_snapshot: DimensionSnapshot,
    #[serde(default)]
    pub after_snapshot: DimensionSnapshot,
    pub ever_in_document: bool,
    pub currently_in_document: bool,
}

/// A mutation record annotated with whether it visibly changed the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedWriteEntry {
    pub id: u64,
    pub path: StructuralPath,
    pub method: String,
    pub args: Vec<String>,
    pub ever_in_document: bool,
    pub currently_in_document: bool,
    pub effective: bool,
}

impl ProcessedWriteEntry {
    pub fn from_record(record: &MutationRecord, effective: bool) -> Self {
        Self {
            id: record.id,
            path: record.path.clone(),
            method: record.method.clone(),
            args: record.args.iter().map(WriteArgument::summary).collect(),
            ever_in_document: record.ever_in_document,
            currently_in_document: record.currently_in_document,
            effective,
        }
    }
}
