//! Experiment-log entries and fix decisions.
//!
//! A replay harness runs the same archived page repeatedly, each time trying
//! one remediation, and writes an ordered log:
//!
//! ```text
//! {"type":"exceptions","exceptions":[{"type":"TypeError","description":"...","baselineIndex":3}]}
//! {"type":"fidelity","subjectRef":3,"fixed":false}
//! {"type":"interaction","path":"/html[1]/body[1]/a[2]","eventTypeToIndices":{"click":[0]},"outcome":{"fixed":true}}
//! ```
//!
//! A `fidelity` entry always refers to one observation of the closest
//! preceding `exceptions` entry.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::path::StructuralPath;

/// Baseline index assigned to an exception that could not be correlated with
/// any exception of the baseline run.
pub const UNMATCHED_BASELINE_INDEX: i64 = -1;

/// Event type -> dispatched listener indices.
pub type EventIndexMap = BTreeMap<String, BTreeSet<u32>>;

/// Truncate a description at its first line break.
///
/// Exception descriptions carry a stack trace after the first line; rule keys
/// and lookups both use this form.
pub fn normalize_description(description: &str) -> &str {
    match description.find(['\n', '\r']) {
        Some(idx) => &description[..idx],
        None => description,
    }
}

/// One exception seen during a replay attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionObservation {
    #[serde(rename = "type")]
    pub exception_type: String,
    /// Message, possibly followed by a multi-line trace.
    pub description: String,
    #[serde(default)]
    pub uncaught: bool,
    #[serde(default = "unmatched_baseline_index")]
    pub baseline_index: i64,
}

fn unmatched_baseline_index() -> i64 {
    UNMATCHED_BASELINE_INDEX
}

impl ExceptionObservation {
    pub fn new(exception_type: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            exception_type: exception_type.into(),
            description: description.into(),
            uncaught: false,
            baseline_index: UNMATCHED_BASELINE_INDEX,
        }
    }

    /// Builder method: set the baseline index.
    pub fn with_baseline_index(mut self, index: i64) -> Self {
        self.baseline_index = index;
        self
    }

    /// Builder method: mark as uncaught.
    pub fn uncaught(mut self) -> Self {
        self.uncaught = true;
        self
    }

    pub fn normalized_description(&self) -> &str {
        normalize_description(&self.description)
    }
}

/// Which exception a fidelity outcome talks about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubjectRef {
    /// Numeric form: the observation's `baselineIndex`.
    ByBaselineIndex(i64),
    /// Textual form: the observation's `type`.
    ByType(String),
}

impl SubjectRef {
    /// True if `observation` is the one this reference names.
    ///
    /// The unmatched baseline index never resolves.
    pub fn matches(&self, observation: &ExceptionObservation) -> bool {
        match self {
            SubjectRef::ByType(name) => observation.exception_type == *name,
            SubjectRef::ByBaselineIndex(index) => {
                *index != UNMATCHED_BASELINE_INDEX && observation.baseline_index == *index
            }
        }
    }
}

impl fmt::Display for SubjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubjectRef::ByBaselineIndex(index) => write!(f, "baseline#{}", index),
            SubjectRef::ByType(name) => write!(f, "{}", name),
        }
    }
}

/// Outcome of one targeted fix attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FidelityOutcome {
    pub subject_ref: SubjectRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    pub fixed: bool,
}

/// Outcome of a replayed interaction. `skipped` and `reason` are informational.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InteractionOutcome {
    pub fixed: bool,
    #[serde(default)]
    pub skipped: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// A single replayed interaction and its outcome, as logged by the harness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionAttempt {
    pub path: StructuralPath,
    pub event_type_to_indices: EventIndexMap,
    pub outcome: InteractionOutcome,
}

/// An interaction that has been tried, with its verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionRecord {
    pub path: StructuralPath,
    pub event_type_to_indices: EventIndexMap,
    pub fixed: bool,
}

impl From<&InteractionAttempt> for InteractionRecord {
    fn from(attempt: &InteractionAttempt) -> Self {
        Self {
            path: attempt.path.clone(),
            event_type_to_indices: attempt.event_type_to_indices.clone(),
            fixed: attempt.outcome.fixed,
        }
    }
}

/// An interaction the orchestrator is considering. Never stored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateInteractionEvent {
    pub path: StructuralPath,
    pub event_type_to_indices: EventIndexMap,
}

impl CandidateInteractionEvent {
    pub fn new(path: impl Into<StructuralPath>) -> Self {
        Self {
            path: path.into(),
            event_type_to_indices: EventIndexMap::new(),
        }
    }

    /// Builder method: request listener indices for an event type.
    pub fn with_event(
        mut self,
        event_type: impl Into<String>,
        indices: impl IntoIterator<Item = u32>,
    ) -> Self {
        self.event_type_to_indices
            .entry(event_type.into())
            .or_default()
            .extend(indices);
        self
    }
}

/// One entry of an experiment log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExperimentLogEntry {
    /// Exceptions seen in one replay attempt.
    Exceptions {
        exceptions: Vec<ExceptionObservation>,
    },
    /// Outcome of a fix targeting one exception of the preceding entry.
    Fidelity(FidelityOutcome),
    /// A replayed interaction.
    Interaction(InteractionAttempt),
    /// Placeholder for an entry that could not be read. Keeps log positions
    /// intact so that a fidelity entry is never paired across a lost
    /// exceptions entry. Never read from or written to the wire.
    #[serde(skip)]
    Malformed {
        /// The entry's `type` field, when it had one.
        entry_type: Option<String>,
    },
}

impl ExperimentLogEntry {
    /// True if this entry may have been (or is) an exceptions entry, so the
    /// pairing for following fidelity entries is no longer known.
    pub fn breaks_fidelity_pairing(&self) -> bool {
        match self {
            ExperimentLogEntry::Exceptions { .. } => true,
            ExperimentLogEntry::Malformed { entry_type } => !matches!(
                entry_type.as_deref(),
                Some("fidelity") | Some("interaction")
            ),
            ExperimentLogEntry::Fidelity(_) | ExperimentLogEntry::Interaction(_) => false,
        }
    }
}

/// Why a decision came out the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionBasis {
    /// A previous attempt covers the query; its outcome is returned.
    KnownOutcome,
    /// Nothing covers the query; optimistic default.
    NoEvidence,
}

/// Decision handed back to the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixDecision {
    pub could_be_fixed: bool,
    pub basis: DecisionBasis,
}

impl FixDecision {
    /// Nothing is known, so the defect stays under investigation.
    pub fn no_evidence() -> Self {
        Self {
            could_be_fixed: true,
            basis: DecisionBasis::NoEvidence,
        }
    }

    pub fn known(could_be_fixed: bool) -> Self {
        Self {
            could_be_fixed,
            basis: DecisionBasis::KnownOutcome,
        }
    }
}
