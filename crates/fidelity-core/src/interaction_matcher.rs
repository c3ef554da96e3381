//! Interaction coverage.
//!
//! Every replayed interaction (an element path plus the listener indices
//! dispatched per event type) is recorded with whether it fixed the defect.
//! A candidate interaction counts as already tried when a single recorded
//! interaction covers it completely:
//!
//! - path: the recorded path is the candidate or one of its ancestors, or
//!   (with leaf drift tolerance) both paths end in the same leaf segment;
//! - events: every requested event type was dispatched, with every requested
//!   index.
//!
//! Coverage is never assembled from several partial records. Anything not
//! fully covered is an open hypothesis and decides as fixable.

use replay_fidelity_types::{
    CandidateInteractionEvent, EventIndexMap, ExperimentLogEntry, FixDecision, InteractionAttempt,
    InteractionRecord, StructuralPath,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::DecisionConfig;

/// How a recorded path covers a candidate path, ordered by specificity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathCoverage {
    /// Different ancestor chains, same leaf segment.
    LeafOnly,
    /// Recorded path is a strict ancestor of the candidate.
    Ancestor,
    /// Same path.
    Exact,
}

/// The recorded interaction that decided a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageMatch {
    /// Position in record order.
    pub record_index: usize,
    pub coverage: PathCoverage,
    pub fixed: bool,
}

#[derive(Debug, Clone)]
pub struct InteractionFixMatcher {
    records: Vec<InteractionRecord>,
    leaf_drift_tolerance: bool,
}

impl Default for InteractionFixMatcher {
    fn default() -> Self {
        Self::with_config(&DecisionConfig::default())
    }
}

impl InteractionFixMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &DecisionConfig) -> Self {
        Self {
            records: Vec::new(),
            leaf_drift_tolerance: config.leaf_drift_tolerance,
        }
    }

    /// Record one attempt. The outcome's `fixed` flag is stored as-is; a
    /// skipped attempt is recorded like any other.
    pub fn parse_interaction_result(&mut self, attempt: &InteractionAttempt) {
        if attempt.outcome.skipped {
            debug!(
                path = %attempt.path,
                reason = attempt.outcome.reason.as_deref().unwrap_or(""),
                "recording skipped interaction"
            );
        }
        self.records.push(InteractionRecord::from(attempt));
    }

    /// Record every interaction entry of a log, in order. Returns how many
    /// were recorded.
    pub fn parse_log(&mut self, log: &[ExperimentLogEntry]) -> usize {
        let before = self.records.len();
        for entry in log {
            if let ExperimentLogEntry::Interaction(attempt) = entry {
                self.parse_interaction_result(attempt);
            }
        }
        self.records.len() - before
    }

    pub fn records(&self) -> &[InteractionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn path_coverage(
        &self,
        recorded: &StructuralPath,
        candidate: &StructuralPath,
    ) -> Option<PathCoverage> {
        if recorded == candidate {
            Some(PathCoverage::Exact)
        } else if recorded.is_ancestor_of(candidate) {
            Some(PathCoverage::Ancestor)
        } else if self.leaf_drift_tolerance && recorded.shares_leaf(candidate) {
            Some(PathCoverage::LeafOnly)
        } else {
            None
        }
    }

    /// Most specific fully covering record. Ties go to the most recent one.
    pub fn find_cover(&self, candidate: &CandidateInteractionEvent) -> Option<CoverageMatch> {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, record)| {
                events_covered(&record.event_type_to_indices, &candidate.event_type_to_indices)
            })
            .filter_map(|(index, record)| {
                self.path_coverage(&record.path, &candidate.path)
                    .map(|coverage| (coverage, record.path.depth(), index, record.fixed))
            })
            .max_by_key(|&(coverage, depth, index, _)| (coverage, depth, index))
            .map(|(coverage, _, record_index, fixed)| CoverageMatch {
                record_index,
                coverage,
                fixed,
            })
    }

    pub fn decide_interact(&self, candidate: &CandidateInteractionEvent) -> FixDecision {
        match self.find_cover(candidate) {
            Some(found) => {
                trace!(
                    path = %candidate.path,
                    record = found.record_index,
                    coverage = ?found.coverage,
                    fixed = found.fixed,
                    "candidate interaction already tried"
                );
                FixDecision::known(found.fixed)
            }
            None => FixDecision::no_evidence(),
        }
    }
}

/// True if every requested event type is present in `recorded` with every
/// requested index.
pub fn events_covered(recorded: &EventIndexMap, requested: &EventIndexMap) -> bool {
    requested.iter().all(|(event_type, indices)| {
        recorded
            .get(event_type)
            .is_some_and(|dispatched| indices.is_subset(dispatched))
    })
}
