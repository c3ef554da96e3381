//! Per-investigation decision facade.
//!
//! A [`FidelityDecider`] is built for one investigated defect, fed every
//! experiment log produced for it (sequentially, so that later outcomes
//! overwrite earlier ones), queried, and dropped. It owns all of its state;
//! two investigations never share rules or interaction records.

use replay_fidelity_types::{
    CandidateInteractionEvent, ExceptionObservation, ExperimentLogEntry, FixDecision,
    ProcessedWriteEntry, StructuralPath,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::DecisionConfig;
use crate::exception_rules::{ExceptionFixRuleStore, FixParseSummary};
use crate::interaction_matcher::InteractionFixMatcher;
use crate::log_ingest::{ingest_experiment_log, IngestReport};
use crate::write_log::find_writes;

/// Counts for orchestrator reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeciderSummary {
    pub investigation_id: String,
    pub rules: usize,
    pub recorded_interactions: usize,
}

#[derive(Debug, Clone)]
pub struct FidelityDecider {
    investigation_id: Uuid,
    config: DecisionConfig,
    rules: ExceptionFixRuleStore,
    interactions: InteractionFixMatcher,
}

impl Default for FidelityDecider {
    fn default() -> Self {
        Self::new()
    }
}

impl FidelityDecider {
    pub fn new() -> Self {
        Self::with_config(DecisionConfig::default())
    }

    pub fn with_config(config: DecisionConfig) -> Self {
        let investigation_id = Uuid::new_v4();
        debug!(investigation = %investigation_id, "starting investigation");
        Self {
            investigation_id,
            interactions: InteractionFixMatcher::with_config(&config),
            rules: ExceptionFixRuleStore::new(),
            config,
        }
    }

    pub fn investigation_id(&self) -> Uuid {
        self.investigation_id
    }

    pub fn config(&self) -> &DecisionConfig {
        &self.config
    }

    pub fn rules(&self) -> &ExceptionFixRuleStore {
        &self.rules
    }

    pub fn interactions(&self) -> &InteractionFixMatcher {
        &self.interactions
    }

    /// Feed one experiment log to both decision components.
    pub fn parse_log(&mut self, log: &[ExperimentLogEntry]) -> FixParseSummary {
        let summary = self.rules.parse_fix_result(log);
        let recorded = self.interactions.parse_log(log);
        if summary.dropped_fidelity() > 0 {
            warn!(
                investigation = %self.investigation_id,
                unresolved = summary.unresolved_fidelity,
                orphan = summary.orphan_fidelity,
                "dropped fidelity entries"
            );
        }
        debug!(
            investigation = %self.investigation_id,
            entries = log.len(),
            rules_written = summary.rules_written,
            interactions_recorded = recorded,
            "parsed experiment log"
        );
        summary
    }

    /// Like [`parse_log`](Self::parse_log), for raw JSON entries. Malformed
    /// entries are skipped and reported.
    pub fn parse_json_log(&mut self, values: &[Value]) -> (IngestReport, FixParseSummary) {
        let (entries, report) = ingest_experiment_log(values);
        let summary = self.parse_log(&entries);
        (report, summary)
    }

    /// Is this exception still worth trying to fix?
    pub fn decide(&self, observation: &ExceptionObservation) -> FixDecision {
        self.rules.decide(observation)
    }

    /// Is this interaction still worth replaying?
    pub fn decide_interact(&self, candidate: &CandidateInteractionEvent) -> FixDecision {
        self.interactions.decide_interact(candidate)
    }

    /// Writes that could explain a discrepancy on `element`.
    pub fn explain_element<'a>(
        &self,
        log: &'a [ProcessedWriteEntry],
        element: &StructuralPath,
        strict: bool,
    ) -> Vec<&'a ProcessedWriteEntry> {
        find_writes(log, element, strict)
    }

    pub fn summary(&self) -> DeciderSummary {
        DeciderSummary {
            investigation_id: self.investigation_id.to_string(),
            rules: self.rules.len(),
            recorded_interactions: self.interactions.len(),
        }
    }
}
