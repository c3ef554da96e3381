//! Exception fix rules.
//!
//! Each replay attempt that targets one exception ends with a `fidelity`
//! entry saying whether the fix worked. The store turns those outcomes into
//! a table keyed by the exception's first description line, so that later
//! occurrences of the same exception (with a different stack trace) get the
//! same verdict.
//!
//! Lookups with no matching rule return `could_be_fixed = true`: an exception
//! nobody has tried to fix yet stays under investigation.

use std::collections::BTreeMap;

use replay_fidelity_types::{
    normalize_description, ExceptionObservation, ExperimentLogEntry, FidelityOutcome, FixDecision,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionFixRule {
    pub could_be_fixed: bool,
}

/// Counts gathered while parsing one log, for callers that want to warn
/// about incomplete experiments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixParseSummary {
    /// Rules written (including overwrites).
    pub rules_written: usize,
    /// Fidelity entries whose subject matched no observation.
    pub unresolved_fidelity: usize,
    /// Fidelity entries with no preceding exceptions entry.
    pub orphan_fidelity: usize,
    /// Exceptions entries never followed by a fidelity entry.
    pub unpaired_exceptions: usize,
}

impl FixParseSummary {
    pub fn merge(&mut self, other: &FixParseSummary) {
        self.rules_written += other.rules_written;
        self.unresolved_fidelity += other.unresolved_fidelity;
        self.orphan_fidelity += other.orphan_fidelity;
        self.unpaired_exceptions += other.unpaired_exceptions;
    }

    pub fn dropped_fidelity(&self) -> usize {
        self.unresolved_fidelity + self.orphan_fidelity
    }
}

/// Normalized description -> verdict. Last write wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExceptionFixRuleStore {
    rules: BTreeMap<String, ExceptionFixRule>,
}

impl ExceptionFixRuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Learn rules from an experiment log.
    ///
    /// Interaction entries are ignored. Entries that cannot be paired or
    /// resolved are skipped and only counted in the returned summary.
    pub fn parse_fix_result(&mut self, log: &[ExperimentLogEntry]) -> FixParseSummary {
        let mut summary = FixParseSummary::default();
        let mut current: Option<&[ExceptionObservation]> = None;
        let mut paired = false;

        for entry in log {
            match entry {
                ExperimentLogEntry::Exceptions { exceptions } => {
                    if current.is_some() && !paired {
                        summary.unpaired_exceptions += 1;
                    }
                    current = Some(exceptions.as_slice());
                    paired = false;
                }
                ExperimentLogEntry::Fidelity(outcome) => {
                    let Some(exceptions) = current else {
                        debug!(subject = %outcome.subject_ref, "fidelity entry without exceptions entry");
                        summary.orphan_fidelity += 1;
                        continue;
                    };
                    match self.apply_outcome(exceptions, outcome) {
                        Some(_) => {
                            summary.rules_written += 1;
                            paired = true;
                        }
                        None => summary.unresolved_fidelity += 1,
                    }
                }
                ExperimentLogEntry::Malformed { entry_type } => {
                    if !entry.breaks_fidelity_pairing() {
                        continue;
                    }
                    // A lost exceptions entry may sit here; what follows
                    // cannot be paired with anything before it.
                    debug!(entry_type = ?entry_type, "malformed entry clears fidelity pairing");
                    if current.is_some() && !paired {
                        summary.unpaired_exceptions += 1;
                    }
                    current = None;
                    paired = false;
                }
                ExperimentLogEntry::Interaction(_) => {}
            }
        }
        if current.is_some() && !paired {
            summary.unpaired_exceptions += 1;
        }

        debug!(
            rules_written = summary.rules_written,
            unresolved = summary.unresolved_fidelity,
            orphan = summary.orphan_fidelity,
            unpaired = summary.unpaired_exceptions,
            total_rules = self.rules.len(),
            "parsed fix results"
        );
        summary
    }

    /// Record one fidelity outcome against the exceptions it refers to.
    ///
    /// Returns the rule key, or `None` if the subject reference resolves to no
    /// observation. The first matching observation wins.
    pub fn apply_outcome(
        &mut self,
        exceptions: &[ExceptionObservation],
        outcome: &FidelityOutcome,
    ) -> Option<String> {
        let Some(observation) = exceptions
            .iter()
            .find(|obs| outcome.subject_ref.matches(obs))
        else {
            debug!(subject = %outcome.subject_ref, "unresolved fidelity subject");
            return None;
        };

        let key = outcome
            .short_description
            .as_deref()
            .map(normalize_description)
            .filter(|desc| !desc.is_empty())
            .unwrap_or_else(|| observation.normalized_description())
            .to_string();

        trace!(key = %key, fixed = outcome.fixed, "writing exception fix rule");
        self.rules.insert(
            key.clone(),
            ExceptionFixRule {
                could_be_fixed: outcome.fixed,
            },
        );
        Some(key)
    }

    /// Verdict for an observed exception; unknown exceptions are fixable.
    pub fn decide(&self, observation: &ExceptionObservation) -> FixDecision {
        match self.rules.get(observation.normalized_description()) {
            Some(rule) => FixDecision::known(rule.could_be_fixed),
            None => FixDecision::no_evidence(),
        }
    }

    pub fn get(&self, description: &str) -> Option<&ExceptionFixRule> {
        self.rules.get(normalize_description(description))
    }

    pub fn rules(&self) -> &BTreeMap<String, ExceptionFixRule> {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use replay_fidelity_types::SubjectRef;

    const SYNTAX: &str = "SyntaxError: Unexpected token '}'";

    fn exceptions(list: Vec<ExceptionObservation>) -> ExperimentLogEntry {
        ExperimentLogEntry::Exceptions { exceptions: list }
    }

    fn fidelity(subject_ref: SubjectRef, fixed: bool) -> ExperimentLogEntry {
        ExperimentLogEntry::Fidelity(FidelityOutcome {
            subject_ref,
            short_description: None,
            fixed,
        })
    }

    #[test]
    fn test_rule_keyed_by_type_reference() {
        let mut store = ExceptionFixRuleStore::new();
        let summary = store.parse_fix_result(&[
            exceptions(vec![ExceptionObservation::new("SyntaxError", SYNTAX)]),
            fidelity(SubjectRef::ByType("SyntaxError".into()), true),
        ]);

        assert_eq!(summary.rules_written, 1);
        assert_eq!(store.rules()[SYNTAX], ExceptionFixRule { could_be_fixed: true });
    }

    #[test]
    fn test_rule_keyed_by_baseline_index() {
        let mut store = ExceptionFixRuleStore::new();
        store.parse_fix_result(&[
            exceptions(vec![
                ExceptionObservation::new("TypeError", "TypeError: a\n  at f").with_baseline_index(0),
                ExceptionObservation::new("TypeError", "TypeError: b\n  at g").with_baseline_index(1),
            ]),
            fidelity(SubjectRef::ByBaselineIndex(1), false),
        ]);

        assert_eq!(store.len(), 1);
        assert!(!store.rules()["TypeError: b"].could_be_fixed);
        assert!(store.get("TypeError: a").is_none());
    }

    #[test]
    fn test_short_description_overrides_key() {
        let mut store = ExceptionFixRuleStore::new();
        store.parse_fix_result(&[
            exceptions(vec![ExceptionObservation::new("ReferenceError", "ReferenceError: x")]),
            ExperimentLogEntry::Fidelity(FidelityOutcome {
                subject_ref: SubjectRef::ByType("ReferenceError".into()),
                short_description: Some("x is not defined\nstack".into()),
                fixed: false,
            }),
        ]);

        assert!(!store.rules()["x is not defined"].could_be_fixed);
        assert!(store.get("ReferenceError: x").is_none());
    }

    #[test]
    fn test_decide_ignores_trace_lines() {
        let mut store = ExceptionFixRuleStore::new();
        store.parse_fix_result(&[
            exceptions(vec![ExceptionObservation::new("SyntaxError", SYNTAX)]),
            fidelity(SubjectRef::ByType("SyntaxError".into()), false),
        ]);

        let with_trace = ExceptionObservation::new(
            "SyntaxError",
            format!("{}\n    at eval (app.js:10:3)\n    at main (app.js:1:1)", SYNTAX),
        );
        let decision = store.decide(&with_trace);
        assert!(!decision.could_be_fixed);
        assert_eq!(decision, store.decide(&ExceptionObservation::new("SyntaxError", SYNTAX)));
    }

    #[test]
    fn test_unknown_exception_is_fixable() {
        let store = ExceptionFixRuleStore::new();
        let decision = store.decide(&ExceptionObservation::new("Error", "Error: never seen"));
        assert_eq!(decision, FixDecision::no_evidence());
    }

    #[test]
    fn test_exceptions_without_fidelity_create_no_rule() {
        let mut store = ExceptionFixRuleStore::new();
        let summary = store.parse_fix_result(&[exceptions(vec![ExceptionObservation::new(
            "SyntaxError",
            SYNTAX,
        )])]);

        assert!(store.is_empty());
        assert_eq!(summary.unpaired_exceptions, 1);
        assert!(store.decide(&ExceptionObservation::new("SyntaxError", SYNTAX)).could_be_fixed);
    }

    #[test]
    fn test_unresolvable_and_orphan_fidelity_are_dropped() {
        let mut store = ExceptionFixRuleStore::new();
        let summary = store.parse_fix_result(&[
            fidelity(SubjectRef::ByType("SyntaxError".into()), false),
            exceptions(vec![ExceptionObservation::new("SyntaxError", SYNTAX)]),
            fidelity(SubjectRef::ByType("TypeError".into()), false),
            fidelity(SubjectRef::ByBaselineIndex(-1), false),
        ]);

        assert!(store.is_empty());
        assert_eq!(summary.orphan_fidelity, 1);
        assert_eq!(summary.unresolved_fidelity, 2);
        assert_eq!(summary.dropped_fidelity(), 3);
        assert_eq!(summary.unpaired_exceptions, 1);
    }

    #[test]
    fn test_lost_exceptions_entry_orphans_next_fidelity() {
        let mut store = ExceptionFixRuleStore::new();
        let summary = store.parse_fix_result(&[
            exceptions(vec![ExceptionObservation::new("SyntaxError", "A")]),
            fidelity(SubjectRef::ByType("SyntaxError".into()), true),
            ExperimentLogEntry::Malformed {
                entry_type: Some("exceptions".into()),
            },
            fidelity(SubjectRef::ByType("SyntaxError".into()), false),
        ]);

        assert_eq!(summary.rules_written, 1);
        assert_eq!(summary.orphan_fidelity, 1);
        assert!(store.rules()["A"].could_be_fixed);
        assert!(store.decide(&ExceptionObservation::new("SyntaxError", "B")).could_be_fixed);
    }

    #[test]
    fn test_lost_interaction_entry_keeps_pairing() {
        let mut store = ExceptionFixRuleStore::new();
        let summary = store.parse_fix_result(&[
            exceptions(vec![ExceptionObservation::new("SyntaxError", "A")]),
            ExperimentLogEntry::Malformed {
                entry_type: Some("interaction".into()),
            },
            fidelity(SubjectRef::ByType("SyntaxError".into()), false),
        ]);

        assert_eq!(summary.rules_written, 1);
        assert!(!store.rules()["A"].could_be_fixed);
    }

    #[test]
    fn test_last_write_wins() {
        let mut store = ExceptionFixRuleStore::new();
        store.parse_fix_result(&[
            exceptions(vec![ExceptionObservation::new("SyntaxError", SYNTAX)]),
            fidelity(SubjectRef::ByType("SyntaxError".into()), true),
            exceptions(vec![ExceptionObservation::new("SyntaxError", SYNTAX)]),
            fidelity(SubjectRef::ByType("SyntaxError".into()), false),
        ]);
        assert_eq!(store.len(), 1);
        assert!(!store.rules()[SYNTAX].could_be_fixed);
    }

    #[test]
    fn test_parse_is_idempotent() {
        let log = vec![
            exceptions(vec![
                ExceptionObservation::new("SyntaxError", SYNTAX),
                ExceptionObservation::new("TypeError", "TypeError: t").with_baseline_index(3),
            ]),
            fidelity(SubjectRef::ByType("SyntaxError".into()), true),
            exceptions(vec![ExceptionObservation::new("TypeError", "TypeError: t").with_baseline_index(3)]),
            fidelity(SubjectRef::ByBaselineIndex(3), false),
        ];

        let mut once = ExceptionFixRuleStore::new();
        once.parse_fix_result(&log);
        let mut twice = once.clone();
        twice.parse_fix_result(&log);
        assert_eq!(once, twice);
    }
}
