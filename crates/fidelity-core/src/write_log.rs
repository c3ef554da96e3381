//! Write-log processing.
//!
//! Turns the raw mutation stream of one page load (or one replayed
//! interaction) into the entries used to explain a detected discrepancy:
//! writes to nodes that never reached the document are dropped, the rest are
//! annotated with whether they visibly changed the page.

use std::collections::BTreeSet;

use replay_fidelity_types::{MutationRecord, ProcessedWriteEntry, StructuralPath};
use tracing::debug;

use crate::config::DecisionConfig;
use crate::mutation_effect::MutationEffectClassifier;

#[derive(Debug, Clone, Default)]
pub struct WriteLogProcessor {
    classifier: MutationEffectClassifier,
}

impl WriteLogProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DecisionConfig) -> Self {
        Self {
            classifier: MutationEffectClassifier::with_config(config),
        }
    }

    pub fn classifier(&self) -> &MutationEffectClassifier {
        &self.classifier
    }

    /// Process one session's records.
    ///
    /// Output is in dispatch (`id`) order regardless of input order; when an id
    /// appears more than once only its first occurrence is kept. Processing the
    /// same input twice yields identical output.
    pub fn process(&self, records: &[MutationRecord]) -> Vec<ProcessedWriteEntry> {
        let mut ordered: Vec<&MutationRecord> = records.iter().collect();
        // Stable sort keeps the first occurrence of a duplicated id in front.
        ordered.sort_by_key(|record| record.id);

        let mut seen = BTreeSet::new();
        let mut detached = 0usize;
        let mut entries = Vec::with_capacity(ordered.len());
        for record in ordered {
            if !seen.insert(record.id) {
                debug!(id = record.id, "dropping duplicate mutation id");
                continue;
            }
            if !record.ever_in_document {
                detached += 1;
                continue;
            }
            let effective = self.classifier.is_effective(record);
            entries.push(ProcessedWriteEntry::from_record(record, effective));
        }

        debug!(
            input = records.len(),
            kept = entries.len(),
            detached,
            effective = entries.iter().filter(|e| e.effective).count(),
            "processed write log"
        );
        entries
    }
}

/// Writes relevant to `element`.
///
/// With `strict`, only writes whose target is `element` itself; otherwise also
/// writes to any of its ancestors, since those can reshape the element too.
pub fn find_writes<'a>(
    log: &'a [ProcessedWriteEntry],
    element: &StructuralPath,
    strict: bool,
) -> Vec<&'a ProcessedWriteEntry> {
    log.iter()
        .filter(|entry| {
            if strict {
                entry.path == *element
            } else {
                entry.path.is_ancestor_or_equal(element)
            }
        })
        .collect()
}

/// Only the entries that visibly changed the page.
pub fn effective_writes(log: &[ProcessedWriteEntry]) -> Vec<&ProcessedWriteEntry> {
    log.iter().filter(|entry| entry.effective).collect()
}
