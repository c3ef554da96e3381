//! Builders for experiment logs and mutation records.

use replay_fidelity::{
    DimensionSnapshot, EventIndexMap, ExceptionObservation, ExperimentLogEntry, FidelityOutcome,
    InteractionAttempt, InteractionOutcome, MutationRecord, Rect, StructuralPath, SubjectRef,
};

pub fn exceptions_entry(exceptions: Vec<ExceptionObservation>) -> ExperimentLogEntry {
    ExperimentLogEntry::Exceptions { exceptions }
}

pub fn fidelity_by_type(exception_type: &str, fixed: bool) -> ExperimentLogEntry {
    ExperimentLogEntry::Fidelity(FidelityOutcome {
        subject_ref: SubjectRef::ByType(exception_type.to_string()),
        short_description: None,
        fixed,
    })
}

pub fn fidelity_by_index(baseline_index: i64, fixed: bool) -> ExperimentLogEntry {
    ExperimentLogEntry::Fidelity(FidelityOutcome {
        subject_ref: SubjectRef::ByBaselineIndex(baseline_index),
        short_description: None,
        fixed,
    })
}

/// Interaction entry dispatching `indices` for each listed event type.
pub fn interaction_entry(path: &str, events: &[(&str, Vec<u32>)], fixed: bool) -> ExperimentLogEntry {
    let mut map = EventIndexMap::new();
    for (event_type, indices) in events {
        map.entry(event_type.to_string())
            .or_default()
            .extend(indices.iter().copied());
    }
    ExperimentLogEntry::Interaction(InteractionAttempt {
        path: StructuralPath::parse(path),
        event_type_to_indices: map,
        outcome: InteractionOutcome {
            fixed,
            skipped: false,
            reason: None,
        },
    })
}

/// Mutation record whose target grows from `before_height` to `after_height`.
pub fn mutation_record(
    id: u64,
    path: &str,
    method: &str,
    before_height: f64,
    after_height: f64,
    ever_in_document: bool,
) -> MutationRecord {
    MutationRecord {
        id,
        path: StructuralPath::parse(path),
        method: method.to_string(),
        args: Vec::new(),
        before_snapshot: DimensionSnapshot::new(Some(Rect::new(0.0, 0.0, 100.0, before_height)), None),
        after_snapshot: DimensionSnapshot::new(Some(Rect::new(0.0, 0.0, 100.0, after_height)), None),
        ever_in_document,
        currently_in_document: ever_in_document,
    }
}
