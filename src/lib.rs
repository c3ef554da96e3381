//! Replay Fidelity
//!
//! Decision engine for automated diagnosis of fidelity defects when replaying
//! archived web pages. An orchestrator feeds it the logs of repeated
//! page-load experiments and asks:
//!
//! - **Exception fixes**: could this exception still be fixed, or has a
//!   targeted fix already failed?
//! - **Interactions**: has this interaction already been replayed, and did
//!   it help?
//! - **Write logs**: which DOM writes visibly changed the page around an
//!   element that differs between the live and the archived capture?
//!
//! See [`replay_fidelity_core`] for the engine and [`replay_fidelity_types`]
//! for the log data model.

pub use replay_fidelity_core as engine;
pub use replay_fidelity_types as types;

pub use replay_fidelity_core::{
    effective_writes, events_covered, find_writes, ingest_experiment_log, ingest_mutation_records,
    CoverageMatch, DeciderSummary, DecisionConfig, ExceptionFixRule, ExceptionFixRuleStore,
    FidelityDecider, FixParseSummary, GeometrySource, IngestReport, InteractionFixMatcher,
    MutationEffectClassifier, PathCoverage, SkippedEntry, WriteLogProcessor,
};
pub use replay_fidelity_types::{
    normalize_description, CandidateInteractionEvent, DecisionBasis, DimensionSnapshot,
    EventIndexMap, ExceptionObservation, ExperimentLogEntry, FidelityOutcome, FixDecision,
    InteractionAttempt, InteractionOutcome, InteractionRecord, MutationRecord,
    ProcessedWriteEntry, Rect, StructuralPath, SubjectRef, WriteArgument,
};
