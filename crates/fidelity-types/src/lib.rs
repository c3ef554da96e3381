//! Shared types for the replay-fidelity workspace.
//!
//! This crate holds the data model exchanged between in-page instrumentation,
//! the replay harness and the decision engine:
//!
//! - [`path`]: structural (XPath-like) DOM paths and their ancestry/leaf relations
//! - [`geometry`]: bounding rectangles and dimension snapshots
//! - [`mutation`]: raw mutation records and processed write-log entries
//! - [`experiment`]: experiment-log entries (exceptions, fidelity outcomes,
//!   interaction attempts) and the decisions produced from them

pub mod env_utils;
pub mod experiment;
pub mod geometry;
pub mod mutation;
pub mod path;

// Re-export commonly used types at crate root
pub use experiment::{
    normalize_description, CandidateInteractionEvent, DecisionBasis, EventIndexMap,
    ExceptionObservation, ExperimentLogEntry, FidelityOutcome, FixDecision, InteractionAttempt,
    InteractionOutcome, InteractionRecord, SubjectRef, UNMATCHED_BASELINE_INDEX,
};
pub use geometry::{DimensionSnapshot, Rect};
pub use mutation::{MutationRecord, ProcessedWriteEntry, WriteArgument};
pub use path::StructuralPath;
