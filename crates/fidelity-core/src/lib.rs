//! Replay Fidelity Core
//!
//! Decision engine used while diagnosing fidelity defects in archived page
//! replays. Given logs captured during repeated page-load experiments it
//! answers two questions for an orchestrator steering the next experiment:
//! is this defect still worth investigating, and has this exact remediation
//! already been tried?
//!
//! # Core Modules
//!
//! - [`mutation_effect`]: decides whether a DOM mutation visibly changed geometry
//! - [`write_log`]: filters and annotates raw mutation records
//! - [`exception_rules`]: exception -> fix verdict rules learned from fidelity outcomes
//! - [`interaction_matcher`]: coverage of candidate interactions by past attempts
//! - [`decider`]: per-investigation facade over the two decision components
//! - [`log_ingest`]: lenient conversion of raw JSON log entries
//!
//! # Example
//!
//! ```
//! use replay_fidelity_core::decider::FidelityDecider;
//! use replay_fidelity_types::{ExceptionObservation, ExperimentLogEntry, FidelityOutcome, SubjectRef};
//!
//! let mut decider = FidelityDecider::new();
//! decider.parse_log(&[
//!     ExperimentLogEntry::Exceptions {
//!         exceptions: vec![ExceptionObservation::new("TypeError", "TypeError: a is undefined")],
//!     },
//!     ExperimentLogEntry::Fidelity(FidelityOutcome {
//!         subject_ref: SubjectRef::ByType("TypeError".into()),
//!         short_description: None,
//!         fixed: false,
//!     }),
//! ]);
//!
//! let obs = ExceptionObservation::new("TypeError", "TypeError: a is undefined\n    at x.js:1:1");
//! assert!(!decider.decide(&obs).could_be_fixed);
//! ```

pub mod config;
pub mod decider;
pub mod exception_rules;
pub mod interaction_matcher;
pub mod log_ingest;
pub mod mutation_effect;
pub mod write_log;

// Re-export main types at crate root for convenience
pub use config::DecisionConfig;
pub use decider::{DeciderSummary, FidelityDecider};
pub use exception_rules::{ExceptionFixRule, ExceptionFixRuleStore, FixParseSummary};
pub use interaction_matcher::{events_covered, CoverageMatch, InteractionFixMatcher, PathCoverage};
pub use log_ingest::{ingest_experiment_log, ingest_mutation_records, IngestReport, SkippedEntry};
pub use mutation_effect::{GeometrySource, MutationEffectClassifier};
pub use write_log::{effective_writes, find_writes, WriteLogProcessor};
