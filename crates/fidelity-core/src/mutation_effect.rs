//! Mutation effect classification.
//!
//! A recorded DOM write is "effective" when it changed something a user could
//! see. The signal is geometry: instrumentation measures the target, the
//! target's parent and every DOM-node argument right before and right after
//! the call, and a write is effective when any of those rectangles changed
//! size.
//!
//! Two rules keep the signal honest:
//!
//! - a rectangle with a negative offset belongs to a detached or not yet
//!   rendered node and never counts as a change, on either side of the call;
//! - listener registrations are not expected to move anything, so they are
//!   effective when the target is actually rendered (non-zero area).

use std::collections::{BTreeMap, HashMap};

use replay_fidelity_types::{DimensionSnapshot, MutationRecord, Rect, StructuralPath, WriteArgument};
use tracing::trace;

use crate::config::DecisionConfig;

/// Live layout lookup used to capture snapshots.
///
/// Implemented by whatever has access to the rendered page; maps work for
/// tests and offline replays of recorded layouts.
pub trait GeometrySource {
    /// Bounding rectangle of the node at `path`, if it exists and can be measured.
    fn rect_of(&self, path: &StructuralPath) -> Option<Rect>;
}

impl GeometrySource for BTreeMap<StructuralPath, Rect> {
    fn rect_of(&self, path: &StructuralPath) -> Option<Rect> {
        self.get(path).copied()
    }
}

impl GeometrySource for HashMap<StructuralPath, Rect> {
    fn rect_of(&self, path: &StructuralPath) -> Option<Rect> {
        self.get(path).copied()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MutationEffectClassifier {
    config: DecisionConfig,
}

impl MutationEffectClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DecisionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DecisionConfig {
        &self.config
    }

    /// Measure `target`, its parent and each DOM-node argument.
    ///
    /// Value arguments get `None` so that argument positions line up between
    /// the before and after snapshots.
    pub fn capture(
        source: &impl GeometrySource,
        target: &StructuralPath,
        args: &[WriteArgument],
    ) -> DimensionSnapshot {
        DimensionSnapshot {
            target: source.rect_of(target),
            parent: target.parent().and_then(|parent| source.rect_of(&parent)),
            args: args
                .iter()
                .map(|arg| arg.node_path().and_then(|path| source.rect_of(path)))
                .collect(),
        }
    }

    /// True if the target, the parent or any positionally paired argument
    /// changed width or height between the two snapshots.
    pub fn compare(before: &DimensionSnapshot, after: &DimensionSnapshot) -> bool {
        rect_changed(before.target.as_ref(), after.target.as_ref())
            || rect_changed(before.parent.as_ref(), after.parent.as_ref())
            || before
                .args
                .iter()
                .zip(after.args.iter())
                .any(|(b, a)| rect_changed(b.as_ref(), a.as_ref()))
    }

    pub fn is_listener_registration(&self, record: &MutationRecord) -> bool {
        self.config.is_listener_method(&record.method)
    }

    pub fn is_effective(&self, record: &MutationRecord) -> bool {
        let effective = if self.is_listener_registration(record) {
            record
                .after_snapshot
                .target
                .or(record.before_snapshot.target)
                .is_some_and(|rect| rect.has_area())
        } else {
            Self::compare(&record.before_snapshot, &record.after_snapshot)
        };
        trace!(
            id = record.id,
            path = %record.path,
            method = %record.method,
            effective,
            "classified mutation"
        );
        effective
    }
}

/// Unmeasured or off-screen rectangles never count as changed.
fn rect_changed(before: Option<&Rect>, after: Option<&Rect>) -> bool {
    match (before, after) {
        (Some(b), Some(a)) => !b.is_offscreen() && !a.is_offscreen() && !b.same_size(a),
        _ => false,
    }
}
