//! Lenient conversion of raw log entries.
//!
//! Experiment logs are often cut short by a crashed browser or a killed
//! harness, so a bad entry must never poison the rest of the log. Each entry
//! is converted independently; failures are logged, recorded in the
//! [`IngestReport`] and skipped.

use anyhow::{anyhow, Context, Result};
use replay_fidelity_types::{ExperimentLogEntry, MutationRecord};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedEntry {
    /// Position in the input.
    pub index: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    pub accepted: usize,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub skipped: Vec<SkippedEntry>,
}

impl IngestReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Convert raw experiment-log entries.
///
/// A malformed entry is reported and replaced in place by
/// [`ExperimentLogEntry::Malformed`], so the output keeps the input's
/// positions and a fidelity entry is never paired across a lost exceptions
/// entry.
pub fn ingest_experiment_log(values: &[Value]) -> (Vec<ExperimentLogEntry>, IngestReport) {
    ingest(values, "experiment log entry", parse_experiment_entry, |value| {
        Some(ExperimentLogEntry::Malformed {
            entry_type: value.get("type").and_then(Value::as_str).map(str::to_string),
        })
    })
}

/// Convert raw mutation records, skipping malformed ones.
pub fn ingest_mutation_records(values: &[Value]) -> (Vec<MutationRecord>, IngestReport) {
    ingest(values, "mutation record", parse_value::<MutationRecord>, |_| None)
}

fn parse_experiment_entry(value: &Value) -> Result<ExperimentLogEntry> {
    let entry_type = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("entry has no string `type` field"))?;
    serde_json::from_value(value.clone()).with_context(|| format!("invalid `{}` entry", entry_type))
}

fn parse_value<T: DeserializeOwned>(value: &Value) -> Result<T> {
    Ok(serde_json::from_value(value.clone())?)
}

/// `placeholder` decides what, if anything, stands in for a skipped entry.
fn ingest<T>(
    values: &[Value],
    kind: &str,
    parse: impl Fn(&Value) -> Result<T>,
    placeholder: impl Fn(&Value) -> Option<T>,
) -> (Vec<T>, IngestReport) {
    let mut items = Vec::with_capacity(values.len());
    let mut report = IngestReport::default();
    for (index, value) in values.iter().enumerate() {
        match parse(value) {
            Ok(item) => {
                items.push(item);
                report.accepted += 1;
            }
            Err(err) => {
                let reason = format!("{:#}", err);
                warn!(index, kind, reason = %reason, "skipping malformed entry");
                report.skipped.push(SkippedEntry { index, reason });
                items.extend(placeholder(value));
            }
        }
    }
    (items, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_skips_malformed_experiment_entries() {
        let values = vec![
            json!({"type": "exceptions", "exceptions": [{"type": "TypeError", "description": "TypeError: x"}]}),
            json!({"type": "fidelity", "fixed": true}),
            json!({"no_type": 1}),
            json!("garbage"),
            json!({"type": "fidelity", "subjectRef": "TypeError", "fixed": false}),
        ];

        let (entries, report) = ingest_experiment_log(&values);
        assert_eq!(entries.len(), 5);
        assert_eq!(report.accepted, 2);
        assert_eq!(
            entries[1],
            ExperimentLogEntry::Malformed {
                entry_type: Some("fidelity".into())
            }
        );
        assert_eq!(entries[3], ExperimentLogEntry::Malformed { entry_type: None });
        let skipped: Vec<usize> = report.skipped.iter().map(|s| s.index).collect();
        assert_eq!(skipped, vec![1, 2, 3]);
        assert!(report.skipped[0].reason.contains("fidelity"));
        assert!(!report.is_clean());
    }

    #[test]
    fn test_bad_exceptions_entry_leaves_placeholder() {
        let values = vec![
            json!({"type": "exceptions", "exceptions": [{"type": "SyntaxError", "description": "A"}]}),
            json!({"type": "exceptions", "exceptions": [
                {"type": "SyntaxError", "description": "B"},
                {"type": "TypeError"}
            ]}),
            json!({"type": "fidelity", "subjectRef": "SyntaxError", "fixed": false}),
        ];

        let (entries, report) = ingest_experiment_log(&values);
        assert_eq!(entries.len(), 3);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].index, 1);
        assert!(report.skipped[0].reason.contains("exceptions"));
        assert!(entries[1].breaks_fidelity_pairing());
        assert!(matches!(entries[2], ExperimentLogEntry::Fidelity(_)));
    }

    #[test]
    fn test_skips_malformed_mutation_records() {
        let values = vec![
            json!({"id": 1, "path": "/a", "method": "appendChild",
                   "everInDocument": true, "currentlyInDocument": true}),
            json!({"id": "one", "path": "/a"}),
        ];

        let (records, report) = ingest_mutation_records(&values);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].index, 1);
    }

    #[test]
    fn test_empty_input_is_clean() {
        let (entries, report) = ingest_experiment_log(&[]);
        assert!(entries.is_empty());
        assert!(report.is_clean());
        assert_eq!(report.accepted, 0);
    }
}
