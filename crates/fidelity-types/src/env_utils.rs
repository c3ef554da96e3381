//! Environment variable parsing utilities.
//!
//! Used by configuration overlays so that an orchestrator can tune the
//! decision engine without code changes.
//!
//! # Example
//!
//! ```
//! use replay_fidelity_types::env_utils::{env_bool_or, env_list};
//!
//! // Default to true if not set
//! let drift = env_bool_or("REPLAY_FIDELITY_LEAF_DRIFT", true);
//!
//! // If METHODS="a,b" then returns vec!["a", "b"]
//! let methods: Vec<String> = env_list("METHODS");
//! ```

/// Check if an environment variable is set to a truthy value, with a default.
///
/// A set variable is truthy if it is "1", "true", "yes", or "on" (case-insensitive).
pub fn env_bool_or(key: &str, default: bool) -> bool {
    match std::env::var(key).ok() {
        Some(v) => matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        None => default,
    }
}

/// Parse a comma-separated environment variable into a vector.
///
/// Blank items are dropped. Returns an empty vector if the variable is not set.
pub fn env_list(key: &str) -> Vec<String> {
    std::env::var(key)
        .ok()
        .map(|v| {
            v.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}
