//! Tunables for the decision engine.

use replay_fidelity_types::env_utils::{env_bool_or, env_list};
use serde::{Deserialize, Serialize};

/// Comma-separated list overriding [`DecisionConfig::listener_methods`].
pub const LISTENER_METHODS_ENV: &str = "REPLAY_FIDELITY_LISTENER_METHODS";
/// Boolean overriding [`DecisionConfig::leaf_drift_tolerance`].
pub const LEAF_DRIFT_ENV: &str = "REPLAY_FIDELITY_LEAF_DRIFT";

/// Listener-registration calls recognized by default.
pub const DEFAULT_LISTENER_METHODS: [&str; 2] = ["addEventListener", "attachEvent"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionConfig {
    /// Mutating-call names that register event listeners.
    ///
    /// Such calls are not expected to change geometry; they count as effective
    /// when the target is actually rendered.
    pub listener_methods: Vec<String>,

    /// Treat a recorded interaction as covering a candidate whose path ends in
    /// the same leaf segment, even when the ancestor chains differ (default: true).
    ///
    /// Live and archived captures of the same page often drift in wrapper
    /// elements above the interacted node.
    pub leaf_drift_tolerance: bool,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            listener_methods: DEFAULT_LISTENER_METHODS
                .iter()
                .map(|m| m.to_string())
                .collect(),
            leaf_drift_tolerance: true,
        }
    }
}

impl DecisionConfig {
    /// Create a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overlaid with `REPLAY_FIDELITY_*` environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        let methods = env_list(LISTENER_METHODS_ENV);
        if !methods.is_empty() {
            config.listener_methods = methods;
        }
        config.leaf_drift_tolerance = env_bool_or(LEAF_DRIFT_ENV, config.leaf_drift_tolerance);
        config
    }

    /// Builder method: replace the listener-registration method list.
    pub fn with_listener_methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.listener_methods = methods.into_iter().map(Into::into).collect();
        self
    }

    /// Builder method: enable or disable leaf-segment path matching.
    pub fn with_leaf_drift_tolerance(mut self, enabled: bool) -> Self {
        self.leaf_drift_tolerance = enabled;
        self
    }

    pub fn is_listener_method(&self, method: &str) -> bool {
        self.listener_methods.iter().any(|m| m == method)
    }
}
