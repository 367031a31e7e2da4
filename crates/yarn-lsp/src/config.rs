//! Server configuration.
//!
//! Settings arrive as loosely shaped JSON from the client, either as
//! initialization options or through `workspace/didChangeConfiguration`.
//! Parsing is best effort: a payload that does not have the expected shape
//! leaves the current values untouched.

use serde::Deserialize;
use serde_json::Value;

pub const DEFAULT_FUZZY_MATCH_THRESHOLD: f32 = 0.24;

/// Options the quick-fix engine reads on every request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfiguration {
    /// Maximum normalized edit distance for "did you mean" suggestions.
    /// Lower is stricter.
    pub fuzzy_match_threshold: f32,
    /// Only treat explicitly declared variables as known; usages without a
    /// `declare` statement are reported.
    pub restrict_to_declared_variables: bool,
}

impl Default for EngineConfiguration {
    fn default() -> Self {
        Self {
            fuzzy_match_threshold: DEFAULT_FUZZY_MATCH_THRESHOLD,
            restrict_to_declared_variables: true,
        }
    }
}

/// Partial update; absent fields keep their current value.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigurationPatch {
    #[serde(alias = "fuzzyMatchThreshold")]
    did_you_mean_threshold: Option<f32>,
    #[serde(alias = "restrictToDeclaredVariables")]
    only_suggest_declared_variables: Option<bool>,
}

impl EngineConfiguration {
    /// Populates from the first element of an initialization payload array.
    pub fn initialize(&mut self, raw: Option<&Value>) {
        let Some(first) = raw.and_then(Value::as_array).and_then(|values| values.first()) else {
            tracing::debug!("no initial configuration supplied");
            return;
        };
        self.apply(first);
    }

    /// Populates from a change notification payload.
    ///
    /// Settings sit one level down, under the first child of the first child
    /// of the payload: `{"yarnspinner": {...}}` or `[[{...}]]`.
    pub fn update(&mut self, raw: Option<&Value>) {
        let Some(settings) = raw.and_then(nested_settings) else {
            tracing::debug!("configuration change without nested settings ignored");
            return;
        };
        self.apply(settings);
    }

    /// Applies a settings object. Malformed objects are ignored as a whole.
    pub fn apply(&mut self, settings: &Value) {
        if !settings.is_object() {
            return;
        }

        let patch = match ConfigurationPatch::deserialize(settings) {
            Ok(patch) => patch,
            Err(e) => {
                tracing::debug!("ignoring malformed configuration: {}", e);
                return;
            }
        };

        if let Some(threshold) = patch.did_you_mean_threshold {
            if threshold.is_finite() && threshold >= 0.0 {
                self.fuzzy_match_threshold = threshold;
            } else {
                tracing::debug!("ignoring out-of-range fuzzy match threshold {}", threshold);
            }
        }
        if let Some(restrict) = patch.only_suggest_declared_variables {
            self.restrict_to_declared_variables = restrict;
        }

        tracing::debug!("configuration now {:?}", self);
    }
}

// Object keys keep payload order (`preserve_order`), so the first child is
// the first section the client sent.
fn nested_settings(raw: &Value) -> Option<&Value> {
    match raw {
        Value::Object(map) => map.values().next(),
        Value::Array(items) => match items.first()? {
            Value::Array(inner) => inner.first(),
            _ => None,
        },
        _ => None,
    }
}
