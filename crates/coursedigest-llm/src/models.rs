// Model rotation: every call draws a model at random to spread load and cost.
// No latency, error-rate or quota tracking is done here.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Which part of the pool a call site draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelPreference {
    /// Smaller, cheaper models
    Preferred,
    /// Any model in the pool
    Any,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPool {
    pub preferred: Vec<String>,
    pub all: Vec<String>,
}

impl ModelPool {
    pub fn new(preferred: Vec<String>, all: Vec<String>) -> Self {
        Self { preferred, all }
    }

    /// Pool with a single model, handy for tests and pinned deployments
    pub fn single(model: impl Into<String>) -> Self {
        let model = model.into();
        Self {
            preferred: vec![model.clone()],
            all: vec![model],
        }
    }

    pub fn pick(&self, preference: ModelPreference) -> String {
        self.pick_with(preference, &mut rand::thread_rng())
    }

    pub fn pick_with<R: Rng + ?Sized>(&self, preference: ModelPreference, rng: &mut R) -> String {
        let candidates = match preference {
            ModelPreference::Preferred if !self.preferred.is_empty() => &self.preferred,
            _ => &self.all,
        };

        candidates
            .choose(rng)
            .or_else(|| self.preferred.choose(rng))
            .cloned()
            .unwrap_or_else(|| DEFAULT_MODEL.to_string())
    }

    pub fn is_empty(&self) -> bool {
        self.preferred.is_empty() && self.all.is_empty()
    }
}

/// Fallback when a pool was configured with no models at all
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

impl Default for ModelPool {
    fn default() -> Self {
        let preferred = vec!["llama-3.1-8b-instant".to_string(), "gemma2-9b-it".to_string()];
        let mut all = preferred.clone();
        all.extend(
            ["llama-3.3-70b-versatile", "llama3-70b-8192", "mixtral-8x7b-32768"]
                .into_iter()
                .map(String::from),
        );
        Self { preferred, all }
    }
}
