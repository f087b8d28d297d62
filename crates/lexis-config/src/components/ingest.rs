//! Node loading, wiring and reclassification settings

use serde::{Deserialize, Serialize};

/// Wiring policy selection
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WiringPolicyConfig {
    /// Defensive after a node load, permissive when node loading is skipped
    #[default]
    Auto,
    /// Create missing targets
    Permissive,
    /// Skip edges whose target is missing
    Defensive,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngestConfig {
    /// Concepts per bulk upsert
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Designated root concept for Object tagging
    #[serde(default = "default_root_concept")]
    pub root_concept: String,
    #[serde(default)]
    pub wiring_policy: WiringPolicyConfig,
    /// Log wiring progress every N concepts
    #[serde(default = "default_progress_every")]
    pub progress_every: usize,
}

fn default_batch_size() -> usize {
    400
}

fn default_root_concept() -> String {
    "artifact.n.01".to_string()
}

fn default_progress_every() -> usize {
    100
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            root_concept: default_root_concept(),
            wiring_policy: WiringPolicyConfig::default(),
            progress_every: default_progress_every(),
        }
    }
}
