//! Lexical corpus source and scope

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CorpusConfig {
    /// JSON-lines concept export
    pub path: Option<PathBuf>,
    /// Restrict passes to these parts of speech (`n`, `v`, `a`, `s`, `r`)
    #[serde(default)]
    pub parts_of_speech: Vec<String>,
    /// Restrict passes to the first N in-scope concepts
    pub limit: Option<usize>,
}
