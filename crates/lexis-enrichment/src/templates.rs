//! Relation template table
//!
//! One template per line: `<sentence>;<CATEGORY>`. The sentence holds a
//! `{Target}` placeholder for the root word and one or more `{mask}`
//! placeholders for the prediction service. Lines starting with `#` are
//! comments.

use lexis_core::{CategoryError, RelationCategory, RelationKind};
use std::collections::BTreeSet;
use std::path::Path;
use thiserror::Error;

pub const TARGET_PLACEHOLDER: &str = "{Target}";
pub const MASK_PLACEHOLDER: &str = "{mask}";

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Failed to read template file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Line {line}: expected '<sentence>;<category>'")]
    MissingSeparator { line: usize },

    #[error("Line {line}: sentence has no {{mask}} placeholder")]
    MissingMask { line: usize },

    #[error("Line {line}: {source}")]
    InvalidCategory {
        line: usize,
        #[source]
        source: CategoryError,
    },

    #[error("Template table contains no templates")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationTemplate {
    pub sentence: String,
    pub category: RelationCategory,
}

impl RelationTemplate {
    pub fn relation_kind(&self) -> RelationKind {
        RelationKind::Predicted(self.category.clone())
    }

    /// Substitute `word` for every `{Target}`; `{mask}` is left in place
    pub fn fill(&self, word: &str) -> String {
        self.sentence.replace(TARGET_PLACEHOLDER, word)
    }
}

/// The closed set of predicted relation categories for a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationTemplates {
    templates: Vec<RelationTemplate>,
}

impl RelationTemplates {
    pub fn parse(content: &str) -> Result<Self, TemplateError> {
        let mut templates = Vec::new();
        for (index, raw) in content.lines().enumerate() {
            let line = index + 1;
            if raw.starts_with('#') || raw.trim().is_empty() {
                continue;
            }
            let (sentence, category) = raw
                .split_once(';')
                .ok_or(TemplateError::MissingSeparator { line })?;
            if !sentence.contains(MASK_PLACEHOLDER) {
                return Err(TemplateError::MissingMask { line });
            }
            let category = RelationCategory::new(category)
                .map_err(|source| TemplateError::InvalidCategory { line, source })?;
            templates.push(RelationTemplate {
                sentence: sentence.to_string(),
                category,
            });
        }

        if templates.is_empty() {
            return Err(TemplateError::Empty);
        }
        Ok(Self { templates })
    }

    pub async fn load(path: &Path) -> Result<Self, TemplateError> {
        let content =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| TemplateError::Io {
                    path: path.display().to_string(),
                    source,
                })?;
        Self::parse(&content)
    }

    pub fn templates(&self) -> &[RelationTemplate] {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Distinct relation kinds, in category order
    pub fn relation_kinds(&self) -> Vec<RelationKind> {
        self.templates
            .iter()
            .map(|t| t.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(RelationKind::Predicted)
            .collect()
    }

    /// Every template filled with `word`, in table order
    pub fn fill(&self, word: &str) -> Vec<String> {
        self.templates.iter().map(|t| t.fill(word)).collect()
    }
}
