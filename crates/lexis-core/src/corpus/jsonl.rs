//! JSON-lines corpus export reader
//!
//! One concept object per line. Blank lines and lines starting with `#`
//! are ignored.

use super::{ConceptRecord, CorpusError, CorpusResult, InMemoryCorpus};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Load a JSON-lines concept export into an indexed in-memory corpus
pub fn load_jsonl(path: &Path) -> CorpusResult<InMemoryCorpus> {
    let io_err = |source: std::io::Error| CorpusError::Io {
        path: path.display().to_string(),
        source,
    };
    let reader = BufReader::new(File::open(path).map_err(io_err)?);

    let mut concepts = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(io_err)?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let concept: ConceptRecord =
            serde_json::from_str(trimmed).map_err(|e| CorpusError::Malformed {
                line: index + 1,
                message: e.to_string(),
            })?;
        concepts.push(concept);
    }

    debug!("Loaded {} concepts from {}", concepts.len(), path.display());
    InMemoryCorpus::new(concepts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::LexicalCorpus;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_jsonl_skips_comments() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# exported concepts").unwrap();
        writeln!(
            file,
            r#"{{"name":"dog.n.01","definition":"a canine","lemmas":[{{"name":"dog"}}],"hypernyms":["animal.n.01"]}}"#
        )
        .unwrap();
        writeln!(file).unwrap();
        writeln!(file, r#"{{"name":"animal.n.01","lemmas":[{{"name":"animal"}}]}}"#).unwrap();

        let corpus = load_jsonl(file.path()).unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(
            corpus.concept("dog.n.01").unwrap().hypernyms,
            vec!["animal.n.01".to_string()]
        );
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"name":"dog.n.01"}}"#).unwrap();
        writeln!(file, "not json").unwrap();

        let err = load_jsonl(file.path()).unwrap_err();
        assert!(matches!(err, CorpusError::Malformed { line: 2, .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = load_jsonl(Path::new("/nonexistent/corpus.jsonl")).unwrap_err();
        assert!(matches!(err, CorpusError::Io { .. }));
    }
}
