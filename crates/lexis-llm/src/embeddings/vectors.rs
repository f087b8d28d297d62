//! Word-vector file provider
//!
//! Reads the word2vec text format: an optional `<count> <dimensions>` header
//! followed by one `<word> <v1> <v2> ...` line per word. The file is loaded
//! once, on the first lookup, and shared read-only afterwards.

use async_trait::async_trait;
use lexis_core::{EmbeddingService, Neighbor, ServiceError, ServiceResult};
use ndarray::Array2;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Unit-normalised vectors, one row per word
#[derive(Debug)]
pub struct VectorTable {
    words: Vec<String>,
    index: HashMap<String, usize>,
    matrix: Array2<f32>,
}

impl VectorTable {
    /// Parse word2vec text content. The first occurrence of a word wins.
    pub fn parse(content: &str) -> ServiceResult<Self> {
        let mut words = Vec::new();
        let mut index = HashMap::new();
        let mut flat: Vec<f32> = Vec::new();
        let mut dimensions: Option<usize> = None;

        for (line_no, line) in content.lines().enumerate() {
            let mut fields = line.split_whitespace();
            let Some(word) = fields.next() else {
                continue;
            };
            let values: Vec<&str> = fields.collect();
            if line_no == 0 && values.len() == 1 && is_header(word, values[0]) {
                continue;
            }

            let vector = values
                .iter()
                .map(|v| v.parse::<f32>())
                .collect::<Result<Vec<f32>, _>>()
                .map_err(|e| malformed(line_no, e))?;

            match dimensions {
                None if vector.is_empty() => {
                    return Err(malformed(line_no, format!("word '{}' has no vector", word)))
                }
                None => dimensions = Some(vector.len()),
                Some(dim) if dim != vector.len() => {
                    return Err(malformed(
                        line_no,
                        format!("expected {} dimensions, found {}", dim, vector.len()),
                    ))
                }
                Some(_) => {}
            }

            if index.contains_key(word) {
                continue;
            }
            index.insert(word.to_string(), words.len());
            words.push(word.to_string());
            flat.extend(normalize(vector));
        }

        let dim = dimensions.unwrap_or(0);
        let matrix = Array2::from_shape_vec((words.len(), dim), flat)
            .map_err(|e| {
                ServiceError::InvalidResponse(format!("inconsistent vector table: {}", e))
            })?;
        Ok(Self {
            words,
            index,
            matrix,
        })
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn dimensions(&self) -> usize {
        self.matrix.ncols()
    }

    /// `k` most cosine-similar words, excluding `word` itself
    pub fn nearest(&self, word: &str, k: usize) -> Option<Vec<Neighbor>> {
        let &row = self.index.get(word)?;
        let scores = self.matrix.dot(&self.matrix.row(row));

        let mut ranked: Vec<(usize, f32)> = scores
            .iter()
            .copied()
            .enumerate()
            .filter(|&(i, _)| i != row)
            .collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| self.words[a.0].cmp(&self.words[b.0]))
        });
        ranked.truncate(k);

        Some(
            ranked
                .into_iter()
                .map(|(i, score)| Neighbor::new(self.words[i].clone(), f64::from(score)))
                .collect(),
        )
    }
}

fn malformed(line_no: usize, detail: impl std::fmt::Display) -> ServiceError {
    ServiceError::InvalidResponse(format!("line {}: {}", line_no + 1, detail))
}

fn is_header(first: &str, second: &str) -> bool {
    first.parse::<usize>().is_ok() && second.parse::<usize>().is_ok()
}

fn normalize(mut vector: Vec<f32>) -> Vec<f32> {
    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        vector.iter_mut().for_each(|v| *v /= norm);
    }
    vector
}

/// Embedding service over a local vector file
pub struct VectorFileEmbeddings {
    path: PathBuf,
    table: OnceCell<Arc<VectorTable>>,
}

impl VectorFileEmbeddings {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            table: OnceCell::new(),
        }
    }

    /// Service over an already parsed table
    pub fn from_table(table: VectorTable) -> Self {
        Self {
            path: PathBuf::new(),
            table: OnceCell::new_with(Some(Arc::new(table))),
        }
    }

    /// Whether the vector file has been read yet
    pub fn is_loaded(&self) -> bool {
        self.table.initialized()
    }

    async fn table(&self) -> ServiceResult<Arc<VectorTable>> {
        self.table
            .get_or_try_init(|| async {
                let path = self.path.clone();
                debug!("Loading word vectors from {}", path.display());
                let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
                    ServiceError::NotConfigured(format!(
                        "cannot read vector file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                let table = tokio::task::spawn_blocking(move || VectorTable::parse(&content))
                    .await
                    .map_err(|e| ServiceError::NotConfigured(format!("vector loader panicked: {}", e)))?
                    .map_err(|e| match e {
                        ServiceError::InvalidResponse(detail) => ServiceError::InvalidResponse(
                            format!("malformed vector file {}: {}", path.display(), detail),
                        ),
                        other => other,
                    })?;
                info!(
                    words = table.len(),
                    dimensions = table.dimensions(),
                    "Loaded word vectors from {}",
                    path.display()
                );
                Ok(Arc::new(table))
            })
            .await
            .cloned()
    }
}

#[async_trait]
impl EmbeddingService for VectorFileEmbeddings {
    async fn nearest_neighbors(&self, word: &str, k: usize) -> ServiceResult<Vec<Neighbor>> {
        self.table()
            .await?
            .nearest(word, k)
            .ok_or_else(|| ServiceError::UnknownWord(word.to_string()))
    }

    fn name(&self) -> &str {
        "vector-file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const VECTORS: &str = "4 3\n\
        dog 1.0 0.9 0.0\n\
        puppy 0.9 1.0 0.0\n\
        cat 0.7 0.3 0.2\n\
        hammer 0.0 0.0 1.0\n";

    #[test]
    fn test_parse_skips_header() {
        let table = VectorTable::parse(VECTORS).unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table.dimensions(), 3);
    }

    #[test]
    fn test_parse_rejects_ragged_rows() {
        let err = VectorTable::parse("dog 1.0 2.0\ncat 1.0\n").unwrap_err();
        match err {
            ServiceError::InvalidResponse(detail) => assert!(detail.contains("line 2")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_non_numeric_components() {
        let err = VectorTable::parse("dog 1.0 woof\n").unwrap_err();
        assert!(matches!(err, ServiceError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_malformed_file_names_the_path() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "dog 1.0 2.0\ncat\n").unwrap();

        let service = VectorFileEmbeddings::new(file.path());
        let err = service.nearest_neighbors("dog", 1).await.unwrap_err();
        match err {
            ServiceError::InvalidResponse(detail) => {
                assert!(detail.contains("malformed vector file"));
                assert!(detail.contains("line 2"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(!service.is_loaded());
    }

    #[test]
    fn test_nearest_excludes_query_and_ranks_by_cosine() {
        let table = VectorTable::parse(VECTORS).unwrap();
        let neighbors = table.nearest("dog", 2).unwrap();
        assert_eq!(neighbors.len(), 2);
        assert_eq!(neighbors[0].word, "puppy");
        assert_eq!(neighbors[1].word, "cat");
        assert!(neighbors[0].score > neighbors[1].score);
        assert!(neighbors.iter().all(|n| n.word != "dog"));
    }

    #[tokio::test]
    async fn test_unknown_word() {
        let service = VectorFileEmbeddings::from_table(VectorTable::parse(VECTORS).unwrap());
        let err = service.nearest_neighbors("zebra", 5).await.unwrap_err();
        assert_eq!(err, ServiceError::UnknownWord("zebra".to_string()));
    }

    #[tokio::test]
    async fn test_file_is_loaded_lazily_once() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", VECTORS).unwrap();

        let service = VectorFileEmbeddings::new(file.path());
        assert!(!service.is_loaded());

        let neighbors = service.nearest_neighbors("hammer", 10).await.unwrap();
        assert_eq!(neighbors.len(), 3);
        assert!(service.is_loaded());

        // A second lookup reuses the table even if the file is gone
        let path = file.path().to_path_buf();
        drop(file);
        assert!(!path.exists());
        assert!(service.nearest_neighbors("dog", 1).await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_file_is_not_configured() {
        let service = VectorFileEmbeddings::new("/nonexistent/vectors.txt");
        let err = service.nearest_neighbors("dog", 1).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotConfigured(_)));
    }
}
