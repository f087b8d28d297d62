//! Pipeline context: the store, corpus and services every phase shares
//!
//! Built once per command from [`LexisConfig`]. Collaborators a command does
//! not need stay unconfigured and only fail when asked for.

use anyhow::{anyhow, Context, Result};
use lexis_config::{LexisConfig, StoreBackend};
use lexis_core::{
    corpus::load_jsonl, CorpusScope, EmbeddingService, GraphStore, InMemoryGraphStore,
    LexicalCorpus, MaskPredictor, ScopedCorpus,
};
use lexis_llm::{create_embedding_service, create_mask_predictor};
use lexis_surrealdb::{SurrealClient, SurrealDbConfig, SurrealGraphStore};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

pub struct PipelineContext {
    config: LexisConfig,
    store: Arc<dyn GraphStore>,
    corpus: Option<Arc<dyn LexicalCorpus>>,
    embeddings: Option<Arc<dyn EmbeddingService>>,
    predictor: Option<Arc<dyn MaskPredictor>>,
}

impl PipelineContext {
    /// Open the configured store, load the corpus if one is configured and
    /// construct the service clients.
    pub async fn initialize(config: LexisConfig) -> Result<Self> {
        config.validate()?;

        let store = create_store(&config).await?;
        let mut context = Self::new(config, store);

        if let Some(path) = context.config.corpus.path.clone() {
            let corpus = load_corpus(&path).await?;
            context = context.with_corpus(corpus);
        }

        match create_embedding_service(&context.config.similarity.embeddings) {
            Ok(service) => context.embeddings = Some(service),
            Err(e) => debug!("Embedding service unavailable: {}", e),
        }
        context.predictor = Some(create_mask_predictor(&context.config.relations));

        info!(
            backend = ?context.config.store.backend,
            corpus = context.corpus.as_ref().map_or(0, |c| c.len()),
            "Pipeline context ready"
        );
        Ok(context)
    }

    /// Context over an already-open store with no corpus or services
    pub fn new(config: LexisConfig, store: Arc<dyn GraphStore>) -> Self {
        Self {
            config,
            store,
            corpus: None,
            embeddings: None,
            predictor: None,
        }
    }

    /// Attach a corpus, restricted to the configured scope
    pub fn with_corpus(mut self, corpus: Arc<dyn LexicalCorpus>) -> Self {
        let scope = CorpusScope {
            parts_of_speech: self.config.corpus.parts_of_speech.clone(),
            limit: self.config.corpus.limit,
        };
        self.corpus = Some(if scope.is_unrestricted() {
            corpus
        } else {
            Arc::new(ScopedCorpus::new(corpus, scope))
        });
        self
    }

    pub fn with_embeddings(mut self, embeddings: Arc<dyn EmbeddingService>) -> Self {
        self.embeddings = Some(embeddings);
        self
    }

    pub fn with_predictor(mut self, predictor: Arc<dyn MaskPredictor>) -> Self {
        self.predictor = Some(predictor);
        self
    }

    pub fn config(&self) -> &LexisConfig {
        &self.config
    }

    pub fn store(&self) -> Arc<dyn GraphStore> {
        self.store.clone()
    }

    pub fn corpus(&self) -> Result<Arc<dyn LexicalCorpus>> {
        self.corpus
            .clone()
            .ok_or_else(|| anyhow!("No corpus configured; set corpus.path or pass --corpus"))
    }

    pub fn embeddings(&self) -> Result<Arc<dyn EmbeddingService>> {
        self.embeddings.clone().ok_or_else(|| {
            anyhow!("No embedding service configured; set similarity.embeddings.vectors_path or use the http provider")
        })
    }

    pub fn predictor(&self) -> Result<Arc<dyn MaskPredictor>> {
        self.predictor
            .clone()
            .ok_or_else(|| anyhow!("No fill-mask service configured"))
    }

    /// Log final graph counts and release the store
    pub async fn shutdown(self) -> Result<()> {
        let stats = self.store.stats().await.context("Failed to read graph stats")?;
        info!(
            entities = stats.entities.values().sum::<usize>(),
            edges = stats.edges.values().sum::<usize>(),
            unresolved = stats.unresolved,
            "Pipeline finished"
        );
        Ok(())
    }
}

/// Open the configured graph store
pub async fn create_store(config: &LexisConfig) -> Result<Arc<dyn GraphStore>> {
    match config.store.backend {
        StoreBackend::Memory => {
            info!("Using in-memory graph store");
            Ok(Arc::new(InMemoryGraphStore::new()))
        }
        StoreBackend::SurrealDb => {
            let surreal_config = SurrealDbConfig::from(&config.store);
            info!(
                path = %surreal_config.path,
                namespace = %surreal_config.namespace,
                database = %surreal_config.database,
                "Opening SurrealDB graph store"
            );
            let client = SurrealClient::new(surreal_config)
                .await
                .context("Failed to connect to SurrealDB")?;
            let store = SurrealGraphStore::open(client)
                .await
                .context("Failed to apply graph schema")?;
            Ok(Arc::new(store))
        }
    }
}

/// Parse a JSON-lines corpus off the async runtime
pub async fn load_corpus(path: &Path) -> Result<Arc<dyn LexicalCorpus>> {
    let owned = path.to_path_buf();
    let corpus = tokio::task::spawn_blocking(move || load_jsonl(&owned))
        .await
        .context("Corpus loading task failed")?
        .with_context(|| format!("Failed to load corpus from {}", path.display()))?;
    info!(path = %path.display(), concepts = corpus.len(), "Loaded corpus");
    Ok(Arc::new(corpus))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexis_core::test_support::{corpus, ConceptBuilder};

    fn memory_config() -> LexisConfig {
        let mut config = LexisConfig::default();
        config.store.backend = StoreBackend::Memory;
        config
    }

    #[tokio::test]
    async fn test_initialize_memory_without_corpus() {
        let context = PipelineContext::initialize(memory_config()).await.unwrap();
        assert!(context.corpus().is_err());
        assert!(context.embeddings().is_err());
        assert!(context.predictor().is_ok());
    }

    #[tokio::test]
    async fn test_corpus_scope_applied() {
        let mut config = memory_config();
        config.corpus.parts_of_speech = vec!["n".to_string()];
        let context = PipelineContext::new(config, Arc::new(InMemoryGraphStore::new()))
            .with_corpus(Arc::new(corpus(vec![
                ConceptBuilder::new("dog.n.01"),
                ConceptBuilder::new("run.v.01"),
            ])));

        let corpus = context.corpus().unwrap();
        let names: Vec<String> = corpus.concepts().map(|c| c.name).collect();
        assert_eq!(names, vec!["dog.n.01"]);
        assert!(corpus.concept("run.v.01").is_some());
    }

    #[tokio::test]
    async fn test_initialize_rejects_invalid_config() {
        let mut config = memory_config();
        config.ingest.batch_size = 0;
        assert!(PipelineContext::initialize(config).await.is_err());
    }

    #[tokio::test]
    async fn test_initialize_loads_corpus_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.jsonl");
        std::fs::write(
            &path,
            "{\"name\":\"dog.n.01\",\"lemmas\":[{\"name\":\"dog\"}]}\n",
        )
        .unwrap();
        let mut config = memory_config();
        config.corpus.path = Some(path);

        let context = PipelineContext::initialize(config).await.unwrap();
        assert_eq!(context.corpus().unwrap().len(), 1);
    }
}
