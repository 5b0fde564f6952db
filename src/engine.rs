//! Answer orchestration.
//!
//! Ties the pipeline together: route the question, consult the planned
//! stores, filter the tabular branch, assemble the evidence context, and
//! hand it to the generator. All state here is loaded once and read-only
//! afterwards; nothing is shared mutably across questions.

use anyhow::Result;

use crate::config::Config;
use crate::context;
use crate::embedding::{self, EmbeddingProvider};
use crate::filter;
use crate::generate;
use crate::models::{DocRecord, RelationRecord, ScoredStatRecord};
use crate::router::{self, RetrievalPlan};
use crate::store_docs::DocStore;
use crate::store_graph::GraphStore;
use crate::store_stats::StatStore;

/// Everything retrieved for one question, before generation.
#[derive(Debug)]
pub struct Evidence {
    pub plan: RetrievalPlan,
    pub docs: Vec<DocRecord>,
    pub stats: Vec<ScoredStatRecord>,
    pub relations: Vec<RelationRecord>,
    pub context: String,
}

/// The answer engine: three read-only stores plus the optional embedding
/// provider, loaded once and shared across questions.
pub struct Engine {
    config: Config,
    docs: DocStore,
    stats: StatStore,
    relations: GraphStore,
    embedder: Option<Box<dyn EmbeddingProvider>>,
}

impl Engine {
    /// Load the three data stores and construct the embedding provider.
    pub fn new(config: Config) -> Result<Self> {
        let docs = DocStore::load(&config.data.docs)?;
        let stats = StatStore::load(&config.data.stats)?;
        let relations = GraphStore::load(&config.data.relations)?;

        let embedder = embedding::create_provider(&config.embedding)?;
        if embedder.is_none() {
            tracing::warn!("embedding provider disabled; semantic search will return no documents");
        }

        tracing::info!(
            docs = docs.len(),
            stats = stats.len(),
            relations = relations.len(),
            "fleet dataset loaded"
        );

        Ok(Self {
            config,
            docs,
            stats,
            relations,
            embedder,
        })
    }

    /// Route the question and gather evidence from the planned stores.
    ///
    /// Empty results from any store are not an error; the corresponding
    /// context section is simply omitted.
    pub async fn retrieve(&self, question: &str) -> Result<Evidence> {
        let plan = router::plan(question);
        tracing::debug!(?plan, "retrieval plan");

        let keyword = plan
            .target_key
            .as_deref()
            .unwrap_or(&self.config.retrieval.default_keyword);

        let docs = match (&self.embedder, plan.use_semantic) {
            (Some(provider), true) => {
                self.docs
                    .search(provider.as_ref(), question, self.config.retrieval.semantic_k)
                    .await?
            }
            _ => Vec::new(),
        };

        let stats = if plan.use_stats {
            let raw = self.stats.query_by_keyword(keyword);
            filter::rank_long_trips(&raw, self.config.retrieval.top_stats)
        } else {
            Vec::new()
        };

        let relations = if plan.use_relations {
            self.relations.query_by_car(keyword)
        } else {
            Vec::new()
        };

        let context = context::assemble(question, &docs, &stats, &relations);

        Ok(Evidence {
            plan,
            docs,
            stats,
            relations,
            context,
        })
    }

    /// Generate the final answer for already-retrieved evidence.
    pub async fn synthesize(&self, question: &str, evidence: &Evidence) -> Result<String> {
        generate::generate_answer(&self.config.generation, question, &evidence.context).await
    }

    /// Answer a question end to end.
    ///
    /// A generation failure fails the whole request; evidence gaps do not.
    pub async fn answer(&self, question: &str) -> Result<String> {
        let evidence = self.retrieve(question).await?;
        self.synthesize(question, &evidence).await
    }

    pub fn doc_count(&self) -> usize {
        self.docs.len()
    }

    pub fn stat_count(&self) -> usize {
        self.stats.len()
    }

    pub fn relation_count(&self) -> usize {
        self.relations.len()
    }

    pub fn semantic_indexed(&self) -> bool {
        self.docs.indexed()
    }

    pub fn embedding_model(&self) -> Option<&str> {
        self.embedder.as_deref().map(|p| p.model_name())
    }

    pub fn generation_model(&self) -> &str {
        &self.config.generation.model
    }
}
