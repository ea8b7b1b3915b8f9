//! Online top-1 remedy lookup.

use remedex_core::{Catalog, RemedyRecord, Result, SharedCatalog, Vector};
use remedex_embed::{EmbedError, SharedEmbedder};
use serde::Serialize;
use tracing::{debug, error, info, warn};

/// Minimum dot product for a match to be trusted.
///
/// Tuned against `text-embedding-3-small` vectors of `"{name} - {symptoms}"`
/// texts scored by raw dot product. A different model or text template needs
/// a new value.
pub const DEFAULT_ACCEPTANCE_THRESHOLD: f32 = 0.2;

/// The accepted catalog remedy for a query.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RemedyMatch {
    pub remedy: RemedyRecord,
    pub score: f32,
}

impl RemedyMatch {
    pub fn into_remedy(self) -> RemedyRecord {
        self.remedy
    }
}

/// Scores free-text queries against the live catalog.
///
/// Every call embeds the query and scans the whole catalog; nothing is cached.
#[derive(Clone)]
pub struct MatchEngine {
    embedder: SharedEmbedder,
    catalog: SharedCatalog,
    threshold: f32,
}

impl MatchEngine {
    pub fn new(embedder: SharedEmbedder, catalog: SharedCatalog) -> Self {
        Self {
            embedder,
            catalog,
            threshold: DEFAULT_ACCEPTANCE_THRESHOLD,
        }
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn catalog(&self) -> &SharedCatalog {
        &self.catalog
    }

    pub fn model(&self) -> &str {
        self.embedder.model()
    }

    /// Embed `text` with the configured provider.
    pub async fn embed(&self, text: &str) -> std::result::Result<Vector, EmbedError> {
        self.embedder.embed(text).await
    }

    /// Best catalog remedy for `query`, or `None`.
    ///
    /// An embedding failure of any kind, including an empty vector, yields
    /// `Ok(None)`, the same as a query that matches nothing. The only error is a dimension mismatch
    /// between the query embedding and the index, which means the model was
    /// changed without reindexing.
    pub async fn find_best_match(&self, query: &str) -> Result<Option<RemedyMatch>> {
        let catalog = self.catalog.snapshot();
        if catalog.is_empty() {
            debug!("catalog is empty, no match possible");
            return Ok(None);
        }

        let vector = match self.embed(query).await {
            Ok(vector) if vector.is_empty() => {
                warn!(model = self.model(), "query embedding is empty, treating as no match");
                return Ok(None);
            }
            Ok(vector) => vector,
            Err(e) => {
                warn!(error = %e, model = self.model(), "query embedding failed, treating as no match");
                return Ok(None);
            }
        };

        self.match_in(&catalog, &vector)
    }

    /// Score an already embedded query against the live catalog.
    pub fn match_vector(&self, vector: &Vector) -> Result<Option<RemedyMatch>> {
        let catalog = self.catalog.snapshot();
        self.match_in(&catalog, vector)
    }

    fn match_in(&self, catalog: &Catalog, vector: &Vector) -> Result<Option<RemedyMatch>> {
        let best = catalog.top_match(vector).map_err(|e| {
            error!(error = %e, "query embedding does not fit the index; reindex with the current model");
            e
        })?;

        match best {
            Some((entry, score)) if score > self.threshold => {
                info!(remedy = entry.remedy.label(), score, "remedy matched");
                Ok(Some(RemedyMatch {
                    remedy: entry.remedy.clone(),
                    score,
                }))
            }
            Some((entry, score)) => {
                info!(
                    closest = entry.remedy.label(),
                    score,
                    threshold = self.threshold,
                    "best score below threshold"
                );
                Ok(None)
            }
            None => Ok(None),
        }
    }
}
