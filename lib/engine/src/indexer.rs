//! Offline construction of the embedding index.

use remedex_core::{Error, IndexedRemedy, RemedyRecord, Result};
use remedex_embed::{EmbedError, SharedEmbedder};
use remedex_storage::{read_remedies, CatalogStore};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info, warn};

/// An entry left out of the index because its embedding call failed.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SkippedRemedy {
    /// Position in the source catalog.
    pub position: usize,
    pub name: String,
    pub reason: String,
}

/// Outcome of one indexing run.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct IndexReport {
    pub indexed: usize,
    pub skipped: Vec<SkippedRemedy>,
    pub dimension: Option<usize>,
}

impl IndexReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Embeds every remedy's canonical text and writes the full index.
pub struct Indexer {
    embedder: SharedEmbedder,
    store: CatalogStore,
}

impl Indexer {
    pub fn new(embedder: SharedEmbedder, store: CatalogStore) -> Self {
        Self { embedder, store }
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    /// Embed `remedies` in order, one call per entry.
    ///
    /// A failed embedding call, or one that returns an empty vector, skips
    /// that entry and is recorded in the report.
    /// A record without English name or symptoms, or an embedding whose
    /// dimension differs from the earlier ones, aborts the whole build.
    pub async fn build(
        &self,
        remedies: Vec<RemedyRecord>,
    ) -> Result<(Vec<IndexedRemedy>, IndexReport)> {
        let texts = remedies
            .iter()
            .enumerate()
            .map(|(position, remedy)| {
                remedy.canonical_text().ok_or_else(|| Error::InvalidRecord {
                    position,
                    reason: format!("'{}' has no English name or symptoms", remedy.label()),
                })
            })
            .collect::<Result<Vec<String>>>()?;

        let mut entries = Vec::with_capacity(remedies.len());
        let mut report = IndexReport::default();

        for (position, (remedy, text)) in remedies.into_iter().zip(texts).enumerate() {
            let embedded = self.embedder.embed(&text).await.and_then(|embedding| {
                if embedding.is_empty() {
                    Err(EmbedError::EmptyResponse)
                } else {
                    Ok(embedding)
                }
            });
            let embedding = match embedded {
                Ok(embedding) => embedding,
                Err(e) => {
                    warn!(position, remedy = remedy.label(), error = %e, "embedding failed, skipping remedy");
                    report.skipped.push(SkippedRemedy {
                        position,
                        name: remedy.label().to_string(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            match report.dimension {
                None => report.dimension = Some(embedding.dim()),
                Some(expected) if expected != embedding.dim() => {
                    return Err(Error::InvalidDimension {
                        expected,
                        actual: embedding.dim(),
                    });
                }
                Some(_) => {}
            }

            debug!(position, remedy = remedy.label(), "remedy embedded");
            entries.push(IndexedRemedy::new(embedding, remedy));
        }

        report.indexed = entries.len();
        Ok((entries, report))
    }

    /// Build the index and replace the stored one. Nothing is written if the
    /// build fails.
    pub async fn run(&self, remedies: Vec<RemedyRecord>) -> Result<IndexReport> {
        let total = remedies.len();
        info!(
            remedies = total,
            model = self.embedder.model(),
            "indexing remedy catalog"
        );

        let (entries, report) = self.build(remedies).await?;
        self.store.save(&entries)?;

        info!(
            indexed = report.indexed,
            skipped = report.skipped.len(),
            path = %self.store.path().display(),
            "index rebuilt"
        );
        Ok(report)
    }

    /// Read the curated catalog from `source` and run the indexer on it.
    pub async fn run_from_path<P: AsRef<Path>>(&self, source: P) -> Result<IndexReport> {
        let remedies = read_remedies(source)?;
        self.run(remedies).await
    }
}
