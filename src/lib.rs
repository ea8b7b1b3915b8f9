//! # Remedex
//!
//! Matches a free-text symptom description to a catalog of homeopathic
//! remedies using precomputed text embeddings.
//!
//! Two components run at different times:
//!
//! - the **indexer** (offline) embeds `"{name.en} - {symptoms.en}"` for every
//!   curated remedy and writes `data/embedded_meds.json`;
//! - the **match engine** (online) loads that index once, embeds each query,
//!   scores every remedy by raw dot product and returns the best one only if
//!   its score is above 0.2.
//!
//! Anything that fails on the way to a query embedding (network, quota,
//! timeout, malformed response) is reported as "no match", never as an error.
//!
//! ## Quick Start
//!
//! ```bash
//! export OPENAI_API_KEY=...
//! remedex index --input data/medicines.json
//! remedex serve --http-port 5000
//! curl -XPOST localhost:5000/match -H 'content-type: application/json' \
//!      -d '{"query": "bruised knee after a fall", "lang": "en"}'
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use remedex::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn run() -> remedex::Result<()> {
//! let embedder: SharedEmbedder = Arc::new(OpenAiEmbedder::new(OpenAiConfig::new("sk-..."))
//!     .expect("valid config"));
//! let catalog = CatalogStore::default().load()?;
//! let engine = MatchEngine::new(embedder, SharedCatalog::new(catalog));
//!
//! if let Some(found) = engine.find_best_match("high fever with a flushed face").await? {
//!     println!("{} ({:.3})", found.remedy.label(), found.score);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate Structure
//!
//! - `remedex-core` - records, vectors, dot-product kernel, catalog
//! - `remedex-embed` - embedding provider boundary and clients
//! - `remedex-storage` - raw catalog reader and index persistence
//! - `remedex-engine` - indexer and match engine
//! - `remedex-api` - REST endpoints

pub use remedex_core::{
    Catalog, Error, IndexedRemedy, Language, LanguageMap, LocalizedRemedy, RemedyRecord, Result,
    SharedCatalog, Vector, ENGLISH,
};

pub use remedex_embed::{
    EmbedError, EmbeddingProvider, HashingEmbedder, OpenAiConfig, OpenAiEmbedder, SharedEmbedder,
};

pub use remedex_storage::{read_remedies, CatalogStore, DEFAULT_INDEX_PATH};

pub use remedex_engine::{
    IndexReport, Indexer, MatchEngine, RemedyMatch, SkippedRemedy, DEFAULT_ACCEPTANCE_THRESHOLD,
};

pub use remedex_api::{AppState, RestApi};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Catalog, CatalogStore, EmbeddingProvider, IndexedRemedy, Indexer, Language, MatchEngine,
        OpenAiConfig, OpenAiEmbedder, RemedyMatch, RemedyRecord, SharedCatalog, SharedEmbedder,
        Vector,
    };
}
