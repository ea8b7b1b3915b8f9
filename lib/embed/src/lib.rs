//! # Remedex Embed
//!
//! The embedding provider boundary. The indexer and the match engine only see
//! [`EmbeddingProvider`]; which model sits behind it is decided by the binary.
//!
//! - [`OpenAiEmbedder`] - hosted model over HTTP (`text-embedding-3-small` by
//!   default) with a per-request timeout and bounded retries on transient errors
//! - [`HashingEmbedder`] - deterministic local embedder for offline runs

pub mod error;
pub mod hashing;
pub mod openai;
pub mod provider;

pub use error::EmbedError;
pub use hashing::{HashingEmbedder, DEFAULT_HASHING_DIM};
pub use openai::{OpenAiConfig, OpenAiEmbedder, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use provider::{EmbeddingProvider, SharedEmbedder};
