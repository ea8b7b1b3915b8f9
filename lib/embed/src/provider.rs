use crate::EmbedError;
use async_trait::async_trait;
use remedex_core::Vector;
use std::sync::Arc;

/// Turns one piece of text into one embedding vector.
///
/// Both the indexer and the match engine depend on this boundary, never on a
/// concrete client.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vector, EmbedError>;

    /// Model identifier, used in logs and the catalog info endpoint.
    fn model(&self) -> &str;
}

#[async_trait]
impl<T: EmbeddingProvider + ?Sized> EmbeddingProvider for Arc<T> {
    async fn embed(&self, text: &str) -> Result<Vector, EmbedError> {
        (**self).embed(text).await
    }

    fn model(&self) -> &str {
        (**self).model()
    }
}

pub type SharedEmbedder = Arc<dyn EmbeddingProvider>;
