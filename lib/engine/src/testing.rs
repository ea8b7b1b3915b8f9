use async_trait::async_trait;
use remedex_core::{LanguageMap, RemedyRecord, Vector, ENGLISH};
use remedex_embed::{EmbedError, EmbeddingProvider};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Embedder with canned answers per input text. Unknown text fails.
#[derive(Default)]
pub struct ScriptedEmbedder {
    answers: HashMap<String, Option<Vec<f32>>>,
    calls: AtomicUsize,
    seen: Mutex<Vec<String>>,
}

impl ScriptedEmbedder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.answers.insert(text.to_string(), Some(vector));
        self
    }

    pub fn fail(mut self, text: &str) -> Self {
        self.answers.insert(text.to_string(), None);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmbeddingProvider for ScriptedEmbedder {
    async fn embed(&self, text: &str) -> Result<Vector, EmbedError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(text.to_string());
        match self.answers.get(text) {
            Some(Some(vector)) => Ok(Vector::new(vector.clone())),
            Some(None) => Err(EmbedError::Status {
                status: 429,
                body: "rate limited".to_string(),
            }),
            None => Err(EmbedError::Http(format!("connection refused for '{}'", text))),
        }
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

pub fn remedy(name: &str, symptoms: &str) -> RemedyRecord {
    RemedyRecord::new(
        LanguageMap::from([(ENGLISH.to_string(), name.to_string())]),
        LanguageMap::from([(ENGLISH.to_string(), symptoms.to_string())]),
        LanguageMap::from([(ENGLISH.to_string(), "3 pills twice daily".to_string())]),
    )
}
