// Integration tests for Remedex: indexer -> index file -> match engine
use async_trait::async_trait;
use remedex::{
    read_remedies, Catalog, CatalogStore, EmbedError, EmbeddingProvider, HashingEmbedder,
    IndexedRemedy, Indexer, Language, MatchEngine, RemedyRecord, SharedCatalog, Vector,
};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

const MEDICINES: &str = r#"[
    {
        "name": {"en": "Arnica", "ur": "آرنیکا"},
        "symptoms": {"en": "bruising, muscle soreness", "ur": "چوٹ، پٹھوں کا درد"},
        "dosage": {"en": "5 drops in water, three times a day", "ur": "پانی میں 5 قطرے، دن میں تین بار"},
        "tips": {"en": ["Rest the injured area", "Apply a cold compress"]}
    },
    {
        "name": {"en": "Belladonna"},
        "symptoms": {"en": "sudden high fever, flushed face, throbbing headache"},
        "dosage": {"en": "3 pills every 4 hours"}
    },
    {
        "name": {"en": "Bryonia"},
        "symptoms": {"en": "dry cough, pain worse on movement"},
        "dosage": {"en": "4 pills twice daily"},
        "tips": {}
    }
]"#;

/// Known vectors per canonical text or query; everything else fails.
struct TableEmbedder {
    table: HashMap<&'static str, Vec<f32>>,
}

impl TableEmbedder {
    fn new() -> Self {
        let mut table = HashMap::new();
        table.insert("Arnica - bruising, muscle soreness", vec![0.6, 0.8, 0.0]);
        table.insert(
            "Belladonna - sudden high fever, flushed face, throbbing headache",
            vec![0.0, 0.6, 0.8],
        );
        // Bryonia is deliberately missing so its embedding call fails.
        table.insert("my knee is bruised and sore", vec![0.6, 0.8, 0.0]);
        table.insert("burning fever since morning", vec![0.0, 0.3, 0.4]);
        table.insert("how do I renew my passport", vec![0.8, -0.6, 0.0]);
        Self { table }
    }
}

#[async_trait]
impl EmbeddingProvider for TableEmbedder {
    async fn embed(&self, text: &str) -> Result<Vector, EmbedError> {
        self.table
            .get(text)
            .map(|v| Vector::new(v.clone()))
            .ok_or_else(|| EmbedError::Http("connection reset by peer".to_string()))
    }

    fn model(&self) -> &str {
        "table"
    }
}

fn write_medicines(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("medicines.json");
    std::fs::write(&path, MEDICINES).unwrap();
    path
}

#[tokio::test]
async fn test_index_then_match_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_medicines(dir.path());
    let store = CatalogStore::new(dir.path().join("data/embedded_meds.json"));
    let embedder = Arc::new(TableEmbedder::new());

    let report = Indexer::new(embedder.clone(), store.clone())
        .run_from_path(&source)
        .await
        .unwrap();
    assert_eq!(report.indexed, 2);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].name, "Bryonia");

    let engine = MatchEngine::new(embedder, SharedCatalog::new(store.load().unwrap()));

    let arnica = engine
        .find_best_match("my knee is bruised and sore")
        .await
        .unwrap()
        .expect("arnica should match");
    assert_eq!(arnica.remedy.english_name(), Some("Arnica"));
    assert!((arnica.score - 1.0).abs() < 1e-5);

    let localized = arnica.remedy.localized(Language::Ur);
    assert_eq!(localized.name, "آرنیکا");
    assert!(localized.tips.is_empty());

    let fever = engine
        .find_best_match("burning fever since morning")
        .await
        .unwrap()
        .expect("belladonna should match");
    assert_eq!(fever.remedy.english_name(), Some("Belladonna"));
    assert!((fever.score - 0.5).abs() < 1e-5);

    // 0.6*0.8 - 0.8*0.6 = 0 for Arnica, negative for Belladonna
    assert!(engine
        .find_best_match("how do I renew my passport")
        .await
        .unwrap()
        .is_none());

    // embedding call fails -> no match, no error
    assert!(engine.find_best_match("unlisted query").await.unwrap().is_none());
}

#[tokio::test]
async fn test_arnica_scaled_and_orthogonal_queries() {
    let arnica: RemedyRecord = serde_json::from_str(
        r#"{"name": {"en": "Arnica"}, "symptoms": {"en": "bruising, muscle soreness"}, "dosage": {"en": "5 drops"}}"#,
    )
    .unwrap();
    let stored = Vector::new(vec![0.12, -0.4, 0.33, 0.05]);
    let catalog = Catalog::new(vec![IndexedRemedy::new(stored.clone(), arnica)]).unwrap();
    let engine = MatchEngine::new(Arc::new(HashingEmbedder::default()), SharedCatalog::new(catalog));

    let same = engine.match_vector(&stored.scaled(1.0)).unwrap().unwrap();
    assert!((same.score - stored.norm_squared()).abs() < 1e-6);
    assert_eq!(same.into_remedy().english_name(), Some("Arnica"));

    let orthogonal = Vector::new(vec![0.4, 0.12, 0.0, 0.0]);
    assert!(engine.match_vector(&orthogonal).unwrap().is_none());
}

#[tokio::test]
async fn test_reindexing_is_reproducible() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_medicines(dir.path());
    let embedder = Arc::new(HashingEmbedder::new(64).unwrap());

    let first = CatalogStore::new(dir.path().join("first.json"));
    let second = CatalogStore::new(dir.path().join("second.json"));
    Indexer::new(embedder.clone(), first.clone())
        .run_from_path(&source)
        .await
        .unwrap();
    Indexer::new(embedder, second.clone())
        .run_from_path(&source)
        .await
        .unwrap();

    let a = first.load().unwrap();
    let b = second.load().unwrap();
    assert_eq!(a.len(), 3);
    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(b.iter()) {
        assert_eq!(x.remedy, y.remedy);
        for (p, q) in x.embedding.as_slice().iter().zip(y.embedding.as_slice()) {
            assert!((p - q).abs() < 1e-6);
        }
    }
}

#[tokio::test]
async fn test_reindex_replaces_and_preserves_records() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_medicines(dir.path());
    let store = CatalogStore::new(dir.path().join("embedded_meds.json"));
    let indexer = Indexer::new(Arc::new(HashingEmbedder::default()), store.clone());

    indexer.run_from_path(&source).await.unwrap();
    indexer
        .run(read_remedies(&source).unwrap().into_iter().take(1).collect())
        .await
        .unwrap();

    let catalog = store.load().unwrap();
    assert_eq!(catalog.len(), 1);
    let stored = &catalog.entries()[0].remedy;
    assert_eq!(stored.dosage["ur"], "پانی میں 5 قطرے، دن میں تین بار");
    assert_eq!(stored.tips.as_ref().unwrap()["en"].len(), 2);
}

#[tokio::test]
async fn test_model_change_without_reindex_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_medicines(dir.path());
    let store = CatalogStore::new(dir.path().join("embedded_meds.json"));
    Indexer::new(Arc::new(HashingEmbedder::new(32).unwrap()), store.clone())
        .run_from_path(&source)
        .await
        .unwrap();

    let engine = MatchEngine::new(
        Arc::new(HashingEmbedder::new(48).unwrap()),
        SharedCatalog::new(store.load().unwrap()),
    );
    let err = engine.find_best_match("dry cough").await.unwrap_err();
    assert!(matches!(
        err,
        remedex::Error::InvalidDimension { expected: 32, actual: 48 }
    ));
}
