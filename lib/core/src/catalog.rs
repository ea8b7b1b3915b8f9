use crate::{Error, IndexedRemedy, Result, Vector};
use parking_lot::RwLock;
use std::sync::Arc;

/// Read-only, ordered set of indexed remedies.
///
/// Every stored embedding has the same dimension; this is checked once when
/// the catalog is built so the scan never has to.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<IndexedRemedy>,
    dimension: Option<usize>,
}

impl Catalog {
    pub fn new(entries: Vec<IndexedRemedy>) -> Result<Self> {
        let dimension = entries.first().map(|entry| entry.embedding.dim());

        if let Some(expected) = dimension {
            if expected == 0 {
                return Err(Error::InvalidConfig(
                    "catalog embeddings must not be empty".to_string(),
                ));
            }
            if let Some(bad) = entries.iter().find(|e| e.embedding.dim() != expected) {
                return Err(Error::InvalidDimension {
                    expected,
                    actual: bad.embedding.dim(),
                });
            }
        }

        Ok(Self { entries, dimension })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Embedding dimension shared by all entries, `None` for an empty catalog.
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    pub fn entries(&self) -> &[IndexedRemedy] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, IndexedRemedy> {
        self.entries.iter()
    }

    pub fn into_entries(self) -> Vec<IndexedRemedy> {
        self.entries
    }

    /// Highest dot-product entry for `query`, scanning every entry in order.
    ///
    /// The running best is only replaced on a strictly greater score, so the
    /// earliest entry wins a tie. No threshold is applied here.
    pub fn top_match(&self, query: &Vector) -> Result<Option<(&IndexedRemedy, f32)>> {
        let Some(expected) = self.dimension else {
            return Ok(None);
        };
        if query.dim() != expected {
            return Err(Error::InvalidDimension {
                expected,
                actual: query.dim(),
            });
        }

        let mut best: Option<(&IndexedRemedy, f32)> = None;
        for entry in &self.entries {
            let score = entry.embedding.dot(query)?;
            match best {
                Some((_, best_score)) if score <= best_score => {}
                // NaN never beats a real score
                Some(_) if score.is_nan() => {}
                _ => best = Some((entry, score)),
            }
        }
        Ok(best)
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a IndexedRemedy;
    type IntoIter = std::slice::Iter<'a, IndexedRemedy>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Handle to the live catalog shared by all in-flight requests.
///
/// Readers take an `Arc` snapshot and keep it for the whole request. A reload
/// swaps the whole catalog at once; nothing is mutated in place.
#[derive(Debug, Clone)]
pub struct SharedCatalog {
    current: Arc<RwLock<Arc<Catalog>>>,
}

impl SharedCatalog {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(catalog))),
        }
    }

    #[inline]
    pub fn snapshot(&self) -> Arc<Catalog> {
        self.current.read().clone()
    }

    /// Install `catalog` and return the one it replaced.
    pub fn replace(&self, catalog: Catalog) -> Arc<Catalog> {
        std::mem::replace(&mut *self.current.write(), Arc::new(catalog))
    }
}

impl From<Catalog> for SharedCatalog {
    fn from(catalog: Catalog) -> Self {
        SharedCatalog::new(catalog)
    }
}
