//! # Remedex Core
//!
//! Data model and scoring primitives for symptom-to-remedy matching.
//!
//! - [`RemedyRecord`] - one curated catalog entry with per-language text
//! - [`Vector`] - an embedding, kept exactly as the model returned it
//! - [`IndexedRemedy`] - a record paired with its embedding
//! - [`Catalog`] - the ordered, immutable set of indexed remedies
//! - [`SharedCatalog`] - the live catalog handle, swapped whole on reload
//!
//! ## Example
//!
//! ```rust
//! use remedex_core::{Catalog, IndexedRemedy, LanguageMap, RemedyRecord, Vector, ENGLISH};
//!
//! let arnica = RemedyRecord::new(
//!     LanguageMap::from([(ENGLISH.to_string(), "Arnica".to_string())]),
//!     LanguageMap::from([(ENGLISH.to_string(), "bruising, muscle soreness".to_string())]),
//!     LanguageMap::new(),
//! );
//! let catalog = Catalog::new(vec![IndexedRemedy::new(Vector::new(vec![0.6, 0.8]), arnica)]).unwrap();
//!
//! let (best, score) = catalog.top_match(&Vector::new(vec![0.6, 0.8])).unwrap().unwrap();
//! assert_eq!(best.remedy.english_name(), Some("Arnica"));
//! assert!((score - 1.0).abs() < 1e-6);
//! ```

pub mod catalog;
pub mod error;
pub mod remedy;
pub mod vector;

/// Dot-product kernels with runtime CPU feature dispatch:
/// AVX2/FMA on x86_64, NEON on aarch64, scalar elsewhere.
pub mod simd;

pub use catalog::{Catalog, SharedCatalog};
pub use error::{Error, Result};
pub use remedy::{
    IndexedRemedy, Language, LanguageMap, LocalizedRemedy, RemedyRecord, ENGLISH, MAX_TIPS,
};
pub use vector::Vector;
