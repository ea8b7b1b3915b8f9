//! # Remedex Engine
//!
//! The two halves of symptom-to-remedy matching:
//!
//! - [`Indexer`] runs offline. It embeds `"{name.en} - {symptoms.en}"` for
//!   every curated remedy and replaces the stored index.
//! - [`MatchEngine`] runs online. It embeds a query, scores every indexed
//!   remedy by raw dot product and accepts the best one only above
//!   [`DEFAULT_ACCEPTANCE_THRESHOLD`].
//!
//! Both take their embedding provider and storage/catalog handles as
//! constructor arguments and never depend on each other.

pub mod indexer;
pub mod matcher;

#[cfg(test)]
pub(crate) mod testing;

pub use indexer::{IndexReport, Indexer, SkippedRemedy};
pub use matcher::{MatchEngine, RemedyMatch, DEFAULT_ACCEPTANCE_THRESHOLD};
