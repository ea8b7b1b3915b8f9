pub mod persistence;
pub mod source;

pub use persistence::{CatalogStore, DEFAULT_INDEX_PATH};
pub use source::read_remedies;
