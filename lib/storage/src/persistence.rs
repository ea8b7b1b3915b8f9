use atomicwrites::{AtomicFile, OverwriteBehavior};
use remedex_core::{Catalog, Error, IndexedRemedy, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Default location of the embedding index, relative to the working directory.
pub const DEFAULT_INDEX_PATH: &str = "data/embedded_meds.json";

/// The embedding index on disk.
///
/// The file is always read and written whole. Writes go to a temporary file
/// in the same directory that is renamed over the target, so a reader sees
/// either the previous index or the complete new one.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    path: PathBuf,
}

impl CatalogStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read the whole index and build a validated [`Catalog`].
    ///
    /// A missing or unreadable file is an error; the match engine cannot run
    /// without its index.
    pub fn load(&self) -> Result<Catalog> {
        let file = File::open(&self.path).map_err(|e| {
            Error::Storage(format!(
                "cannot open embedding index {}: {}",
                self.path.display(),
                e
            ))
        })?;

        let entries: Vec<IndexedRemedy> = serde_json::from_reader(BufReader::new(file))?;
        let catalog = Catalog::new(entries)?;

        info!(
            path = %self.path.display(),
            remedies = catalog.len(),
            dimension = ?catalog.dimension(),
            "embedding index loaded"
        );
        Ok(catalog)
    }

    /// Replace the index with `entries`, creating the parent directory if needed.
    pub fn save(&self, entries: &[IndexedRemedy]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        AtomicFile::new(&self.path, OverwriteBehavior::AllowOverwrite)
            .write(|file| -> Result<()> {
                let mut writer = BufWriter::new(file);
                serde_json::to_writer_pretty(&mut writer, entries)?;
                writer.write_all(b"\n")?;
                writer.flush()?;
                Ok(())
            })
            .map_err(|e| match e {
                atomicwrites::Error::Internal(io) => Error::Io(io),
                atomicwrites::Error::User(inner) => inner,
            })?;

        info!(path = %self.path.display(), remedies = entries.len(), "embedding index written");
        Ok(())
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new(DEFAULT_INDEX_PATH)
    }
}
