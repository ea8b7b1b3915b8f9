use remedex_core::{Error, RemedyRecord, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Read the curated catalog: a JSON array of remedy records, in catalog order.
pub fn read_remedies<P: AsRef<Path>>(path: P) -> Result<Vec<RemedyRecord>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        Error::Storage(format!("cannot open remedy catalog {}: {}", path.display(), e))
    })?;
    let remedies: Vec<RemedyRecord> = serde_json::from_reader(BufReader::new(file))?;
    tracing::debug!(path = %path.display(), count = remedies.len(), "remedy catalog read");
    Ok(remedies)
}
