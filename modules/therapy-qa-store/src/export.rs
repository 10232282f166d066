// Flat-file export of the stored collection.

use std::path::Path;

use tracing::info;

use crate::error::Result;

/// Write `documents` to `path` as a pretty-printed JSON array and return how
/// many were written. Documents are already plain JSON, so dates appear as
/// the RFC 3339 strings they were stored as.
pub async fn write_documents(path: &Path, documents: &[serde_json::Value]) -> Result<usize> {
    let bytes = serde_json::to_vec_pretty(documents)?;
    tokio::fs::write(path, bytes).await?;
    info!(path = %path.display(), count = documents.len(), "Exported documents");
    Ok(documents.len())
}
