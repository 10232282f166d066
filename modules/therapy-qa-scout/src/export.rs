use std::path::Path;

use anyhow::Result;

use crate::traits::RecordStore;

/// Dump the whole stored collection to `path` as a JSON array.
pub async fn export_collection(store: &dyn RecordStore, path: &Path) -> Result<usize> {
    let documents = store.documents().await?;
    let written = therapy_qa_store::write_documents(path, &documents).await?;
    Ok(written)
}
