//! One pretty-printed JSON file per document in a single directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::{
    DocumentId, DocumentPage, DocumentRecord, DocumentStore, NewDocument, STATUS_PROCESSED,
    StoreError,
};

const EXTENSION: &str = "json";
const SOURCE_EXTENSION: &str = "source";

pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    /// Open the store at `dir`, creating the directory if needed.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        debug!(dir = %dir.display(), "opened document store");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: DocumentId) -> PathBuf {
        self.dir.join(format!("{id}.{EXTENSION}"))
    }

    fn source_path_for(&self, id: DocumentId) -> PathBuf {
        self.dir.join(format!("{id}.{SOURCE_EXTENSION}"))
    }

    async fn read_all(&self) -> Result<Vec<DocumentRecord>, StoreError> {
        let mut records = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            let bytes = tokio::fs::read(&path).await?;
            match serde_json::from_slice::<DocumentRecord>(&bytes) {
                Ok(record) => records.push(record),
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable record"),
            }
        }
        Ok(records)
    }
}

#[async_trait]
impl DocumentStore for JsonStore {
    async fn insert(&self, doc: NewDocument) -> Result<DocumentId, StoreError> {
        let id = DocumentId::new();
        let file_path = match &doc.source {
            Some(bytes) => {
                let path = self.source_path_for(id);
                write_replacing(&path, bytes).await?;
                Some(path)
            }
            None => None,
        };
        let record = DocumentRecord {
            id,
            filename: doc.filename,
            upload_time: doc.upload_time,
            status: STATUS_PROCESSED.to_string(),
            file_path,
            analysis: doc.result,
        };
        let json = serde_json::to_vec_pretty(&record)?;

        if let Err(e) = write_replacing(&self.path_for(id), &json).await {
            if let Some(source) = &record.file_path {
                remove_if_present(source).await;
            }
            return Err(e);
        }

        info!(%id, filename = %record.filename, "stored document");
        Ok(id)
    }

    async fn get(&self, id: DocumentId) -> Result<DocumentRecord, StoreError> {
        match tokio::fs::read(self.path_for(id)).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self, page: usize, limit: usize) -> Result<DocumentPage, StoreError> {
        let page = page.max(1);
        let mut records = self.read_all().await?;
        records.sort_by(|a, b| a.upload_time.cmp(&b.upload_time).then(a.id.cmp(&b.id)));

        let total = records.len();
        let documents = records
            .into_iter()
            .skip((page - 1).saturating_mul(limit))
            .take(limit)
            .collect();
        Ok(DocumentPage {
            documents,
            total,
            page,
            limit,
            has_next: page.saturating_mul(limit) < total,
        })
    }

    async fn source(&self, id: DocumentId) -> Result<Vec<u8>, StoreError> {
        let record = self.get(id).await?;
        if record.file_path.is_none() {
            return Err(StoreError::NotFound(format!("{id} source file")));
        }
        // Resolved against the store directory, not the recorded path, so a
        // store opened through a different relative path still finds it.
        match tokio::fs::read(self.source_path_for(id)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(format!("{id} source file")))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, id: DocumentId) -> Result<(), StoreError> {
        match tokio::fs::remove_file(self.path_for(id)).await {
            Ok(()) => {
                remove_if_present(&self.source_path_for(id)).await;
                info!(%id, "deleted document");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Write via a sibling temp file and rename, so readers never see a partial
/// file. The temp file is removed if either step fails.
async fn write_replacing(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let tmp = path.with_extension("tmp");
    let written = async {
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, path).await
    }
    .await;
    if let Err(e) = written {
        remove_if_present(&tmp).await;
        return Err(e.into());
    }
    Ok(())
}

async fn remove_if_present(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %path.display(), error = %e, "could not remove file");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use legalmate_core::{AnalysisResult, EntityMap, normalize};

    fn result(text: &str) -> AnalysisResult {
        let mut entities = EntityMap::new();
        entities.push(EntityMap::CLAUSES, "Governing Law");
        AnalysisResult::new(
            normalize(text),
            entities,
            "A summary.".into(),
            vec!["Missing Governing Law clause".into()],
            None,
        )
    }

    fn doc(name: &str, minutes: i64) -> NewDocument {
        let base = Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap();
        NewDocument {
            filename: name.to_string(),
            upload_time: base + Duration::minutes(minutes),
            result: result(name),
            source: None,
        }
    }

    async fn store() -> (tempfile::TempDir, JsonStore) {
        let dir = tempfile::TempDir::new().unwrap();
        let store = JsonStore::open(dir.path().join("uploads")).await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn open_creates_directory() {
        let (dir, store) = store().await;
        assert!(store.dir().is_dir());
        assert!(store.dir().starts_with(dir.path()));
    }

    #[tokio::test]
    async fn insert_then_get() {
        let (_dir, store) = store().await;
        let id = store.insert(doc("contract.pdf", 0)).await.unwrap();

        let record = store.get(id).await.unwrap();
        assert_eq!(record.id, id);
        assert_eq!(record.filename, "contract.pdf");
        assert_eq!(record.status, "processed");
        assert_eq!(record.analysis, result("contract.pdf"));
        assert!(record.file_path.is_none());
        assert!(matches!(store.source(id).await, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn source_file_kept_beside_record() {
        let (_dir, store) = store().await;
        let new = doc("nda.pdf", 0).with_source(b"%PDF-1.4 original".to_vec());
        let id = store.insert(new).await.unwrap();

        let record = store.get(id).await.unwrap();
        let path = record.file_path.unwrap();
        assert!(path.starts_with(store.dir()));
        assert_eq!(store.source(id).await.unwrap(), b"%PDF-1.4 original");

        store.delete(id).await.unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn failed_write_leaves_no_temp_file() {
        let (_dir, store) = store().await;
        // A non-empty directory at the destination makes the rename fail.
        let dest = store.dir().join("blocked.json");
        tokio::fs::create_dir(&dest).await.unwrap();
        tokio::fs::write(dest.join("keep"), "x").await.unwrap();

        let err = write_replacing(&dest, b"{}").await.unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
        assert!(!store.dir().join("blocked.tmp").exists());
        assert!(dest.join("keep").exists());
    }

    #[tokio::test]
    async fn record_survives_reopen() {
        let (dir, store) = store().await;
        let id = store.insert(doc("nda.docx", 0)).await.unwrap();
        drop(store);

        let reopened = JsonStore::open(dir.path().join("uploads")).await.unwrap();
        assert_eq!(reopened.get(id).await.unwrap().filename, "nda.docx");
    }

    #[tokio::test]
    async fn missing_record_is_not_found() {
        let (_dir, store) = store().await;
        let err = store.get(DocumentId::new()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        let err = store.delete(DocumentId::new()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_removes_record() {
        let (_dir, store) = store().await;
        let id = store.insert(doc("a.pdf", 0)).await.unwrap();
        store.delete(id).await.unwrap();
        assert!(matches!(store.get(id).await, Err(StoreError::NotFound(_))));
        assert_eq!(store.list(1, 10).await.unwrap().total, 0);
    }

    #[tokio::test]
    async fn list_paginates_oldest_first() {
        let (_dir, store) = store().await;
        // Inserted out of order on purpose.
        for (name, minute) in [("c.pdf", 2), ("a.pdf", 0), ("e.pdf", 4), ("b.pdf", 1), ("d.pdf", 3)] {
            store.insert(doc(name, minute)).await.unwrap();
        }

        let first = store.list(1, 2).await.unwrap();
        let names: Vec<_> = first.documents.iter().map(|d| d.filename.as_str()).collect();
        assert_eq!(names, ["a.pdf", "b.pdf"]);
        assert_eq!(first.total, 5);
        assert!(first.has_next);

        let last = store.list(3, 2).await.unwrap();
        let names: Vec<_> = last.documents.iter().map(|d| d.filename.as_str()).collect();
        assert_eq!(names, ["e.pdf"]);
        assert!(!last.has_next);

        let beyond = store.list(4, 2).await.unwrap();
        assert!(beyond.documents.is_empty());
        assert_eq!(beyond.total, 5);
    }

    #[tokio::test]
    async fn exact_page_boundary_has_no_next() {
        let (_dir, store) = store().await;
        for minute in 0..4 {
            store.insert(doc("x.pdf", minute)).await.unwrap();
        }
        assert!(!store.list(2, 2).await.unwrap().has_next);
    }

    #[tokio::test]
    async fn page_zero_is_first_page() {
        let (_dir, store) = store().await;
        store.insert(doc("a.pdf", 0)).await.unwrap();
        let page = store.list(0, 10).await.unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.documents.len(), 1);
    }

    #[tokio::test]
    async fn foreign_files_are_ignored() {
        let (_dir, store) = store().await;
        store.insert(doc("a.pdf", 0)).await.unwrap();
        tokio::fs::write(store.dir().join("notes.txt"), "hello").await.unwrap();
        tokio::fs::write(store.dir().join("broken.json"), "{").await.unwrap();
        tokio::fs::write(store.dir().join("orphan.source"), "%PDF").await.unwrap();
        assert_eq!(store.list(1, 10).await.unwrap().total, 1);
    }
}
