use crate::domain::ports::{ArtifactRef, ArtifactStore};
use crate::utils::error::{ContractError, Result};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::io::AsyncWriteExt;

/// 全程序共用的序號，與時間戳和 uuid 一起組成檔名
static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Allocates a collision-resistant artifact file name.
///
/// `contract_<UTC timestamp>_<sequence>_<uuid8>.<ext>`; the extension comes
/// from the suggested name and defaults to `pdf`.
pub fn allocate_name(suggested_name: &str) -> String {
    let stem = Path::new(suggested_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'))
        .unwrap_or("contract");
    let extension = Path::new(suggested_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| e.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or("pdf");

    let timestamp = chrono::Utc::now().format("%Y%m%d%H%M%S%3f");
    let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let random = uuid::Uuid::new_v4().simple().to_string();

    format!(
        "{}_{}_{}_{}.{}",
        stem,
        timestamp,
        sequence,
        &random[..8],
        extension
    )
}

/// Stores contracts as files under a local directory.
#[derive(Debug, Clone)]
pub struct LocalArtifactStore {
    base_path: PathBuf,
    public_prefix: String,
}

impl LocalArtifactStore {
    pub fn new(base_path: impl Into<PathBuf>, public_prefix: &str) -> Self {
        Self {
            base_path: base_path.into(),
            public_prefix: public_prefix.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

/// Removes a half-written temp file unless disarmed.
struct TempFileGuard {
    path: Option<PathBuf>,
}

impl TempFileGuard {
    fn disarm(&mut self) {
        self.path = None;
    }
}

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.path.take() {
            if let Err(e) = std::fs::remove_file(&path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!("⚠️ Failed to remove temp file {}: {}", path.display(), e);
                }
            }
        }
    }
}

impl ArtifactStore for LocalArtifactStore {
    async fn store(&self, suggested_name: &str, payload: &[u8]) -> Result<ArtifactRef> {
        tokio::fs::create_dir_all(&self.base_path).await.map_err(|e| {
            ContractError::storage(format!(
                "failed to create output directory '{}': {}",
                self.base_path.display(),
                e
            ))
        })?;

        let name = allocate_name(suggested_name);
        let final_path = self.base_path.join(&name);
        let temp_path = self.base_path.join(format!(".{}.tmp", name));

        // 先寫入暫存檔再改名，避免呼叫端看到不完整的文件
        let mut guard = TempFileGuard {
            path: Some(temp_path.clone()),
        };

        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_path)
            .await
            .map_err(|e| ContractError::storage(format!("failed to create temp file: {}", e)))?;
        file.write_all(payload)
            .await
            .map_err(|e| ContractError::storage(format!("failed to write artifact: {}", e)))?;
        file.sync_all()
            .await
            .map_err(|e| ContractError::storage(format!("failed to sync artifact: {}", e)))?;
        drop(file);

        if tokio::fs::try_exists(&final_path).await.unwrap_or(false) {
            return Err(ContractError::storage(format!(
                "artifact name collision: {}",
                name
            )));
        }
        tokio::fs::rename(&temp_path, &final_path)
            .await
            .map_err(|e| ContractError::storage(format!("failed to finalize artifact: {}", e)))?;
        guard.disarm();

        tracing::debug!("Stored {} bytes at {}", payload.len(), final_path.display());

        Ok(ArtifactRef {
            public_path: format!("{}/{}", self.public_prefix, name),
            file_path: final_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tempfile::TempDir;

    #[test]
    fn test_allocate_name_shape() {
        let name = allocate_name("contract.pdf");
        assert!(name.starts_with("contract_"));
        assert!(name.ends_with(".pdf"));
        assert_eq!(name.split('_').count(), 4);

        let traversal = allocate_name("../../etc/passwd");
        assert!(traversal.starts_with("passwd_"));
        assert!(!traversal.contains('/'));
        assert!(allocate_name("my contract!.pdf").starts_with("contract_"));
        assert!(allocate_name("").ends_with(".pdf"));
    }

    #[test]
    fn test_allocated_names_are_unique_within_a_tick() {
        let names: HashSet<String> = (0..1000).map(|_| allocate_name("contract.pdf")).collect();
        assert_eq!(names.len(), 1000);
    }

    #[tokio::test]
    async fn test_store_writes_file_and_leaves_no_temp() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalArtifactStore::new(temp_dir.path().join("contracts"), "/contracts/");

        let artifact = store.store("contract.pdf", b"%PDF-1.7").await.unwrap();

        assert!(artifact.public_path.starts_with("/contracts/contract_"));
        assert_eq!(std::fs::read(&artifact.file_path).unwrap(), b"%PDF-1.7");

        let entries: Vec<String> = std::fs::read_dir(store.base_path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(entries.len(), 1);
        assert!(!entries[0].ends_with(".tmp"));
    }

    #[tokio::test]
    async fn test_concurrent_stores_get_distinct_references() {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalArtifactStore::new(temp_dir.path(), "/contracts");

        let (a, b) = tokio::join!(
            store.store("contract.pdf", b"first"),
            store.store("contract.pdf", b"second")
        );
        let (a, b) = (a.unwrap(), b.unwrap());

        assert_ne!(a.public_path, b.public_path);
        assert_eq!(std::fs::read(&a.file_path).unwrap(), b"first");
        assert_eq!(std::fs::read(&b.file_path).unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_unwritable_directory_is_storage_failure() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"file").unwrap();

        let store = LocalArtifactStore::new(&blocker, "/contracts");
        let result = store.store("contract.pdf", b"data").await;
        tokio_test::assert_err!(result.as_ref());
        assert_eq!(result.unwrap_err().kind(), "StorageFailure");
    }
}
