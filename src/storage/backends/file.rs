use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, error, info};

use crate::errors::{ReelinkError, Result};
use crate::storage::KvStore;

/// 目录型存储：每个槽位对应 `<dir>/<slot>.json`
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub async fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();

        // 如果不存在就初始化
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            error!("Failed to create data directory {}: {}", dir.display(), e);
            ReelinkError::storage_write(format!(
                "Failed to create data directory {}: {}",
                dir.display(),
                e
            ))
        })?;

        info!("File store ready at {}", dir.display());
        Ok(FileStore { dir })
    }

    fn slot_path(&self, slot: &str) -> Result<PathBuf> {
        // 槽位名直接拼进文件名，禁止路径分隔符
        if !crate::utils::is_valid_alias(slot) || slot.starts_with('.') {
            return Err(ReelinkError::validation(format!(
                "Invalid storage slot name '{}'",
                slot
            )));
        }
        Ok(self.dir.join(format!("{}.json", slot)))
    }
}

#[async_trait]
impl KvStore for FileStore {
    async fn get(&self, slot: &str) -> Result<Option<String>> {
        let path = self.slot_path(slot)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Slot file {} not found", path.display());
                Ok(None)
            }
            Err(e) => Err(ReelinkError::storage_read(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn set(&self, slot: &str, value: &str) -> Result<()> {
        let path = self.slot_path(slot)?;
        let tmp_path = path.with_extension("json.tmp");

        // 先写临时文件再 rename，避免半截内容
        let write_result = async {
            tokio::fs::write(&tmp_path, value).await?;
            tokio::fs::rename(&tmp_path, &path).await
        }
        .await;

        write_result.map_err(|e| {
            error!("Failed to write slot file {}: {}", path.display(), e);
            ReelinkError::storage_write(format!("Failed to write {}: {}", path.display(), e))
        })
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}
