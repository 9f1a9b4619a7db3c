use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::warn;

/// 白名单存储错误
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("allowlist io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 行分隔文本文件形式的模型白名单
///
/// 每次 load 都重新读文件，扫描拿到的是当时的快照；
/// 写操作内部用互斥锁串行化，重写走临时文件 + rename。
pub struct AllowlistStore {
    path: PathBuf,

    /// 串行化 add/remove，避免并发 HTTP 写丢更新
    write_lock: Mutex<()>,
}

impl AllowlistStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 加载当前白名单快照，文件不存在视为空集
    pub async fn load(&self) -> Result<BTreeSet<String>, StoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %self.path.display(), "Allowlist file missing, treating as empty");
                return Ok(BTreeSet::new());
            }
            Err(e) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };

        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// 追加一个模型（不去重，重复行在 load 时合并）
    pub async fn add(&self, model: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| self.io_err(e))?;

        file.write_all(format!("{}\n", model.trim()).as_bytes())
            .await
            .map_err(|e| self.io_err(e))?;
        file.flush().await.map_err(|e| self.io_err(e))?;

        Ok(())
    }

    /// 删除所有与 model 完全匹配的行，文件不存在时按空内容处理
    pub async fn remove(&self, model: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
            Err(e) => return Err(self.io_err(e)),
        };

        let target = model.trim();
        let mut remaining = String::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line == target {
                continue;
            }
            remaining.push_str(line);
            remaining.push('\n');
        }

        self.rewrite(remaining).await
    }

    /// 临时文件 + rename 的原子重写
    async fn rewrite(&self, content: String) -> Result<(), StoreError> {
        let tmp_path = self.path.with_extension("tmp");

        tokio::fs::write(&tmp_path, content.as_bytes())
            .await
            .map_err(|e| StoreError::Io {
                path: tmp_path.clone(),
                source: e,
            })?;

        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| self.io_err(e))?;

        Ok(())
    }

    fn io_err(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_load_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = AllowlistStore::new(dir.path().join("allowed_models.txt"));

        let models = store.load().await.unwrap();
        assert!(models.is_empty());
    }

    #[tokio::test]
    async fn test_add_then_load() {
        let dir = tempdir().unwrap();
        let store = AllowlistStore::new(dir.path().join("allowed_models.txt"));

        store.add("gemini-pro").await.unwrap();
        store.add("  gemini-flash  ").await.unwrap();

        let models = store.load().await.unwrap();
        assert!(models.contains("gemini-pro"));
        assert!(models.contains("gemini-flash"));
        assert_eq!(models.len(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_add_keeps_both_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("allowed_models.txt");
        let store = AllowlistStore::new(&path);

        store.add("gemini-pro").await.unwrap();
        store.add("gemini-pro").await.unwrap();

        // 写入不去重
        let raw = std::fs::read_to_string(&path).unwrap();
        assert_eq!(raw.matches("gemini-pro").count(), 2);

        // load 时合并
        let models = store.load().await.unwrap();
        assert_eq!(models.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_exact_match_only() {
        let dir = tempdir().unwrap();
        let store = AllowlistStore::new(dir.path().join("allowed_models.txt"));

        store.add("gemini-pro").await.unwrap();
        store.add("gemini-pro-vision").await.unwrap();
        store.remove("gemini-pro").await.unwrap();

        let models = store.load().await.unwrap();
        assert!(!models.contains("gemini-pro"));
        assert!(models.contains("gemini-pro-vision"));
    }

    #[tokio::test]
    async fn test_remove_on_missing_file_is_noop() {
        let dir = tempdir().unwrap();
        let store = AllowlistStore::new(dir.path().join("allowed_models.txt"));

        store.remove("gemini-pro").await.unwrap();
        assert!(store.load().await.unwrap().is_empty());
    }
}
