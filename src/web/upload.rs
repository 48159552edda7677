use crate::Result;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// 单次请求的上传临时文件
///
/// 请求结束时调用 `cleanup` 删除；若处理线程 panic，`Drop` 同样会删除文件。
pub struct TempUpload {
    file: NamedTempFile,
}

impl TempUpload {
    /// 写入上传目录，文件名形如 `temp_<random>.<ext>`
    pub fn save(upload_dir: &Path, original_name: Option<&str>, data: &[u8]) -> Result<Self> {
        let suffix = original_name
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{}", ext))
            .unwrap_or_default();

        let mut file = tempfile::Builder::new()
            .prefix("temp_")
            .suffix(&suffix)
            .tempfile_in(upload_dir)?;
        file.write_all(data)?;
        file.flush()?;

        tracing::debug!(
            "Saved upload {:?} to {} ({} bytes)",
            original_name,
            file.path().display(),
            data.len()
        );

        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// 删除临时文件，文件已不存在时忽略
    pub fn cleanup(self) {
        let path: PathBuf = self.file.path().to_path_buf();

        match self.file.close() {
            Ok(()) => tracing::debug!("Removed upload {}", path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Failed to remove upload {}: {}", path.display(), e),
        }
    }
}
