//! 图片读取 - 基础设施层
//!
//! 把本地图片文件异步读成 data URL

use crate::error::{AppError, AppResult, FileError};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::path::{Path, PathBuf};

/// 图片读取能力
pub trait ImageReader: Send + Sync {
    /// 读取文件并返回 `data:<mime>;base64,...`
    fn read_data_url(&self, path: PathBuf) -> BoxFuture<'static, AppResult<String>>;
}

/// 基于文件系统的实现
#[derive(Debug, Clone, Default)]
pub struct FsImageReader;

impl ImageReader for FsImageReader {
    fn read_data_url(&self, path: PathBuf) -> BoxFuture<'static, AppResult<String>> {
        async move {
            let bytes = tokio::fs::read(&path).await.map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    AppError::File(FileError::NotFound {
                        path: path.display().to_string(),
                    })
                } else {
                    AppError::file_read_failed(path.display().to_string(), e)
                }
            })?;
            Ok(to_data_url(mime_for(&path), &bytes))
        }
        .boxed()
    }
}

/// 编码为 data URL
pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// 按扩展名推断 MIME 类型
pub fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_data_url() {
        assert_eq!(to_data_url("image/png", b"abc"), "data:image/png;base64,YWJj");
    }

    #[test]
    fn test_mime_for_extension() {
        assert_eq!(mime_for(Path::new("a/b.PNG")), "image/png");
        assert_eq!(mime_for(Path::new("photo.jpeg")), "image/jpeg");
        assert_eq!(mime_for(Path::new("noext")), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_fs_reader_reads_file() {
        let path = std::env::temp_dir().join(format!("eqb-img-{}.gif", std::process::id()));
        std::fs::write(&path, b"GIF89a").unwrap();

        let url = FsImageReader.read_data_url(path.clone()).await.unwrap();
        assert_eq!(url, "data:image/gif;base64,R0lGODlh");

        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn test_fs_reader_missing_file() {
        let result = FsImageReader
            .read_data_url(PathBuf::from("/no/such/image.png"))
            .await;
        assert!(matches!(result, Err(AppError::File(FileError::NotFound { .. }))));
    }
}
