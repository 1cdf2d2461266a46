use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// 上传图片在媒体目录下的子目录名
pub const IMAGE_DIR: &str = "article_images";

/// 媒体文件存储
///
/// 负责归一化图片的落盘和公开 URL 的拼接。
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
    url_prefix: String,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            url_prefix: url_prefix.into(),
        }
    }

    /// 从环境变量 `MEDIA_ROOT` 和 `MEDIA_URL` 构建，缺省为 `media` 和 `/media/`
    pub fn from_env() -> Self {
        Self::new(
            env::var("MEDIA_ROOT").unwrap_or_else(|_| "media".to_string()),
            env::var("MEDIA_URL").unwrap_or_else(|_| "/media/".to_string()),
        )
    }

    /// 按原始文件名保存归一化字节，返回相对媒体目录的路径
    ///
    /// 同名文件直接覆盖，后写的胜出。
    pub fn save(&self, filename: &str, bytes: &[u8]) -> Result<String> {
        // 只取文件名部分，丢弃客户端可能带上的目录
        let filename = Path::new(filename)
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or(Error::FormatError("invalid upload file name"))?;

        let dir = self.root.join(IMAGE_DIR);
        std::fs::create_dir_all(&dir)?;
        std::fs::write(dir.join(filename), bytes)?;

        Ok(format!("{IMAGE_DIR}/{filename}"))
    }

    /// 相对路径对应的公开 URL
    pub fn url(&self, relative: &str) -> String {
        format!("{}{}", self.url_prefix, relative)
    }

    /// 判断某个媒体 URL 指向的文件是否存在于磁盘
    pub fn exists_for_url(&self, url: &str) -> bool {
        let relative = url
            .strip_prefix(&self.url_prefix)
            .unwrap_or(url)
            .trim_start_matches('/');
        self.root.join(relative).is_file()
    }
}
