//! 文件工具模块
//!
//! 提供文件 sink 使用的实用工具函数，包括目录创建、路径规范化、
//! 输出文件打开与日志文件名生成。

use crate::error::{Result, ShuvlogError};
use crate::utils::timestamp;
use std::fs::{self, File, OpenOptions};
use std::io::BufWriter;
use std::path::{Component, Path, PathBuf};

/// 文件工具结构体
///
/// 提供各种文件操作的静态方法
pub struct FileTools;

impl FileTools {
    /// 确保目录存在，如果不存在则创建
    ///
    /// # 参数
    ///
    /// * `path` - 目录路径
    ///
    /// # 返回值
    ///
    /// 成功时返回 `Ok(())`，路径存在但不是目录或创建失败时返回错误
    pub fn ensure_directory_exists<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();

        if !path.exists() {
            fs::create_dir_all(path)?;
        } else if !path.is_dir() {
            return Err(ShuvlogError::IoError {
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("路径存在但不是目录: {}", path.display()),
                ),
            });
        }

        Ok(())
    }

    /// 将路径解析为绝对路径并做词法规范化
    ///
    /// 相对路径以当前工作目录为基准；去掉 `.`，`..` 抵消前一个普通组件。
    /// 不访问文件系统，因此对尚不存在的文件同样适用。
    pub fn absolute_path<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
        let path = path.as_ref();
        let joined = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };
        Ok(Self::normalize_lexically(&joined))
    }

    /// 词法规范化，不解析符号链接
    pub fn normalize_lexically(path: &Path) -> PathBuf {
        let mut normalized = PathBuf::new();
        for component in path.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    if matches!(normalized.components().next_back(), Some(Component::Normal(_))) {
                        normalized.pop();
                    } else if !normalized.has_root() {
                        normalized.push("..");
                    }
                }
                other => normalized.push(other.as_os_str()),
            }
        }
        normalized
    }

    /// 以读写方式打开输出文件，不存在则创建，存在则截断
    pub fn open_truncated<P: AsRef<Path>>(file_path: P) -> std::io::Result<File> {
        OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(file_path)
    }

    /// 创建带缓冲的文件写入器
    ///
    /// # 参数
    ///
    /// * `file` - 文件句柄
    /// * `buffer_size` - 缓冲区大小（可选，默认为8KB）
    pub fn create_buffered_writer(file: File, buffer_size: Option<usize>) -> BufWriter<File> {
        match buffer_size {
            Some(size) => BufWriter::with_capacity(size, file),
            None => BufWriter::new(file),
        }
    }

    /// 生成 `{project}_{timestamp}.{extension}` 形式的日志文件名
    ///
    /// `extension` 可以带或不带前导 `.`。
    pub fn generate_log_file_name(project_name: &str, extension: &str) -> String {
        let stamp = timestamp::file_safe_timestamp(&chrono::Local::now());
        format!(
            "{}_{}.{}",
            project_name,
            stamp,
            extension.trim_start_matches('.')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_directory_exists() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");

        assert!(FileTools::ensure_directory_exists(&nested).is_ok());
        assert!(nested.is_dir());

        // 已存在的目录
        assert!(FileTools::ensure_directory_exists(&nested).is_ok());

        // 路径存在但是文件
        let file = temp_dir.path().join("plain.txt");
        fs::write(&file, b"x").unwrap();
        assert!(FileTools::ensure_directory_exists(&file).is_err());
    }

    #[test]
    fn test_normalize_lexically() {
        assert_eq!(
            FileTools::normalize_lexically(Path::new("/var/log/./app/../out.log")),
            PathBuf::from("/var/log/out.log")
        );
        assert_eq!(
            FileTools::normalize_lexically(Path::new("/../out.log")),
            PathBuf::from("/out.log")
        );
    }

    #[test]
    fn test_absolute_path_for_relative_input() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(FileTools::absolute_path("out.log").unwrap(), cwd.join("out.log"));
        assert_eq!(
            FileTools::absolute_path("./out.log").unwrap(),
            FileTools::absolute_path("out.log").unwrap()
        );
    }

    #[test]
    fn test_open_truncated_replaces_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.log");
        fs::write(&path, b"previous content").unwrap();

        let mut file = FileTools::open_truncated(&path).unwrap();
        file.write_all(b"new").unwrap();
        drop(file);

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_generate_log_file_name() {
        let name = FileTools::generate_log_file_name("demo", ".ndjson");
        assert!(name.starts_with("demo_"));
        assert!(name.ends_with(".ndjson"));
        assert!(!name.contains(':'));
        assert!(!name.contains(".."));
    }
}
