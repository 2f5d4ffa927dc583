//! 文件 Sink 通用功能
//!
//! 此模块提供文件 sink 共享的准入规则与写入器：
//!
//! 1. 推荐扩展名必须以 `.` 开头且至少两个字符
//! 2. 输出路径解析为绝对路径（词法规范化）
//! 3. 解析后的路径必须以推荐扩展名结尾，否则不创建文件
//! 4. 以读写、创建、截断方式打开文件
//!
//! 同一解析路径上的重复注册由引擎在创建之前检查。

use crate::core::level::{Level, LevelMask};
use crate::error::{Result, ShuvlogError};
use crate::sinks::filter::{FilterMode, SinkFilter};
use crate::sinks::format::SinkFormat;
use crate::sinks::traits::{Sink, SinkDescriptor, SinkError, SinkFactory, SinkKind, SinkResult};
use crate::utils::FileTools;
use std::fs::File;
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// 文件 sink 的静态描述
pub trait FileSinkKind: Sink + Sized + 'static {
    /// Sink 名称
    const NAME: &'static str;
    /// 错误信息中使用的格式名称，例如 `JSON`
    const EXTENSION_NAME: &'static str;
    /// 推荐扩展名，例如 `.json`
    const RECOMMENDED_EXTENSION: &'static str;

    /// 由已打开的输出文件构造 sink
    fn from_destination(destination: FileDestination, filter: SinkFilter, format: SinkFormat) -> Self;
}

/// 文件 sink 构造器
///
/// 过滤器在 `descriptor` 阶段校验，之后才检查路径并打开文件。
#[derive(Debug)]
pub struct FileSinkBuilder<S> {
    path: PathBuf,
    mode: FilterMode,
    mask: LevelMask,
    format: SinkFormat,
    _sink: PhantomData<fn() -> S>,
}

impl<S: FileSinkKind> FileSinkBuilder<S> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            mode: FilterMode::AcceptAll,
            mask: LevelMask::ALL,
            format: SinkFormat::plain(),
            _sink: PhantomData,
        }
    }

    /// 设置过滤模式与级别掩码
    pub fn filter(mut self, mode: FilterMode, mask: impl Into<LevelMask>) -> Self {
        self.mode = mode;
        self.mask = mask.into();
        self
    }

    /// 只接收不低于 `level` 的事件
    pub fn minimum_level(self, level: Level) -> Self {
        self.filter(FilterMode::MinimumLevel, level)
    }

    /// 设置格式
    pub fn format(mut self, format: SinkFormat) -> Self {
        self.format = format;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn validated_filter(&self) -> Result<SinkFilter> {
        SinkFilter::new(self.mode, self.mask)
    }
}

impl<S: FileSinkKind> SinkFactory for FileSinkBuilder<S> {
    type Output = S;

    fn descriptor(&self) -> Result<SinkDescriptor> {
        self.validated_filter()?;
        let path = resolve_destination(&self.path, S::EXTENSION_NAME, S::RECOMMENDED_EXTENSION)?;
        Ok(SinkDescriptor::new(S::NAME, SinkKind::File(path)))
    }

    fn create(self) -> Result<S> {
        let filter = self.validated_filter()?;
        let destination =
            FileDestination::open(&self.path, S::EXTENSION_NAME, S::RECOMMENDED_EXTENSION)?;
        Ok(S::from_destination(destination, filter, self.format))
    }
}

/// 校验推荐扩展名并解析输出路径
///
/// 无副作用，sink 工厂的 `descriptor` 与 `create` 都会调用。
pub fn resolve_destination(
    path: &Path,
    extension_name: &str,
    recommended_extension: &str,
) -> Result<PathBuf> {
    if !recommended_extension.starts_with('.') || recommended_extension.len() < 2 {
        return Err(ShuvlogError::BadRecommendedExtension(
            recommended_extension.to_string(),
        ));
    }

    let absolute = FileTools::absolute_path(path)?;
    if !absolute.to_string_lossy().ends_with(recommended_extension) {
        return Err(ShuvlogError::BadFileExtension {
            extension_name: extension_name.to_string(),
            recommended: recommended_extension.to_string(),
            path: path.to_path_buf(),
        });
    }

    Ok(absolute)
}

/// 已通过准入检查的输出文件
///
/// 封装缓冲写入器，并记录关闭状态
#[derive(Debug)]
pub struct FileDestination {
    /// 解析后的绝对路径
    path: PathBuf,
    /// 文件写入器，关闭后为 `None`
    writer: Option<BufWriter<File>>,
}

impl FileDestination {
    /// 完成准入检查并打开输出文件
    pub fn open(
        path: impl AsRef<Path>,
        extension_name: &str,
        recommended_extension: &str,
    ) -> Result<Self> {
        let user_path = path.as_ref();
        let absolute = resolve_destination(user_path, extension_name, recommended_extension)?;

        let file = FileTools::open_truncated(&absolute).map_err(|source| {
            ShuvlogError::CouldNotOpenFile {
                path: user_path.to_path_buf(),
                source,
            }
        })?;

        Ok(Self {
            path: absolute,
            writer: Some(FileTools::create_buffered_writer(file, None)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_closed(&self) -> bool {
        self.writer.is_none()
    }

    fn writer(&mut self) -> SinkResult<&mut BufWriter<File>> {
        self.writer.as_mut().ok_or(SinkError::Closed)
    }

    /// 写入全部字节
    pub fn write_all(&mut self, data: &[u8]) -> SinkResult<()> {
        self.writer()?.write_all(data)?;
        Ok(())
    }

    /// 定位写入位置，会先刷新缓冲区
    pub fn seek(&mut self, position: SeekFrom) -> SinkResult<u64> {
        Ok(self.writer()?.seek(position)?)
    }

    /// 刷新缓冲区
    pub fn flush(&mut self) -> SinkResult<()> {
        self.writer()?.flush()?;
        Ok(())
    }

    /// 刷新并关闭文件，之后的写入返回 [`SinkError::Closed`]
    pub fn close(&mut self) -> SinkResult<()> {
        match self.writer.take() {
            Some(mut writer) => {
                writer.flush()?;
                writer.get_ref().sync_all()?;
                Ok(())
            }
            None => Ok(()),
        }
    }
}
