//! shuvlog Sink Traits
//!
//! 定义了统一的 Sink 接口，允许开发者实现自定义的日志输出目标。
//!
//! # 架构设计
//!
//! - `Sink`: 对象安全的输出目标接口，由引擎以 `Arc<Mutex<dyn Sink>>` 持有
//! - `SinkFactory`: 两阶段构造。`descriptor` 无副作用地描述输出目标，
//!   引擎据此完成冲突检查后才调用 `create` 打开文件
//!
//! # 生命周期
//!
//! `Constructed → Active → Closed`。`write_header` 对每个实例恰好调用一次，
//! `close` 在关闭时恰好调用一次，之后的写入返回 [`SinkError::Closed`]。
//!
//! # 使用示例
//!
//! ```rust
//! use shuvlog::core::event::{Log, SessionInfo};
//! use shuvlog::sinks::filter::SinkFilter;
//! use shuvlog::sinks::traits::{Sink, SinkDescriptor, SinkFactory, SinkKind, SinkResult};
//!
//! #[derive(Debug)]
//! struct CountingSink {
//!     filter: SinkFilter,
//!     count: usize,
//! }
//!
//! impl Sink for CountingSink {
//!     fn write(&mut self, _log: &Log) -> SinkResult<()> {
//!         self.count += 1;
//!         Ok(())
//!     }
//!
//!     fn write_header(&mut self, _session: &SessionInfo) -> SinkResult<()> {
//!         Ok(())
//!     }
//!
//!     fn flush(&mut self) -> SinkResult<()> {
//!         Ok(())
//!     }
//!
//!     fn close(&mut self) -> SinkResult<()> {
//!         Ok(())
//!     }
//!
//!     fn filter(&self) -> &SinkFilter {
//!         &self.filter
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "counting"
//!     }
//! }
//!
//! impl SinkFactory for CountingSink {
//!     type Output = CountingSink;
//!
//!     fn descriptor(&self) -> shuvlog::Result<SinkDescriptor> {
//!         Ok(SinkDescriptor::new("counting", SinkKind::Memory))
//!     }
//!
//!     fn create(self) -> shuvlog::Result<CountingSink> {
//!         Ok(self)
//!     }
//! }
//! ```

use crate::core::event::{Log, SessionInfo};
use crate::core::level::Level;
use crate::error::Result;
use crate::sinks::filter::SinkFilter;
use std::fmt::{self, Debug};
use std::path::{Path, PathBuf};

/// 日志输出目标
///
/// 每个实例由引擎放在独立的互斥锁之后，因此实现不需要内部同步。
pub trait Sink: Send + Debug {
    /// 写入一条已通过过滤的事件
    fn write(&mut self, log: &Log) -> SinkResult<()>;

    /// 写入会话头部
    fn write_header(&mut self, session: &SessionInfo) -> SinkResult<()>;

    /// 将缓冲的输出落盘
    fn flush(&mut self) -> SinkResult<()>;

    /// 关闭输出目标，不可逆
    fn close(&mut self) -> SinkResult<()>;

    /// 当前过滤器
    fn filter(&self) -> &SinkFilter;

    /// 该级别是否应被写入
    fn should_log(&self, level: Level) -> bool {
        self.filter().should_log(level)
    }

    /// 获取 sink 的名称
    ///
    /// 用于日志和调试目的
    fn name(&self) -> &'static str;
}

/// Sink 工厂 trait
///
/// 用于创建 sink 实例的工厂接口
pub trait SinkFactory {
    type Output: Sink + 'static;

    /// 描述输出目标，不能有副作用
    fn descriptor(&self) -> Result<SinkDescriptor>;

    /// 完成准入检查并创建 sink 实例
    fn create(self) -> Result<Self::Output>;
}

/// 输出目标种类
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SinkKind {
    /// 进程的标准输出/标准错误，全局唯一
    Console,
    /// 文件，按解析后的绝对路径判重
    File(PathBuf),
    /// 进程内存，不参与判重
    Memory,
}

/// Sink 描述信息
///
/// 在 sink 创建之前生成，用于注册时的冲突检查
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkDescriptor {
    /// Sink 名称
    pub name: &'static str,
    /// 输出目标
    pub kind: SinkKind,
}

impl SinkDescriptor {
    pub fn new(name: &'static str, kind: SinkKind) -> Self {
        Self { name, kind }
    }

    pub fn is_console(&self) -> bool {
        matches!(self.kind, SinkKind::Console)
    }

    pub fn file_path(&self) -> Option<&Path> {
        match &self.kind {
            SinkKind::File(path) => Some(path),
            _ => None,
        }
    }
}

impl fmt::Display for SinkDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            SinkKind::Console => write!(f, "{} (console)", self.name),
            SinkKind::File(path) => write!(f, "{} ({})", self.name, path.display()),
            SinkKind::Memory => write!(f, "{} (memory)", self.name),
        }
    }
}

/// 通用 Sink 错误类型
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// I/O 错误
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// 序列化错误
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 通用错误
    #[error("Generic error: {0}")]
    Generic(String),

    /// Sink 已关闭
    #[error("Sink is closed")]
    Closed,
}

/// Sink 结果类型
pub type SinkResult<T> = std::result::Result<T, SinkError>;
