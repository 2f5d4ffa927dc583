//! shuvlog Sinks 模块
//!
//! 提供日志输出目标的实现：控制台、纯文本日志文件、JSON 文件、NDJSON 文件，
//! 以及用于测试与嵌入的内存 sink。所有 sink 实现 [`Sink`]，通过
//! [`SinkFactory`] 交给引擎注册。

pub mod console;
pub mod file_common;
pub mod filter;
pub mod format;
pub mod json_file;
pub mod log_file;
pub mod memory;
pub mod ndjson_file;
pub mod traits;

// 重新导出主要类型
pub use console::ConsoleSink;
pub use file_common::{FileSinkBuilder, FileSinkKind};
pub use filter::{FilterMode, SinkFilter};
pub use format::SinkFormat;
pub use json_file::{JsonFileSink, JsonFileSinkBuilder};
pub use log_file::{LogFileSink, LogFileSinkBuilder};
pub use memory::{MemorySink, MemorySinkHandle};
pub use ndjson_file::{NdJsonFileSink, NdJsonFileSinkBuilder};
pub use traits::{Sink, SinkDescriptor, SinkError, SinkFactory, SinkKind, SinkResult};
