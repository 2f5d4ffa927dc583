//! `.ndjson` Sink
//!
//! 第一行是会话头部对象，之后每个事件一行 JSON 对象。

use crate::core::event::{Log, SessionInfo};
use crate::sinks::file_common::{FileDestination, FileSinkBuilder, FileSinkKind};
use crate::sinks::filter::SinkFilter;
use crate::sinks::format::SinkFormat;
use crate::sinks::json_file::{JsonHeader, JsonLogEntry};
use crate::sinks::traits::{Sink, SinkResult};

/// `.ndjson` 文件 sink 构造器
pub type NdJsonFileSinkBuilder = FileSinkBuilder<NdJsonFileSink>;

/// NDJSON Sink
#[derive(Debug)]
pub struct NdJsonFileSink {
    destination: FileDestination,
    filter: SinkFilter,
    format: SinkFormat,
}

impl NdJsonFileSink {
    /// 创建构造器，交给 `Logger::add_sink` 完成注册
    pub fn builder(path: impl Into<std::path::PathBuf>) -> NdJsonFileSinkBuilder {
        FileSinkBuilder::new(path)
    }

    fn write_line<T: serde::Serialize>(&mut self, value: &T) -> SinkResult<()> {
        let mut line = serde_json::to_vec(value)?;
        line.push(b'\n');
        self.destination.write_all(&line)
    }
}

impl FileSinkKind for NdJsonFileSink {
    const NAME: &'static str = "ndjson_file";
    const EXTENSION_NAME: &'static str = "NDJSON";
    const RECOMMENDED_EXTENSION: &'static str = ".ndjson";

    fn from_destination(destination: FileDestination, filter: SinkFilter, format: SinkFormat) -> Self {
        Self {
            destination,
            filter,
            format,
        }
    }
}

impl Sink for NdJsonFileSink {
    fn write(&mut self, log: &Log) -> SinkResult<()> {
        let entry = JsonLogEntry::new(log, &self.format);
        self.write_line(&entry)
    }

    fn write_header(&mut self, session: &SessionInfo) -> SinkResult<()> {
        let header = JsonHeader::new(session, &self.filter);
        self.write_line(&header)?;
        self.destination.flush()
    }

    fn flush(&mut self) -> SinkResult<()> {
        self.destination.flush()
    }

    fn close(&mut self) -> SinkResult<()> {
        self.destination.close()
    }

    fn filter(&self) -> &SinkFilter {
        &self.filter
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}
