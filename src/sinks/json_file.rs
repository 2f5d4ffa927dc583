//! `.json` 文档 Sink
//!
//! 整个文件是一个 JSON 对象：会话头部字段在前，`logs` 数组在最后。每次写入
//! 都回退到结尾的 `]}` 之前追加一条记录，因此文件在任意两次写入之间都是
//! 合法的 JSON 文档。

use crate::core::event::{Log, SessionInfo};
use crate::core::level::Level;
use crate::sinks::file_common::{FileDestination, FileSinkBuilder, FileSinkKind};
use crate::sinks::filter::{FilterMode, SinkFilter};
use crate::sinks::format::SinkFormat;
use crate::sinks::traits::{Sink, SinkError, SinkResult};
use crate::utils::timestamp::{format_timestamp, TimestampStyle};
use serde::Serialize;
use std::io::SeekFrom;

/// `.json` 文件 sink 构造器
pub type JsonFileSinkBuilder = FileSinkBuilder<JsonFileSink>;

const DOCUMENT_TAIL: &[u8] = b"]}";

/// 会话头部的 JSON 表示，字段顺序即输出顺序
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonHeader<'a> {
    project_name: &'a str,
    version: &'a str,
    build_type: &'a str,
    filter_mode: &'static str,
    level_mask: serde_json::Value,
    command: String,
    start_time: String,
    os_name: &'a str,
    kernel_version: &'a str,
    hostname: &'a str,
    compiler: &'a str,
    compilation_flags: &'a str,
    build_system: &'a str,
}

impl<'a> JsonHeader<'a> {
    pub(crate) fn new(session: &'a SessionInfo, filter: &SinkFilter) -> Self {
        let build = &session.build_info;
        Self {
            project_name: &session.project_name,
            version: &build.version,
            build_type: &build.build_type,
            filter_mode: filter.mode().name(),
            level_mask: level_mask_value(filter),
            command: session.command_line(),
            start_time: format_timestamp(&session.start_time, TimestampStyle::default()),
            os_name: &session.os_name,
            kernel_version: &session.kernel_version,
            hostname: &session.hostname,
            compiler: &build.compiler,
            compilation_flags: &build.compiler_flags,
            build_system: &build.build_system,
        }
    }
}

/// MinimumLevel 为阈值名称，ExplicitMask 为级别名称数组，AcceptAll 为空字符串
fn level_mask_value(filter: &SinkFilter) -> serde_json::Value {
    match filter.mode() {
        FilterMode::AcceptAll => serde_json::Value::String(String::new()),
        FilterMode::MinimumLevel => serde_json::Value::String(filter.mask().to_string()),
        FilterMode::ExplicitMask => serde_json::Value::Array(
            filter
                .mask()
                .levels()
                .into_iter()
                .map(|level| serde_json::Value::String(level.name().to_string()))
                .collect(),
        ),
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct JsonThread<'a> {
    name: &'a str,
    id: String,
}

/// 单条事件的 JSON 表示
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JsonLogEntry<'a> {
    timestamp: String,
    level: &'static str,
    thread: JsonThread<'a>,
    source: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    module: Option<&'static str>,
    line: u32,
    column: u32,
    message: &'a str,
}

impl<'a> JsonLogEntry<'a> {
    pub(crate) fn new(log: &'a Log, format: &SinkFormat) -> Self {
        let location = log.location();
        Self {
            timestamp: format_timestamp(&log.timestamp(), format.timestamp_style()),
            level: Level::name(log.level()),
            thread: JsonThread {
                name: log.thread_label(),
                id: log.thread_id().to_string(),
            },
            source: location.file_name(),
            module: location.module_path,
            line: location.line,
            column: location.column,
            message: log.message(),
        }
    }
}

/// JSON 文档 Sink
#[derive(Debug)]
pub struct JsonFileSink {
    destination: FileDestination,
    filter: SinkFilter,
    format: SinkFormat,
    header_written: bool,
    has_entries: bool,
}

impl JsonFileSink {
    /// 创建构造器，交给 `Logger::add_sink` 完成注册
    pub fn builder(path: impl Into<std::path::PathBuf>) -> JsonFileSinkBuilder {
        FileSinkBuilder::new(path)
    }
}

impl FileSinkKind for JsonFileSink {
    const NAME: &'static str = "json_file";
    const EXTENSION_NAME: &'static str = "JSON";
    const RECOMMENDED_EXTENSION: &'static str = ".json";

    fn from_destination(destination: FileDestination, filter: SinkFilter, format: SinkFormat) -> Self {
        Self {
            destination,
            filter,
            format,
            header_written: false,
            has_entries: false,
        }
    }
}

impl Sink for JsonFileSink {
    fn write(&mut self, log: &Log) -> SinkResult<()> {
        if self.destination.is_closed() {
            return Err(SinkError::Closed);
        }
        if !self.header_written {
            return Err(SinkError::Generic(
                "JSON document has no header yet".to_string(),
            ));
        }

        let entry = serde_json::to_vec(&JsonLogEntry::new(log, &self.format))?;

        self.destination
            .seek(SeekFrom::End(-(DOCUMENT_TAIL.len() as i64)))?;
        if self.has_entries {
            self.destination.write_all(b",")?;
        }
        self.destination.write_all(&entry)?;
        self.destination.write_all(DOCUMENT_TAIL)?;
        self.has_entries = true;
        Ok(())
    }

    fn write_header(&mut self, session: &SessionInfo) -> SinkResult<()> {
        let mut document = serde_json::to_string(&JsonHeader::new(session, &self.filter))?;
        // 去掉结尾的 `}`，追加空的 logs 数组
        document.pop();
        document.push_str(",\"logs\":[]}");

        self.destination.write_all(document.as_bytes())?;
        self.destination.flush()?;
        self.header_written = true;
        Ok(())
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
