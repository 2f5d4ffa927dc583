//! `.log` 文本文件 Sink
//!
//! 头部为带边框的会话信息表，随后每个事件一行。

use crate::core::event::{Log, SessionInfo};
use crate::sinks::file_common::{FileDestination, FileSinkBuilder, FileSinkKind};
use crate::sinks::filter::SinkFilter;
use crate::sinks::format::SinkFormat;
use crate::sinks::traits::{Sink, SinkResult};
use crate::utils::timestamp::{format_timestamp, TimestampStyle};
use std::fmt::Write;

/// `.log` 文件 sink 构造器
pub type LogFileSinkBuilder = FileSinkBuilder<LogFileSink>;

const BORDER: &str = "*************************************************";

/// 文本文件 Sink
#[derive(Debug)]
pub struct LogFileSink {
    destination: FileDestination,
    filter: SinkFilter,
    format: SinkFormat,
}

impl LogFileSink {
    /// 创建构造器，交给 `Logger::add_sink` 完成注册
    pub fn builder(path: impl Into<std::path::PathBuf>) -> LogFileSinkBuilder {
        FileSinkBuilder::new(path)
    }

    fn render_header(&self, session: &SessionInfo) -> String {
        let build = &session.build_info;
        let rows: [Option<(&str, String)>; 14] = [
            None,
            Some(("Project", session.project_name.clone())),
            Some(("Version", build.version.clone())),
            Some(("Build type", build.build_type.clone())),
            Some(("Filter", self.filter.to_string())),
            None,
            Some(("Command", session.command_line())),
            Some((
                "Start time",
                format_timestamp(&session.start_time, TimestampStyle::default()),
            )),
            None,
            Some(("OS", format!("{} {}", session.os_name, session.kernel_version))),
            Some(("Host", session.hostname.clone())),
            Some(("Compiler", build.compiler.clone())),
            Some(("Compilation flags", build.compiler_flags.clone())),
            Some(("Build system", build.build_system.clone())),
        ];

        let key_width = rows
            .iter()
            .flatten()
            .map(|(key, _)| key.len())
            .max()
            .unwrap_or(0);

        let mut header = format!("/{}\n", BORDER);
        for row in &rows {
            match row {
                Some((key, value)) => {
                    let _ = writeln!(header, "|   {:<width$}  :  {}", key, value, width = key_width);
                }
                None => header.push_str("|\n"),
            }
        }
        header.push_str("|\n");
        let _ = write!(header, "\\{}\n\n", BORDER);
        header
    }
}

impl FileSinkKind for LogFileSink {
    const NAME: &'static str = "log_file";
    const EXTENSION_NAME: &'static str = "Log";
    const RECOMMENDED_EXTENSION: &'static str = ".log";

    fn from_destination(destination: FileDestination, filter: SinkFilter, format: SinkFormat) -> Self {
        Self {
            destination,
            filter,
            format: SinkFormat {
                colored: false,
                ..format
            },
        }
    }
}

impl Sink for LogFileSink {
    fn write(&mut self, log: &Log) -> SinkResult<()> {
        let mut line = self.format.render_line(log);
        line.push('\n');
        self.destination.write_all(line.as_bytes())
    }

    fn write_header(&mut self, session: &SessionInfo) -> SinkResult<()> {
        let header = self.render_header(session);
        self.destination.write_all(header.as_bytes())?;
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
