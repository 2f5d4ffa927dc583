//! 控制台输出 Sink 实现
//!
//! 提供将日志事件输出到标准输出或标准错误的功能，支持彩色输出和级别过滤。
//! `ERROR` 及以上级别写入标准错误，其余写入标准输出。进程内只允许注册一个
//! 控制台 sink。

use crate::core::event::{Log, SessionInfo};
use crate::error::Result;
use crate::sinks::filter::SinkFilter;
use crate::sinks::format::SinkFormat;
use crate::sinks::traits::{Sink, SinkDescriptor, SinkError, SinkFactory, SinkKind, SinkResult};
use std::io::{self, Write};

/// 控制台输出 Sink
#[derive(Debug)]
pub struct ConsoleSink {
    filter: SinkFilter,
    format: SinkFormat,
    closed: bool,
}

impl ConsoleSink {
    /// 创建新的控制台 Sink
    pub fn new() -> Self {
        Self::with_filter(SinkFilter::accept_all())
    }

    pub fn with_filter(filter: SinkFilter) -> Self {
        Self {
            filter,
            format: SinkFormat::console(),
            closed: false,
        }
    }

    /// 设置格式
    pub fn with_format(mut self, format: SinkFormat) -> Self {
        self.format = format;
        self
    }

    /// 获取格式
    pub fn format(&self) -> &SinkFormat {
        &self.format
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for ConsoleSink {
    fn write(&mut self, log: &Log) -> SinkResult<()> {
        if self.closed {
            return Err(SinkError::Closed);
        }

        let mut line = self.format.render_line(log);
        line.push('\n');

        if log.level().is_error_class() {
            io::stderr().lock().write_all(line.as_bytes())?;
        } else {
            io::stdout().lock().write_all(line.as_bytes())?;
        }
        Ok(())
    }

    fn write_header(&mut self, _session: &SessionInfo) -> SinkResult<()> {
        Ok(())
    }

    fn flush(&mut self) -> SinkResult<()> {
        io::stdout().flush()?;
        io::stderr().flush()?;
        Ok(())
    }

    fn close(&mut self) -> SinkResult<()> {
        if !self.closed {
            self.closed = true;
            let _ = io::stdout().flush();
            let _ = io::stderr().flush();
        }
        Ok(())
    }

    fn filter(&self) -> &SinkFilter {
        &self.filter
    }

    fn name(&self) -> &'static str {
        "console"
    }
}

impl SinkFactory for ConsoleSink {
    type Output = ConsoleSink;

    fn descriptor(&self) -> Result<SinkDescriptor> {
        Ok(SinkDescriptor::new("console", SinkKind::Console))
    }

    fn create(self) -> Result<ConsoleSink> {
        Ok(self)
    }
}
