//! tracing 桥接层
//!
//! 把 `tracing` 事件转换为 [`Log`](crate::core::event::Log) 并交给引擎，使依赖库
//! 通过 `tracing` 宏输出的日志也进入同一组 sink。级别映射：
//!
//! | tracing | shuvlog   |
//! |---------|-----------|
//! | TRACE   | DEBUG     |
//! | DEBUG   | DEBUG     |
//! | INFO    | INFO      |
//! | WARN    | WARNING   |
//! | ERROR   | ERROR     |

use crate::core::engine::Logger;
use crate::core::event::SourceLocation;
use crate::core::level::Level;
use std::fmt::{self, Write as _};
use tracing_core::field::{Field, Visit};
use tracing_core::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

/// 引擎自身的诊断输出使用此前缀的 target，不会被回送到 sink
const INTERNAL_TARGET_PREFIX: &str = "shuvlog";

/// 将 tracing 事件转发给 [`Logger`] 的层
#[derive(Debug, Clone, Copy)]
pub struct ShuvlogLayer {
    logger: &'static Logger,
}

impl ShuvlogLayer {
    pub fn new(logger: &'static Logger) -> Self {
        Self { logger }
    }

    /// 转发到全局引擎
    pub fn global() -> Self {
        Self::new(crate::logger())
    }
}

impl Default for ShuvlogLayer {
    fn default() -> Self {
        Self::global()
    }
}

/// tracing 级别映射
pub fn map_level(level: &tracing_core::Level) -> Level {
    match *level {
        tracing_core::Level::TRACE | tracing_core::Level::DEBUG => Level::Debug,
        tracing_core::Level::INFO => Level::Info,
        tracing_core::Level::WARN => Level::Warning,
        tracing_core::Level::ERROR => Level::Error,
    }
}

/// 收集 `message` 字段，其余字段以 `key=value` 追加在消息之后
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn push_field(&mut self, field: &Field, value: fmt::Arguments<'_>) {
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{}={}", field.name(), value);
    }

    fn finish(self) -> String {
        match (self.message.is_empty(), self.fields.is_empty()) {
            (_, true) => self.message,
            (true, false) => self.fields,
            (false, false) => format!("{} {}", self.message, self.fields),
        }
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            self.push_field(field, format_args!("{:?}", value));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            self.push_field(field, format_args!("{:?}", value));
        }
    }
}

impl<S> Layer<S> for ShuvlogLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if metadata.target().starts_with(INTERNAL_TARGET_PREFIX) {
            return;
        }

        let level = map_level(metadata.level());
        if !self.logger.is_initialized() || level < self.logger.minimum_level() {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let location = SourceLocation::new(
            metadata.file().unwrap_or("<unknown>"),
            metadata.line().unwrap_or(0),
            0,
            metadata.module_path(),
        );
        self.logger.log(level, location, visitor.finish());
    }
}
