//! 文本行格式化
//!
//! 控制台与 `.log` 文件共用的单行渲染，形如
//! `2025-01-31 14:03:07.042 [MainThread (4242)]     INFO: message (main.rs:12:5)`。
//! 级别名右对齐到 8 个字符（`CRITICAL` 的长度）。

use crate::core::event::Log;
use crate::utils::timestamp::{format_timestamp, TimestampStyle};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

const LEVEL_WIDTH: usize = 8;

/// Sink 格式化设置，只影响呈现，与过滤无关
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SinkFormat {
    /// 显示时间戳
    pub show_timestamp: bool,
    /// 只显示时间部分
    pub time_only: bool,
    /// 显示毫秒
    pub show_milliseconds: bool,
    /// 显示线程标签
    pub show_thread_name: bool,
    /// 显示线程 ID
    pub show_thread_id: bool,
    /// 显示源文件
    pub show_source: bool,
    /// 显示行号
    pub show_line: bool,
    /// 显示列号
    pub show_column: bool,
    /// 显示模块路径
    pub show_module: bool,
    /// 彩色级别名
    pub colored: bool,
}

impl Default for SinkFormat {
    fn default() -> Self {
        Self {
            show_timestamp: true,
            time_only: false,
            show_milliseconds: true,
            show_thread_name: true,
            show_thread_id: true,
            show_source: true,
            show_line: true,
            show_column: true,
            show_module: false,
            colored: false,
        }
    }
}

impl SinkFormat {
    /// 控制台默认格式：彩色，不显示线程 ID 与列号
    pub fn console() -> Self {
        Self {
            show_thread_id: false,
            show_column: false,
            colored: true,
            ..Self::default()
        }
    }

    /// 无颜色的完整格式
    pub fn plain() -> Self {
        Self::default()
    }

    pub fn timestamp_style(&self) -> TimestampStyle {
        TimestampStyle {
            time_only: self.time_only,
            milliseconds: self.show_milliseconds,
        }
    }

    /// 渲染一行（不含换行符）
    pub fn render_line(&self, log: &Log) -> String {
        let mut line = String::with_capacity(64 + log.message().len());

        if self.show_timestamp {
            line.push_str(&format_timestamp(&log.timestamp(), self.timestamp_style()));
            line.push(' ');
        }

        match (self.show_thread_name, self.show_thread_id) {
            (true, true) => {
                let _ = write!(line, "[{} ({})] ", log.thread_label(), log.thread_id());
            }
            (true, false) => {
                let _ = write!(line, "[{}] ", log.thread_label());
            }
            (false, true) => {
                let _ = write!(line, "[{}] ", log.thread_id());
            }
            (false, false) => {}
        }

        let level = log.level();
        let padded = format!("{:>width$}", level.name(), width = LEVEL_WIDTH);
        match level.color().filter(|_| self.colored) {
            Some(color) => {
                let _ = write!(line, "{}", padded.color(color).bold());
            }
            None => line.push_str(&padded),
        }
        line.push_str(": ");
        line.push_str(log.message());

        if let Some(suffix) = self.location_suffix(log) {
            line.push_str(" (");
            line.push_str(&suffix);
            line.push(')');
        }

        line
    }

    fn location_suffix(&self, log: &Log) -> Option<String> {
        let location = log.location();
        let mut parts = Vec::new();

        if self.show_module {
            if let Some(module) = location.module_path {
                parts.push(module.to_string());
            }
        }

        if self.show_source {
            let mut source = location.file_name().to_string();
            if self.show_line {
                let _ = write!(source, ":{}", location.line);
                if self.show_column {
                    let _ = write!(source, ":{}", location.column);
                }
            }
            parts.push(source);
        }

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}
