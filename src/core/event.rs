//! shuvlog 事件定义
//!
//! 此模块定义了引擎中流转的核心数据结构：日志事件 [`Log`]、调用点
//! [`SourceLocation`] 以及写入每个 sink 头部的会话信息 [`SessionInfo`]。

use crate::core::level::Level;
use crate::core::thread;
use crate::utils::background_info;
use crate::utils::build_info::BuildInfo;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::panic::Location;

/// 日志调用点
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SourceLocation {
    /// 源文件
    pub file: &'static str,
    /// 行号
    pub line: u32,
    /// 列号
    pub column: u32,
    /// 模块路径（通过宏捕获时可用）
    pub module_path: Option<&'static str>,
}

impl SourceLocation {
    pub const fn new(
        file: &'static str,
        line: u32,
        column: u32,
        module_path: Option<&'static str>,
    ) -> Self {
        Self {
            file,
            line,
            column,
            module_path,
        }
    }

    /// 捕获调用者位置
    #[track_caller]
    pub fn caller() -> Self {
        Self::from(Location::caller())
    }

    /// 仅保留文件名部分，用于紧凑输出
    pub fn file_name(&self) -> &'static str {
        self.file
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(self.file)
    }
}

impl From<&'static Location<'static>> for SourceLocation {
    fn from(location: &'static Location<'static>) -> Self {
        Self::new(location.file(), location.line(), location.column(), None)
    }
}

/// 日志事件
///
/// 在 `Logger::log` 中构造一次，之后不可变。级别永远是单一比特位。
#[derive(Debug, Clone)]
pub struct Log {
    message: String,
    level: Level,
    location: SourceLocation,
    thread_id: u64,
    thread_label: String,
    timestamp: DateTime<Local>,
}

impl Log {
    /// 以当前线程和当前时间创建事件
    pub fn new(level: Level, location: SourceLocation, message: String) -> Self {
        Self {
            message,
            level,
            location,
            thread_id: background_info::get_tid(),
            thread_label: thread::thread_label(),
            timestamp: Local::now(),
        }
    }

    /// 以显式字段创建事件，主要用于测试与回放
    pub fn with_details(
        level: Level,
        location: SourceLocation,
        message: String,
        thread_id: u64,
        thread_label: String,
        timestamp: DateTime<Local>,
    ) -> Self {
        Self {
            message,
            level,
            location,
            thread_id,
            thread_label,
            timestamp,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    pub fn thread_id(&self) -> u64 {
        self.thread_id
    }

    pub fn thread_label(&self) -> &str {
        &self.thread_label
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }
}

/// 会话信息
///
/// `initialize` 时生成一次，写入每个 sink 的头部。
#[derive(Debug, Clone)]
pub struct SessionInfo {
    /// 项目名称
    pub project_name: String,
    /// 启动命令行
    pub command: Vec<String>,
    /// 构建信息
    pub build_info: BuildInfo,
    /// 会话开始时间
    pub start_time: DateTime<Local>,
    /// 操作系统名称
    pub os_name: String,
    /// 内核版本描述
    pub kernel_version: String,
    /// 主机名
    pub hostname: String,
}

impl SessionInfo {
    /// 以当前主机信息创建会话信息
    pub fn new(project_name: impl Into<String>, command: Vec<String>, build_info: BuildInfo) -> Self {
        Self {
            project_name: project_name.into(),
            command,
            build_info,
            start_time: Local::now(),
            os_name: background_info::os_name(),
            kernel_version: background_info::kernel_version(),
            hostname: background_info::get_hostname(),
        }
    }

    /// 以空格拼接的命令行
    pub fn command_line(&self) -> String {
        self.command.join(" ")
    }
}
