//! shuvlog - 多 sink 异步日志引擎
//!
//! shuvlog 在调用线程上只做级别检查与入队，格式化与 I/O 全部交给一个后台
//! worker 线程按批完成。同一条事件可以同时写入控制台、纯文本日志、JSON 与
//! NDJSON 文件，每个 sink 拥有独立的级别过滤器。
//!
//! # 快速开始
//!
//! ```rust,no_run
//! use shuvlog::sinks::{ConsoleSink, LogFileSink};
//! use shuvlog::{build_info, log_info, log_warn, Level, Settings};
//!
//! shuvlog::initialize(
//!     "demo",
//!     std::env::args().collect(),
//!     build_info!(),
//!     Settings::default().with_minimum_level(Level::Debug),
//! );
//! shuvlog::add_sink(ConsoleSink::new());
//! shuvlog::add_sink(LogFileSink::builder("logs/demo.log").minimum_level(Level::Info));
//!
//! log_info!("Application started");
//! log_warn!("Disk usage at {}%", 91);
//!
//! // 排空队列并关闭所有 sink；省略时在进程退出时自动执行
//! shuvlog::shutdown();
//! ```
//!
//! # 基于配置初始化
//!
//! ```rust,no_run
//! use shuvlog::config::load_config_from_str;
//!
//! let config = load_config_from_str(r#"
//!     project_name = "service"
//!
//!     [settings]
//!     minimum_level = "INFO"
//!
//!     [[sinks]]
//!     type = "console"
//!
//!     [[sinks]]
//!     type = "json_file"
//!     path = "logs/service.json"
//! "#)?;
//!
//! let _guard = shuvlog::init_from_config(config)?;
//! shuvlog::log_err!("Something failed");
//! // _guard 被 drop 时自动关闭引擎
//! # Ok::<(), shuvlog::ShuvlogError>(())
//! ```

pub mod config;
pub mod core;
pub mod diagnostics;
pub mod env_config;
pub mod error;
pub mod sinks;
pub mod utils;

// 重新导出主要类型
pub use config::{load_config_from_file, LoggerConfig, Settings};
pub use diagnostics::DiagnosticsSnapshot;
pub use error::{Result, ShuvlogError};

// 重新导出核心功能
pub use core::engine::{LifecycleState, Logger};
pub use core::event::{Log, SessionInfo, SourceLocation};
pub use core::layers::ShuvlogLayer;
pub use core::level::{Level, LevelMask};
pub use core::thread::{set_thread_label, thread_label};
pub use utils::build_info::BuildInfo;

use env_config::EnvConfig;
use once_cell::sync::Lazy;
use std::fmt;
use std::sync::Once;

/// 库版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 全局引擎实例
static LOGGER: Lazy<Logger> = Lazy::new(Logger::new);

static EXIT_HOOK: Once = Once::new();

/// 获取全局引擎
pub fn logger() -> &'static Logger {
    &LOGGER
}

/// 初始化全局引擎
///
/// 只有第一次调用生效。初始化之前注册的 sink 会在此时收到会话头部。
/// 成功初始化后注册进程退出钩子：进程退出时若尚未调用 [`shutdown`]，
/// 队列中剩余的事件仍会写出并关闭所有 sink。
pub fn initialize(
    project_name: impl Into<String>,
    argv: Vec<String>,
    build_info: BuildInfo,
    settings: Settings,
) {
    LOGGER.initialize(project_name, argv, build_info, settings);
    if LOGGER.is_initialized() {
        EXIT_HOOK.call_once(register_exit_hook);
    }
}

fn register_exit_hook() {
    // SAFETY: 回调是无捕获的 extern "C" 函数，整个进程生命周期内有效
    if unsafe { libc::atexit(shutdown_at_exit) } != 0 {
        eprintln!("CAUTION: Could not register the logger exit hook, call shutdown() before exiting.");
    }
}

/// 进程退出时关闭全局引擎
///
/// 退出线程的线程局部存储此时可能已经销毁，构造事件需要读取线程局部数据，
/// 因此在新线程上执行关闭。回调不能向外展开 panic。
extern "C" fn shutdown_at_exit() {
    if !LOGGER.is_initialized() {
        return;
    }
    let on_thread = std::panic::catch_unwind(|| {
        std::thread::Builder::new()
            .name("shuvlog-exit".to_string())
            .spawn(|| LOGGER.shutdown())
            .map(|handle| handle.join().is_ok())
    });
    if !matches!(on_thread, Ok(Ok(true))) {
        let _ = std::panic::catch_unwind(|| LOGGER.shutdown());
    }
}

/// 向全局引擎注册 sink，失败时输出诊断信息而不是返回错误
#[track_caller]
pub fn add_sink<F: sinks::SinkFactory>(factory: F) {
    LOGGER.add_sink(factory);
}

/// 向全局引擎注册 sink 并返回失败原因
pub fn try_add_sink<F: sinks::SinkFactory>(factory: F) -> Result<()> {
    LOGGER.try_add_sink(factory)
}

/// 记录一条日志
pub fn log(level: Level, location: SourceLocation, message: impl Into<String>) {
    LOGGER.log(level, location, message);
}

/// 记录一条格式化日志，通常经由 [`log_at!`] 等宏调用
pub fn log_fmt(level: Level, location: SourceLocation, args: fmt::Arguments<'_>) {
    LOGGER.log_fmt(level, location, args);
}

/// 关闭全局引擎，排空全部待处理事件
#[track_caller]
pub fn shutdown() {
    LOGGER.shutdown();
}

/// 检查全局引擎是否处于运行状态
pub fn is_initialized() -> bool {
    LOGGER.is_initialized()
}

/// 调整全局最低级别
pub fn set_minimum_level(level: Level) {
    LOGGER.set_minimum_level(level);
}

/// 全局引擎的诊断快照
pub fn diagnostics() -> DiagnosticsSnapshot {
    LOGGER.diagnostics()
}

/// 被 drop 时关闭全局引擎
#[derive(Debug)]
#[must_use = "dropping the guard shuts the logger down immediately"]
pub struct ShutdownGuard {
    _private: (),
}

impl ShutdownGuard {
    /// 立即关闭
    pub fn shutdown(self) {}
}

impl Drop for ShutdownGuard {
    fn drop(&mut self) {
        LOGGER.shutdown();
    }
}

/// 按配置初始化全局引擎并注册所有 sink
///
/// 配置先经过校验，随后应用 `SHUVLOG_*` 环境变量覆盖。sink 注册失败按
/// [`add_sink`] 的方式报告，不会使本函数失败。
pub fn init_from_config(mut config: LoggerConfig) -> Result<ShutdownGuard> {
    config::validate_config(&config)?;
    EnvConfig::apply_overrides(&mut config.settings)?;

    initialize(
        config.project_name.clone(),
        std::env::args().collect(),
        BuildInfo::from_build(),
        config.settings.clone(),
    );
    LOGGER.add_sinks_from_config(&config);

    Ok(ShutdownGuard { _private: () })
}

/// 捕获当前调用点
#[macro_export]
macro_rules! source_location {
    () => {
        $crate::SourceLocation::new(file!(), line!(), column!(), Some(module_path!()))
    };
}

/// 以指定级别记录格式化日志
///
/// ```rust,no_run
/// shuvlog::log_at!(shuvlog::Level::TraceR2, "cache hit ratio {:.2}", 0.93);
/// ```
#[macro_export]
macro_rules! log_at {
    ($level:expr, $($arg:tt)+) => {
        $crate::logger().log_fmt($level, $crate::source_location!(), format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)+) => { $crate::log_at!($crate::Level::Debug, $($arg)+) };
}

/// 发布版追踪级别，数字越小越详细
#[macro_export]
macro_rules! log_trace_r3 {
    ($($arg:tt)+) => { $crate::log_at!($crate::Level::TraceR3, $($arg)+) };
}

#[macro_export]
macro_rules! log_trace_r2 {
    ($($arg:tt)+) => { $crate::log_at!($crate::Level::TraceR2, $($arg)+) };
}

#[macro_export]
macro_rules! log_trace_r1 {
    ($($arg:tt)+) => { $crate::log_at!($crate::Level::TraceR1, $($arg)+) };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)+) => { $crate::log_at!($crate::Level::Info, $($arg)+) };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)+) => { $crate::log_at!($crate::Level::Warning, $($arg)+) };
}

#[macro_export]
macro_rules! log_err {
    ($($arg:tt)+) => { $crate::log_at!($crate::Level::Error, $($arg)+) };
}

#[macro_export]
macro_rules! log_crit {
    ($($arg:tt)+) => { $crate::log_at!($crate::Level::Critical, $($arg)+) };
}

#[macro_export]
macro_rules! log_fatal {
    ($($arg:tt)+) => { $crate::log_at!($crate::Level::Fatal, $($arg)+) };
}
