//! 日志引擎
//!
//! [`Logger`] 负责会话生命周期、sink 注册与后台批处理：
//!
//! ```text
//! Uninitialized → Initializing → Running → ShuttingDown → Shutdown
//! ```
//!
//! 生产者线程只在入队时短暂持有队列锁；唯一的 worker 线程按批取出事件，
//! 对每个事件按注册顺序交给通过过滤的 sink，批末只刷新本批写入过的 sink。
//! 关闭时 worker 在同一临界区内关闭并排空队列，已被接受的事件不会丢失。

use crate::config::{FileSinkConfig, LoggerConfig, SinkConfig, Settings};
use crate::core::event::{Log, SessionInfo, SourceLocation};
use crate::core::level::Level;
use crate::core::queue::EventQueue;
use crate::core::thread;
use crate::diagnostics::{Diagnostics, DiagnosticsSnapshot};
use crate::error::{Result, ShuvlogError};
use crate::sinks::console::ConsoleSink;
use crate::sinks::json_file::JsonFileSink;
use crate::sinks::log_file::LogFileSink;
use crate::sinks::ndjson_file::NdJsonFileSink;
use crate::sinks::traits::{Sink, SinkDescriptor, SinkFactory};
use crate::sinks::filter::SinkFilter;
use crate::utils::build_info::BuildInfo;
use crate::utils::FileTools;
use once_cell::sync::OnceCell;
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU16, AtomicU8, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;
use std::time::Duration;

const WORKER_THREAD_NAME: &str = "shuvlog-worker";

/// 引擎生命周期状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LifecycleState {
    Uninitialized = 0,
    Initializing = 1,
    Running = 2,
    ShuttingDown = 3,
    Shutdown = 4,
}

impl LifecycleState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => LifecycleState::Uninitialized,
            1 => LifecycleState::Initializing,
            2 => LifecycleState::Running,
            3 => LifecycleState::ShuttingDown,
            _ => LifecycleState::Shutdown,
        }
    }
}

/// 已注册的 sink
///
/// 过滤器在注册时缓存一份，worker 不必为判断过滤而加锁。
#[derive(Clone)]
struct RegisteredSink {
    descriptor: SinkDescriptor,
    filter: SinkFilter,
    sink: Arc<Mutex<dyn Sink>>,
}

impl RegisteredSink {
    fn lock(&self) -> MutexGuard<'_, dyn Sink + 'static> {
        self.sink.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for RegisteredSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredSink")
            .field("descriptor", &self.descriptor)
            .field("filter", &self.filter)
            .finish()
    }
}

#[derive(Debug, Default)]
struct SinkRegistry {
    entries: Vec<RegisteredSink>,
    console_registered: bool,
}

fn lock_registry(registry: &Mutex<SinkRegistry>) -> MutexGuard<'_, SinkRegistry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// 配置中文件 sink 的输出路径
///
/// 未给出路径时使用日志目录下的生成文件名，目录不可用时报告目录本身。
fn configured_path(config: &LoggerConfig, file: &FileSinkConfig, extension: &str) -> Result<PathBuf> {
    let directory = &config.settings.log_directory;
    if file.path.is_none() {
        FileTools::ensure_directory_exists(directory).map_err(|e| {
            ShuvlogError::config(format!(
                "Could not create log directory {}: {}",
                directory.display(),
                e
            ))
        })?;
    }
    Ok(file.resolve_path(&config.project_name, directory, extension))
}

/// 日志引擎
///
/// 进程通常通过 [`crate::logger()`] 使用全局实例；测试和嵌入方也可以构造
/// 相互独立的实例。实例被 drop 时自动调用 [`Logger::shutdown`]。
pub struct Logger {
    state: AtomicU8,
    running: Arc<AtomicBool>,
    minimum_level: AtomicU16,
    queue: Arc<EventQueue<Log>>,
    registry: Arc<Mutex<SinkRegistry>>,
    sink_count: AtomicUsize,
    session: OnceCell<SessionInfo>,
    settings: OnceCell<Settings>,
    worker: Mutex<Option<JoinHandle<()>>>,
    diagnostics: Arc<Diagnostics>,
    warned_uninitialized: AtomicBool,
    warned_after_shutdown: AtomicBool,
    warned_no_sink: AtomicBool,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("state", &self.state())
            .field("minimum_level", &self.minimum_level())
            .field("sinks", &self.sink_count())
            .field("queued", &self.queue.len())
            .finish()
    }
}

impl Logger {
    /// 创建未初始化的引擎
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(LifecycleState::Uninitialized as u8),
            running: Arc::new(AtomicBool::new(false)),
            minimum_level: AtomicU16::new(Settings::default().minimum_level.bits()),
            queue: Arc::new(EventQueue::new()),
            registry: Arc::new(Mutex::new(SinkRegistry::default())),
            sink_count: AtomicUsize::new(0),
            session: OnceCell::new(),
            settings: OnceCell::new(),
            worker: Mutex::new(None),
            diagnostics: Arc::new(Diagnostics::new()),
            warned_uninitialized: AtomicBool::new(false),
            warned_after_shutdown: AtomicBool::new(false),
            warned_no_sink: AtomicBool::new(false),
        }
    }

    /// 当前生命周期状态
    pub fn state(&self) -> LifecycleState {
        LifecycleState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// 是否处于运行状态
    pub fn is_initialized(&self) -> bool {
        self.state() == LifecycleState::Running
    }

    /// `initialize` 时生效的设置
    pub fn settings(&self) -> Option<&Settings> {
        self.settings.get()
    }

    /// 会话信息
    pub fn session(&self) -> Option<&SessionInfo> {
        self.session.get()
    }

    pub fn minimum_level(&self) -> Level {
        Level::from_bits(self.minimum_level.load(Ordering::Relaxed)).unwrap_or(Level::Info)
    }

    /// 运行时调整全局最低级别
    pub fn set_minimum_level(&self, level: Level) {
        self.minimum_level.store(level.bits(), Ordering::Relaxed);
    }

    /// 已注册的 sink 数量
    pub fn sink_count(&self) -> usize {
        self.sink_count.load(Ordering::Acquire)
    }

    /// 诊断数据快照
    pub fn diagnostics(&self) -> DiagnosticsSnapshot {
        self.diagnostics.snapshot()
    }

    /// 初始化引擎并启动 worker 线程
    ///
    /// 只有第一次调用生效，之后的调用（任意线程、任意时刻）都是空操作。
    pub fn initialize(
        &self,
        project_name: impl Into<String>,
        argv: Vec<String>,
        build_info: BuildInfo,
        settings: Settings,
    ) {
        if self
            .state
            .compare_exchange(
                LifecycleState::Uninitialized as u8,
                LifecycleState::Initializing as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_err()
        {
            tracing::debug!("Logger already initialized, ignoring initialize()");
            return;
        }

        let settings = settings.sanitized();
        self.set_minimum_level(settings.minimum_level);

        if let Err(e) = FileTools::ensure_directory_exists(&settings.log_directory) {
            eprintln!(
                "CAUTION: Could not create log directory {}: {}",
                settings.log_directory.display(),
                e
            );
        }

        if !thread::has_thread_label() {
            thread::set_thread_label("MainThread");
        }

        let session = self
            .session
            .get_or_init(|| SessionInfo::new(project_name, argv, build_info));
        let settings = self.settings.get_or_init(|| settings);

        let registry = lock_registry(&self.registry);
        for entry in &registry.entries {
            if let Err(e) = entry.lock().write_header(session) {
                self.diagnostics.increment_sink_errors();
                tracing::warn!(sink = %entry.descriptor, error = %e, "Failed to write sink header");
            }
        }

        self.running.store(true, Ordering::Release);
        let worker = Worker {
            queue: Arc::clone(&self.queue),
            registry: Arc::clone(&self.registry),
            running: Arc::clone(&self.running),
            diagnostics: Arc::clone(&self.diagnostics),
            max_batch_size: settings.max_batch_size,
            flush_interval: settings.flush_interval(),
        };

        match std::thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || worker.run())
        {
            Ok(handle) => {
                *self.worker.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
                self.state
                    .store(LifecycleState::Running as u8, Ordering::Release);
                tracing::debug!(
                    project = %session.project_name,
                    sinks = registry.entries.len(),
                    "Logger initialized"
                );
            }
            Err(e) => {
                self.running.store(false, Ordering::Release);
                self.state
                    .store(LifecycleState::Shutdown as u8, Ordering::Release);
                eprintln!("CAUTION: Could not start the logger worker thread: {}", e);
            }
        }
    }

    /// 注册 sink
    ///
    /// 失败不会返回给调用方：引擎运行、已有 sink 且全局最低级别不高于 `ERROR`
    /// 时以 `ERROR` 级别写入日志，否则打印到标准错误。
    #[track_caller]
    pub fn add_sink<F: SinkFactory>(&self, factory: F) {
        let location = SourceLocation::caller();
        if let Err(e) = self.try_add_sink(factory) {
            self.report_rejected_sink(location, &e);
        }
    }

    /// 注册 sink 并返回失败原因
    pub fn try_add_sink<F: SinkFactory>(&self, factory: F) -> Result<()> {
        let result = self.register(factory);
        if result.is_err() {
            self.diagnostics.increment_sinks_rejected();
        }
        result
    }

    fn register<F: SinkFactory>(&self, factory: F) -> Result<()> {
        let mut registry = lock_registry(&self.registry);

        if self.state() >= LifecycleState::ShuttingDown {
            return Err(ShuvlogError::internal("Logger has been shut down"));
        }

        let descriptor = factory.descriptor()?;
        if descriptor.is_console() && registry.console_registered {
            return Err(ShuvlogError::duplicate("console"));
        }
        if let Some(path) = descriptor.file_path() {
            if registry
                .entries
                .iter()
                .any(|entry| entry.descriptor.file_path() == Some(path))
            {
                return Err(ShuvlogError::duplicate(path.display().to_string()));
            }
        }

        let mut sink = factory.create()?;
        let filter = *sink.filter();

        // initialize 在同一把锁下写头部并切换状态，这里只需处理已运行的情况
        if self.state() == LifecycleState::Running {
            if let Some(session) = self.session.get() {
                if let Err(e) = sink.write_header(session) {
                    self.diagnostics.increment_sink_errors();
                    tracing::warn!(sink = %descriptor, error = %e, "Failed to write sink header");
                }
            }
        }

        if descriptor.is_console() {
            registry.console_registered = true;
        }
        tracing::debug!(sink = %descriptor, filter = %filter, "Sink registered");
        registry.entries.push(RegisteredSink {
            descriptor,
            filter,
            sink: Arc::new(Mutex::new(sink)),
        });
        self.sink_count.fetch_add(1, Ordering::AcqRel);
        self.diagnostics.increment_sinks_registered();
        Ok(())
    }

    fn report_rejected_sink(&self, location: SourceLocation, error: &ShuvlogError) {
        if self.reports_through_pipeline() {
            self.log(Level::Error, location, format!("Could not add sink: {}", error));
        } else {
            eprintln!("{}", error);
        }
    }

    /// 注册失败的报告能否经由 sink 输出，否则改为标准错误
    fn reports_through_pipeline(&self) -> bool {
        self.is_initialized() && self.sink_count() > 0 && Level::Error >= self.minimum_level()
    }

    /// 按配置注册 sink，未给出路径的文件 sink 写入日志目录下的生成文件名
    #[track_caller]
    pub fn add_sinks_from_config(&self, config: &LoggerConfig) {
        let location = SourceLocation::caller();

        for sink_config in &config.sinks {
            let result = match sink_config {
                SinkConfig::Console(console) => self.try_add_configured(
                    console
                        .filter
                        .to_filter()
                        .map(|filter| ConsoleSink::with_filter(filter).with_format(console.format)),
                ),
                SinkConfig::LogFile(file) => self.try_add_configured(
                    configured_path(config, file, "log").map(|path| {
                        LogFileSink::builder(path)
                            .filter(file.filter.mode, file.filter.mask())
                            .format(file.format)
                    }),
                ),
                SinkConfig::JsonFile(file) => self.try_add_configured(
                    configured_path(config, file, "json").map(|path| {
                        JsonFileSink::builder(path)
                            .filter(file.filter.mode, file.filter.mask())
                            .format(file.format)
                    }),
                ),
                SinkConfig::NdJsonFile(file) => self.try_add_configured(
                    configured_path(config, file, "ndjson").map(|path| {
                        NdJsonFileSink::builder(path)
                            .filter(file.filter.mode, file.filter.mask())
                            .format(file.format)
                    }),
                ),
            };

            if let Err(e) = result {
                self.report_rejected_sink(location, &e);
            }
        }
    }

    /// 配置阶段的失败与注册失败一样计入被拒绝的 sink
    fn try_add_configured<F: SinkFactory>(&self, factory: Result<F>) -> Result<()> {
        match factory {
            Ok(factory) => self.try_add_sink(factory),
            Err(e) => {
                self.diagnostics.increment_sinks_rejected();
                Err(e)
            }
        }
    }

    /// 记录一条日志
    ///
    /// 低于全局最低级别的事件在分配任何内存之前被丢弃。
    pub fn log(&self, level: Level, location: SourceLocation, message: impl Into<String>) {
        if self.accepts(level) {
            self.enqueue(Log::new(level, location, message.into()));
        }
    }

    /// 记录一条格式化日志，只有通过检查后才会格式化
    pub fn log_fmt(&self, level: Level, location: SourceLocation, args: fmt::Arguments<'_>) {
        if self.accepts(level) {
            let message = match args.as_str() {
                Some(s) => s.to_string(),
                None => args.to_string(),
            };
            self.enqueue(Log::new(level, location, message));
        }
    }

    fn accepts(&self, level: Level) -> bool {
        match self.state() {
            LifecycleState::Running => {}
            LifecycleState::Uninitialized | LifecycleState::Initializing => {
                self.diagnostics.increment_events_dropped_inactive();
                if !self.warned_uninitialized.swap(true, Ordering::Relaxed) {
                    eprintln!(
                        "CAUTION: Logger has been used uninitialized.\n\
                         Make sure you call the initialize() function before performing any log."
                    );
                }
                return false;
            }
            LifecycleState::ShuttingDown | LifecycleState::Shutdown => {
                self.diagnostics.increment_events_dropped_inactive();
                if !self.warned_after_shutdown.swap(true, Ordering::Relaxed) {
                    eprintln!("CAUTION: Logger has been used after shutdown, log dropped.");
                }
                return false;
            }
        }

        if level < self.minimum_level() {
            return false;
        }

        if self.sink_count() == 0 {
            self.diagnostics.increment_events_dropped_inactive();
            if !self.warned_no_sink.swap(true, Ordering::Relaxed) {
                eprintln!("WARNING: Trying to log with no sink.");
            }
            return false;
        }

        true
    }

    fn enqueue(&self, log: Log) {
        if self.queue.push(log) {
            self.diagnostics.increment_events_enqueued();
        } else {
            self.diagnostics.increment_events_dropped_inactive();
        }
    }

    /// 关闭引擎
    ///
    /// 排空队列中的全部事件后按注册顺序关闭每个 sink。未运行时为空操作。
    #[track_caller]
    pub fn shutdown(&self) {
        if self
            .state
            .compare_exchange(
                LifecycleState::Running as u8,
                LifecycleState::ShuttingDown as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_err()
        {
            return;
        }

        let pending = self.queue.len();
        if Level::Info >= self.minimum_level() {
            self.enqueue(Log::new(
                Level::Info,
                SourceLocation::caller(),
                format!("Shutting down logger, will dump remaining logs ({}).", pending),
            ));
        }

        self.running.store(false, Ordering::Release);
        self.queue.notify_all();

        let handle = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                eprintln!("CAUTION: Logger worker thread panicked");
            }
        }

        let entries = lock_registry(&self.registry).entries.clone();
        for entry in &entries {
            if let Err(e) = entry.lock().close() {
                self.diagnostics.increment_sink_errors();
                tracing::warn!(sink = %entry.descriptor, error = %e, "Failed to close sink");
            }
        }

        self.state
            .store(LifecycleState::Shutdown as u8, Ordering::Release);
        tracing::debug!(sinks = entries.len(), "Logger shut down");
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// 后台批处理线程的状态
struct Worker {
    queue: Arc<EventQueue<Log>>,
    registry: Arc<Mutex<SinkRegistry>>,
    running: Arc<AtomicBool>,
    diagnostics: Arc<Diagnostics>,
    max_batch_size: usize,
    flush_interval: Duration,
}

impl Worker {
    fn run(self) {
        tracing::debug!(
            max_batch_size = self.max_batch_size,
            flush_interval_ms = self.flush_interval.as_millis() as u64,
            "Logger worker started"
        );

        let mut batch = Vec::with_capacity(self.max_batch_size);
        while self.running.load(Ordering::Acquire) {
            self.queue.wait_for_data(self.flush_interval, &self.running);
            self.queue.pop_batch(&mut batch, self.max_batch_size);
            if !batch.is_empty() {
                self.dispatch(&mut batch);
            }
        }

        self.queue.close_and_drain_to(&mut batch);
        let remaining = batch.len();
        if !batch.is_empty() {
            self.dispatch(&mut batch);
        }
        tracing::debug!(remaining, "Logger worker stopped");
    }

    fn dispatch(&self, batch: &mut Vec<Log>) {
        let sinks = lock_registry(&self.registry).entries.clone();
        let mut touched = vec![false; sinks.len()];

        for log in batch.iter() {
            for (entry, touched) in sinks.iter().zip(touched.iter_mut()) {
                if !entry.filter.should_log(log.level()) {
                    self.diagnostics.increment_events_filtered();
                    continue;
                }
                match entry.lock().write(log) {
                    Ok(()) => {
                        self.diagnostics.increment_events_written();
                        *touched = true;
                    }
                    Err(e) => {
                        self.diagnostics.increment_sink_errors();
                        tracing::warn!(sink = %entry.descriptor, error = %e, "Sink write failed");
                    }
                }
            }
        }

        for (entry, _) in sinks.iter().zip(&touched).filter(|(_, touched)| **touched) {
            match entry.lock().flush() {
                Ok(()) => self.diagnostics.increment_sink_flushes(),
                Err(e) => {
                    self.diagnostics.increment_sink_errors();
                    tracing::warn!(sink = %entry.descriptor, error = %e, "Sink flush failed");
                }
            }
        }

        self.diagnostics.increment_batches_processed();
        batch.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::level::LevelMask;
    use crate::sinks::filter::FilterMode;
    use crate::sinks::memory::MemorySink;
    use std::time::Instant;
    use tempfile::TempDir;

    fn settings(dir: &TempDir) -> Settings {
        Settings::default()
            .with_log_directory(dir.path().join("logs"))
            .with_flush_interval_ms(10)
    }

    fn here() -> SourceLocation {
        SourceLocation::caller()
    }

    fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if condition() {
                return true;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        condition()
    }

    #[test]
    fn test_state_transitions() {
        let dir = TempDir::new().unwrap();
        let logger = Logger::new();
        assert_eq!(logger.state(), LifecycleState::Uninitialized);

        logger.initialize("states", Vec::new(), BuildInfo::unknown(), settings(&dir));
        assert_eq!(logger.state(), LifecycleState::Running);
        assert!(logger.is_initialized());
        assert!(dir.path().join("logs").is_dir());

        logger.shutdown();
        assert_eq!(logger.state(), LifecycleState::Shutdown);
        assert!(!logger.is_initialized());

        // 第二次关闭为空操作
        logger.shutdown();
        assert_eq!(logger.state(), LifecycleState::Shutdown);
    }

    #[test]
    fn test_log_before_initialize_is_dropped() {
        let logger = Logger::new();
        let sink = MemorySink::default();
        let handle = sink.handle();
        logger.add_sink(sink);

        logger.log(Level::Error, here(), "too early");
        assert_eq!(logger.diagnostics().events_dropped_inactive, 1);
        assert_eq!(logger.diagnostics().events_enqueued, 0);
        assert_eq!(handle.header_count(), 0);
    }

    #[test]
    fn test_header_written_on_initialize_and_on_late_registration() {
        let dir = TempDir::new().unwrap();
        let logger = Logger::new();

        let early = MemorySink::default();
        let early_handle = early.handle();
        logger.add_sink(early);
        assert_eq!(early_handle.header_count(), 0);

        logger.initialize("headers", Vec::new(), BuildInfo::unknown(), settings(&dir));
        assert_eq!(early_handle.headers(), vec!["headers".to_string()]);

        let late = MemorySink::default();
        let late_handle = late.handle();
        logger.add_sink(late);
        assert_eq!(late_handle.header_count(), 1);
        assert_eq!(early_handle.header_count(), 1);
    }

    #[test]
    fn test_global_minimum_level_applies_before_sink_filters() {
        let dir = TempDir::new().unwrap();
        let logger = Logger::new();
        let sink = MemorySink::new(SinkFilter::accept_all());
        let handle = sink.handle();
        logger.add_sink(sink);
        logger.initialize(
            "levels",
            Vec::new(),
            BuildInfo::unknown(),
            settings(&dir).with_minimum_level(Level::Warning),
        );

        logger.log(Level::Info, here(), "hidden");
        logger.log(Level::Error, here(), "shown");
        logger.set_minimum_level(Level::Debug);
        logger.log(Level::Debug, here(), "now shown");
        logger.shutdown();

        let messages = handle.messages();
        assert_eq!(&messages[..2], &["shown".to_string(), "now shown".to_string()]);
        assert!(messages[2].starts_with("Shutting down logger"));
    }

    #[test]
    fn test_sink_filter_is_respected() {
        let dir = TempDir::new().unwrap();
        let logger = Logger::new();
        let errors_only = MemorySink::new(SinkFilter::explicit(Level::Error | Level::Fatal));
        let handle = errors_only.handle();
        logger.add_sink(errors_only);
        logger.initialize("filters", Vec::new(), BuildInfo::unknown(), settings(&dir));

        for level in Level::ALL {
            logger.log(level, here(), level.name());
        }
        logger.shutdown();

        assert_eq!(handle.levels(), vec![Level::Error, Level::Fatal]);
        assert!(logger.diagnostics().events_filtered > 0);
    }

    #[test]
    fn test_events_delivered_without_shutdown() {
        let dir = TempDir::new().unwrap();
        let logger = Logger::new();
        let sink = MemorySink::default();
        let handle = sink.handle();
        logger.add_sink(sink);
        logger.initialize("live", Vec::new(), BuildInfo::unknown(), settings(&dir));

        logger.log_fmt(Level::Info, here(), format_args!("value = {}", 42));
        assert!(wait_until(|| handle.flush_count() >= 1));
        assert_eq!(handle.messages(), vec!["value = 42".to_string()]);
    }

    #[test]
    fn test_rejected_sinks_are_counted() {
        let dir = TempDir::new().unwrap();
        let logger = Logger::new();
        assert!(logger.try_add_sink(ConsoleSink::new()).is_ok());
        assert!(matches!(
            logger.try_add_sink(ConsoleSink::new()),
            Err(ShuvlogError::DuplicateSink(_))
        ));

        let bad_filter = LogFileSink::builder(dir.path().join("bad.log"))
            .filter(FilterMode::MinimumLevel, LevelMask::from(Level::Info) | Level::Error);
        logger.add_sink(bad_filter);
        assert!(!dir.path().join("bad.log").exists());

        let snapshot = logger.diagnostics();
        assert_eq!(snapshot.sinks_registered, 1);
        assert_eq!(snapshot.sinks_rejected, 2);
        assert_eq!(logger.sink_count(), 1);
    }

    #[test]
    fn test_unusable_log_directory_is_reported() {
        let dir = TempDir::new().unwrap();
        let blocked = dir.path().join("blocked");
        std::fs::write(&blocked, b"not a directory").unwrap();

        let logger = Logger::new();
        let memory = MemorySink::default();
        let handle = memory.handle();
        logger.add_sink(memory);
        logger.initialize("dirs", Vec::new(), BuildInfo::unknown(), settings(&dir));

        let config = LoggerConfig {
            project_name: "dirs".to_string(),
            settings: Settings::default().with_log_directory(blocked.clone()),
            sinks: vec![SinkConfig::LogFile(FileSinkConfig::default())],
        };
        logger.add_sinks_from_config(&config);
        logger.shutdown();

        assert_eq!(logger.sink_count(), 1);
        assert_eq!(logger.diagnostics().sinks_rejected, 1);
        let blocked = blocked.display().to_string();
        assert!(handle.messages().iter().any(|m| {
            m.starts_with("Could not add sink:")
                && m.contains("Could not create log directory")
                && m.contains(&blocked)
        }));
    }

    #[test]
    fn test_rejection_report_respects_minimum_level() {
        let dir = TempDir::new().unwrap();
        let logger = Logger::new();
        let memory = MemorySink::default();
        let handle = memory.handle();
        logger.add_sink(memory);
        logger.initialize(
            "fatal-only",
            Vec::new(),
            BuildInfo::unknown(),
            settings(&dir).with_minimum_level(Level::Fatal),
        );
        let bad_filter = || {
            LogFileSink::builder(dir.path().join("bad.log"))
                .filter(FilterMode::MinimumLevel, LevelMask::from(Level::Info) | Level::Error)
        };

        // ERROR 低于全局最低级别，报告改走标准错误
        assert!(!logger.reports_through_pipeline());
        logger.add_sink(bad_filter());
        assert_eq!(logger.diagnostics().events_enqueued, 0);

        logger.set_minimum_level(Level::Debug);
        assert!(logger.reports_through_pipeline());
        logger.add_sink(bad_filter());
        logger.shutdown();

        assert_eq!(logger.diagnostics().sinks_rejected, 2);
        let reports = handle
            .messages()
            .into_iter()
            .filter(|m| m.starts_with("Could not add sink:"))
            .count();
        assert_eq!(reports, 1);
    }

    #[test]
    fn test_add_sink_after_shutdown_rejected() {
        let dir = TempDir::new().unwrap();
        let logger = Logger::new();
        logger.add_sink(MemorySink::default());
        logger.initialize("closed", Vec::new(), BuildInfo::unknown(), settings(&dir));
        logger.shutdown();

        let err = logger.try_add_sink(MemorySink::default()).unwrap_err();
        assert!(matches!(err, ShuvlogError::InternalError(_)));
    }

    #[test]
    fn test_drop_shuts_down() {
        let dir = TempDir::new().unwrap();
        let sink = MemorySink::default();
        let handle = sink.handle();
        {
            let logger = Logger::new();
            logger.add_sink(sink);
            logger.initialize("drop", Vec::new(), BuildInfo::unknown(), settings(&dir));
            logger.log(Level::Warning, here(), "before drop");
        }
        assert_eq!(handle.close_count(), 1);
        assert_eq!(handle.messages()[0], "before drop");
    }
}
