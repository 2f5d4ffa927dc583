//! 定义 shuvlog 引擎的内部诊断与指标。
//!
//! 此模块提供了对日志引擎健康状况和吞吐的可观测性。每个 `Logger` 持有
//! 自己的 [`Diagnostics`]，通过 `Logger::diagnostics` 获取快照。

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// 内部诊断与指标数据结构。
///
/// 使用原子操作确保线程安全，提供日志引擎运行时的关键指标。
#[derive(Debug, Default)]
pub struct Diagnostics {
    /// 引擎创建时间
    start_time: Option<Instant>,

    /// 成功入队的事件数
    events_enqueued: AtomicU64,

    /// 成功写入 sink 的次数（一个事件写入两个 sink 计两次）
    events_written: AtomicU64,

    /// 被 sink 过滤器拒绝的次数
    events_filtered: AtomicU64,

    /// 引擎未运行或没有 sink 时丢弃的事件数
    events_dropped_inactive: AtomicU64,

    /// worker 处理的批次数
    batches_processed: AtomicU64,

    /// sink flush 次数
    sink_flushes: AtomicU64,

    /// sink 写入、flush、关闭错误数
    sink_errors: AtomicU64,

    /// 注册成功的 sink 数
    sinks_registered: AtomicU64,

    /// 注册失败的 sink 数
    sinks_rejected: AtomicU64,
}

/// 诊断数据的快照，用于外部查询。
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticsSnapshot {
    /// 引擎运行时间
    pub uptime: Option<Duration>,
    pub events_enqueued: u64,
    pub events_written: u64,
    pub events_filtered: u64,
    pub events_dropped_inactive: u64,
    pub batches_processed: u64,
    pub sink_flushes: u64,
    pub sink_errors: u64,
    pub sinks_registered: u64,
    pub sinks_rejected: u64,
}

impl Diagnostics {
    /// 创建新的诊断实例。
    pub fn new() -> Self {
        Self {
            start_time: Some(Instant::now()),
            ..Default::default()
        }
    }

    pub fn increment_events_enqueued(&self) {
        self.events_enqueued.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_events_written(&self) {
        self.events_written.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_events_filtered(&self) {
        self.events_filtered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_events_dropped_inactive(&self) {
        self.events_dropped_inactive.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_batches_processed(&self) {
        self.batches_processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_sink_flushes(&self) {
        self.sink_flushes.fetch_add(1, Ordering::Relaxed);
    }

    /// 增加 Sink 错误计数。
    pub fn increment_sink_errors(&self) {
        self.sink_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_sinks_registered(&self) {
        self.sinks_registered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_sinks_rejected(&self) {
        self.sinks_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// 获取诊断数据的快照。
    pub fn snapshot(&self) -> DiagnosticsSnapshot {
        DiagnosticsSnapshot {
            uptime: self.start_time.map(|start| start.elapsed()),
            events_enqueued: self.events_enqueued.load(Ordering::Relaxed),
            events_written: self.events_written.load(Ordering::Relaxed),
            events_filtered: self.events_filtered.load(Ordering::Relaxed),
            events_dropped_inactive: self.events_dropped_inactive.load(Ordering::Relaxed),
            batches_processed: self.batches_processed.load(Ordering::Relaxed),
            sink_flushes: self.sink_flushes.load(Ordering::Relaxed),
            sink_errors: self.sink_errors.load(Ordering::Relaxed),
            sinks_registered: self.sinks_registered.load(Ordering::Relaxed),
            sinks_rejected: self.sinks_rejected.load(Ordering::Relaxed),
        }
    }

    /// 重置所有计数器（主要用于测试）。
    pub fn reset(&self) {
        for counter in [
            &self.events_enqueued,
            &self.events_written,
            &self.events_filtered,
            &self.events_dropped_inactive,
            &self.batches_processed,
            &self.sink_flushes,
            &self.sink_errors,
            &self.sinks_registered,
            &self.sinks_rejected,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

impl DiagnosticsSnapshot {
    /// 写入成功率（百分比），没有任何写入尝试时为 100
    pub fn write_success_rate_percent(&self) -> f64 {
        let attempts = self.events_written + self.sink_errors;
        if attempts == 0 {
            100.0
        } else {
            self.events_written as f64 / attempts as f64 * 100.0
        }
    }
}
