//! 内存 Sink
//!
//! 在进程内记录收到的事件与调用序列，供测试和嵌入方检查。所有状态通过
//! [`MemorySinkHandle`] 共享，sink 本身交给引擎之后仍可读取。

use crate::core::event::{Log, SessionInfo};
use crate::core::level::Level;
use crate::error::Result;
use crate::sinks::filter::SinkFilter;
use crate::sinks::traits::{Sink, SinkDescriptor, SinkError, SinkFactory, SinkKind, SinkResult};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct MemoryState {
    logs: Vec<Log>,
    headers: Vec<String>,
    flushes: usize,
    batch_sizes: Vec<usize>,
    pending: usize,
    closes: usize,
    writes_after_close: usize,
}

/// 内存 Sink
#[derive(Debug)]
pub struct MemorySink {
    filter: SinkFilter,
    state: Arc<Mutex<MemoryState>>,
}

/// 读取 [`MemorySink`] 记录的共享句柄
#[derive(Debug, Clone)]
pub struct MemorySinkHandle {
    state: Arc<Mutex<MemoryState>>,
}

impl MemorySink {
    pub fn new(filter: SinkFilter) -> Self {
        Self {
            filter,
            state: Arc::new(Mutex::new(MemoryState::default())),
        }
    }

    /// 获取共享句柄
    pub fn handle(&self) -> MemorySinkHandle {
        MemorySinkHandle {
            state: Arc::clone(&self.state),
        }
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new(SinkFilter::accept_all())
    }
}

impl Sink for MemorySink {
    fn write(&mut self, log: &Log) -> SinkResult<()> {
        let mut state = self.state();
        if state.closes > 0 {
            state.writes_after_close += 1;
            return Err(SinkError::Closed);
        }
        state.logs.push(log.clone());
        state.pending += 1;
        Ok(())
    }

    fn write_header(&mut self, session: &SessionInfo) -> SinkResult<()> {
        self.state().headers.push(session.project_name.clone());
        Ok(())
    }

    fn flush(&mut self) -> SinkResult<()> {
        let mut state = self.state();
        state.flushes += 1;
        let pending = std::mem::take(&mut state.pending);
        if pending > 0 {
            state.batch_sizes.push(pending);
        }
        Ok(())
    }

    fn close(&mut self) -> SinkResult<()> {
        self.state().closes += 1;
        Ok(())
    }

    fn filter(&self) -> &SinkFilter {
        &self.filter
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

impl SinkFactory for MemorySink {
    type Output = MemorySink;

    fn descriptor(&self) -> Result<SinkDescriptor> {
        Ok(SinkDescriptor::new("memory", SinkKind::Memory))
    }

    fn create(self) -> Result<MemorySink> {
        Ok(self)
    }
}

impl MemorySinkHandle {
    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 已写入事件的副本
    pub fn logs(&self) -> Vec<Log> {
        self.state().logs.clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.state()
            .logs
            .iter()
            .map(|log| log.message().to_string())
            .collect()
    }

    pub fn levels(&self) -> Vec<Level> {
        self.state().logs.iter().map(Log::level).collect()
    }

    /// 每次写入头部时的项目名
    pub fn headers(&self) -> Vec<String> {
        self.state().headers.clone()
    }

    pub fn header_count(&self) -> usize {
        self.state().headers.len()
    }

    pub fn flush_count(&self) -> usize {
        self.state().flushes
    }

    /// 每次 flush 之前累计的写入数，即每批的大小
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.state().batch_sizes.clone()
    }

    pub fn close_count(&self) -> usize {
        self.state().closes
    }

    pub fn writes_after_close(&self) -> usize {
        self.state().writes_after_close
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event::SourceLocation;
    use crate::utils::build_info::BuildInfo;

    fn log(level: Level, message: &str) -> Log {
        Log::new(level, SourceLocation::caller(), message.to_string())
    }

    #[test]
    fn test_records_calls() {
        let mut sink = MemorySink::default();
        let handle = sink.handle();

        sink.write_header(&SessionInfo::new("mem", Vec::new(), BuildInfo::unknown()))
            .unwrap();
        sink.write(&log(Level::Info, "a")).unwrap();
        sink.write(&log(Level::Error, "b")).unwrap();
        sink.flush().unwrap();
        sink.write(&log(Level::Info, "c")).unwrap();
        sink.flush().unwrap();
        sink.flush().unwrap();

        assert_eq!(handle.headers(), vec!["mem".to_string()]);
        assert_eq!(handle.messages(), vec!["a", "b", "c"]);
        assert_eq!(handle.levels(), vec![Level::Info, Level::Error, Level::Info]);
        assert_eq!(handle.batch_sizes(), vec![2, 1]);
        assert_eq!(handle.flush_count(), 3);
    }

    #[test]
    fn test_writes_after_close_are_rejected_and_counted() {
        let mut sink = MemorySink::default();
        let handle = sink.handle();
        sink.close().unwrap();
        assert!(matches!(sink.write(&log(Level::Info, "late")), Err(SinkError::Closed)));
        assert_eq!(handle.close_count(), 1);
        assert_eq!(handle.writes_after_close(), 1);
        assert!(handle.logs().is_empty());
    }
}
