//! shuvlog 核心模块
//!
//! 本模块包含日志引擎的核心组件：事件与级别定义、事件队列、线程标签、
//! 引擎本身以及 tracing 桥接层。

pub mod engine;
pub mod event;
pub mod layers;
pub mod level;
pub mod queue;
pub mod thread;

// 重新导出核心类型
pub use engine::{LifecycleState, Logger};
pub use event::{Log, SessionInfo, SourceLocation};
pub use level::{Level, LevelMask};
pub use queue::EventQueue;

pub use layers::ShuvlogLayer;
