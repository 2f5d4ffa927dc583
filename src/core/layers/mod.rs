//! tracing 处理层
//!
//! 目前只有 [`bridge::ShuvlogLayer`]，把 `tracing` 事件转发给引擎。

pub mod bridge;

pub use bridge::ShuvlogLayer;
