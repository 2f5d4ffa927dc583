//! 实用工具模块
//!
//! 提供各种辅助功能和工具函数

pub mod background_info;
pub mod build_info;
pub mod file_tools;
pub mod timestamp;

pub use build_info::BuildInfo;
pub use file_tools::FileTools;
pub use timestamp::{format_timestamp, TimestampStyle};
