//! 环境变量配置模块
//!
//! 此模块允许通过环境变量覆盖引擎设置：
//!
//! - `SHUVLOG_MIN_LEVEL`: 全局最低级别，例如 `debug`、`WARN`
//! - `SHUVLOG_MAX_BATCH_SIZE`: 批大小
//! - `SHUVLOG_FLUSH_INTERVAL_MS`: 刷新间隔（毫秒）
//! - `SHUVLOG_LOG_DIR`: 日志目录

use crate::config::Settings;
use crate::core::level::Level;
use crate::error::{Result, ShuvlogError};
use std::env;
use std::path::PathBuf;

pub const MIN_LEVEL_VAR: &str = "SHUVLOG_MIN_LEVEL";
pub const MAX_BATCH_SIZE_VAR: &str = "SHUVLOG_MAX_BATCH_SIZE";
pub const FLUSH_INTERVAL_VAR: &str = "SHUVLOG_FLUSH_INTERVAL_MS";
pub const LOG_DIR_VAR: &str = "SHUVLOG_LOG_DIR";

/// 环境变量配置管理器
pub struct EnvConfig;

impl EnvConfig {
    /// 以默认设置为基础应用环境变量覆盖
    pub fn settings_from_env() -> Result<Settings> {
        let mut settings = Settings::default();
        Self::apply_overrides(&mut settings)?;
        Ok(settings)
    }

    /// 将进程环境变量中的覆盖项应用到 `settings`
    pub fn apply_overrides(settings: &mut Settings) -> Result<()> {
        Self::apply_overrides_with(settings, |key| env::var(key).ok())
    }

    /// 使用自定义查找函数应用覆盖项，空值视为未设置
    pub fn apply_overrides_with<F>(settings: &mut Settings, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(level) = get(MIN_LEVEL_VAR) {
            settings.minimum_level = level
                .parse::<Level>()
                .map_err(|_| ShuvlogError::InvalidLogLevel(level.clone()))?;
        }

        if let Some(size) = get(MAX_BATCH_SIZE_VAR) {
            settings.max_batch_size = size.parse().map_err(|e| {
                ShuvlogError::config(format!("{} 无效: {} ({})", MAX_BATCH_SIZE_VAR, size, e))
            })?;
        }

        if let Some(interval) = get(FLUSH_INTERVAL_VAR) {
            settings.flush_interval_ms = interval.parse().map_err(|e| {
                ShuvlogError::config(format!("{} 无效: {} ({})", FLUSH_INTERVAL_VAR, interval, e))
            })?;
        }

        if let Some(directory) = get(LOG_DIR_VAR) {
            settings.log_directory = PathBuf::from(directory);
        }

        if settings.max_batch_size == 0 || settings.flush_interval_ms == 0 {
            tracing::warn!("批大小与刷新间隔至少为 1，初始化时将被修正");
        }

        Ok(())
    }
}
