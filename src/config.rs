//! 定义 shuvlog 日志引擎的所有配置结构体。
//!
//! 配置使用 TOML 描述，例如：
//!
//! ```toml
//! project_name = "demo"
//!
//! [settings]
//! minimum_level = "DEBUG"
//! max_batch_size = 32
//!
//! [[sinks]]
//! type = "console"
//!
//! [[sinks]]
//! type = "json_file"
//! path = "logs/demo.json"
//! filter = { mode = "explicit_mask", levels = ["ERROR", "FATAL"] }
//! ```

use crate::core::level::{Level, LevelMask};
use crate::error::{Result, ShuvlogError};
use crate::sinks::filter::{FilterMode, SinkFilter};
use crate::sinks::format::SinkFormat;
use crate::utils::FileTools;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

// --- 辅助函数，用于提供配置项的默认值 ---
fn default_project_name() -> String {
    "shuvlog".to_string()
}
fn default_minimum_level() -> Level {
    Level::Info
}
fn default_max_batch_size() -> usize {
    64
}
fn default_flush_interval_ms() -> u64 {
    250
}
fn default_log_directory() -> PathBuf {
    PathBuf::from("logs")
}
fn default_console_format() -> SinkFormat {
    SinkFormat::console()
}

/// 引擎级设置，在 `initialize` 时取快照
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// 全局最低级别，低于此级别的事件在入队前丢弃
    #[serde(default = "default_minimum_level")]
    pub minimum_level: Level,
    /// worker 每批最多处理的事件数
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,
    /// worker 最长等待时间（毫秒）
    #[serde(default = "default_flush_interval_ms")]
    pub flush_interval_ms: u64,
    /// 日志目录，`initialize` 时创建
    #[serde(default = "default_log_directory")]
    pub log_directory: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            minimum_level: default_minimum_level(),
            max_batch_size: default_max_batch_size(),
            flush_interval_ms: default_flush_interval_ms(),
            log_directory: default_log_directory(),
        }
    }
}

impl Settings {
    pub fn with_minimum_level(mut self, level: Level) -> Self {
        self.minimum_level = level;
        self
    }

    pub fn with_max_batch_size(mut self, size: usize) -> Self {
        self.max_batch_size = size;
        self
    }

    pub fn with_flush_interval_ms(mut self, interval_ms: u64) -> Self {
        self.flush_interval_ms = interval_ms;
        self
    }

    pub fn with_log_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.log_directory = directory.into();
        self
    }

    /// 批大小与刷新间隔至少为 1
    pub fn sanitized(mut self) -> Self {
        self.max_batch_size = self.max_batch_size.max(1);
        self.flush_interval_ms = self.flush_interval_ms.max(1);
        self
    }

    pub fn flush_interval(&self) -> Duration {
        Duration::from_millis(self.flush_interval_ms)
    }
}

/// Sink 过滤配置
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct FilterConfig {
    #[serde(default)]
    pub mode: FilterMode,
    /// 级别列表，按位或组合成掩码
    #[serde(default)]
    pub levels: Vec<Level>,
}

impl FilterConfig {
    pub fn mask(&self) -> LevelMask {
        match self.mode {
            FilterMode::AcceptAll if self.levels.is_empty() => LevelMask::ALL,
            _ => self.levels.iter().copied().collect(),
        }
    }

    /// 校验并转换为过滤器
    pub fn to_filter(&self) -> Result<SinkFilter> {
        SinkFilter::new(self.mode, self.mask())
    }
}

/// 控制台 sink 配置
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConsoleSinkConfig {
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default = "default_console_format")]
    pub format: SinkFormat,
}

impl Default for ConsoleSinkConfig {
    fn default() -> Self {
        Self {
            filter: FilterConfig::default(),
            format: default_console_format(),
        }
    }
}

/// 文件 sink 配置
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct FileSinkConfig {
    /// 输出路径，缺省时在日志目录下生成 `{project}_{timestamp}.{ext}`
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub format: SinkFormat,
}

impl FileSinkConfig {
    /// 实际输出路径
    pub fn resolve_path(&self, project_name: &str, log_directory: &Path, extension: &str) -> PathBuf {
        match &self.path {
            Some(path) => path.clone(),
            None => log_directory.join(FileTools::generate_log_file_name(project_name, extension)),
        }
    }
}

/// 单个 sink 的配置
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum SinkConfig {
    #[serde(rename = "console")]
    Console(ConsoleSinkConfig),
    #[serde(rename = "log_file")]
    LogFile(FileSinkConfig),
    #[serde(rename = "json_file")]
    JsonFile(FileSinkConfig),
    #[serde(rename = "ndjson_file")]
    NdJsonFile(FileSinkConfig),
}

impl SinkConfig {
    pub fn filter(&self) -> &FilterConfig {
        match self {
            SinkConfig::Console(config) => &config.filter,
            SinkConfig::LogFile(config)
            | SinkConfig::JsonFile(config)
            | SinkConfig::NdJsonFile(config) => &config.filter,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            SinkConfig::Console(_) => "console",
            SinkConfig::LogFile(_) => "log_file",
            SinkConfig::JsonFile(_) => "json_file",
            SinkConfig::NdJsonFile(_) => "ndjson_file",
        }
    }
}

/// shuvlog 日志引擎的顶层配置结构体。
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggerConfig {
    #[serde(default = "default_project_name")]
    pub project_name: String,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub sinks: Vec<SinkConfig>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            project_name: default_project_name(),
            settings: Settings::default(),
            sinks: Vec::new(),
        }
    }
}

/// 用于从 TOML 文件加载 `LoggerConfig` 的辅助函数。
pub fn load_config_from_file(path: &Path) -> Result<LoggerConfig> {
    if !path.exists() {
        return Err(ShuvlogError::ConfigFileMissing(
            path.to_string_lossy().into_owned(),
        ));
    }

    let config_str = std::fs::read_to_string(path)?;
    load_config_from_str(&config_str)
}

/// 用于从 TOML 字符串加载 `LoggerConfig` 的辅助函数。
pub fn load_config_from_str(config_str: &str) -> Result<LoggerConfig> {
    toml::from_str(config_str).map_err(|e| ShuvlogError::ConfigError(format!("TOML解析失败: {}", e)))
}

/// 验证配置的有效性。
pub fn validate_config(config: &LoggerConfig) -> Result<()> {
    if config.project_name.trim().is_empty() {
        return Err(ShuvlogError::config("项目名称不能为空"));
    }

    if config.settings.max_batch_size == 0 {
        return Err(ShuvlogError::config("批大小必须大于0"));
    }

    if config.settings.flush_interval_ms == 0 {
        return Err(ShuvlogError::config("刷新间隔必须大于0"));
    }

    let consoles = config
        .sinks
        .iter()
        .filter(|sink| matches!(sink, SinkConfig::Console(_)))
        .count();
    if consoles > 1 {
        return Err(ShuvlogError::duplicate("console"));
    }

    for sink in &config.sinks {
        sink.filter().to_filter()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggerConfig::default();
        assert_eq!(config.project_name, "shuvlog");
        assert_eq!(config.settings.minimum_level, Level::Info);
        assert_eq!(config.settings.max_batch_size, 64);
        assert_eq!(config.settings.flush_interval_ms, 250);
        assert_eq!(config.settings.log_directory, PathBuf::from("logs"));
        assert!(config.sinks.is_empty());
    }

    #[test]
    fn test_settings_sanitized() {
        let settings = Settings::default()
            .with_max_batch_size(0)
            .with_flush_interval_ms(0)
            .sanitized();
        assert_eq!(settings.max_batch_size, 1);
        assert_eq!(settings.flush_interval(), Duration::from_millis(1));
    }

    #[test]
    fn test_load_full_config() {
        let config = load_config_from_str(
            r#"
            project_name = "demo"

            [settings]
            minimum_level = "debug_unused"
            "#,
        );
        assert!(config.is_err());

        let config = load_config_from_str(
            r#"
            project_name = "demo"

            [settings]
            minimum_level = "DEBUG"
            max_batch_size = 8

            [[sinks]]
            type = "console"
            filter = { mode = "minimum_level", levels = ["WARNING"] }

            [[sinks]]
            type = "log_file"
            path = "out.log"
            format = { show_thread_id = false }

            [[sinks]]
            type = "ndjson_file"
            filter = { mode = "explicit_mask", levels = ["ERROR", "FATAL"] }
            "#,
        )
        .unwrap();

        assert_eq!(config.project_name, "demo");
        assert_eq!(config.settings.minimum_level, Level::Debug);
        assert_eq!(config.settings.max_batch_size, 8);
        assert_eq!(config.settings.flush_interval_ms, 250);
        assert_eq!(config.sinks.len(), 3);

        match &config.sinks[0] {
            SinkConfig::Console(console) => {
                assert_eq!(console.filter.to_filter().unwrap(), SinkFilter::minimum(Level::Warning));
                assert!(console.format.colored);
            }
            other => panic!("unexpected sink: {other:?}"),
        }
        match &config.sinks[1] {
            SinkConfig::LogFile(file) => {
                assert_eq!(file.path, Some(PathBuf::from("out.log")));
                assert!(!file.format.show_thread_id);
            }
            other => panic!("unexpected sink: {other:?}"),
        }
        assert_eq!(config.sinks[2].filter().mask(), Level::Error | Level::Fatal);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_unknown_fields_rejected() {
        assert!(load_config_from_str("unknown = 1").is_err());
        assert!(load_config_from_str("[[sinks]]\ntype = \"console\"\npath = \"x.log\"").is_err());
        assert!(load_config_from_str("[[sinks]]\ntype = \"socket\"").is_err());
    }

    #[test]
    fn test_validate_config() {
        let mut config = LoggerConfig::default();
        config.sinks.push(SinkConfig::Console(ConsoleSinkConfig::default()));
        assert!(validate_config(&config).is_ok());

        config.sinks.push(SinkConfig::Console(ConsoleSinkConfig::default()));
        assert!(matches!(validate_config(&config), Err(ShuvlogError::DuplicateSink(_))));

        let mut config = LoggerConfig::default();
        config.sinks.push(SinkConfig::JsonFile(FileSinkConfig {
            filter: FilterConfig {
                mode: FilterMode::MinimumLevel,
                levels: vec![Level::Info, Level::Error],
            },
            ..FileSinkConfig::default()
        }));
        assert!(matches!(validate_config(&config), Err(ShuvlogError::InvalidLevel(_))));

        let mut config = LoggerConfig::default();
        config.settings.max_batch_size = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_generated_path() {
        let config = FileSinkConfig::default();
        let path = config.resolve_path("demo", Path::new("logs"), "json");
        assert!(path.starts_with("logs"));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("demo_") && name.ends_with(".json"));

        let explicit = FileSinkConfig {
            path: Some(PathBuf::from("custom.json")),
            ..FileSinkConfig::default()
        };
        assert_eq!(explicit.resolve_path("demo", Path::new("logs"), "json"), PathBuf::from("custom.json"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_config_from_file(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ShuvlogError::ConfigFileMissing(_)));
    }
}
