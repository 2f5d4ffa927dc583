//! Sink 级别过滤策略

use crate::core::level::{Level, LevelMask};
use crate::error::{Result, ShuvlogError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 过滤模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    /// 接收所有级别
    #[default]
    AcceptAll,
    /// 接收不低于阈值的级别，阈值必须是单一级别
    MinimumLevel,
    /// 只接收掩码中列出的级别
    ExplicitMask,
}

impl FilterMode {
    pub fn name(self) -> &'static str {
        match self {
            FilterMode::AcceptAll => "AcceptAll",
            FilterMode::MinimumLevel => "MinimumLevel",
            FilterMode::ExplicitMask => "ExplicitMask",
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sink 过滤状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SinkFilter {
    mode: FilterMode,
    mask: LevelMask,
}

impl Default for SinkFilter {
    fn default() -> Self {
        Self::accept_all()
    }
}

impl SinkFilter {
    /// 校验并创建过滤器
    ///
    /// `MinimumLevel` 模式下掩码必须恰好包含一个级别，否则返回
    /// [`ShuvlogError::InvalidLevel`]。
    pub fn new(mode: FilterMode, mask: impl Into<LevelMask>) -> Result<Self> {
        let mask = mask.into();
        if mode == FilterMode::MinimumLevel && !mask.is_single_level() {
            return Err(ShuvlogError::InvalidLevel(mask.bits()));
        }
        Ok(Self { mode, mask })
    }

    pub const fn accept_all() -> Self {
        Self {
            mode: FilterMode::AcceptAll,
            mask: LevelMask::ALL,
        }
    }

    pub fn minimum(level: Level) -> Self {
        Self {
            mode: FilterMode::MinimumLevel,
            mask: level.into(),
        }
    }

    pub fn explicit(mask: impl Into<LevelMask>) -> Self {
        Self {
            mode: FilterMode::ExplicitMask,
            mask: mask.into(),
        }
    }

    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    pub fn mask(&self) -> LevelMask {
        self.mask
    }

    /// 判断该级别是否通过过滤
    pub fn should_log(&self, level: Level) -> bool {
        match self.mode {
            FilterMode::AcceptAll => true,
            FilterMode::MinimumLevel => level.bits() >= self.mask.bits(),
            FilterMode::ExplicitMask => self.mask.contains(level),
        }
    }

    /// 头部中展示的级别描述
    pub fn describe_levels(&self) -> String {
        match self.mode {
            FilterMode::AcceptAll => "ALL".to_string(),
            FilterMode::MinimumLevel => format!(">= {}", self.mask),
            FilterMode::ExplicitMask if self.mask.is_empty() => "NONE".to_string(),
            FilterMode::ExplicitMask => self.mask.to_string(),
        }
    }
}

impl fmt::Display for SinkFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.mode, self.describe_levels())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimum_level_requires_single_bit() {
        let err = SinkFilter::new(FilterMode::MinimumLevel, Level::Error | Level::Fatal).unwrap_err();
        assert!(matches!(err, ShuvlogError::InvalidLevel(bits) if bits == 0b1_0100_0000));

        assert!(SinkFilter::new(FilterMode::MinimumLevel, LevelMask::EMPTY).is_err());
        assert!(SinkFilter::new(FilterMode::MinimumLevel, Level::Error).is_ok());
    }

    #[test]
    fn test_explicit_mask_accepts_any_combination() {
        let filter = SinkFilter::new(FilterMode::ExplicitMask, Level::Debug | Level::Error).unwrap();
        assert!(filter.should_log(Level::Debug));
        assert!(filter.should_log(Level::Error));
        assert!(!filter.should_log(Level::Info));
        assert!(!filter.should_log(Level::Fatal));
    }

    #[test]
    fn test_minimum_level_threshold() {
        let filter = SinkFilter::minimum(Level::Warning);
        assert!(!filter.should_log(Level::Info));
        assert!(filter.should_log(Level::Warning));
        assert!(filter.should_log(Level::Fatal));
    }

    #[test]
    fn test_accept_all() {
        let filter = SinkFilter::default();
        assert!(Level::ALL.iter().all(|level| filter.should_log(*level)));
        assert_eq!(filter.to_string(), "AcceptAll (ALL)");
    }

    #[test]
    fn test_describe_levels() {
        assert_eq!(SinkFilter::minimum(Level::Info).describe_levels(), ">= INFO");
        assert_eq!(
            SinkFilter::explicit(Level::Info | Level::Error).to_string(),
            "ExplicitMask (INFO | ERROR)"
        );
        assert_eq!(SinkFilter::explicit(LevelMask::EMPTY).describe_levels(), "NONE");
    }
}
