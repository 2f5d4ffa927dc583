//! 日志级别模型
//!
//! 每个级别占用一个独立的比特位，因此多个级别可以通过按位或组合成
//! [`LevelMask`]，用于 sink 的显式掩码过滤。事件自身的级别永远只有一个比特位。

use colored::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

/// 日志严重级别
///
/// 数值越大越严重，`MinimumLevel` 过滤直接比较比特值。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u16)]
pub enum Level {
    Debug = 1 << 0,
    TraceR3 = 1 << 1,
    TraceR2 = 1 << 2,
    TraceR1 = 1 << 3,
    Info = 1 << 4,
    #[serde(alias = "WARN")]
    Warning = 1 << 5,
    Error = 1 << 6,
    Critical = 1 << 7,
    Fatal = 1 << 8,
}

impl Level {
    /// 按严重程度升序排列的全部级别
    pub const ALL: [Level; 9] = [
        Level::Debug,
        Level::TraceR3,
        Level::TraceR2,
        Level::TraceR1,
        Level::Info,
        Level::Warning,
        Level::Error,
        Level::Critical,
        Level::Fatal,
    ];

    /// 级别对应的比特值
    pub const fn bits(self) -> u16 {
        self as u16
    }

    /// 从单一比特值还原级别，多比特或未知比特返回 `None`
    pub fn from_bits(bits: u16) -> Option<Level> {
        Self::ALL.into_iter().find(|level| level.bits() == bits)
    }

    /// 显示名称
    pub const fn name(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::TraceR3 => "TRACE_R3",
            Level::TraceR2 => "TRACE_R2",
            Level::TraceR1 => "TRACE_R1",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
            Level::Fatal => "FATAL",
        }
    }

    /// 控制台渲染使用的颜色
    pub fn color(self) -> Option<Color> {
        match self {
            Level::Debug => Some(Color::Cyan),
            Level::TraceR3 => Some(Color::BrightBlack),
            Level::TraceR2 => Some(Color::Blue),
            Level::TraceR1 => Some(Color::BrightBlue),
            Level::Info => Some(Color::Green),
            Level::Warning => Some(Color::Yellow),
            Level::Error => Some(Color::Red),
            Level::Critical => Some(Color::BrightRed),
            Level::Fatal => Some(Color::BrightMagenta),
        }
    }

    /// 是否应写入标准错误
    pub fn is_error_class(self) -> bool {
        self >= Level::Error
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DEBUG" => Ok(Level::Debug),
            "TRACE_R3" => Ok(Level::TraceR3),
            "TRACE_R2" => Ok(Level::TraceR2),
            "TRACE_R1" => Ok(Level::TraceR1),
            "INFO" => Ok(Level::Info),
            "WARN" | "WARNING" => Ok(Level::Warning),
            "ERROR" => Ok(Level::Error),
            "CRITICAL" => Ok(Level::Critical),
            "FATAL" => Ok(Level::Fatal),
            _ => Err(format!("Invalid log level: {}", s)),
        }
    }
}

/// 级别掩码，多个级别按位或的组合
///
/// 只能作为过滤规格使用，不能作为事件级别。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LevelMask(u16);

impl LevelMask {
    /// 不包含任何级别
    pub const EMPTY: LevelMask = LevelMask(0);

    /// 包含全部已知级别
    pub const ALL: LevelMask = LevelMask(0x01FF);

    pub const fn from_bits(bits: u16) -> Self {
        LevelMask(bits)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn contains(self, level: Level) -> bool {
        self.0 & level.bits() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// 是否恰好设置了一个比特位
    pub const fn is_single_level(self) -> bool {
        self.0 != 0 && (self.0 & (self.0 - 1)) == 0
    }

    /// 将掩码拆分为单一级别，按严重程度升序，未知比特被忽略
    pub fn levels(self) -> Vec<Level> {
        Level::ALL
            .into_iter()
            .filter(|level| self.contains(*level))
            .collect()
    }
}

impl From<Level> for LevelMask {
    fn from(level: Level) -> Self {
        LevelMask(level.bits())
    }
}

impl FromIterator<Level> for LevelMask {
    fn from_iter<I: IntoIterator<Item = Level>>(iter: I) -> Self {
        iter.into_iter().fold(LevelMask::EMPTY, |mask, level| mask | level)
    }
}

impl BitOr for Level {
    type Output = LevelMask;

    fn bitor(self, rhs: Level) -> LevelMask {
        LevelMask(self.bits() | rhs.bits())
    }
}

impl BitOr<Level> for LevelMask {
    type Output = LevelMask;

    fn bitor(self, rhs: Level) -> LevelMask {
        LevelMask(self.0 | rhs.bits())
    }
}

impl BitOr for LevelMask {
    type Output = LevelMask;

    fn bitor(self, rhs: LevelMask) -> LevelMask {
        LevelMask(self.0 | rhs.0)
    }
}

impl BitOrAssign<Level> for LevelMask {
    fn bitor_assign(&mut self, rhs: Level) {
        self.0 |= rhs.bits();
    }
}

impl fmt::Display for LevelMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.levels().into_iter().map(Level::name).collect();
        write!(f, "{}", names.join(" | "))
    }
}
