//! 时间戳格式化

use chrono::{DateTime, Local};

/// 时间戳样式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampStyle {
    /// 只显示时间部分
    pub time_only: bool,
    /// 显示毫秒
    pub milliseconds: bool,
}

impl Default for TimestampStyle {
    fn default() -> Self {
        Self {
            time_only: false,
            milliseconds: true,
        }
    }
}

/// 按样式格式化时间戳
///
/// 完整格式为 `2025-01-31 14:03:07.042`。
pub fn format_timestamp(timestamp: &DateTime<Local>, style: TimestampStyle) -> String {
    let pattern = match (style.time_only, style.milliseconds) {
        (true, true) => "%H:%M:%S%.3f",
        (true, false) => "%H:%M:%S",
        (false, true) => "%Y-%m-%d %H:%M:%S%.3f",
        (false, false) => "%Y-%m-%d %H:%M:%S",
    };
    timestamp.format(pattern).to_string()
}

/// 文件名安全的时间戳，例如 `2025-01-31_14-03-07`
pub fn file_safe_timestamp(timestamp: &DateTime<Local>) -> String {
    timestamp.format("%Y-%m-%d_%H-%M-%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2025, 1, 31, 14, 3, 7)
            .single()
            .unwrap()
            + chrono::Duration::milliseconds(42)
    }

    #[test]
    fn test_format_styles() {
        let ts = sample();
        assert_eq!(format_timestamp(&ts, TimestampStyle::default()), "2025-01-31 14:03:07.042");
        assert_eq!(
            format_timestamp(&ts, TimestampStyle { time_only: true, milliseconds: true }),
            "14:03:07.042"
        );
        assert_eq!(
            format_timestamp(&ts, TimestampStyle { time_only: true, milliseconds: false }),
            "14:03:07"
        );
        assert_eq!(
            format_timestamp(&ts, TimestampStyle { time_only: false, milliseconds: false }),
            "2025-01-31 14:03:07"
        );
    }

    #[test]
    fn test_file_safe_timestamp() {
        let stamp = file_safe_timestamp(&sample());
        assert_eq!(stamp, "2025-01-31_14-03-07");
        assert!(!stamp.contains(':'));
    }
}
