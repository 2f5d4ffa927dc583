//! 构建信息
//!
//! 会话头部中展示的构建元数据。`from_build` 读取 `build.rs` 导出的编译期
//! 环境变量；宿主程序可以用 [`build_info!`](crate::build_info) 记录自身的版本。

use serde::Serialize;

const UNKNOWN: &str = "Unknown";

/// 构建元数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildInfo {
    /// 构建类型，例如 `Debug` / `Release`
    pub build_type: String,
    /// 版本号
    pub version: String,
    /// 编译器
    pub compiler: String,
    /// 编译参数
    pub compiler_flags: String,
    /// 构建系统
    pub build_system: String,
}

impl BuildInfo {
    pub fn new(
        build_type: impl Into<String>,
        version: impl Into<String>,
        compiler: impl Into<String>,
        compiler_flags: impl Into<String>,
        build_system: impl Into<String>,
    ) -> Self {
        Self {
            build_type: build_type.into(),
            version: version.into(),
            compiler: compiler.into(),
            compiler_flags: compiler_flags.into(),
            build_system: build_system.into(),
        }
    }

    /// 所有字段均为 "Unknown"
    pub fn unknown() -> Self {
        Self::new(UNKNOWN, UNKNOWN, UNKNOWN, UNKNOWN, UNKNOWN)
    }

    /// 以 shuvlog 自身的编译信息构建
    pub fn from_build() -> Self {
        Self::with_version(env!("CARGO_PKG_VERSION"))
    }

    /// 复用编译器信息，替换为宿主程序的版本号
    pub fn with_version(version: impl Into<String>) -> Self {
        let build_type = match option_env!("SHUVLOG_BUILD_PROFILE") {
            Some(profile) if !profile.is_empty() => profile,
            _ => UNKNOWN,
        };
        let flags = match option_env!("SHUVLOG_RUSTFLAGS") {
            Some(flags) if !flags.trim().is_empty() => flags,
            _ => "None",
        };

        Self::new(
            build_type,
            version,
            option_env!("SHUVLOG_RUSTC_VERSION").unwrap_or(UNKNOWN),
            flags,
            "Cargo",
        )
    }
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self::unknown()
    }
}

/// 以调用方 crate 的版本号构建 [`BuildInfo`]
///
/// 构建类型取调用方的 `debug_assertions`。
#[macro_export]
macro_rules! build_info {
    () => {{
        let mut info = $crate::utils::build_info::BuildInfo::with_version(env!("CARGO_PKG_VERSION"));
        info.build_type = if cfg!(debug_assertions) { "Debug" } else { "Release" }.to_string();
        info
    }};
}
