//! shuvlog 构建脚本
//!
//! 此脚本负责：
//! 1. 采集构建元数据（构建类型、编译器版本、编译参数）
//! 2. 以 `rustc-env` 的形式导出，供 `BuildInfo::from_build` 在会话头中使用

use chrono::Utc;
use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=RUSTFLAGS");
    println!("cargo:rerun-if-env-changed=CARGO_ENCODED_RUSTFLAGS");

    let profile = env::var("PROFILE").unwrap_or_else(|_| "Unknown".to_string());
    println!("cargo:rustc-env=SHUVLOG_BUILD_PROFILE={}", capitalize(&profile));

    println!("cargo:rustc-env=SHUVLOG_RUSTC_VERSION={}", rustc_version());
    println!("cargo:rustc-env=SHUVLOG_RUSTFLAGS={}", rustflags());

    let target = env::var("TARGET").unwrap_or_else(|_| "Unknown".to_string());
    println!("cargo:rustc-env=SHUVLOG_TARGET={}", target);

    // 输出构建信息
    println!(
        "cargo:rustc-env=SHUVLOG_BUILD_TIME={}",
        Utc::now().to_rfc3339()
    );
}

/// 获取编译器版本，例如 `rustc 1.80.0 (051478957 2024-07-21)`
fn rustc_version() -> String {
    let rustc = env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());

    Command::new(rustc)
        .arg("--version")
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
        .filter(|version| !version.is_empty())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// 获取编译参数，`CARGO_ENCODED_RUSTFLAGS` 以 0x1f 分隔
fn rustflags() -> String {
    let flags = env::var("CARGO_ENCODED_RUSTFLAGS")
        .map(|encoded| encoded.split('\x1f').collect::<Vec<_>>().join(" "))
        .unwrap_or_default();

    if flags.trim().is_empty() {
        "None".to_string()
    } else {
        flags
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
