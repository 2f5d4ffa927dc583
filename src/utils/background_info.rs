//! 背景信息获取模块
//!
//! 提供获取系统背景信息的函数，包括线程ID、主机名、操作系统名称与内核版本。
//! 这些信息用于事件记录和会话头部。

#[cfg(target_os = "macos")]
use std::process::Command;

/// 获取当前线程ID
///
/// Linux 上为内核线程 ID，Windows 上为 `GetCurrentThreadId`，
/// 其他平台回退为标准库线程 ID 的哈希值。
pub fn get_tid() -> u64 {
    #[cfg(windows)]
    {
        // SAFETY: GetCurrentThreadId 无参数且总是成功
        unsafe { u64::from(winapi::um::processthreadsapi::GetCurrentThreadId()) }
    }

    #[cfg(target_os = "linux")]
    {
        // SAFETY: gettid 系统调用无参数且总是成功
        let tid = unsafe { libc::syscall(libc::SYS_gettid) };
        tid as u64
    }

    #[cfg(not(any(windows, target_os = "linux")))]
    {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        std::thread::current().id().hash(&mut hasher);
        hasher.finish()
    }
}

/// 获取主机名
///
/// 获取失败时返回 "Unknown"
pub fn get_hostname() -> String {
    hostname::get()
        .map(|name| name.to_string_lossy().into_owned())
        .ok()
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// 获取操作系统名称
///
/// Linux 读取 `/etc/os-release` 的 `NAME=` 字段，macOS 调用 `sw_vers`。
pub fn os_name() -> String {
    #[cfg(target_os = "linux")]
    {
        std::fs::read_to_string("/etc/os-release")
            .ok()
            .and_then(|content| parse_os_release_name(&content))
            .unwrap_or_else(|| "Linux".to_string())
    }

    #[cfg(target_os = "macos")]
    {
        match (sw_vers("-productName"), sw_vers("-productVersion")) {
            (Some(name), Some(version)) => format!("{} {}", name, version),
            _ => "macOS".to_string(),
        }
    }

    #[cfg(windows)]
    {
        "Windows".to_string()
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos", windows)))]
    {
        std::env::consts::OS.to_string()
    }
}

/// 获取内核版本描述，形如 `(build 6.8.0-45-generic)`
pub fn kernel_version() -> String {
    #[cfg(unix)]
    {
        #[cfg(target_os = "macos")]
        if let Some(build) = sw_vers("-buildVersion") {
            return format!("(build {})", build);
        }

        uname_release()
            .map(|release| format!("(build {})", release))
            .unwrap_or_else(|| "(unknown build)".to_string())
    }

    #[cfg(not(unix))]
    {
        "(unknown build)".to_string()
    }
}

/// 从 os-release 内容中提取 `NAME=` 的值
pub(crate) fn parse_os_release_name(content: &str) -> Option<String> {
    content
        .lines()
        .find_map(|line| line.strip_prefix("NAME="))
        .map(|value| value.trim().trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(unix)]
fn uname_release() -> Option<String> {
    // SAFETY: utsname 为纯数据结构，全零是合法初始值；uname 只写入该结构
    unsafe {
        let mut data: libc::utsname = std::mem::zeroed();
        if libc::uname(&mut data) != 0 {
            return None;
        }
        let release = std::ffi::CStr::from_ptr(data.release.as_ptr());
        Some(release.to_string_lossy().into_owned())
    }
}

#[cfg(target_os = "macos")]
fn sw_vers(flag: &str) -> Option<String> {
    Command::new("sw_vers")
        .arg(flag)
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
        .filter(|value| !value.is_empty())
}
