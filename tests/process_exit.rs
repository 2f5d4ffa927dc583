//! 进程退出时的隐式关闭
//!
//! 测试以子进程方式重新运行自身：子进程初始化全局引擎、记录日志后直接退出，
//! 不调用 `shutdown()`。父进程随后检查输出文件。

use shuvlog::sinks::LogFileSink;
use shuvlog::{Level, Settings};
use std::fs;
use std::process::Command;
use tempfile::TempDir;

const CHILD_LOG_PATH: &str = "EXIT_CHILD_LOG_PATH";
const TEST_NAME: &str = "test_pending_events_flushed_at_process_exit";

fn run_child(path: &str) -> ! {
    shuvlog::add_sink(LogFileSink::builder(path).minimum_level(Level::Debug));
    shuvlog::initialize(
        "exit-child",
        Vec::new(),
        shuvlog::build_info!(),
        Settings::default()
            .with_log_directory(std::env::temp_dir())
            .with_flush_interval_ms(5000),
    );
    shuvlog::log_info!("accepted just before exit");
    std::process::exit(0);
}

#[test]
fn test_pending_events_flushed_at_process_exit() -> anyhow::Result<()> {
    if let Ok(path) = std::env::var(CHILD_LOG_PATH) {
        run_child(&path);
    }

    let dir = TempDir::new()?;
    let path = dir.path().join("exit.log");
    let status = Command::new(std::env::current_exe()?)
        .args([TEST_NAME, "--exact", "--nocapture", "--test-threads=1"])
        .env(CHILD_LOG_PATH, &path)
        .status()?;
    assert!(status.success());

    let content = fs::read_to_string(&path)?;
    assert!(content.starts_with("/****"));
    assert!(content.contains("accepted just before exit"));
    assert!(content.contains("Shutting down logger, will dump remaining logs"));
    Ok(())
}
