//! shuvlog 基本用法示例
//!
//! 运行：`cargo run --example basic_usage`
//!
//! 同时输出到控制台、`logs/` 下的纯文本日志、JSON 文档与 NDJSON 流，
//! 并演示多线程写入、线程标签以及 tracing 事件的桥接。

use shuvlog::sinks::{ConsoleSink, FilterMode, JsonFileSink, LogFileSink, NdJsonFileSink};
use shuvlog::{build_info, log_crit, log_debug, log_err, log_info, log_trace_r1, log_warn};
use shuvlog::{Level, Settings, ShuvlogLayer};
use std::thread;
use std::time::Duration;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() {
    shuvlog::initialize(
        "basic_usage",
        std::env::args().collect(),
        build_info!(),
        Settings::default()
            .with_minimum_level(Level::Debug)
            .with_log_directory("logs"),
    );

    shuvlog::add_sink(ConsoleSink::new());
    shuvlog::add_sink(LogFileSink::builder("logs/basic_usage.log").minimum_level(Level::TraceR1));
    shuvlog::add_sink(
        JsonFileSink::builder("logs/basic_usage.json")
            .filter(FilterMode::ExplicitMask, Level::Error | Level::Critical | Level::Fatal),
    );
    shuvlog::add_sink(NdJsonFileSink::builder("logs/basic_usage.ndjson"));

    // 扩展名不匹配，注册失败后以 ERROR 日志报告
    shuvlog::add_sink(LogFileSink::builder("logs/basic_usage.txt"));

    // 依赖库的 tracing 事件同样进入 shuvlog
    tracing_subscriber::registry().with(ShuvlogLayer::global()).init();

    log_info!("Demo started with {} sinks", shuvlog::logger().sink_count());
    log_debug!("Debug details: {:?}", std::env::current_dir().ok());

    let workers: Vec<_> = (0..3)
        .map(|id| {
            thread::spawn(move || {
                shuvlog::set_thread_label(format!("Worker-{}", id));
                for step in 0..5 {
                    log_trace_r1!("worker {} step {}", id, step);
                    thread::sleep(Duration::from_millis(5));
                }
                if id == 2 {
                    log_err!("worker {} hit a simulated failure", id);
                }
            })
        })
        .collect();
    for worker in workers {
        let _ = worker.join();
    }

    tracing::warn!(target: "demo::network", attempt = 3, "retrying request");
    log_warn!("Low disk space: {}% used", 93);
    log_crit!("Critical section reached");

    let snapshot = shuvlog::diagnostics();
    log_info!(
        "Diagnostics: {} enqueued, {} written, {} rejected sinks",
        snapshot.events_enqueued,
        snapshot.events_written,
        snapshot.sinks_rejected
    );

    shuvlog::shutdown();
}
