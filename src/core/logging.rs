//! 日志初始化
//!
//! 配置tracing日志框架。`RUST_LOG`环境变量优先于配置文件中的级别。

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// 初始化日志系统
///
/// 可以重复调用，只有第一次生效（宿主进程可能已经安装了订阅者）。
pub fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(config.ansi)
        .with_target(config.show_target)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(target: "bridge", level = %config.level, "Logging initialized");
    } else {
        tracing::debug!(target: "bridge", "Global subscriber already installed, keeping it");
    }
}
