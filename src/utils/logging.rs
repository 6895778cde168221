use std::env;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEBUG_ENV: &str = "VOXFLOW_DEBUG";

/// 日志配置
pub struct LoggingConfig;

impl LoggingConfig {
    /// 初始化日志系统
    ///
    /// 支持通过环境变量配置：
    /// - RUST_LOG: 设置日志级别（error, warn, info, debug, trace）
    /// - VOXFLOW_DEBUG: 启用详细调试输出（文件、行号、线程）
    ///
    /// 重复调用是安全的，已经安装过订阅器时直接忽略。
    ///
    /// ```no_run
    /// use voxflow::utils::LoggingConfig;
    ///
    /// LoggingConfig::init();
    /// tracing::info!("ready");
    /// ```
    pub fn init() {
        let is_debug = Self::is_debug();

        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(Self::default_directives(is_debug)));

        let fmt_layer = fmt::layer()
            .with_target(is_debug)
            .with_file(is_debug)
            .with_line_number(is_debug)
            .with_thread_ids(is_debug);

        let installed = tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .is_ok();

        if installed && is_debug {
            tracing::debug!("debug logging enabled");
        }
    }

    pub fn is_debug() -> bool {
        env::var(DEBUG_ENV).is_ok()
    }

    fn default_directives(is_debug: bool) -> &'static str {
        if is_debug {
            "voxflow=debug,info"
        } else {
            "voxflow=info,warn"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_directives_follow_debug_flag() {
        assert_eq!(LoggingConfig::default_directives(true), "voxflow=debug,info");
        assert_eq!(LoggingConfig::default_directives(false), "voxflow=info,warn");
    }

    #[test]
    fn init_twice_is_harmless() {
        LoggingConfig::init();
        LoggingConfig::init();
        tracing::info!("logging initialized");
    }
}
