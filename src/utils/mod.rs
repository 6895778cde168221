/// 工具模块 - 日志初始化与配置校验
pub mod logging;
pub mod validation;

pub use logging::LoggingConfig;
pub use validation::ConfigValidator;

/// 空白字符串视为缺失字段
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
