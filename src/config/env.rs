use crate::error::{Result, VoxFlowError};
use std::env;

/// 环境变量配置管理
pub struct EnvConfig;

impl EnvConfig {
    /// 解析密钥
    ///
    /// 优先级：
    /// 1. 直接传入的值（如果不以 ${} 包裹）
    /// 2. `${VAR_NAME}` 形式时读取对应环境变量
    /// 3. 值为空时读取 `default_env_var`
    pub fn resolve_secret(value: &str, default_env_var: &str) -> Result<String> {
        if let Some(name) = value.strip_prefix("${").and_then(|v| v.strip_suffix('}')) {
            Self::get_env(name)
        } else if value.trim().is_empty() {
            Self::get_env(default_env_var)
        } else {
            Ok(value.to_string())
        }
    }

    /// 从环境变量获取值
    pub fn get_env(key: &str) -> Result<String> {
        env::var(key).map_err(|_| {
            VoxFlowError::Config(format!(
                "environment variable `{key}` is not set"
            ))
        })
    }

    /// 获取可选的环境变量
    pub fn get_env_optional(key: &str) -> Option<String> {
        env::var(key).ok().filter(|v| !v.trim().is_empty())
    }

    /// 读取毫秒数，未设置时使用默认值
    pub fn get_millis(key: &str, default: u64) -> Result<u64> {
        match Self::get_env_optional(key) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                VoxFlowError::Config(format!("`{key}` must be a whole number of milliseconds"))
            }),
            None => Ok(default),
        }
    }
}
