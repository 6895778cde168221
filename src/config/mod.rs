pub mod env;

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, VoxFlowError};
use crate::utils::ConfigValidator;

pub use env::EnvConfig;

pub const DEFAULT_DISCOVERY_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_PUSH_TIMEOUT_MS: u64 = 15_000;
pub const DEFAULT_WEBHOOK_TIMEOUT_MS: u64 = 10_000;

const ENV_REMOTE_BASE_URL: &str = "VOXFLOW_REMOTE_BASE_URL";
const ENV_REMOTE_API_KEY: &str = "VOXFLOW_REMOTE_API_KEY";
const ENV_INTEGRATION_BASE_URL: &str = "VOXFLOW_INTEGRATION_BASE_URL";
const ENV_DISCOVERY_TIMEOUT_MS: &str = "VOXFLOW_DISCOVERY_TIMEOUT_MS";
const ENV_PUSH_TIMEOUT_MS: &str = "VOXFLOW_PUSH_TIMEOUT_MS";
const ENV_WEBHOOK_TIMEOUT_MS: &str = "VOXFLOW_WEBHOOK_TIMEOUT_MS";

/// 远端语音 Agent 配置 API 的连接信息
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemoteConfig {
    pub base_url: String,
    /// 支持 `${VAR}` 引用环境变量，为空时读取 VOXFLOW_REMOTE_API_KEY
    #[serde(default)]
    pub api_key: String,
}

/// 部署流水线配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeployConfig {
    pub remote: RemoteConfig,
    /// 调度 / CRM 工具模板的相对地址以此为基准
    pub integration_base_url: String,
    #[serde(default = "default_discovery_timeout_ms")]
    pub discovery_timeout_ms: u64,
    #[serde(default = "default_push_timeout_ms")]
    pub push_timeout_ms: u64,
    #[serde(default = "default_webhook_timeout_ms")]
    pub webhook_timeout_ms: u64,
}

fn default_discovery_timeout_ms() -> u64 {
    DEFAULT_DISCOVERY_TIMEOUT_MS
}

fn default_push_timeout_ms() -> u64 {
    DEFAULT_PUSH_TIMEOUT_MS
}

fn default_webhook_timeout_ms() -> u64 {
    DEFAULT_WEBHOOK_TIMEOUT_MS
}

impl DeployConfig {
    pub fn new(
        remote_base_url: impl Into<String>,
        integration_base_url: impl Into<String>,
    ) -> Self {
        Self {
            remote: RemoteConfig {
                base_url: remote_base_url.into(),
                api_key: String::new(),
            },
            integration_base_url: integration_base_url.into(),
            discovery_timeout_ms: DEFAULT_DISCOVERY_TIMEOUT_MS,
            push_timeout_ms: DEFAULT_PUSH_TIMEOUT_MS,
            webhook_timeout_ms: DEFAULT_WEBHOOK_TIMEOUT_MS,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.remote.api_key = api_key.into();
        self
    }

    pub fn with_timeouts(mut self, discovery_ms: u64, push_ms: u64) -> Self {
        self.discovery_timeout_ms = discovery_ms;
        self.push_timeout_ms = push_ms;
        self
    }

    /// 从环境变量加载
    pub fn from_env() -> Result<Self> {
        let config = Self {
            remote: RemoteConfig {
                base_url: EnvConfig::get_env(ENV_REMOTE_BASE_URL)?,
                api_key: EnvConfig::get_env_optional(ENV_REMOTE_API_KEY).unwrap_or_default(),
            },
            integration_base_url: EnvConfig::get_env(ENV_INTEGRATION_BASE_URL)?,
            discovery_timeout_ms: EnvConfig::get_millis(
                ENV_DISCOVERY_TIMEOUT_MS,
                DEFAULT_DISCOVERY_TIMEOUT_MS,
            )?,
            push_timeout_ms: EnvConfig::get_millis(ENV_PUSH_TIMEOUT_MS, DEFAULT_PUSH_TIMEOUT_MS)?,
            webhook_timeout_ms: EnvConfig::get_millis(
                ENV_WEBHOOK_TIMEOUT_MS,
                DEFAULT_WEBHOOK_TIMEOUT_MS,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    /// 从 JSON 文件加载
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            VoxFlowError::Config(format!("failed to read `{}`: {e}", path.display()))
        })?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|e| VoxFlowError::Config(format!("invalid deploy config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ConfigValidator::validate_url(&self.remote.base_url)?;
        ConfigValidator::validate_url(&self.integration_base_url)?;
        ConfigValidator::validate_timeout_ms("discovery_timeout_ms", self.discovery_timeout_ms)?;
        ConfigValidator::validate_timeout_ms("push_timeout_ms", self.push_timeout_ms)?;
        ConfigValidator::validate_timeout_ms("webhook_timeout_ms", self.webhook_timeout_ms)?;
        Ok(())
    }

    /// 解析后的 API Key，`${VAR}` 会展开
    pub fn api_key(&self) -> Result<String> {
        let key = EnvConfig::resolve_secret(&self.remote.api_key, ENV_REMOTE_API_KEY)?;
        ConfigValidator::validate_api_key(&key)?;
        Ok(key)
    }

    pub fn discovery_timeout(&self) -> Duration {
        Duration::from_millis(self.discovery_timeout_ms)
    }

    pub fn push_timeout(&self) -> Duration {
        Duration::from_millis(self.push_timeout_ms)
    }
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080", "http://localhost:3000")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_config_fills_default_timeouts() {
        let config = DeployConfig::from_json_str(
            r#"{
                "remote": { "base_url": "https://voice.example.com/v2", "api_key": "key_live_123456" },
                "integration_base_url": "https://portal.example.com/api"
            }"#,
        )
        .unwrap();
        assert_eq!(config.discovery_timeout_ms, DEFAULT_DISCOVERY_TIMEOUT_MS);
        assert_eq!(config.push_timeout_ms, DEFAULT_PUSH_TIMEOUT_MS);
        assert_eq!(config.webhook_timeout_ms, DEFAULT_WEBHOOK_TIMEOUT_MS);
        assert_eq!(config.api_key().unwrap(), "key_live_123456");
    }

    #[test]
    fn json_config_rejects_bad_url() {
        let result = DeployConfig::from_json_str(
            r#"{ "remote": { "base_url": "voice.example.com" }, "integration_base_url": "https://x" }"#,
        );
        assert!(matches!(result, Err(VoxFlowError::Config(_))));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let config = DeployConfig::default().with_timeouts(0, 10);
        assert!(config.validate().is_err());
    }
}
