use crate::error::{Result, VoxFlowError};

/// 配置验证器
///
/// 只检查部署配置和结构性约束，不校验节点内容的业务语义（电话号码、
/// webhook 地址是否可达等）。
pub struct ConfigValidator;

impl ConfigValidator {
    /// 验证 API Key 格式
    pub fn validate_api_key(api_key: &str) -> Result<()> {
        if api_key.trim().is_empty() {
            return Err(VoxFlowError::Config("API key must not be empty".into()));
        }

        if api_key.starts_with("your_") || api_key.starts_with("${") {
            return Err(VoxFlowError::Config(
                "API key looks like a placeholder, provide a real key".into(),
            ));
        }

        Ok(())
    }

    /// 验证 URL 格式
    pub fn validate_url(url: &str) -> Result<()> {
        if url.is_empty() {
            return Err(VoxFlowError::Config("URL must not be empty".into()));
        }

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(VoxFlowError::Config(format!(
                "URL `{url}` must start with http:// or https://"
            )));
        }

        Ok(())
    }

    /// 验证节点 ID
    pub fn validate_node_id(node_id: &str) -> Result<()> {
        if node_id.trim().is_empty() {
            return Err(VoxFlowError::InvalidFlow("node id must not be empty".into()));
        }
        Ok(())
    }

    pub fn validate_timeout_ms(name: &str, timeout_ms: u64) -> Result<()> {
        if timeout_ms == 0 {
            return Err(VoxFlowError::Config(format!("{name} must be greater than zero")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_api_key() {
        assert!(ConfigValidator::validate_api_key("").is_err());
        assert!(ConfigValidator::validate_api_key("your_api_key_here").is_err());
        assert!(ConfigValidator::validate_api_key("${VOXFLOW_REMOTE_API_KEY}").is_err());
        assert!(ConfigValidator::validate_api_key("key_1234567890abcdef").is_ok());
    }

    #[test]
    fn test_validate_url() {
        assert!(ConfigValidator::validate_url("").is_err());
        assert!(ConfigValidator::validate_url("api.example.com").is_err());
        assert!(ConfigValidator::validate_url("http://localhost:8080").is_ok());
        assert!(ConfigValidator::validate_url("https://api.example.com").is_ok());
    }

    #[test]
    fn test_validate_node_id() {
        assert!(ConfigValidator::validate_node_id("").is_err());
        assert!(ConfigValidator::validate_node_id("   ").is_err());
        assert!(ConfigValidator::validate_node_id("node-1").is_ok());
    }

    #[test]
    fn test_validate_timeout() {
        assert!(ConfigValidator::validate_timeout_ms("push_timeout_ms", 0).is_err());
        assert!(ConfigValidator::validate_timeout_ms("push_timeout_ms", 1).is_ok());
    }
}
