use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, VoxFlowError>;

/// 对调用方统一展示的失败文案，具体原因只进日志
pub const GENERIC_DEPLOY_FAILURE: &str = "deployment failed";

#[derive(Debug, Error)]
pub enum VoxFlowError {
    #[error("flow `{0}` not found")]
    FlowNotFound(String),
    #[error("flow `{0}` has no linked agent")]
    AgentNotLinked(String),
    #[error("invalid flow: {0}")]
    InvalidFlow(String),
    /// 只在发现阶段内部使用，会被降级为空的远端工具集
    #[error("remote discovery failed: {0}")]
    RemoteDiscovery(String),
    #[error("remote push failed: {0}")]
    RemotePushFailed(String),
    #[error("flow `{flow_id}` changed during deploy (expected version {expected}, found {found})")]
    PersistenceConflict {
        flow_id: String,
        expected: u64,
        found: u64,
    },
    #[error("deploy cancelled before push")]
    Cancelled,
    #[error("configuration error: {0}")]
    Config(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VoxFlowError {
    /// 冲突时远端已经被修改，重试前需要重新发现
    pub fn is_retryable(&self) -> bool {
        matches!(self, VoxFlowError::PersistenceConflict { .. })
    }

    pub fn to_error_body(&self) -> DeployErrorBody {
        DeployErrorBody {
            success: false,
            error: GENERIC_DEPLOY_FAILURE.to_string(),
            retryable: self.is_retryable(),
        }
    }
}

impl From<serde_json::Error> for VoxFlowError {
    fn from(err: serde_json::Error) -> Self {
        VoxFlowError::Serialization(err.to_string())
    }
}

/// 部署失败时返回给调用方的负载
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct DeployErrorBody {
    pub success: bool,
    pub error: String,
    pub retryable: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_conflicts_are_retryable() {
        let conflict = VoxFlowError::PersistenceConflict {
            flow_id: "f1".into(),
            expected: 2,
            found: 3,
        };
        assert!(conflict.is_retryable());
        assert!(!VoxFlowError::RemotePushFailed("502".into()).is_retryable());
        assert!(!VoxFlowError::AgentNotLinked("f1".into()).is_retryable());
    }

    #[test]
    fn error_body_hides_detail() {
        let body =
            VoxFlowError::RemotePushFailed("upstream said 500: secret".into()).to_error_body();
        assert!(!body.success);
        assert_eq!(body.error, GENERIC_DEPLOY_FAILURE);
        assert!(!body.retryable);
    }
}
