use std::fmt;

use serde::Serialize;
use tracing::debug;

/// 部署状态机
///
/// `Loaded → Discovering → Compiling → Merging → Pushing → Committed`，
/// 推送或提交失败进入终态 `Failed`。发现阶段的失败会被降级吸收，不会进入 `Failed`。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployStage {
    Loaded,
    Discovering,
    Compiling,
    Merging,
    Pushing,
    Committed,
    Failed,
}

impl DeployStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeployStage::Loaded => "loaded",
            DeployStage::Discovering => "discovering",
            DeployStage::Compiling => "compiling",
            DeployStage::Merging => "merging",
            DeployStage::Pushing => "pushing",
            DeployStage::Committed => "committed",
            DeployStage::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, DeployStage::Committed | DeployStage::Failed)
    }
}

impl fmt::Display for DeployStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 记录一次部署经过的阶段
#[derive(Debug)]
pub(crate) struct StageTracker {
    flow_id: String,
    history: Vec<DeployStage>,
}

impl StageTracker {
    pub fn start(flow_id: &str) -> Self {
        debug!(flow_id, stage = %DeployStage::Loaded, "deploy stage");
        Self {
            flow_id: flow_id.to_string(),
            history: vec![DeployStage::Loaded],
        }
    }

    pub fn enter(&mut self, stage: DeployStage) {
        debug!(flow_id = %self.flow_id, stage = %stage, "deploy stage");
        self.history.push(stage);
    }

    pub fn current(&self) -> DeployStage {
        self.history
            .last()
            .copied()
            .unwrap_or(DeployStage::Loaded)
    }

    pub fn into_history(self) -> Vec<DeployStage> {
        self.history
    }
}
