use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::time::sleep;

use super::{AgentDirectory, AgentRecord, BindingShape, ConfigPatch, EngineBinding, LlmConfig};
use crate::error::{Result, VoxFlowError};

/// 一次被接受的写调用
#[derive(Clone, Debug, PartialEq)]
pub struct PushRecord {
    pub target: BindingShape,
    pub patch: ConfigPatch,
}

#[derive(Default)]
struct DirectoryState {
    agents: HashMap<String, AgentRecord>,
    llms: HashMap<String, LlmConfig>,
    pushes: Vec<PushRecord>,
    fail_agent_reads: bool,
    fail_llm_reads: bool,
    fail_pushes: bool,
    read_delay: Option<Duration>,
    push_delay: Option<Duration>,
}

/// 内存中的远端 Agent 目录，用于 dry-run 和测试
///
/// 写调用会真正修改内存中的配置，因此后续发现能看到上一次部署的结果。
#[derive(Default)]
pub struct MemoryAgentDirectory {
    inner: RwLock<DirectoryState>,
}

impl MemoryAgentDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_agent(self, record: AgentRecord) -> Self {
        self.insert_agent(record);
        self
    }

    pub fn with_llm(self, llm: LlmConfig) -> Self {
        self.insert_llm(llm);
        self
    }

    pub fn insert_agent(&self, record: AgentRecord) {
        self.inner.write().agents.insert(record.agent_id.clone(), record);
    }

    pub fn insert_llm(&self, llm: LlmConfig) {
        self.inner.write().llms.insert(llm.llm_id.clone(), llm);
    }

    pub fn agent(&self, agent_id: &str) -> Option<AgentRecord> {
        self.inner.read().agents.get(agent_id).cloned()
    }

    pub fn llm(&self, llm_id: &str) -> Option<LlmConfig> {
        self.inner.read().llms.get(llm_id).cloned()
    }

    /// 所有被接受的写调用，按时间顺序
    pub fn pushes(&self) -> Vec<PushRecord> {
        self.inner.read().pushes.clone()
    }

    pub fn fail_agent_reads(&self, fail: bool) {
        self.inner.write().fail_agent_reads = fail;
    }

    pub fn fail_llm_reads(&self, fail: bool) {
        self.inner.write().fail_llm_reads = fail;
    }

    pub fn fail_pushes(&self, fail: bool) {
        self.inner.write().fail_pushes = fail;
    }

    pub fn set_read_delay(&self, delay: Option<Duration>) {
        self.inner.write().read_delay = delay;
    }

    pub fn set_push_delay(&self, delay: Option<Duration>) {
        self.inner.write().push_delay = delay;
    }

    async fn pause(delay: Option<Duration>) {
        if let Some(delay) = delay {
            sleep(delay).await;
        }
    }

    fn record_push(&self, target: BindingShape, patch: &ConfigPatch) -> Result<()> {
        let mut state = self.inner.write();
        if state.fail_pushes {
            return Err(VoxFlowError::RemotePushFailed(
                "remote rejected the configuration update".into(),
            ));
        }
        match &target {
            BindingShape::LlmBound { llm_id } => {
                let llm = state.llms.get_mut(llm_id).ok_or_else(|| {
                    VoxFlowError::RemotePushFailed(format!("llm `{llm_id}` not found"))
                })?;
                llm.tools = patch.tools.clone();
                llm.instruction_script = Some(patch.instruction_script.clone());
            }
            BindingShape::Inline { agent_id } => {
                let agent = state.agents.get_mut(agent_id).ok_or_else(|| {
                    VoxFlowError::RemotePushFailed(format!("agent `{agent_id}` not found"))
                })?;
                agent.response_engine = Some(EngineBinding::Inline {
                    tools: patch.tools.clone(),
                    instruction_script: Some(patch.instruction_script.clone()),
                });
            }
        }
        state.pushes.push(PushRecord {
            target,
            patch: patch.clone(),
        });
        Ok(())
    }
}

#[async_trait]
impl AgentDirectory for MemoryAgentDirectory {
    async fn fetch_agent(&self, agent_id: &str) -> Result<AgentRecord> {
        let delay = self.inner.read().read_delay;
        Self::pause(delay).await;
        let state = self.inner.read();
        if state.fail_agent_reads {
            return Err(VoxFlowError::RemoteDiscovery("agent read failed".into()));
        }
        state
            .agents
            .get(agent_id)
            .cloned()
            .ok_or_else(|| VoxFlowError::RemoteDiscovery(format!("agent `{agent_id}` not found")))
    }

    async fn fetch_llm(&self, llm_id: &str) -> Result<LlmConfig> {
        let delay = self.inner.read().read_delay;
        Self::pause(delay).await;
        let state = self.inner.read();
        if state.fail_llm_reads {
            return Err(VoxFlowError::RemoteDiscovery("llm read failed".into()));
        }
        state
            .llms
            .get(llm_id)
            .cloned()
            .ok_or_else(|| VoxFlowError::RemoteDiscovery(format!("llm `{llm_id}` not found")))
    }

    async fn update_llm(&self, llm_id: &str, patch: &ConfigPatch) -> Result<()> {
        let delay = self.inner.read().push_delay;
        Self::pause(delay).await;
        self.record_push(
            BindingShape::LlmBound {
                llm_id: llm_id.to_string(),
            },
            patch,
        )
    }

    async fn update_agent(&self, agent_id: &str, patch: &ConfigPatch) -> Result<()> {
        let delay = self.inner.read().push_delay;
        Self::pause(delay).await;
        self.record_push(
            BindingShape::Inline {
                agent_id: agent_id.to_string(),
            },
            patch,
        )
    }
}
