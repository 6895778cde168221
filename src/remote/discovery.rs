use std::fmt;
use std::time::Duration;

use serde::Serialize;
use tokio::time::timeout;
use tracing::{debug, warn};

use super::{AgentDirectory, EngineBinding};
use crate::tools::ToolDescriptor;

/// 工具列表所在位置，由发现阶段决定
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum BindingShape {
    LlmBound { llm_id: String },
    Inline { agent_id: String },
}

/// 读取失败时降级的原因；只记录和记日志，不会作为错误返回
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DegradeReason {
    AgentProbeFailed(String),
    AgentProbeTimedOut,
    NoEngineBinding,
    LlmReadFailed(String),
    LlmReadTimedOut,
}

impl fmt::Display for DegradeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DegradeReason::AgentProbeFailed(detail) => write!(f, "agent probe failed: {detail}"),
            DegradeReason::AgentProbeTimedOut => write!(f, "agent probe timed out"),
            DegradeReason::NoEngineBinding => write!(f, "agent has no engine binding"),
            DegradeReason::LlmReadFailed(detail) => write!(f, "llm read failed: {detail}"),
            DegradeReason::LlmReadTimedOut => write!(f, "llm read timed out"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Discovery {
    pub shape: BindingShape,
    pub existing_tools: Vec<ToolDescriptor>,
    pub degraded: Option<DegradeReason>,
}

impl Discovery {
    fn found(shape: BindingShape, existing_tools: Vec<ToolDescriptor>) -> Self {
        Self {
            shape,
            existing_tools,
            degraded: None,
        }
    }

    /// 读取失败：按空的远端工具集继续
    fn degraded(shape: BindingShape, reason: DegradeReason) -> Self {
        warn!(%reason, ?shape, "remote discovery degraded, continuing without existing tools");
        Self {
            shape,
            existing_tools: Vec::new(),
            degraded: Some(reason),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded.is_some()
    }
}

/// 只读探测远端 Agent 的配置形态并取回已有工具
///
/// 降级策略：
/// - Agent 读取失败、超时或没有可用绑定：形态回退为 `Inline`（直接改 Agent），已有工具为空
/// - LLM 绑定但 LLM 读取失败或超时：保持 `LlmBound`，已有工具为空
pub async fn discover(
    directory: &dyn AgentDirectory,
    agent_id: &str,
    read_timeout: Duration,
) -> Discovery {
    let inline = || BindingShape::Inline {
        agent_id: agent_id.to_string(),
    };

    let record = match timeout(read_timeout, directory.fetch_agent(agent_id)).await {
        Ok(Ok(record)) => record,
        Ok(Err(err)) => {
            return Discovery::degraded(inline(), DegradeReason::AgentProbeFailed(err.to_string()))
        }
        Err(_) => return Discovery::degraded(inline(), DegradeReason::AgentProbeTimedOut),
    };

    match record.response_engine {
        Some(EngineBinding::Inline { tools, .. }) => {
            debug!(agent_id, tools = tools.len(), "agent carries inline llm configuration");
            Discovery::found(inline(), tools)
        }
        Some(EngineBinding::LlmRef { llm_id }) if !llm_id.trim().is_empty() => {
            let shape = BindingShape::LlmBound {
                llm_id: llm_id.clone(),
            };
            match timeout(read_timeout, directory.fetch_llm(&llm_id)).await {
                Ok(Ok(llm)) => {
                    debug!(agent_id, %llm_id, tools = llm.tools.len(), "agent is llm-bound");
                    Discovery::found(shape, llm.tools)
                }
                Ok(Err(err)) => {
                    Discovery::degraded(shape, DegradeReason::LlmReadFailed(err.to_string()))
                }
                Err(_) => Discovery::degraded(shape, DegradeReason::LlmReadTimedOut),
            }
        }
        _ => Discovery::degraded(inline(), DegradeReason::NoEngineBinding),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::{AgentRecord, LlmConfig, MemoryAgentDirectory};

    fn tool(name: &str) -> ToolDescriptor {
        ToolDescriptor::builder("custom", name).build()
    }

    const READ_TIMEOUT: Duration = Duration::from_millis(200);

    #[tokio::test]
    async fn llm_bound_reads_llm_tools() {
        let directory = MemoryAgentDirectory::new()
            .with_agent(AgentRecord::llm_bound("ag", "llm"))
            .with_llm(LlmConfig::new("llm", vec![tool("custom_tool")]));

        let found = discover(&directory, "ag", READ_TIMEOUT).await;

        assert_eq!(
            found.shape,
            BindingShape::LlmBound {
                llm_id: "llm".into()
            }
        );
        assert_eq!(found.existing_tools, vec![tool("custom_tool")]);
        assert!(!found.is_degraded());
    }

    #[tokio::test]
    async fn inline_reads_agent_tools() {
        let directory =
            MemoryAgentDirectory::new().with_agent(AgentRecord::inline("ag", vec![tool("x")]));
        let found = discover(&directory, "ag", READ_TIMEOUT).await;
        assert_eq!(found.shape, BindingShape::Inline { agent_id: "ag".into() });
        assert_eq!(found.existing_tools.len(), 1);
    }

    #[tokio::test]
    async fn missing_agent_degrades_to_inline_and_empty() {
        let directory = MemoryAgentDirectory::new();
        let found = discover(&directory, "ag", READ_TIMEOUT).await;
        assert_eq!(found.shape, BindingShape::Inline { agent_id: "ag".into() });
        assert!(found.existing_tools.is_empty());
        assert!(matches!(found.degraded, Some(DegradeReason::AgentProbeFailed(_))));
    }

    #[tokio::test]
    async fn failed_llm_read_keeps_llm_shape() {
        let directory = MemoryAgentDirectory::new()
            .with_agent(AgentRecord::llm_bound("ag", "llm"))
            .with_llm(LlmConfig::new("llm", vec![tool("kept_remotely")]));
        directory.fail_llm_reads(true);

        let found = discover(&directory, "ag", READ_TIMEOUT).await;

        assert_eq!(
            found.shape,
            BindingShape::LlmBound {
                llm_id: "llm".into()
            }
        );
        assert!(found.existing_tools.is_empty());
        assert!(matches!(found.degraded, Some(DegradeReason::LlmReadFailed(_))));
    }

    #[tokio::test]
    async fn slow_probe_times_out_into_degrade() {
        let directory =
            MemoryAgentDirectory::new().with_agent(AgentRecord::inline("ag", vec![tool("x")]));
        directory.set_read_delay(Some(Duration::from_millis(500)));
        let found = discover(&directory, "ag", Duration::from_millis(20)).await;
        assert_eq!(found.degraded, Some(DegradeReason::AgentProbeTimedOut));
        assert!(found.existing_tools.is_empty());
    }

    #[tokio::test]
    async fn agent_without_binding_degrades() {
        let mut record = AgentRecord::inline("ag", vec![]);
        record.response_engine = None;
        let directory = MemoryAgentDirectory::new().with_agent(record);
        let found = discover(&directory, "ag", READ_TIMEOUT).await;
        assert_eq!(found.degraded, Some(DegradeReason::NoEngineBinding));
    }
}
