//! 远端语音 Agent 配置 API 适配层
//!
//! 这里只消费远端接口：读取 Agent / LLM 配置、判断工具列表放在哪里、把合并后的
//! 工具和脚本写回去。

pub mod discovery;
#[cfg(feature = "http-client")]
pub mod http;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;
use crate::tools::ToolDescriptor;

pub use discovery::{discover, BindingShape, DegradeReason, Discovery};
#[cfg(feature = "http-client")]
pub use http::HttpAgentDirectory;
pub use memory::{MemoryAgentDirectory, PushRecord};

/// `GET agent` 返回的 Agent 记录
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentRecord {
    pub agent_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_engine: Option<EngineBinding>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AgentRecord {
    pub fn llm_bound(agent_id: impl Into<String>, llm_id: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            response_engine: Some(EngineBinding::LlmRef {
                llm_id: llm_id.into(),
            }),
            extra: Map::new(),
        }
    }

    pub fn inline(agent_id: impl Into<String>, tools: Vec<ToolDescriptor>) -> Self {
        Self {
            agent_id: agent_id.into(),
            response_engine: Some(EngineBinding::Inline {
                tools,
                instruction_script: None,
            }),
            extra: Map::new(),
        }
    }
}

/// Agent 的语言模型绑定：引用独立的 LLM 对象，或直接内嵌
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineBinding {
    LlmRef {
        llm_id: String,
    },
    Inline {
        #[serde(default)]
        tools: Vec<ToolDescriptor>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        instruction_script: Option<String>,
    },
}

/// `GET llm` 返回的语言模型对象
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    pub llm_id: String,
    #[serde(default)]
    pub tools: Vec<ToolDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruction_script: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LlmConfig {
    pub fn new(llm_id: impl Into<String>, tools: Vec<ToolDescriptor>) -> Self {
        Self {
            llm_id: llm_id.into(),
            tools,
            instruction_script: None,
            extra: Map::new(),
        }
    }
}

/// PATCH 请求体
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfigPatch {
    pub instruction_script: String,
    pub tools: Vec<ToolDescriptor>,
}

impl ConfigPatch {
    pub fn tool_names(&self) -> Vec<String> {
        self.tools.iter().map(|tool| tool.name.clone()).collect()
    }
}

/// 远端 Agent 目录
#[async_trait]
pub trait AgentDirectory: Send + Sync {
    async fn fetch_agent(&self, agent_id: &str) -> Result<AgentRecord>;
    async fn fetch_llm(&self, llm_id: &str) -> Result<LlmConfig>;
    async fn update_llm(&self, llm_id: &str, patch: &ConfigPatch) -> Result<()>;
    async fn update_agent(&self, agent_id: &str, patch: &ConfigPatch) -> Result<()>;
}

pub type DynAgentDirectory = Arc<dyn AgentDirectory>;

/// 按发现到的绑定形态写回，恰好一次写调用
pub async fn push_config(
    directory: &dyn AgentDirectory,
    shape: &BindingShape,
    patch: &ConfigPatch,
) -> Result<()> {
    match shape {
        BindingShape::LlmBound { llm_id } => directory.update_llm(llm_id, patch).await,
        BindingShape::Inline { agent_id } => directory.update_agent(agent_id, patch).await,
    }
}
