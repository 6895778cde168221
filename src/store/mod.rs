#[cfg(feature = "memory-store")]
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::flow::{Flow, FlowEdge, FlowNode};

#[cfg(feature = "memory-store")]
pub use memory::MemoryFlowStore;

/// Flow 记录存储
#[async_trait]
pub trait FlowStore: Send + Sync {
    /// 读取调用方名下的 Flow；不存在或不属于该客户时返回 `FlowNotFound`
    async fn load(&self, client_id: &str, flow_id: &str) -> Result<Flow>;

    /// 编辑节点与连线，不改动 `version` / `active`
    async fn save_definition(
        &self,
        client_id: &str,
        flow_id: &str,
        nodes: Vec<FlowNode>,
        edges: Vec<FlowEdge>,
    ) -> Result<Flow>;

    /// 部署提交：仅当存储中的版本仍为 `expected_version` 时写入
    /// `version + 1` 与 `active = true`，否则返回 `PersistenceConflict`
    async fn commit_deploy(&self, flow_id: &str, expected_version: u64) -> Result<Flow>;
}

pub type DynFlowStore = Arc<dyn FlowStore>;
