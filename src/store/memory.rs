use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::FlowStore;
use crate::error::{Result, VoxFlowError};
use crate::flow::{Flow, FlowEdge, FlowNode};

/// 内存 Flow 存储
#[derive(Default)]
pub struct MemoryFlowStore {
    inner: RwLock<HashMap<String, Flow>>,
}

impl MemoryFlowStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flow(self, flow: Flow) -> Self {
        self.insert(flow);
        self
    }

    pub fn insert(&self, flow: Flow) {
        self.inner.write().insert(flow.id.clone(), flow);
    }

    /// 不校验归属，直接读取当前存储的副本
    pub fn get(&self, flow_id: &str) -> Option<Flow> {
        self.inner.read().get(flow_id).cloned()
    }
}

#[async_trait]
impl FlowStore for MemoryFlowStore {
    async fn load(&self, client_id: &str, flow_id: &str) -> Result<Flow> {
        self.inner
            .read()
            .get(flow_id)
            .filter(|flow| flow.client_id == client_id)
            .cloned()
            .ok_or_else(|| VoxFlowError::FlowNotFound(flow_id.to_string()))
    }

    async fn save_definition(
        &self,
        client_id: &str,
        flow_id: &str,
        nodes: Vec<FlowNode>,
        edges: Vec<FlowEdge>,
    ) -> Result<Flow> {
        let mut flows = self.inner.write();
        let flow = flows
            .get_mut(flow_id)
            .filter(|flow| flow.client_id == client_id)
            .ok_or_else(|| VoxFlowError::FlowNotFound(flow_id.to_string()))?;
        flow.replace_nodes(nodes, edges);
        Ok(flow.clone())
    }

    async fn commit_deploy(&self, flow_id: &str, expected_version: u64) -> Result<Flow> {
        let mut flows = self.inner.write();
        let flow = flows
            .get_mut(flow_id)
            .ok_or_else(|| VoxFlowError::FlowNotFound(flow_id.to_string()))?;
        if flow.version != expected_version {
            return Err(VoxFlowError::PersistenceConflict {
                flow_id: flow_id.to_string(),
                expected: expected_version,
                found: flow.version,
            });
        }
        flow.version += 1;
        flow.active = true;
        Ok(flow.clone())
    }
}
