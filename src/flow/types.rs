use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Result, VoxFlowError};
use crate::flow::nodes::FlowNode;
use crate::utils::ConfigValidator;

/// 客户拥有的对话流程
///
/// `version` / `active` 只由部署提交推进，编辑节点不会改动它们。
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flow {
    pub id: String,
    pub client_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub nodes: Vec<FlowNode>,
    /// 预留给后续分支遍历，编译器当前不读取
    #[serde(default)]
    pub edges: Vec<FlowEdge>,
    #[serde(default)]
    pub version: u64,
    #[serde(default)]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
}

impl Flow {
    pub fn new(id: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            client_id: client_id.into(),
            name: String::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
            version: 0,
            active: false,
            agent_id: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_nodes(mut self, nodes: Vec<FlowNode>) -> Self {
        self.nodes = nodes;
        self
    }

    pub fn with_edges(mut self, edges: Vec<FlowEdge>) -> Self {
        self.edges = edges;
        self
    }

    pub fn with_agent(mut self, agent_id: impl Into<String>) -> Self {
        self.agent_id = Some(agent_id.into());
        self
    }

    /// 编辑节点与连线
    pub fn replace_nodes(&mut self, nodes: Vec<FlowNode>, edges: Vec<FlowEdge>) {
        self.nodes = nodes;
        self.edges = edges;
    }

    pub fn linked_agent(&self) -> Option<&str> {
        self.agent_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// 结构校验：节点 ID 非空且唯一
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            ConfigValidator::validate_node_id(&node.id)?;
            if !seen.insert(node.id.as_str()) {
                return Err(VoxFlowError::InvalidFlow(format!(
                    "duplicate node id `{}` in flow `{}`",
                    node.id, self.id
                )));
            }
        }
        Ok(())
    }

    /// 节点字段和 edge 列表里作者写下的分支链接总数
    pub fn branch_link_count(&self) -> usize {
        self.nodes.iter().map(FlowNode::branch_links).sum::<usize>() + self.edges.len()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_flow_is_empty_and_inactive() {
        let flow = Flow::new("f1", "client-a");
        assert!(flow.nodes.is_empty());
        assert_eq!(flow.version, 0);
        assert!(!flow.active);
        assert!(flow.linked_agent().is_none());
    }

    #[test]
    fn editing_keeps_deploy_bookkeeping() {
        let mut flow = Flow::new("f1", "client-a");
        flow.version = 4;
        flow.active = true;
        flow.replace_nodes(vec![FlowNode::message("m", "hi")], Vec::new());
        assert_eq!(flow.version, 4);
        assert!(flow.active);
        assert_eq!(flow.nodes.len(), 1);
    }

    #[test]
    fn duplicate_ids_fail_validation() {
        let flow = Flow::new("f1", "c").with_nodes(vec![
            FlowNode::message("a", "one"),
            FlowNode::message("a", "two"),
        ]);
        assert!(matches!(flow.validate(), Err(VoxFlowError::InvalidFlow(_))));
    }

    #[test]
    fn blank_agent_id_is_not_linked() {
        let flow = Flow::new("f1", "c").with_agent("  ");
        assert!(flow.linked_agent().is_none());
    }

    #[test]
    fn persisted_flow_round_trips_from_record() {
        let flow: Flow = serde_json::from_value(json!({
            "id": "f1",
            "client_id": "client-a",
            "nodes": [
                { "id": "n1", "type": "message", "data": { "text": "Hello", "nextNodeId": "n2" } },
                { "id": "n2", "type": "end", "data": {} }
            ],
            "edges": [ { "id": "e1", "source": "n1", "target": "n2" } ],
            "agent_id": "agent_123"
        }))
        .unwrap();
        assert_eq!(flow.nodes.len(), 2);
        assert_eq!(flow.version, 0);
        assert_eq!(flow.linked_agent(), Some("agent_123"));
        assert_eq!(flow.branch_link_count(), 2);
        assert!(flow.validate().is_ok());
    }
}
