use crate::flow::constants::tools::{TRANSFER_PREFIX, WEBHOOK_PREFIX};
use crate::flow::FlowNode;

/// 单次编译内的计数器，只在字段齐全时递增
#[derive(Clone, Copy, Debug, Default)]
struct DynamicCounters {
    webhooks: usize,
    transfers: usize,
}

impl DynamicCounters {
    fn assign(&mut self, node: &FlowNode) -> Option<String> {
        if node.webhook_target().is_some() {
            self.webhooks += 1;
            Some(format!("{WEBHOOK_PREFIX}{}", self.webhooks))
        } else if node.transfer_target().is_some() {
            self.transfers += 1;
            Some(format!("{TRANSFER_PREFIX}{}", self.transfers))
        } else {
            None
        }
    }
}

/// 为每个节点分配动态工具名（`flow_webhook_<n>` / `transfer_call_<n>`）
///
/// 结果与 `nodes` 一一对应；编译器和工具解析器都从这里取名，保证两边一致。
pub fn dynamic_tool_names(nodes: &[FlowNode]) -> Vec<Option<String>> {
    nodes
        .iter()
        .scan(DynamicCounters::default(), |counters, node| Some(counters.assign(node)))
        .collect()
}
