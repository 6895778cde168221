// Flow 模块 - 节点 / 连线数据模型

pub mod constants;
pub mod nodes;
pub mod types;

pub use nodes::{
    ChoiceOption, FlowNode, NodeKind, NodeType, SchedulingProvider, WebhookMethod,
};
pub use types::{Flow, FlowEdge};
