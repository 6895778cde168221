use super::descriptor::ToolDescriptor;
use super::registry::ToolSet;

/// 合并远端已有工具与本次编译出的工具
///
/// 结果中每个名称只出现一次。与流程工具同名的远端工具被丢弃；远端自身重名时保留
/// 第一个，流程工具重名时以后出现的定义为准。远端工具保持原有相对顺序，之后按编译
/// 顺序追加流程工具。纯函数，不做任何网络访问。
pub fn merge(existing: Vec<ToolDescriptor>, flow: Vec<ToolDescriptor>) -> Vec<ToolDescriptor> {
    let mut flow_tools = ToolSet::new();
    for tool in flow {
        flow_tools.upsert(tool);
    }

    let mut merged: ToolSet = existing
        .into_iter()
        .filter(|tool| !flow_tools.contains(&tool.name))
        .collect();
    merged.extend(flow_tools.into_vec());
    merged.into_vec()
}
