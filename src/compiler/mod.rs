//! 节点编译器
//!
//! 把有序节点列表编译成远端 Agent 的自然语言指令脚本，并收集需要展开工具模板的
//! provider。纯函数：不访问网络，不依赖全局状态，同样的输入得到逐字节相同的输出。
//!
//! 节点按数组顺序线性编号，不跟随 `nextNodeId` / 条件分支 / edge 列表。

mod instructions;
pub mod naming;
pub mod providers;

use serde::Serialize;

use crate::flow::constants::script;
use crate::flow::FlowNode;

pub use naming::dynamic_tool_names;
pub use providers::{scheduling_tool_name, ProviderKind, ProviderSet, SchedulingAction};

/// 编译结果
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CompiledScript {
    pub script: String,
    pub providers: ProviderSet,
}

pub struct NodeCompiler;

impl NodeCompiler {
    pub fn compile(nodes: &[FlowNode]) -> CompiledScript {
        if nodes.is_empty() {
            return CompiledScript::default();
        }

        let names = dynamic_tool_names(nodes);
        let mut providers = ProviderSet::new();
        let mut lines = vec![
            script::FLOW_HEADER.to_string(),
            script::FLOW_INTRO.to_string(),
            String::new(),
        ];

        for (index, (node, tool_name)) in nodes.iter().zip(&names).enumerate() {
            let instruction = instructions::render(index + 1, node, tool_name.as_deref());
            if let Some(provider) = instruction.provider {
                providers.insert(provider);
            }
            lines.extend(instruction.lines);
        }

        lines.push(String::new());
        lines.push(script::GUIDELINES_HEADER.to_string());
        lines.extend(script::GUIDELINES.iter().map(|g| format!("- {g}")));

        CompiledScript {
            script: lines.join("\n"),
            providers,
        }
    }
}

/// 统计脚本中的顶层编号行（`<n>. ...`）
pub fn numbered_lines(script: &str) -> Vec<(usize, &str)> {
    script
        .lines()
        .filter_map(|line| {
            let (number, rest) = line.split_once(". ")?;
            let position = number.parse::<usize>().ok()?;
            Some((position, rest))
        })
        .collect()
}
