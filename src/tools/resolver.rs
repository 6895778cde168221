use std::sync::Arc;

use serde_json::json;

use super::binder::{ClientContext, ToolBinder};
use super::descriptor::{ParameterSchema, ToolDescriptor};
use super::registry::ToolSet;
use super::templates::provider_templates;
use crate::compiler::{dynamic_tool_names, ProviderSet};
use crate::config::DEFAULT_WEBHOOK_TIMEOUT_MS;
use crate::flow::constants::{fields, tools as tool_names};
use crate::flow::{FlowNode, WebhookMethod};

/// 把 provider 与动态节点展开成具体工具
#[derive(Clone)]
pub struct ToolResolver {
    binder: Arc<dyn ToolBinder>,
    webhook_timeout_ms: u64,
}

impl ToolResolver {
    pub fn new(binder: Arc<dyn ToolBinder>) -> Self {
        Self {
            binder,
            webhook_timeout_ms: DEFAULT_WEBHOOK_TIMEOUT_MS,
        }
    }

    pub fn with_webhook_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.webhook_timeout_ms = timeout_ms;
        self
    }

    /// provider 模板在前（按 provider 顺序），之后是按节点顺序的 webhook / transfer 工具。
    /// 结果中不会出现重名工具。
    pub fn resolve(
        &self,
        providers: &ProviderSet,
        nodes: &[FlowNode],
        ctx: &ClientContext,
    ) -> Vec<ToolDescriptor> {
        let mut tools = ToolSet::new();

        for provider in providers.iter() {
            for template in provider_templates(provider) {
                if tools.contains(&template.name) {
                    continue;
                }
                tools.insert(self.binder.bind(template.clone(), ctx));
            }
        }

        for (node, name) in nodes.iter().zip(dynamic_tool_names(nodes)) {
            let Some(name) = name else { continue };
            if let Some((url, method)) = node.webhook_target() {
                tools.insert(self.webhook_tool(name, url, method));
            } else if let Some(number) = node.transfer_target() {
                tools.insert(transfer_tool(name, number));
            }
        }

        tools.into_vec()
    }

    fn webhook_tool(&self, name: String, url: &str, method: WebhookMethod) -> ToolDescriptor {
        ToolDescriptor::builder(tool_names::KIND_CUSTOM, name)
            .description("Send the caller's details collected in this step to the configured webhook.")
            .parameters(
                ParameterSchema::object()
                    .property(fields::CALLER_NAME, "string", "The caller's full name")
                    .property(fields::CALLER_PHONE, "string", "The caller's phone number")
                    .property(fields::CALLER_EMAIL, "string", "The caller's email address")
                    .property(fields::NOTES, "string", "Any other details the caller shared"),
            )
            .field("url", json!(url))
            .field("method", json!(method.as_str()))
            .timeout_ms(self.webhook_timeout_ms)
            .speaks_while_working("Let the caller know you're working on it.")
            .build()
    }
}

fn transfer_tool(name: String, number: &str) -> ToolDescriptor {
    ToolDescriptor::builder(tool_names::KIND_TRANSFER_CALL, name)
        .description("Warm-transfer the caller to a team member.")
        .field(
            "transfer_destination",
            json!({ "type": "predefined", "number": number }),
        )
        .field(
            "transfer_option",
            json!({ "type": "warm_transfer", "on_hold_music": "ringtone" }),
        )
        .build()
}
