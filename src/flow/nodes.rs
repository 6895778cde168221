use serde::{Deserialize, Serialize};

use crate::utils::non_blank;

/// Flow 节点
///
/// 持久化格式为 `{ id, type, data: {...} }`，`data` 是九种类型共用的可选字段
/// 集合；反序列化时会转换成每种类型各自的强类型负载。
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawNode", into = "RawNode")]
pub struct FlowNode {
    pub id: String,
    pub kind: NodeKind,
    /// `data.nextNodeId`，原样保存，编译器不会跟随
    pub next: Option<String>,
}

impl FlowNode {
    pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            kind,
            next: None,
        }
    }

    pub fn with_next(mut self, next: impl Into<String>) -> Self {
        self.next = Some(next.into());
        self
    }

    pub fn message(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(
            id,
            NodeKind::Message {
                text: Some(text.into()),
            },
        )
    }

    pub fn question(
        id: impl Into<String>,
        text: impl Into<String>,
        options: Vec<ChoiceOption>,
    ) -> Self {
        Self::new(
            id,
            NodeKind::Question {
                text: Some(text.into()),
                options,
            },
        )
    }

    pub fn condition(id: impl Into<String>, condition: impl Into<String>) -> Self {
        Self::new(
            id,
            NodeKind::Condition {
                condition: Some(condition.into()),
                true_node_id: None,
                false_node_id: None,
            },
        )
    }

    pub fn transfer(id: impl Into<String>, number: Option<&str>) -> Self {
        Self::new(
            id,
            NodeKind::Transfer {
                transfer_number: number.map(str::to_string),
                text: None,
            },
        )
    }

    pub fn end(id: impl Into<String>, text: Option<&str>) -> Self {
        Self::new(
            id,
            NodeKind::End {
                text: text.map(str::to_string),
            },
        )
    }

    pub fn check_availability(id: impl Into<String>, provider: Option<SchedulingProvider>) -> Self {
        Self::new(id, NodeKind::CheckAvailability { provider, text: None })
    }

    pub fn book_appointment(id: impl Into<String>, provider: Option<SchedulingProvider>) -> Self {
        Self::new(id, NodeKind::BookAppointment { provider, text: None })
    }

    pub fn crm_lookup(id: impl Into<String>) -> Self {
        Self::new(id, NodeKind::CrmLookup { text: None })
    }

    pub fn webhook(id: impl Into<String>, url: Option<&str>) -> Self {
        Self::new(
            id,
            NodeKind::Webhook {
                webhook_url: url.map(str::to_string),
                webhook_method: WebhookMethod::default(),
            },
        )
    }

    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    /// 作者在节点上写下但编译器不会跟随的分支链接数量
    pub fn branch_links(&self) -> usize {
        let own = usize::from(self.next.is_some());
        let payload = match &self.kind {
            NodeKind::Question { options, .. } => {
                options.iter().filter(|o| o.next_node_id.is_some()).count()
            }
            NodeKind::Condition {
                true_node_id,
                false_node_id,
                ..
            } => usize::from(true_node_id.is_some()) + usize::from(false_node_id.is_some()),
            _ => 0,
        };
        own + payload
    }

    /// webhook 节点且带有可用 URL
    pub fn webhook_target(&self) -> Option<(&str, WebhookMethod)> {
        match &self.kind {
            NodeKind::Webhook {
                webhook_url,
                webhook_method,
            } => non_blank(webhook_url.as_deref()).map(|url| (url, *webhook_method)),
            _ => None,
        }
    }

    /// transfer 节点且带有目标号码
    pub fn transfer_target(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Transfer {
                transfer_number, ..
            } => non_blank(transfer_number.as_deref()),
            _ => None,
        }
    }
}

/// 每种节点类型各自的负载
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Message {
        text: Option<String>,
    },
    Question {
        text: Option<String>,
        options: Vec<ChoiceOption>,
    },
    Condition {
        condition: Option<String>,
        true_node_id: Option<String>,
        false_node_id: Option<String>,
    },
    Transfer {
        transfer_number: Option<String>,
        text: Option<String>,
    },
    End {
        text: Option<String>,
    },
    CheckAvailability {
        provider: Option<SchedulingProvider>,
        text: Option<String>,
    },
    BookAppointment {
        provider: Option<SchedulingProvider>,
        text: Option<String>,
    },
    CrmLookup {
        text: Option<String>,
    },
    Webhook {
        webhook_url: Option<String>,
        webhook_method: WebhookMethod,
    },
}

impl NodeKind {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Message { .. } => NodeType::Message,
            NodeKind::Question { .. } => NodeType::Question,
            NodeKind::Condition { .. } => NodeType::Condition,
            NodeKind::Transfer { .. } => NodeType::Transfer,
            NodeKind::End { .. } => NodeType::End,
            NodeKind::CheckAvailability { .. } => NodeType::CheckAvailability,
            NodeKind::BookAppointment { .. } => NodeType::BookAppointment,
            NodeKind::CrmLookup { .. } => NodeType::CrmLookup,
            NodeKind::Webhook { .. } => NodeType::Webhook,
        }
    }
}

/// 节点类型标签（JSON 中的 `type` 字段）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Message,
    Question,
    Condition,
    Transfer,
    End,
    CheckAvailability,
    BookAppointment,
    CrmLookup,
    Webhook,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceOption {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_node_id: Option<String>,
}

impl ChoiceOption {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            next_node_id: None,
        }
    }
}

/// 调度服务提供方
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulingProvider {
    #[default]
    #[serde(alias = "cal_com", alias = "cal")]
    Calcom,
    #[serde(alias = "google")]
    GoogleCalendar,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WebhookMethod {
    #[default]
    Post,
    Get,
}

impl WebhookMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookMethod::Post => "POST",
            WebhookMethod::Get => "GET",
        }
    }
}

/// 持久化 / 编辑器交换用的宽松格式
#[derive(Clone, Debug, Serialize, Deserialize)]
struct RawNode {
    id: String,
    #[serde(rename = "type")]
    node_type: NodeType,
    #[serde(default)]
    data: RawNodeData,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNodeData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    next_node_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    options: Option<Vec<ChoiceOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    true_node_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    false_node_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    transfer_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    provider: Option<SchedulingProvider>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    webhook_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    webhook_method: Option<WebhookMethod>,
}

impl From<RawNode> for FlowNode {
    fn from(raw: RawNode) -> Self {
        let RawNode { id, node_type, data } = raw;
        let kind = match node_type {
            NodeType::Message => NodeKind::Message { text: data.text },
            NodeType::Question => NodeKind::Question {
                text: data.text,
                options: data.options.unwrap_or_default(),
            },
            NodeType::Condition => NodeKind::Condition {
                condition: data.condition,
                true_node_id: data.true_node_id,
                false_node_id: data.false_node_id,
            },
            NodeType::Transfer => NodeKind::Transfer {
                transfer_number: data.transfer_number,
                text: data.text,
            },
            NodeType::End => NodeKind::End { text: data.text },
            NodeType::CheckAvailability => NodeKind::CheckAvailability {
                provider: data.provider,
                text: data.text,
            },
            NodeType::BookAppointment => NodeKind::BookAppointment {
                provider: data.provider,
                text: data.text,
            },
            NodeType::CrmLookup => NodeKind::CrmLookup { text: data.text },
            NodeType::Webhook => NodeKind::Webhook {
                webhook_url: data.webhook_url,
                webhook_method: data.webhook_method.unwrap_or_default(),
            },
        };
        FlowNode {
            id,
            kind,
            next: data.next_node_id,
        }
    }
}

impl From<FlowNode> for RawNode {
    fn from(node: FlowNode) -> Self {
        let node_type = node.kind.node_type();
        let mut data = RawNodeData {
            next_node_id: node.next,
            ..RawNodeData::default()
        };
        match node.kind {
            NodeKind::Message { text } | NodeKind::End { text } | NodeKind::CrmLookup { text } => {
                data.text = text;
            }
            NodeKind::Question { text, options } => {
                data.text = text;
                data.options = (!options.is_empty()).then_some(options);
            }
            NodeKind::Condition {
                condition,
                true_node_id,
                false_node_id,
            } => {
                data.condition = condition;
                data.true_node_id = true_node_id;
                data.false_node_id = false_node_id;
            }
            NodeKind::Transfer {
                transfer_number,
                text,
            } => {
                data.transfer_number = transfer_number;
                data.text = text;
            }
            NodeKind::CheckAvailability { provider, text }
            | NodeKind::BookAppointment { provider, text } => {
                data.provider = provider;
                data.text = text;
            }
            NodeKind::Webhook {
                webhook_url,
                webhook_method,
            } => {
                data.webhook_url = webhook_url;
                data.webhook_method = Some(webhook_method);
            }
        }
        RawNode {
            id: node.id,
            node_type,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_editor_shape_into_typed_payload() {
        let node: FlowNode = serde_json::from_value(json!({
            "id": "n1",
            "type": "question",
            "data": {
                "text": "New or existing customer?",
                "options": [
                    { "label": "New", "nextNodeId": "n2" },
                    { "label": "Existing" }
                ],
                "nextNodeId": "n3"
            }
        }))
        .unwrap();

        assert_eq!(node.node_type(), NodeType::Question);
        assert_eq!(node.next.as_deref(), Some("n3"));
        match &node.kind {
            NodeKind::Question { text, options } => {
                assert_eq!(text.as_deref(), Some("New or existing customer?"));
                assert_eq!(options.len(), 2);
                assert_eq!(options[0].next_node_id.as_deref(), Some("n2"));
            }
            other => panic!("unexpected kind {other:?}"),
        }
        assert_eq!(node.branch_links(), 2);
    }

    #[test]
    fn missing_data_is_tolerated() {
        let node: FlowNode = serde_json::from_value(json!({ "id": "e", "type": "end" })).unwrap();
        assert_eq!(node.kind, NodeKind::End { text: None });
    }

    #[test]
    fn webhook_method_defaults_to_post() {
        let node: FlowNode = serde_json::from_value(json!({
            "id": "w",
            "type": "webhook",
            "data": { "webhookUrl": "https://hooks.example.com/lead" }
        }))
        .unwrap();
        assert_eq!(
            node.webhook_target(),
            Some(("https://hooks.example.com/lead", WebhookMethod::Post))
        );
    }

    #[test]
    fn blank_fields_count_as_missing() {
        let webhook = FlowNode::webhook("w", Some("  "));
        assert_eq!(webhook.webhook_target(), None);
        let transfer = FlowNode::transfer("t", Some(""));
        assert_eq!(transfer.transfer_target(), None);
    }

    #[test]
    fn provider_accepts_aliases() {
        let node: FlowNode = serde_json::from_value(json!({
            "id": "c",
            "type": "check_availability",
            "data": { "provider": "google" }
        }))
        .unwrap();
        assert_eq!(
            node.kind,
            NodeKind::CheckAvailability {
                provider: Some(SchedulingProvider::GoogleCalendar),
                text: None
            }
        );
    }

    #[test]
    fn serializes_back_to_editor_shape() {
        let node = FlowNode::transfer("t1", Some("+15550000000")).with_next("t2");
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "t1",
                "type": "transfer",
                "data": { "transferNumber": "+15550000000", "nextNodeId": "t2" }
            })
        );
    }

    #[test]
    fn unknown_type_is_rejected() {
        let result: Result<FlowNode, _> =
            serde_json::from_value(json!({ "id": "x", "type": "teleport", "data": {} }));
        assert!(result.is_err());
    }
}
