use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// 交给远端 Agent 的可调用工具定义
///
/// `name` 是合并键。远端已有工具里不认识的字段都保存在 `extra` 中，合并后原样写回。
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ToolDescriptor {
    pub fn builder(kind: impl Into<String>, name: impl Into<String>) -> ToolDescriptorBuilder {
        ToolDescriptorBuilder::new(kind, name)
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(Value::as_str)
    }
}

#[derive(Clone, Debug)]
pub struct ToolDescriptorBuilder {
    descriptor: ToolDescriptor,
}

impl ToolDescriptorBuilder {
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            descriptor: ToolDescriptor {
                kind: kind.into(),
                name: name.into(),
                description: None,
                parameters: None,
                timeout_ms: None,
                extra: Map::new(),
            },
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.descriptor.description = Some(description.into());
        self
    }

    pub fn parameters(mut self, schema: ParameterSchema) -> Self {
        self.descriptor.parameters = Some(schema.into_value());
        self
    }

    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.descriptor.timeout_ms = Some(timeout_ms);
        self
    }

    pub fn field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.descriptor.extra.insert(key.into(), value);
        self
    }

    /// 调用期间 / 调用后都让 Agent 开口
    pub fn speaks_while_working(self, message: &str) -> Self {
        self.field("speak_during_execution", Value::Bool(true))
            .field("speak_after_execution", Value::Bool(true))
            .field("execution_message_description", json!(message))
    }

    pub fn build(self) -> ToolDescriptor {
        self.descriptor
    }
}

/// 类 JSON Schema 的参数定义
#[derive(Clone, Debug, Default)]
pub struct ParameterSchema {
    properties: Map<String, Value>,
    required: Vec<String>,
}

impl ParameterSchema {
    pub fn object() -> Self {
        Self::default()
    }

    pub fn property(mut self, name: &str, type_name: &str, description: &str) -> Self {
        self.properties.insert(
            name.to_string(),
            json!({ "type": type_name, "description": description }),
        );
        self
    }

    pub fn required_property(self, name: &str, type_name: &str, description: &str) -> Self {
        let mut schema = self.property(name, type_name, description);
        schema.required.push(name.to_string());
        schema
    }

    pub fn into_value(self) -> Value {
        json!({
            "type": "object",
            "properties": Value::Object(self.properties),
            "required": self.required,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_populates_fields() {
        let tool = ToolDescriptor::builder("custom", "lookup")
            .description("Look something up")
            .parameters(
                ParameterSchema::object()
                    .required_property("phone_number", "string", "Caller phone")
                    .property("notes", "string", "Free text"),
            )
            .timeout_ms(8_000)
            .field("url", json!("/tools/lookup"))
            .build();

        assert_eq!(tool.kind, "custom");
        assert_eq!(tool.name, "lookup");
        assert_eq!(tool.timeout_ms, Some(8_000));
        assert_eq!(tool.field_str("url"), Some("/tools/lookup"));
        let params = tool.parameters.unwrap();
        assert_eq!(params["required"], json!(["phone_number"]));
        assert_eq!(params["properties"]["notes"]["type"], "string");
    }

    #[test]
    fn unknown_remote_fields_survive_round_trip() {
        let raw = json!({
            "type": "end_call",
            "name": "end_call",
            "description": "Hang up",
            "vendor_specific": { "a": 1 }
        });
        let tool: ToolDescriptor = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(tool.field("vendor_specific"), Some(&json!({ "a": 1 })));
        assert_eq!(serde_json::to_value(&tool).unwrap(), raw);
    }
}
