use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::descriptor::ToolDescriptor;
use crate::flow::constants::fields;

pub const CLIENT_ID_HEADER: &str = "X-Client-Id";

/// 发起部署的客户上下文，同时作为读取 Flow 的归属范围
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClientContext {
    pub client_id: String,
    /// 集成后端要求的鉴权头，由身份系统提供
    pub headers: BTreeMap<String, String>,
}

impl ClientContext {
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            headers: BTreeMap::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// 把模板工具绑定到具体客户（身份 / 鉴权系统的窄接口）
pub trait ToolBinder: Send + Sync {
    fn bind(&self, tool: ToolDescriptor, ctx: &ClientContext) -> ToolDescriptor;
}

/// 默认绑定：相对地址拼到集成后端，附加 client_id 与鉴权头
#[derive(Clone, Debug)]
pub struct ClientScopedBinder {
    integration_base_url: String,
}

impl ClientScopedBinder {
    pub fn new(integration_base_url: impl Into<String>) -> Self {
        Self {
            integration_base_url: integration_base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl ToolBinder for ClientScopedBinder {
    fn bind(&self, mut tool: ToolDescriptor, ctx: &ClientContext) -> ToolDescriptor {
        if let Some(path) = tool.field_str("url").filter(|url| url.starts_with('/')) {
            let absolute = format!("{}{}", self.integration_base_url, path);
            tool.extra.insert("url".into(), Value::String(absolute));
        }

        let mut headers = take_object(&mut tool, "headers");
        for (name, value) in &ctx.headers {
            headers.insert(name.clone(), Value::String(value.clone()));
        }
        headers.insert(CLIENT_ID_HEADER.into(), Value::String(ctx.client_id.clone()));
        tool.extra.insert("headers".into(), Value::Object(headers));

        let mut query = take_object(&mut tool, "query_params");
        query.insert(fields::CLIENT_ID.into(), Value::String(ctx.client_id.clone()));
        tool.extra.insert("query_params".into(), Value::Object(query));

        tool
    }
}

fn take_object(tool: &mut ToolDescriptor, key: &str) -> Map<String, Value> {
    match tool.extra.remove(key) {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    }
}
