use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::instrument;

use super::{AgentDirectory, AgentRecord, ConfigPatch, LlmConfig};
use crate::config::DeployConfig;
use crate::error::{Result, VoxFlowError};

/// 通过 HTTP 访问远端语音 Agent 配置 API
///
/// - `GET   {base}/agents/{agent_id}`
/// - `GET   {base}/llms/{llm_id}`
/// - `PATCH {base}/agents/{agent_id}` / `PATCH {base}/llms/{llm_id}`，请求体为 `ConfigPatch`
///
/// 单次请求的超时由部署流程用 `tokio::time::timeout` 控制，这里只设置连接超时。
#[derive(Clone)]
pub struct HttpAgentDirectory {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpAgentDirectory {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .pool_max_idle_per_host(4)
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| VoxFlowError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    pub fn from_config(config: &DeployConfig) -> Result<Self> {
        Self::new(config.remote.base_url.clone(), config.api_key()?)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(&self.api_key)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .request(Method::GET, path)
            .send()
            .await
            .map_err(|e| VoxFlowError::RemoteDiscovery(format!("GET {path}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(VoxFlowError::RemoteDiscovery(format!(
                "GET {path} returned {status}"
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| VoxFlowError::RemoteDiscovery(format!("GET {path}: unusable body: {e}")))
    }

    async fn patch_json(&self, path: &str, patch: &ConfigPatch) -> Result<()> {
        let response = self
            .request(Method::PATCH, path)
            .json(patch)
            .send()
            .await
            .map_err(|e| VoxFlowError::RemotePushFailed(format!("PATCH {path}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VoxFlowError::RemotePushFailed(format!(
                "PATCH {path} returned {status}: {body}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl AgentDirectory for HttpAgentDirectory {
    #[instrument(skip(self))]
    async fn fetch_agent(&self, agent_id: &str) -> Result<AgentRecord> {
        self.get_json(&format!("/agents/{agent_id}")).await
    }

    #[instrument(skip(self))]
    async fn fetch_llm(&self, llm_id: &str) -> Result<LlmConfig> {
        self.get_json(&format!("/llms/{llm_id}")).await
    }

    #[instrument(skip(self, patch), fields(tools = patch.tools.len()))]
    async fn update_llm(&self, llm_id: &str, patch: &ConfigPatch) -> Result<()> {
        self.patch_json(&format!("/llms/{llm_id}"), patch).await
    }

    #[instrument(skip(self, patch), fields(tools = patch.tools.len()))]
    async fn update_agent(&self, agent_id: &str, patch: &ConfigPatch) -> Result<()> {
        self.patch_json(&format!("/agents/{agent_id}"), patch).await
    }
}
