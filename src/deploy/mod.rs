//! 部署编排：发现 → 编译 → 合并 → 推送 → 提交
//!
//! 整个流程严格顺序执行，每次部署恰好一次远端写调用。只有远端确认成功后才推进
//! 存储中的 `version` / `active`。

mod cancel;
mod stage;

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::time::timeout;
use tracing::{error, info, warn};

use crate::compiler::NodeCompiler;
use crate::config::DeployConfig;
use crate::error::{Result, VoxFlowError};
use crate::remote::{
    discover, push_config, BindingShape, ConfigPatch, DegradeReason, DynAgentDirectory,
};
use crate::store::DynFlowStore;
use crate::tools::{
    merge, ClientContext, ClientScopedBinder, ToolBinder, ToolDescriptor, ToolResolver,
};

pub use cancel::{CancelHandle, CancelSignal};
pub use stage::DeployStage;

use stage::StageTracker;

/// 部署成功的返回
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DeployOutcome {
    pub success: bool,
    pub prompt_preview: String,
    pub tools_registered: Vec<String>,
    #[serde(skip)]
    pub report: DeployReport,
}

impl DeployOutcome {
    /// 对外输出的摘要：结果字段加上提交版本与降级原因
    pub fn summary(&self) -> DeploySummary<'_> {
        DeploySummary {
            outcome: self,
            version: self.report.version,
            degraded: self.report.degraded.as_ref().map(ToString::to_string),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeploySummary<'a> {
    #[serde(flatten)]
    pub outcome: &'a DeployOutcome,
    pub version: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degraded: Option<String>,
}

/// 部署过程细节，不对调用方序列化
#[derive(Clone, Debug, PartialEq)]
pub struct DeployReport {
    pub stages: Vec<DeployStage>,
    pub binding: BindingShape,
    pub degraded: Option<DegradeReason>,
    pub version: u64,
}

/// 只编译不推送的预览
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PreviewOutcome {
    pub prompt_preview: String,
    pub tools: Vec<ToolDescriptor>,
}

pub struct FlowDeployer {
    store: DynFlowStore,
    directory: DynAgentDirectory,
    resolver: ToolResolver,
    discovery_timeout: Duration,
    push_timeout: Duration,
}

impl FlowDeployer {
    pub fn new(
        store: DynFlowStore,
        directory: DynAgentDirectory,
        binder: Arc<dyn ToolBinder>,
    ) -> Self {
        let defaults = DeployConfig::default();
        Self {
            store,
            directory,
            resolver: ToolResolver::new(binder),
            discovery_timeout: defaults.discovery_timeout(),
            push_timeout: defaults.push_timeout(),
        }
    }

    pub fn from_config(
        store: DynFlowStore,
        directory: DynAgentDirectory,
        config: &DeployConfig,
    ) -> Self {
        let binder = Arc::new(ClientScopedBinder::new(config.integration_base_url.clone()));
        Self {
            store,
            directory,
            resolver: ToolResolver::new(binder)
                .with_webhook_timeout_ms(config.webhook_timeout_ms),
            discovery_timeout: config.discovery_timeout(),
            push_timeout: config.push_timeout(),
        }
    }

    pub fn with_timeouts(mut self, discovery: Duration, push: Duration) -> Self {
        self.discovery_timeout = discovery;
        self.push_timeout = push;
        self
    }

    /// 编译并解析工具，不访问远端也不写存储
    pub async fn preview(&self, ctx: &ClientContext, flow_id: &str) -> Result<PreviewOutcome> {
        let flow = self.store.load(&ctx.client_id, flow_id).await?;
        flow.validate()?;
        let compiled = NodeCompiler::compile(&flow.nodes);
        let tools = self.resolver.resolve(&compiled.providers, &flow.nodes, ctx);
        Ok(PreviewOutcome {
            prompt_preview: compiled.script,
            tools,
        })
    }

    pub async fn deploy(&self, ctx: &ClientContext, flow_id: &str) -> Result<DeployOutcome> {
        self.deploy_with_cancel(ctx, flow_id, &CancelSignal::never()).await
    }

    pub async fn deploy_with_cancel(
        &self,
        ctx: &ClientContext,
        flow_id: &str,
        cancel: &CancelSignal,
    ) -> Result<DeployOutcome> {
        let flow = self.store.load(&ctx.client_id, flow_id).await?;
        let mut tracker = StageTracker::start(flow_id);
        flow.validate()?;
        let agent_id = flow
            .linked_agent()
            .ok_or_else(|| VoxFlowError::AgentNotLinked(flow_id.to_string()))?
            .to_string();
        let expected_version = flow.version;

        let ignored_links = flow.branch_link_count();
        if ignored_links > 0 {
            info!(
                flow_id,
                ignored_links, "branch links are not followed, compiling nodes in list order"
            );
        }
        ensure_not_cancelled(cancel)?;

        tracker.enter(DeployStage::Discovering);
        let discovery = discover(self.directory.as_ref(), &agent_id, self.discovery_timeout).await;
        ensure_not_cancelled(cancel)?;

        tracker.enter(DeployStage::Compiling);
        let compiled = NodeCompiler::compile(&flow.nodes);
        let flow_tools = self.resolver.resolve(&compiled.providers, &flow.nodes, ctx);

        tracker.enter(DeployStage::Merging);
        let patch = ConfigPatch {
            instruction_script: compiled.script,
            tools: merge(discovery.existing_tools, flow_tools),
        };
        ensure_not_cancelled(cancel)?;

        tracker.enter(DeployStage::Pushing);
        if let Err(err) = self.push(&discovery.shape, &patch).await {
            error!(
                flow_id,
                agent_id = %agent_id,
                stage = %tracker.current(),
                error = %err,
                "deploy failed, nothing committed"
            );
            tracker.enter(DeployStage::Failed);
            return Err(err);
        }

        let committed = match self.store.commit_deploy(flow_id, expected_version).await {
            Ok(flow) => flow,
            Err(err) => {
                tracker.enter(DeployStage::Failed);
                warn!(flow_id, error = %err, "remote updated but local commit failed");
                return Err(err);
            }
        };
        tracker.enter(DeployStage::Committed);
        info!(
            flow_id,
            version = committed.version,
            tools = patch.tools.len(),
            "flow deployed"
        );

        Ok(DeployOutcome {
            success: true,
            tools_registered: patch.tool_names(),
            prompt_preview: patch.instruction_script,
            report: DeployReport {
                stages: tracker.into_history(),
                binding: discovery.shape,
                degraded: discovery.degraded,
                version: committed.version,
            },
        })
    }

    /// 推送超时与失败同等对待
    async fn push(&self, shape: &BindingShape, patch: &ConfigPatch) -> Result<()> {
        let push = push_config(self.directory.as_ref(), shape, patch);
        match timeout(self.push_timeout, push).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err @ VoxFlowError::RemotePushFailed(_))) => Err(err),
            Ok(Err(other)) => Err(VoxFlowError::RemotePushFailed(other.to_string())),
            Err(_) => Err(VoxFlowError::RemotePushFailed(format!(
                "push timed out after {}ms",
                self.push_timeout.as_millis()
            ))),
        }
    }
}

fn ensure_not_cancelled(cancel: &CancelSignal) -> Result<()> {
    if cancel.is_cancelled() {
        warn!("deploy cancelled before push");
        return Err(VoxFlowError::Cancelled);
    }
    Ok(())
}
