pub mod compiler;
pub mod config;
pub mod deploy;
pub mod error;
pub mod flow;
pub mod remote;
pub mod store;
pub mod tools;
pub mod utils;

pub use compiler::{numbered_lines, CompiledScript, NodeCompiler, ProviderKind, ProviderSet};
pub use config::{DeployConfig, EnvConfig, RemoteConfig};
pub use deploy::{
    CancelHandle, CancelSignal, DeployOutcome, DeployReport, DeployStage, DeploySummary,
    FlowDeployer, PreviewOutcome,
};
pub use error::{DeployErrorBody, Result, VoxFlowError};
pub use flow::{
    ChoiceOption, Flow, FlowEdge, FlowNode, NodeKind, NodeType, SchedulingProvider, WebhookMethod,
};
pub use remote::{
    AgentDirectory, AgentRecord, BindingShape, ConfigPatch, DegradeReason, Discovery,
    DynAgentDirectory, EngineBinding, LlmConfig, MemoryAgentDirectory,
};
#[cfg(feature = "http-client")]
pub use remote::HttpAgentDirectory;
#[cfg(feature = "memory-store")]
pub use store::MemoryFlowStore;
pub use store::{DynFlowStore, FlowStore};
pub use tools::{
    merge, ClientContext, ClientScopedBinder, ParameterSchema, ToolBinder, ToolDescriptor,
    ToolResolver, ToolSet,
};
pub use utils::{logging, validation, LoggingConfig};
