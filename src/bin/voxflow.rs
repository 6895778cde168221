use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use voxflow::{
    AgentRecord, ClientContext, DeployConfig, DynAgentDirectory, Flow, FlowDeployer,
    LoggingConfig, MemoryAgentDirectory, MemoryFlowStore,
};

#[derive(Parser)]
#[command(name = "voxflow", version, about = "Conversation flow compiler and deployer", author)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 编译 Flow 文件，输出脚本与工具列表
    Compile {
        #[arg(long)]
        flow: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        client_id: Option<String>,
    },
    /// 部署到远端 Agent，成功后把新的 version / active 写回 Flow 文件
    Deploy {
        #[arg(long)]
        flow: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        client_id: Option<String>,
        /// 使用内存目录代替远端 API
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    LoggingConfig::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Compile {
            flow,
            config,
            client_id,
        } => handle_compile(&flow, config.as_deref(), client_id).await?,
        Command::Deploy {
            flow,
            config,
            client_id,
            dry_run,
        } => handle_deploy(&flow, config.as_deref(), client_id, dry_run).await?,
    }
    Ok(())
}

fn load_flow(path: &Path) -> anyhow::Result<Flow> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read flow file `{}`", path.display()))?;
    let flow: Flow = serde_json::from_str(&raw)
        .with_context(|| format!("invalid flow file `{}`", path.display()))?;
    Ok(flow)
}

fn load_config(path: Option<&Path>, allow_default: bool) -> anyhow::Result<DeployConfig> {
    let config = match path {
        Some(path) => DeployConfig::from_json_file(path)?,
        None => match DeployConfig::from_env() {
            Ok(config) => config,
            Err(_) if allow_default => DeployConfig::default(),
            Err(err) => return Err(err.into()),
        },
    };
    Ok(config)
}

fn client_context(flow: &Flow, client_id: Option<String>) -> ClientContext {
    ClientContext::new(client_id.unwrap_or_else(|| flow.client_id.clone()))
}

async fn handle_compile(
    flow_path: &Path,
    config: Option<&Path>,
    client_id: Option<String>,
) -> anyhow::Result<()> {
    let flow = load_flow(flow_path)?;
    let config = load_config(config, true)?;
    let ctx = client_context(&flow, client_id);
    let flow_id = flow.id.clone();

    let store = Arc::new(MemoryFlowStore::new().with_flow(flow));
    let deployer = FlowDeployer::from_config(store, Arc::new(MemoryAgentDirectory::new()), &config);
    let preview = deployer.preview(&ctx, &flow_id).await?;
    println!("{}", serde_json::to_string_pretty(&preview)?);
    Ok(())
}

async fn handle_deploy(
    flow_path: &Path,
    config: Option<&Path>,
    client_id: Option<String>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let flow = load_flow(flow_path)?;
    let config = load_config(config, dry_run)?;
    let ctx = client_context(&flow, client_id);
    let flow_id = flow.id.clone();

    let directory = directory_for(&flow, &config, dry_run)?;
    let store = Arc::new(MemoryFlowStore::new().with_flow(flow));
    let deployer = FlowDeployer::from_config(store.clone(), directory, &config);

    match deployer.deploy(&ctx, &flow_id).await {
        Ok(outcome) => {
            if let Some(committed) = store.get(&flow_id) {
                fs::write(flow_path, serde_json::to_string_pretty(&committed)?).with_context(|| {
                    format!("failed to write flow file `{}`", flow_path.display())
                })?;
            }
            println!("{}", serde_json::to_string_pretty(&outcome.summary())?);
            Ok(())
        }
        Err(err) => {
            println!("{}", serde_json::to_string_pretty(&err.to_error_body())?);
            Err(err.into())
        }
    }
}

fn directory_for(
    flow: &Flow,
    config: &DeployConfig,
    dry_run: bool,
) -> anyhow::Result<DynAgentDirectory> {
    if dry_run {
        let directory = MemoryAgentDirectory::new();
        if let Some(agent_id) = flow.linked_agent() {
            directory.insert_agent(AgentRecord::inline(agent_id, Vec::new()));
        }
        return Ok(Arc::new(directory));
    }
    remote_directory(config)
}

#[cfg(feature = "http-client")]
fn remote_directory(config: &DeployConfig) -> anyhow::Result<DynAgentDirectory> {
    Ok(Arc::new(voxflow::HttpAgentDirectory::from_config(config)?))
}

#[cfg(not(feature = "http-client"))]
fn remote_directory(_config: &DeployConfig) -> anyhow::Result<DynAgentDirectory> {
    anyhow::bail!("built without the `http-client` feature; use --dry-run")
}
