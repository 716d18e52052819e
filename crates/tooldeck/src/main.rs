use anyhow::Context;
use clap::Parser;

use tooldeck::cli::Args;
use tooldeck::{logging, server};
use tooldeck_settings::DeckSettings;
use tooldeck_tools::{ToolRegistry, ToolRegistryConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let workspace = args
        .workspace
        .canonicalize()
        .with_context(|| format!("resolving workspace {}", args.workspace.display()))?;

    let settings = DeckSettings::load_or_default(args.settings.as_deref());
    let registry = ToolRegistry::with_config(workspace.clone(), ToolRegistryConfig { settings });

    tracing::info!(
        workspace = %workspace.display(),
        tools = registry.available_tools().len(),
        "tooldeck server started"
    );

    server::run(registry).await
}
