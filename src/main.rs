use anyhow::{Context as AnyhowContext, Result};
use clap::Parser;
use std::path::PathBuf;

use export_env::cli::{self, Args};
use export_env::collect::{EnvCollector, OfflineOptions, ServiceDefinition};
use export_env::error::IoError;
use export_env::inventory::{
    CancellationToken, InventorySnapshot, RecordedControlPlane, SnapshotFetcher,
};
use export_env::logging::{self, Verbosity};
use export_env::output::OutputFormatter;
use export_env::Resolver;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();
    args.validate().context("Invalid arguments")?;
    logging::init(Verbosity::from_flags(args.verbose, args.quiet));

    let definition = ServiceDefinition::from_path(&args.config)
        .context("Failed to load service definition")?;
    let stack_name = match &args.stack_name {
        Some(name) => name.clone(),
        None => definition.stack_name()?,
    };

    let snapshot = fetch_snapshot(&args, &stack_name).await?;

    let mut collector = EnvCollector::new(&definition)
        .with_outputs(args.outputs || definition.custom.export_env.export_outputs);
    if let Some(offline) =
        args.offline_options(OfflineOptions::from_settings(&definition.custom.offline))
    {
        collector = collector.with_offline(offline);
    }
    let scopes = collector.collect(&snapshot);

    let resolver = Resolver::builder()
        .with_attribute_heuristics(args.experimental_attributes)
        .build();
    let mut resolution = resolver
        .resolve_scopes(&scopes, &snapshot, definition.overrides())
        .flatten();

    for diagnostic in &resolution.diagnostics {
        tracing::warn!("{diagnostic}");
    }
    if args.skip_unresolved {
        resolution = resolution.without_unresolved();
    }

    let rendered = OutputFormatter::format(&resolution, args.format)?;
    let target = args
        .output_file
        .clone()
        .or_else(|| definition.custom.export_env.filename.as_ref().map(PathBuf::from));

    match target {
        Some(path) => {
            std::fs::write(&path, rendered).map_err(|e| IoError::write(&path, e))?;
            tracing::info!(
                "Wrote {} variable(s) to {}",
                resolution.variables.len(),
                path.display()
            );
        }
        None => println!("{rendered}"),
    }

    Ok(())
}

async fn fetch_snapshot(args: &Args, stack_name: &str) -> Result<InventorySnapshot> {
    let plane = RecordedControlPlane::from_path(&args.inventory)
        .context("Failed to load recorded inventory")?;

    let (token, cancellation) = CancellationToken::new();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling inventory fetch");
            token.cancel();
        }
    });

    let fetcher = SnapshotFetcher::new()
        .with_max_pages(args.max_pages)
        .with_timeout(args.timeout())
        .with_cancellation(cancellation);
    let snapshot = fetcher
        .fetch(&plane, stack_name)
        .await
        .with_context(|| format!("Failed to fetch inventory for stack {stack_name}"));

    interrupt.abort();
    snapshot
}
