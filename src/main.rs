mod cli;

use actionrule::{
    apply,
    azure::AzureClient,
    config::{self, Config},
    plan::{self, Change},
    resource::ActionRuleResource,
    state::{self, StateFile},
};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Config and state locations resolved from flags and default search paths.
struct Paths {
    config: Option<PathBuf>,
    state: PathBuf,
}

impl Paths {
    fn resolve(cli: &Cli) -> Self {
        let config = cli.config.clone().or_else(config::find_default_config);
        let state = cli
            .state
            .clone()
            .unwrap_or_else(|| state::default_state_path(config.as_deref()));
        Self { config, state }
    }

    fn load_config(&self) -> Result<Config> {
        config::load_config_or_default(self.config.as_deref())
    }

    fn load_state(&self) -> Result<StateFile> {
        StateFile::load(&self.state)
    }
}

fn build_resource(config: &Config) -> Result<ActionRuleResource> {
    let client = AzureClient::new(&config.provider)?;
    Ok(ActionRuleResource::new(Arc::new(client)))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "actionrule=trace,ar_codec=trace,ar_core=debug".to_string()
        } else {
            "actionrule=debug,ar_codec=debug,ar_core=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    let paths = Paths::resolve(&cli);

    match cli.command {
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(paths.config);
            validate_config(path.as_deref())
        }
        Commands::Plan => plan_changes(&paths),
        Commands::Apply => run_async(apply_changes(&paths)),
        Commands::Refresh => run_async(refresh_state(&paths)),
        Commands::Show { id } => run_async(show_rule(&paths, &id)),
        Commands::Import { id } => run_async(import_rule(&paths, &id)),
        Commands::Destroy { name } => run_async(destroy_rules(&paths, name.as_deref())),
        Commands::Version => {
            println!("actionrule {}", env!("CARGO_PKG_VERSION"));
            println!("api-version {}", ar_core::API_VERSION);
            Ok(())
        }
    }
}

fn run_async<F: std::future::Future<Output = Result<()>>>(future: F) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(future)
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  Endpoint: {}", config.provider.endpoint);
            println!("  API version: {}", config.provider.api_version);
            println!("  Action rules: {}", config.action_rules.len());
            for rule in &config.action_rules {
                println!(
                    "    {} ({}, {})",
                    rule.state_key(),
                    rule.kind.type_name(),
                    if rule.enabled { "enabled" } else { "disabled" }
                );
            }
        }
        None => {
            println!("No config file specified, using defaults");
            let config = Config::default();
            println!("  Endpoint: {}", config.provider.endpoint);
            println!("  Action rules: 0");
        }
    }

    Ok(())
}

fn plan_changes(paths: &Paths) -> Result<()> {
    let config = paths.load_config()?;
    let state = paths.load_state()?;
    let plan = plan::plan(&config, &state)?;

    for change in &plan.changes {
        println!("{} {}", change.change, change.key);
    }

    println!(
        "\nPlan: {} to create, {} to update, {} to forget.",
        plan.count(Change::Create),
        plan.count(Change::Update),
        plan.count(Change::Forget)
    );

    if plan.is_empty() {
        println!("No changes. Tracked state matches the configuration.");
    }

    Ok(())
}

async fn apply_changes(paths: &Paths) -> Result<()> {
    let config = paths.load_config()?;
    let mut state = paths.load_state()?;
    let resource = build_resource(&config)?;

    let summary = apply::apply(&config, &mut state, &resource).await?;

    for key in &summary.created {
        println!("created {}", key);
    }
    for key in &summary.updated {
        println!("updated {}", key);
    }
    for key in &summary.forgotten {
        println!("forgot {}", key);
    }
    println!(
        "\nApply complete! {} created, {} updated, {} unchanged, {} forgotten.",
        summary.created.len(),
        summary.updated.len(),
        summary.unchanged.len(),
        summary.forgotten.len()
    );

    Ok(())
}

async fn refresh_state(paths: &Paths) -> Result<()> {
    let config = paths.load_config()?;
    let mut state = paths.load_state()?;
    let resource = build_resource(&config)?;

    let summary = apply::refresh(&mut state, &resource).await?;

    for key in &summary.removed {
        println!("{} no longer exists, removed from state", key);
    }
    println!(
        "Refreshed {} rule(s), removed {}.",
        summary.refreshed.len(),
        summary.removed.len()
    );

    Ok(())
}

async fn show_rule(paths: &Paths, id: &str) -> Result<()> {
    let config = paths.load_config()?;
    let resource = build_resource(&config)?;

    let tracked = resource
        .read(id, None)
        .await?
        .with_context(|| format!("Action Rule {:?} does not exist", id))?;

    println!("{}", serde_json::to_string_pretty(&tracked)?);
    Ok(())
}

async fn import_rule(paths: &Paths, id: &str) -> Result<()> {
    let config = paths.load_config()?;
    let mut state = paths.load_state()?;
    let resource = build_resource(&config)?;

    let tracked = resource.import(id).await?;
    let key = tracked.key();
    if state.contains(&key) {
        anyhow::bail!("{} is already tracked in {:?}", key, paths.state);
    }

    state.upsert(tracked);
    state.save()?;
    println!("Imported {} as {}", id, key);
    Ok(())
}

async fn destroy_rules(paths: &Paths, name: Option<&str>) -> Result<()> {
    let config = paths.load_config()?;
    let mut state = paths.load_state()?;

    if state.is_empty() {
        println!("No tracked rules, nothing to destroy.");
        return Ok(());
    }

    let resource = build_resource(&config)?;
    let destroyed = apply::destroy(&mut state, &resource, name).await?;

    for key in &destroyed {
        println!("destroyed {}", key);
    }
    println!("Destroy complete! {} rule(s) deleted.", destroyed.len());
    Ok(())
}
