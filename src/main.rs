//! provdal CLI: provenance lineage queries over a dataset file.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::Result;

use provdal::config::ProvDalConfig;
use provdal::query::resolve;
use provdal::store::ProvStore;

#[derive(Parser)]
#[command(name = "provdal", version, about = "Provenance lineage query engine")]
struct Cli {
    /// Path to a TOML config file (dataset, namespaces).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to the JSON dataset file (overrides the config).
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a lineage query and print the rendered document.
    Query {
        /// Seed identifiers (repeatable).
        #[arg(long = "id", required = true)]
        ids: Vec<String>,

        /// Relation-hop budget: ALL or a non-negative integer.
        #[arg(long, default_value = "1")]
        depth: String,

        /// Traversal direction: BACK or FORTH.
        #[arg(long, default_value = "BACK")]
        direction: String,

        /// Output format: PROV-N, PROV-JSON, PROV-XML, GRAPH or GRAPH-JSON.
        #[arg(long, default_value = "PROV-JSON")]
        format: String,

        /// Compliance profile: IVOA or W3C.
        #[arg(long, default_value = "IVOA")]
        model: String,

        /// Follow collection membership downward.
        #[arg(long)]
        members: bool,

        /// Follow activity-flow steps downward.
        #[arg(long)]
        steps: bool,

        /// Follow relations through agents.
        #[arg(long)]
        agents: bool,
    },

    /// Validate a dataset file and report what it contains.
    Validate,

    /// Show store statistics.
    Info,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ProvDalConfig::load(path)?,
        None => ProvDalConfig::default(),
    };

    let dataset = cli
        .dataset
        .clone()
        .or_else(|| config.dataset.clone())
        .ok_or_else(|| miette::miette!("no dataset given; pass --dataset or set it in the config"))?;

    let store = ProvStore::from_json_file(&dataset)?;

    match cli.command {
        Commands::Query { ids, depth, direction, format, model, members, steps, agents } => {
            let mut params: Vec<(String, String)> =
                ids.into_iter().map(|id| ("ID".to_string(), id)).collect();
            params.push(("DEPTH".to_string(), depth));
            params.push(("DIRECTION".to_string(), direction));
            params.push(("RESPONSEFORMAT".to_string(), format));
            params.push(("MODEL".to_string(), model));
            if members {
                params.push(("MEMBERS".to_string(), "TRUE".to_string()));
            }
            if steps {
                params.push(("STEPS".to_string(), "TRUE".to_string()));
            }
            if agents {
                params.push(("AGENT".to_string(), "TRUE".to_string()));
            }

            let query = resolve(&params, None)?;
            let rendered = provdal::run_query(&store, &query, &config.namespaces)?;
            println!("{}", rendered.body);
        }

        Commands::Validate => {
            println!(
                "dataset ok: {} nodes, {} relations",
                store.node_count(),
                store.relation_count()
            );
        }

        Commands::Info => {
            println!("dataset:   {}", dataset.display());
            println!("nodes:     {}", store.node_count());
            println!("relations: {}", store.relation_count());
            println!(
                "activities: {}, entities: {}, agents: {}",
                store.all_activities().count(),
                store.all_entities().count(),
                store.all_agents().count()
            );
        }
    }

    Ok(())
}
