use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use taskstate::cluster::{load_states_file, AggregateState, NodeStateView};
use taskstate::config::NodeConfig;
use taskstate::dashboard::{run_dashboard, DashboardState};
use taskstate::shutdown::install_shutdown_handler;

#[derive(Parser, Debug)]
#[command(name = "taskstate")]
#[command(version)]
#[command(about = "Cluster-wide task state aggregation and edit guard")]
#[command(propagate_version = true)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Start the task state dashboard for this node
    Serve(ServeArgs),

    /// Aggregate a JSON file of per-node reports and print the result
    Inspect {
        /// Path to a JSON array of node reports
        file: PathBuf,

        /// Output format
        #[arg(long, short = 'o', default_value = "table")]
        output: OutputFormat,
    },
}

// =============================================================================
// Server Arguments
// =============================================================================

#[derive(Parser, Debug)]
struct ServeArgs {
    /// Node ID used in cluster reports
    #[arg(long, default_value = "node-1")]
    node_id: String,

    /// Port for the HTTP dashboard
    #[arg(long, default_value = "8080")]
    port: u16,

    /// Accept per-node reports and consult them for status and edits
    #[arg(long)]
    clustered: bool,

    /// Maximum number of tasks held in the local registry
    #[arg(long, default_value = "10000")]
    max_tasks: usize,
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

// =============================================================================
// JSON Output Types
// =============================================================================

#[derive(Serialize)]
struct InspectOutput {
    state: String,
    run_state: Option<String>,
    end_state: Option<String>,
    last_run_ms: Option<i64>,
    last_run_duration_ms: Option<u64>,
    nodes: Option<Vec<NodeStateView>>,
}

// =============================================================================
// Command Handlers
// =============================================================================

async fn run_server(args: ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let listen_addr: SocketAddr = format!("0.0.0.0:{}", args.port).parse()?;
    let config = NodeConfig::new(args.node_id, listen_addr)
        .with_clustered(args.clustered)
        .with_max_tasks(args.max_tasks);

    tracing::info!(
        node_id = %config.node_id,
        listen_addr = %config.listen_addr,
        clustered = config.clustered,
        max_tasks = config.max_tasks,
        "Starting taskstate node"
    );

    let shutdown = install_shutdown_handler();
    let state = DashboardState::new(&config);
    run_dashboard(config.listen_addr, state, shutdown).await?;
    Ok(())
}

fn handle_inspect(file: PathBuf, output: &OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let nodes = load_states_file(&file)?;
    let Some(aggregate) = AggregateState::from_nodes(&nodes) else {
        return Err("no node reports to aggregate".into());
    };

    match output {
        OutputFormat::Json => {
            let out = InspectOutput {
                state: aggregate.state.to_string(),
                run_state: aggregate.run_state.map(|s| s.to_string()),
                end_state: aggregate.end_state.map(|s| s.to_string()),
                last_run_ms: aggregate.last_run.map(|t| t.timestamp_millis()),
                last_run_duration_ms: aggregate.last_run_duration_ms,
                nodes: aggregate.nodes,
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Table => {
            println!("Task State ({} nodes)", nodes.len());
            println!("{}", "=".repeat(40));
            println!("State:        {}", aggregate.state);
            if let Some(run_state) = aggregate.run_state {
                println!("Run State:    {}", run_state);
            }
            if let Some(end_state) = aggregate.end_state {
                println!("End State:    {}", end_state);
            }
            if let Some(last_run) = aggregate.last_run {
                println!("Last Run:     {}", last_run.to_rfc3339());
            }
            if let Some(duration_ms) = aggregate.last_run_duration_ms {
                println!("Longest Run:  {}s", duration_ms / 1000);
            }

            match aggregate.nodes {
                Some(views) => {
                    println!();
                    println!("{:<20} {:<18} {:<10} LAST RUN", "NODE", "STATUS", "DETAIL");
                    println!("{}", "-".repeat(60));
                    for view in views {
                        println!(
                            "{:<20} {:<18} {:<10} {}",
                            view.node_id,
                            view.status,
                            view.status_description,
                            view.last_run_result.as_deref().unwrap_or("-")
                        );
                    }
                }
                None => {
                    println!();
                    println!("(Per-node detail suppressed: idle and last run succeeded)");
                }
            }
        }
    }
    Ok(())
}

// =============================================================================
// Main Entry Point
// =============================================================================

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    match args.command {
        Commands::Serve(serve_args) => {
            run_server(serve_args).await?;
        }
        Commands::Inspect { file, output } => {
            handle_inspect(file, &output)?;
        }
    }

    Ok(())
}
