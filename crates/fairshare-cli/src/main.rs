//! fairshare — inspect Dominant Resource Fairness orderings.
//!
//! # Usage
//!
//! ```text
//! fairshare replay scenario.toml --format json
//! fairshare share --total "cpus:10;mem:100" --allocation "cpus:1;mem:50"
//! fairshare parse "cpus:4;ports:[31000-32000]"
//! ```

use clap::{Parser, Subcommand};

mod commands;
mod scenario;

#[derive(Parser)]
#[command(
    name = "fairshare",
    about = "fairshare — Dominant Resource Fairness ordering for cluster frameworks",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a scenario of allocator events and print each ordering.
    ///
    /// The scenario is a TOML file with an ordered [[events]] list; every
    /// `sort` event prints the active clients, least-served first.
    Replay {
        /// Path to the scenario file
        path: String,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Compute the dominant share of one allocation.
    Share {
        /// Cluster-wide total, e.g. "cpus:10;mem:100"
        #[arg(long)]
        total: String,
        /// Resources held by the client, e.g. "cpus:1;mem:50"
        #[arg(long)]
        allocation: String,
    },
    /// Parse a resource vector and print it in normalized form.
    Parse {
        /// Resource text, e.g. "cpus:4;ports:[31000-32000];disks:{sda}"
        resources: String,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fairshare=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Replay { path, format } => commands::replay::replay(&path, &format),
        Commands::Share { total, allocation } => commands::share::share(&total, &allocation),
        Commands::Parse { resources, format } => commands::parse::parse(&resources, &format),
    }
}
