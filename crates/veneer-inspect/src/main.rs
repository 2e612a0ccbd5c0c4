//! veneer-inspect CLI
//!
//! Resolves hrefs against a JSON route manifest.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use veneer_inspect::{render_tree, resolve, Manifest};

/// Inspect veneer route manifests.
#[derive(Parser)]
#[command(name = "veneer-inspect")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Route manifest (JSON).
    #[arg(short, long, env = "VENEER_ROUTES", default_value = "routes.json")]
    manifest: PathBuf,

    /// Extra param or query name to allow. Repeatable.
    #[arg(short, long = "expect", value_name = "NAME")]
    expect: Vec<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Navigate to an href and show what was rendered.
    Resolve {
        /// Path with optional query, e.g. `/users/42?tab=posts`.
        href: String,
    },

    /// Print the route tree.
    Tree,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut manifest = Manifest::load(&cli.manifest)?;
    manifest.expect(cli.expect);
    debug!(expected = ?manifest.options.expected_params, "allow-list");

    match cli.command {
        Commands::Resolve { href } => {
            let report = resolve(&manifest, &href)?;
            print!("{report}");
        }
        Commands::Tree => {
            print!("{}", render_tree(&manifest.build_routes()?));
        }
    }

    Ok(())
}
