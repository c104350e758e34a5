use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vmprov_lib::consts::DEFAULT_CONFIG_FILE;
use vmprov_lib::platform::GuestPlatform;

mod cmd;
mod output;

use cmd::RenderFormat;
use output::print_error;

/// vmprov - declarative VM provisioning
#[derive(Parser)]
#[command(name = "vmprov")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Guest platform to build for (overrides VMPROV_PLATFORM)
  #[arg(long, global = true)]
  platform: Option<GuestPlatform>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Evaluate a provisioning file and summarize the session
  Plan {
    /// Path to the provisioning file
    #[arg(default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    json: bool,
  },

  /// Evaluate a provisioning file and write the session for an orchestrator
  Render {
    /// Path to the provisioning file
    #[arg(default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    format: RenderFormat,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
  },

  /// List artifacts present in the download cache
  Cache {
    /// Path to the provisioning file (the cache is resolved relative to it)
    #[arg(default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    json: bool,
  },

  /// List registered subjects and actions
  Recipes {
    /// Output as JSON
    #[arg(long)]
    json: bool,
  },

  /// Show build defaults
  Info,
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let filter = EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "debug" } else { "warn" }));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let result = match cli.command {
    Commands::Plan { config, json } => cmd::cmd_plan(&config, cli.platform, json),
    Commands::Render { config, format, output } => cmd::cmd_render(&config, cli.platform, format, output.as_deref()),
    Commands::Cache { config, json } => cmd::cmd_cache(&config, cli.platform, json),
    Commands::Recipes { json } => cmd::cmd_recipes(json),
    Commands::Info => cmd::cmd_info(cli.platform),
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      print_error(&format!("{err:#}"));
      ExitCode::FAILURE
    }
  }
}
