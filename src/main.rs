use clap::{Parser, Subcommand};
use clap_complete::Shell;

mod cli_types;
mod cli_utils;
mod commands;
mod stdin_processor;

pub use cli_types::FmtArgs;

#[derive(Parser)]
#[command(
    name = "bazelfmt",
    author,
    version,
    about = "Format Bazel build files through an external formatter",
    long_about = None
)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<String>,

    /// Ignore all configuration files
    #[arg(long, global = true)]
    no_config: bool,

    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Format Bazel files in place, or stdin to stdout
    Fmt(FmtArgs),
    /// Create a default .bazelfmt.toml in the current directory
    Init,
    /// Show the effective configuration
    Config,
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for (detected from $SHELL if omitted)
        shell: Option<Shell>,
        /// List available shells
        #[arg(long)]
        list: bool,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Fmt(args) => commands::fmt::handle_fmt(&args, config_path, cli.no_config),
        Commands::Init => commands::init::handle_init(),
        Commands::Config => commands::config::handle_config(config_path, cli.no_config),
        Commands::Completions { shell, list } => commands::completions::handle_completions(shell, list),
    }
}
