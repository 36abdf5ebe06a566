mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use helmgen_core::types::Generator;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "helmgen",
    about = "Interactive Helm chart generator: scaffold a chart, add APIs and hooks",
    version,
    propagate_version = true,
    args_conflicts_with_subcommands = true
)]
struct Cli {
    /// Chart root (default: nearest directory with .helmgen.yaml, else cwd)
    #[arg(long, global = true, env = "HELMGEN_ROOT")]
    root: Option<PathBuf>,

    /// Output the run report as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Generator to run: app, app:api or app:hook
    #[arg(default_value = "app")]
    generator: String,

    /// Title shown instead of the generator banner
    #[arg(long)]
    title: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect stored answers
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Some(Commands::Config { subcommand }) => cmd::config::run(&root, subcommand, cli.json),
        None => cli
            .generator
            .parse::<Generator>()
            .map_err(anyhow::Error::from)
            .and_then(|generator| cmd::generate(&root, generator, cli.title.as_deref(), cli.json)),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
