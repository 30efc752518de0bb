#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use output::{OutputMode, resolve_output_mode};
use std::env;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "shiftfeed: normalize shift rows into an employee's feed",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format. Defaults to `FORMAT`, then pretty on a TTY and text otherwise.
    #[arg(long, value_enum, global = true)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Read feed config from this file instead of `.shiftfeed/config.toml`.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Feed",
        about = "Print the ordered, visible shift feed",
        long_about = "Map shift rows, merge assignment metadata, hide unpublished or pending shifts, \
                      and print the feed in start order with each shift's phase and badge status.",
        after_help = "EXAMPLES:\n    # Show the feed from two table exports\n    shiftfeed feed --rows shifts.json --assignments assignments.json\n\n    # Only shifts running right now\n    shiftfeed feed --rows shifts.json --phase live\n\n    # Evaluate against a fixed clock, as JSON\n    shiftfeed feed --rows shifts.json --now 2026-03-01T09:00:00Z --format json"
    )]
    Feed(cmd::feed::FeedArgs),

    #[command(
        next_help_heading = "Feed",
        about = "Show the shift to clock in for",
        long_about = "Print the first live shift in the feed, or the soonest upcoming one if nothing is live.",
        after_help = "EXAMPLES:\n    # What's next?\n    shiftfeed next --rows shifts.json --assignments assignments.json"
    )]
    Next(cmd::next::NextArgs),

    #[command(
        next_help_heading = "Feed",
        about = "Classify a time window as past, live, or upcoming",
        after_help = "EXAMPLES:\n    # Is this shift live at 09:00?\n    shiftfeed phase --start 2026-03-01T08:00:00Z --end 2026-03-01T16:00:00Z --now 2026-03-01T09:00:00Z"
    )]
    Phase(cmd::phase::PhaseArgs),

    #[command(
        next_help_heading = "Utilities",
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n    # Generate zsh completions\n    shiftfeed completions zsh > ~/.zfunc/_shiftfeed"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("SHIFTFEED_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "shiftfeed=debug,info"
        } else {
            "shiftfeed=info,warn"
        })
    });

    let format = env::var("SHIFTFEED_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let project_root = env::current_dir()?;
    let output = cli.output_mode();

    match cli.command {
        Commands::Feed(ref args) => {
            let mapper = cmd::build_mapper(cli.config.as_deref(), output, &project_root)?;
            cmd::feed::run_feed(args, mapper, output)
        }
        Commands::Next(ref args) => {
            let mapper = cmd::build_mapper(cli.config.as_deref(), output, &project_root)?;
            cmd::next::run_next(args, mapper, output)
        }
        Commands::Phase(ref args) => cmd::phase::run_phase(args, output),
        Commands::Completions(ref args) => {
            cmd::completions::run_completions(args.shell, &mut Cli::command())
        }
    }
}
