pub mod completions;
pub mod feed;
pub mod next;
pub mod phase;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use clap::Args;
use shiftfeed_core::config::{load_config, load_config_file};
use shiftfeed_core::error::ErrorCode;
use shiftfeed_core::source::{FeedService, JsonDumpSource};
use shiftfeed_core::temporal::parse_instant;
use shiftfeed_core::{Shift, ShiftMapper};

use crate::output::{CliError, OutputMode, render_error};

/// Row dump locations shared by `feed` and `next`.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// JSON array of shift rows.
    #[arg(long, value_name = "FILE")]
    pub rows: PathBuf,

    /// JSON array of assignment rows for the same employee.
    #[arg(long, value_name = "FILE")]
    pub assignments: Option<PathBuf>,

    /// Evaluate phases at this instant instead of the current time.
    #[arg(long, value_name = "TIMESTAMP")]
    pub now: Option<String>,
}

/// Build the mapper from `--config`, or the project/user config chain.
///
/// # Errors
///
/// Returns an error (after rendering it) if a config file exists but cannot
/// be read or parsed.
pub fn build_mapper(
    config_path: Option<&Path>,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<ShiftMapper> {
    let loaded = config_path.map_or_else(|| load_config(project_root), load_config_file);
    match loaded {
        Ok(config) => {
            let mapper = ShiftMapper::from_config(&config);
            tracing::debug!(
                hidden = ?mapper.policy().hidden_statuses().collect::<Vec<_>>(),
                "feed config resolved"
            );
            Ok(mapper)
        }
        Err(e) => {
            render_error(
                output,
                &CliError::coded(ErrorCode::ConfigParseError, format!("{e:#}")),
            )?;
            Err(e)
        }
    }
}

/// Read both dumps and run the pipeline.
///
/// # Errors
///
/// Returns an error (after rendering it with its code) if either dump is
/// missing or malformed.
pub fn load_feed(
    args: &SourceArgs,
    mapper: ShiftMapper,
    output: OutputMode,
) -> anyhow::Result<Vec<Shift>> {
    let source = JsonDumpSource::new(&args.rows, args.assignments.clone());
    let service = FeedService::new(source, mapper);
    match service.load_feed() {
        Ok(feed) => Ok(feed),
        Err(e) => {
            render_error(output, &CliError::coded(e.code(), e.to_string()))?;
            Err(e.into())
        }
    }
}

/// Parse a user-supplied timestamp, or use the wall clock when absent.
///
/// # Errors
///
/// Returns an error (after rendering it) if `raw` is present but unparsable.
pub fn resolve_instant(
    flag: &str,
    raw: Option<&str>,
    output: OutputMode,
) -> anyhow::Result<DateTime<Utc>> {
    let Some(raw) = raw else {
        return Ok(Utc::now());
    };
    require_instant(flag, raw, output)
}

/// Parse a required timestamp argument.
///
/// # Errors
///
/// Returns an error (after rendering it) if `raw` is unparsable.
pub fn require_instant(flag: &str, raw: &str, output: OutputMode) -> anyhow::Result<DateTime<Utc>> {
    if let Some(at) = parse_instant(raw) {
        return Ok(at);
    }
    let message = format!("invalid {flag} timestamp '{raw}'");
    render_error(
        output,
        &CliError::coded(ErrorCode::InvalidTimestamp, message.clone()),
    )?;
    anyhow::bail!(message)
}
