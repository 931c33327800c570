//! cron-shift — rewrite cron expressions for another timezone.
//!
//! Usage:
//!   cron-shift convert "0 12 * * *" --from America/New_York --to Europe/London
//!   cron-shift convert "0 12 * * *" --from America/New_York --to Asia/Tokyo --json
//!   cron-shift offset --from America/New_York --to Asia/Kolkata --at 2026-07-01T00:00:00Z

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "cron-shift",
    version,
    about = "Shift cron expressions between timezones"
)]
struct Cli {
    /// Verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a cron expression from one timezone to another
    Convert {
        /// Cron expression (5 fields, or 6 with leading seconds)
        expression: String,

        /// IANA timezone the expression is written for
        #[arg(long)]
        from: String,

        /// IANA timezone to convert into
        #[arg(long)]
        to: String,

        /// Instant whose UTC offsets are used (RFC 3339, defaults to now)
        #[arg(long)]
        at: Option<String>,

        /// Print the full conversion report as JSON
        #[arg(long)]
        json: bool,

        /// Exit with an error instead of echoing the input when conversion fails
        #[arg(long)]
        strict: bool,
    },
    /// Print the UTC-offset difference between two timezones in minutes
    Offset {
        #[arg(long)]
        from: String,

        #[arg(long)]
        to: String,

        /// Instant to evaluate at (RFC 3339, defaults to now)
        #[arg(long)]
        at: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "cron_shift=debug"
    } else {
        "cron_shift=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Convert {
            expression,
            from,
            to,
            at,
            json,
            strict,
        } => {
            let now = parse_anchor(at.as_deref())?;
            let conversion = cron_shift::convert_detailed(&expression, &from, &to, now);

            if strict && conversion.outcome == cron_shift::Outcome::Unchanged {
                // Re-run the fallible steps to surface the underlying error.
                cron_shift::offset_between(&from, &to, now)?;
                cron_shift::CronFields::parse(&expression)?;
                anyhow::bail!("could not convert '{expression}' from {from} to {to}");
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&conversion)?);
            } else {
                println!("{}", conversion.converted);
            }
        }
        Command::Offset { from, to, at } => {
            let now = parse_anchor(at.as_deref())?;
            let minutes = cron_shift::offset_between(&from, &to, now)?;
            println!("{minutes}");
        }
    }

    Ok(())
}

fn parse_anchor(at: Option<&str>) -> Result<DateTime<Utc>> {
    match at {
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .with_context(|| format!("invalid --at datetime '{s}'")),
        None => Ok(Utc::now()),
    }
}
