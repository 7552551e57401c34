//! Trove CLI - inspect settings as the application would resolve them.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trove::SettingsStore;

#[derive(Parser)]
#[command(name = "trove")]
#[command(about = "Inspect environment-derived settings")]
struct Cli {
    /// Override file to load instead of searching for `.env`
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every cached setting, secrets redacted
    Show {
        #[arg(long)]
        json: bool,
    },
    /// Print a string setting
    Get {
        name: String,
        #[arg(long, default_value = "")]
        default: String,
    },
    /// Print a bool setting
    Bool { name: String },
    /// Print a duration setting in seconds
    Duration { name: String },
    /// Print the server mode (DEV or LVE)
    Mode,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let settings = match &cli.env_file {
        Some(path) => SettingsStore::load_from_path(path)?,
        None => SettingsStore::load()?,
    };

    match cli.command {
        Commands::Show { json } => {
            let snapshot = settings.snapshot();
            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                for (key, value) in &snapshot.strings {
                    println!("{}={}", key, value);
                }
                for (key, value) in &snapshot.bools {
                    println!("{}={}", key, value);
                }
            }
        }
        Commands::Get { name, default } => {
            println!("{}", settings.get_with_default(&name, &default));
        }
        Commands::Bool { name } => {
            println!("{}", settings.get_bool(&name));
        }
        Commands::Duration { name } => match settings.try_get_duration(&name) {
            Ok(duration) => println!("{}", format_seconds(duration)),
            Err(e) => {
                error!("{}", e);
                return Ok(ExitCode::FAILURE);
            }
        },
        Commands::Mode => {
            println!("{}", settings.server_is());
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Seconds with up to nanosecond precision, trailing zeros trimmed.
fn format_seconds(duration: chrono::Duration) -> String {
    let seconds = duration.num_seconds();
    let nanos = duration.subsec_nanos();
    if nanos == 0 {
        return seconds.to_string();
    }

    let sign = if seconds < 0 || nanos < 0 { "-" } else { "" };
    let fraction = format!("{:09}", nanos.unsigned_abs());
    format!(
        "{}{}.{}",
        sign,
        seconds.unsigned_abs(),
        fraction.trim_end_matches('0')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(Duration::hours(2)), "7200");
        assert_eq!(format_seconds(Duration::milliseconds(1500)), "1.5");
        assert_eq!(format_seconds(Duration::milliseconds(-250)), "-0.25");
        assert_eq!(format_seconds(Duration::zero()), "0");
    }
}
