use std::path::PathBuf;

use clap::{ArgAction, Parser};
use itertools::Itertools;
use tracing::Level;

use crate::catalog::Catalog;
use crate::config::Settings;
use crate::error::FetchError;

#[derive(Debug, Parser)]
#[command(
    name = "image-fetcher",
    version,
    about = "Download the image catalog into a local directory, skipping files already present"
)]
pub struct Cli {
    #[arg(
        short = 'v',
        long = "verbose",
        help = "Sets the level of verbosity",
        action = ArgAction::Count
    )]
    verbose: u8,

    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Optional settings file (TOML, YAML or JSON)"
    )]
    config: Option<PathBuf>,

    #[arg(
        long = "catalog",
        value_name = "FILE",
        help = "Reads the catalog from a file instead of the built-in one"
    )]
    catalog: Option<PathBuf>,

    #[arg(
        short = 'o',
        long = "root-dir",
        value_name = "DIR",
        help = "Directory the catalog paths are resolved against"
    )]
    root_dir: Option<PathBuf>,

    #[arg(long = "delay-ms", value_name = "N", help = "Pause after each request")]
    delay_ms: Option<u64>,

    #[arg(long = "timeout-secs", value_name = "N", help = "Per-request timeout")]
    timeout_secs: Option<u64>,

    #[arg(long = "user-agent", value_name = "STRING", help = "User-Agent header sent with every request")]
    user_agent: Option<String>,

    #[arg(
        long = "min-valid-size",
        value_name = "BYTES",
        help = "Existing files at or below this size are downloaded again"
    )]
    min_valid_size: Option<u64>,

    #[arg(long = "list", help = "Print the catalog and exit")]
    list: bool,
}

pub struct Args {
    pub settings: Settings,
    pub catalog: Catalog,
    pub list_only: bool,
    pub log_level: Level,
}

impl Cli {
    fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(root_dir) = &self.root_dir {
            settings.root_dir = root_dir.clone();
        }
        if let Some(delay_ms) = self.delay_ms {
            settings.delay_ms = delay_ms;
        }
        if let Some(timeout_secs) = self.timeout_secs {
            settings.timeout_secs = timeout_secs;
        }
        if let Some(user_agent) = &self.user_agent {
            settings.user_agent = user_agent.clone();
        }
        if let Some(min_valid_size) = self.min_valid_size {
            settings.min_valid_size = min_valid_size;
        }
    }
}

pub fn parse_args() -> Result<Args, FetchError> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(log_level.into())
                .from_env_lossy(),
        )
        .init();

    resolve(cli, log_level)
}

fn resolve(cli: Cli, log_level: Level) -> Result<Args, FetchError> {
    let mut settings = Settings::load(cli.config.as_deref())?;

    cli.apply_overrides(&mut settings);

    let catalog = match &cli.catalog {
        Some(path) => Catalog::load(path)?,
        None => Catalog::builtin(),
    };

    Ok(Args {
        settings,
        catalog,
        list_only: cli.list,
        log_level,
    })
}

pub fn print_catalog(catalog: &Catalog) {
    for entry in catalog {
        println!(
            "{}\t{}\t{}",
            entry.relative_path.display(),
            entry.source_url,
            entry.descriptive_tags.iter().join(",")
        );
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;
    use tracing::Level;

    use super::{resolve, Cli};

    #[test]
    fn test_flags_override_settings() {
        let cli = Cli::parse_from([
            "image-fetcher",
            "--root-dir",
            "out",
            "--delay-ms",
            "0",
            "--min-valid-size",
            "10",
        ]);

        let args = resolve(cli, Level::INFO).unwrap();

        assert_eq!(args.settings.root_dir, PathBuf::from("out"));
        assert_eq!(args.settings.delay_ms, 0);
        assert_eq!(args.settings.min_valid_size, 10);
        assert_eq!(args.settings.timeout_secs, 30);
        assert_eq!(args.catalog.len(), 47);
        assert!(!args.list_only);
    }

    #[test]
    fn test_verbosity_and_list() {
        let cli = Cli::parse_from(["image-fetcher", "-vv", "--list"]);

        assert_eq!(cli.verbose, 2);
        assert!(cli.list);
    }
}
