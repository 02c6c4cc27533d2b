//! Command-line argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use whoisbatch_pipeline::Preset;

use crate::output::OutputFormat;

/// Bulk IP/domain ownership, geolocation and anonymity lookups
///
/// Resolves each target's organization, country and connection type
/// (standard, hosting, VPN/proxy, Tor, CDN, private relay). Addresses in
/// the same network block share one lookup, and rate-limited targets are
/// retried automatically.
#[derive(Parser, Debug)]
#[command(name = "whoisbatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Paid-service token; without one the free service is used
    #[arg(short = 'k', long, env = "WHOISBATCH_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Look up a batch of IP addresses and hostnames
    Lookup(LookupArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),
}

#[derive(Args, Debug, Default)]
pub struct LookupArgs {
    /// Targets to look up (IPv4, IPv6 or hostnames)
    pub targets: Vec<String>,

    /// Read targets from a file, one per line (`#` starts a comment)
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Pacing preset (stable: 1 worker, 2.5s delay; fast: 2 workers, 1.4s delay)
    #[arg(long)]
    pub preset: Option<Preset>,

    /// Number of concurrent lookups
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Delay before each live lookup, in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Wait after a rate-limit response before retrying, in seconds
    #[arg(long)]
    pub backoff_secs: Option<u64>,

    /// Append the RDAP network name to each organization
    #[arg(long)]
    pub rdap: bool,

    /// Skip lookups and print reference links only
    #[arg(long)]
    pub simple: bool,

    /// Do not draw the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Key (api_key, output_format, preset, workers, politeness_delay_ms,
        /// rate_limit_backoff_secs, use_rdap)
        key: String,

        /// Value
        value: String,
    },

    /// Print the configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_lookup_flags() {
        let cli = Cli::try_parse_from([
            "whoisbatch", "lookup", "8.8.8.8", "example.com", "--preset", "fast", "-w", "3",
            "--rdap", "-o", "json",
        ])
        .unwrap();

        let Commands::Lookup(args) = cli.command else {
            panic!("expected lookup");
        };
        assert_eq!(args.targets, ["8.8.8.8", "example.com"]);
        assert_eq!(args.preset, Some(Preset::Fast));
        assert_eq!(args.workers, Some(3));
        assert!(args.rdap);
        assert_eq!(cli.output, Some(OutputFormat::Json));
    }

    #[test]
    fn test_unknown_preset_rejected() {
        assert!(Cli::try_parse_from(["whoisbatch", "lookup", "--preset", "turbo"]).is_err());
    }
}
