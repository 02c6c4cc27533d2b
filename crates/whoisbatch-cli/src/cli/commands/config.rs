//! `whoisbatch config` - CLI configuration management.

use anyhow::Result;
use colored::Colorize;
use whoisbatch_pipeline::Preset;

use super::Context;
use crate::cli::args::{ConfigArgs, ConfigCommands};
use crate::config::Config;
use crate::output::OutputFormat;

pub fn execute(ctx: &Context, args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Show => show_config(ctx),
        ConfigCommands::Set { key, value } => set_config(&key, &value),
        ConfigCommands::Path => show_path(),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    let config = Config::load()?;

    match ctx.output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&config.masked())?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(&config.masked())?);
        }
        OutputFormat::Csv | OutputFormat::Pretty => {
            let pipeline = &config.pipeline;
            println!("{}", "Current Configuration:".bold());
            println!();

            let api_display = config
                .api_key
                .as_deref()
                .map_or_else(|| "(not set)".dimmed().to_string(), mask_key);
            println!("  {} {}", "api_key:".bold(), api_display);
            println!(
                "  {} {}",
                "output_format:".bold(),
                config.output_format.unwrap_or_default()
            );
            println!();
            println!("{}", "[pipeline]".bold());
            println!("  {} {}", "workers:".bold(), pipeline.workers);
            println!("  {} {}", "politeness_delay_ms:".bold(), pipeline.politeness_delay_ms);
            println!(
                "  {} {}",
                "rate_limit_backoff_secs:".bold(),
                pipeline.rate_limit_backoff_secs
            );
            println!("  {} {}", "use_rdap:".bold(), pipeline.use_rdap);
        }
    }

    Ok(())
}

fn set_config(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load()?;

    match key {
        "api_key" => {
            config.api_key = Some(value.to_string()).filter(|v| !v.is_empty());
            println!("{} API key set.", "Success:".green().bold());
        }
        "output_format" | "output" => {
            config.output_format = Some(value.parse()?);
            println!("{} Output format set to {}.", "Success:".green().bold(), value.cyan());
        }
        "preset" => {
            let preset: Preset = value.parse()?;
            config.pipeline.apply_preset(preset);
            println!("{} Applied preset {}.", "Success:".green().bold(), preset.to_string().cyan());
        }
        "workers" => {
            config.pipeline.workers = value.parse()?;
            println!("{} workers set to {}.", "Success:".green().bold(), value);
        }
        "politeness_delay_ms" | "delay_ms" => {
            config.pipeline.politeness_delay_ms = value.parse()?;
            println!("{} politeness_delay_ms set to {}.", "Success:".green().bold(), value);
        }
        "rate_limit_backoff_secs" | "backoff_secs" => {
            config.pipeline.rate_limit_backoff_secs = value.parse()?;
            println!("{} rate_limit_backoff_secs set to {}.", "Success:".green().bold(), value);
        }
        "use_rdap" | "rdap" => {
            config.pipeline.use_rdap = value.parse()?;
            println!("{} use_rdap set to {}.", "Success:".green().bold(), value);
        }
        _ => {
            anyhow::bail!(
                "Unknown config key: {key}\n\n\
                 Available keys:\n  \
                 api_key                 - Paid-service token\n  \
                 output_format           - Default output format (pretty/json/csv/yaml)\n  \
                 preset                  - Pacing preset (stable/fast)\n  \
                 workers                 - Concurrent lookups\n  \
                 politeness_delay_ms     - Delay before each live lookup\n  \
                 rate_limit_backoff_secs - Wait after HTTP 429\n  \
                 use_rdap                - Append RDAP network names (true/false)"
            );
        }
    }

    config.pipeline.validate()?;
    config.save()?;

    Ok(())
}

fn show_path() -> Result<()> {
    let path = Config::path()?;
    println!("{}", path.display());
    Ok(())
}

fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    } else {
        "****".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key("abcd1234efgh"), "abcd...efgh");
        assert_eq!(mask_key("short"), "****");
    }
}
