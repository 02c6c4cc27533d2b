//! `whoisbatch lookup` - Resolve a batch of addresses and hostnames.

use anyhow::{Context as _, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;
use tokio::sync::watch;
use tracing::info;
use whoisbatch_client::LookupClient;
use whoisbatch_core::Target;
use whoisbatch_pipeline::{ExitNodeDirectory, PipelineConfig, Progress, Resolver, Scheduler};

use super::Context;
use crate::cli::args::LookupArgs;
use crate::output::{self, OutputFormat};

pub async fn execute(ctx: Context, args: LookupArgs) -> Result<()> {
    let targets = collect_targets(&args)?;
    if targets.is_empty() {
        anyhow::bail!(
            "No targets given.\n\n\
             Pass addresses as arguments or use --file <PATH>."
        );
    }

    let config = pipeline_config(&ctx, &args)?;
    let client = LookupClient::new()?;

    let mut resolver = Resolver::new(client.clone(), config.resolver_config())
        .with_credential(ctx.api_key.clone());
    if !config.simple_mode {
        let exit_nodes = ExitNodeDirectory::new(client).current().await;
        resolver = resolver.with_exit_nodes(exit_nodes);
    }
    info!(
        targets = targets.len(),
        paid = resolver.is_paid(),
        workers = config.workers,
        "starting lookup"
    );

    let mut scheduler = Scheduler::new(resolver, config.scheduler_config())?;

    let cancel = scheduler.cancel_handle();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("{} finishing in-flight lookups...", "Cancelling:".yellow().bold());
            cancel.cancel();
        }
    });

    let show_progress = !args.no_progress
        && ctx.output_format == OutputFormat::Pretty
        && console::Term::stderr().is_term();
    let progress_task = show_progress.then(|| tokio::spawn(render_progress(scheduler.subscribe())));

    let report = scheduler
        .run(targets.into_iter().map(Target::new))
        .await?;

    interrupt.abort();
    if let Some(task) = progress_task {
        let _ = task.await;
    }

    output::print_report(&report, ctx.output_format)?;
    Ok(())
}

/// Merge config-file pipeline settings with command-line overrides
fn pipeline_config(ctx: &Context, args: &LookupArgs) -> Result<PipelineConfig> {
    let mut config = ctx.config.pipeline.clone();
    if let Some(preset) = args.preset {
        config.apply_preset(preset);
    }
    if let Some(workers) = args.workers {
        config.workers = workers;
    }
    if let Some(delay) = args.delay_ms {
        config.politeness_delay_ms = delay;
    }
    if let Some(backoff) = args.backoff_secs {
        config.rate_limit_backoff_secs = backoff;
    }
    config.use_rdap |= args.rdap;
    config.simple_mode |= args.simple;
    config.validate()?;
    Ok(config)
}

/// Targets from arguments followed by the file's, in order
fn collect_targets(args: &LookupArgs) -> Result<Vec<String>> {
    let mut targets: Vec<String> = args
        .targets
        .iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    if let Some(path) = &args.file {
        targets.extend(read_targets_file(path)?);
    }
    Ok(targets)
}

fn read_targets_file(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read targets from {}", path.display()))?;
    Ok(parse_targets(&content))
}

/// One target per line; blank lines and `#` comments are skipped
fn parse_targets(content: &str) -> Vec<String> {
    content
        .lines()
        .filter_map(|line| line.split('#').next())
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

async fn render_progress(mut rx: watch::Receiver<Progress>) {
    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    bar.enable_steady_tick(Duration::from_millis(120));

    loop {
        let progress = rx.borrow_and_update().clone();
        bar.set_length(progress.total as u64);
        bar.set_position(progress.processed as u64);
        bar.set_message(progress_message(&progress));

        if progress.is_done() || rx.changed().await.is_err() {
            break;
        }
    }
    bar.finish_and_clear();
}

fn progress_message(progress: &Progress) -> String {
    let eta = progress
        .eta
        .map_or_else(|| "calculating".to_string(), |eta| format!("{}s", eta.as_secs()));
    let mut message = format!("ETA {eta}");
    if progress.pending > 0 {
        let retry = progress
            .next_retry_in
            .map(|d| format!(", retry in {}s", d.as_secs()))
            .unwrap_or_default();
        message.push_str(&format!(" | {} rate-limited{retry}", progress.pending).yellow().to_string());
    }
    message
}
