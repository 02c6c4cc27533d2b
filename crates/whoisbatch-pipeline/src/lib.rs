//! Concurrent, rate-limit aware resolution pipeline.
//!
//! The pipeline turns a list of IP addresses and hostnames into one terminal
//! [`ResolutionResult`](whoisbatch_core::ResolutionResult) per target:
//!
//! - [`block`] groups addresses into network blocks (/24 and /48)
//! - [`cache`] shares lookups between addresses of one block for 24 hours
//! - [`resolver`] resolves a single target against the free or paid service
//! - [`deferred`] parks targets that hit HTTP 429 until their resume time
//! - [`scheduler`] drives rounds over a bounded worker pool
//! - [`progress`] exposes processed/total/pending counts and an ETA
//!
//! # Example
//!
//! ```rust,no_run
//! use whoisbatch_client::LookupClient;
//! use whoisbatch_core::Target;
//! use whoisbatch_pipeline::{PipelineConfig, Resolver, Scheduler};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PipelineConfig::default();
//! let resolver = Resolver::new(LookupClient::new()?, config.resolver_config());
//! let mut scheduler = Scheduler::new(resolver, config.scheduler_config())?;
//!
//! let report = scheduler
//!     .run(["8.8.8.8", "1.1.1.1", "example.com"].map(Target::new))
//!     .await?;
//! for result in &report.results {
//!     println!("{}: {}", result.target, result.outcome);
//! }
//! # Ok(())
//! # }
//! ```

#![doc(html_root_url = "https://docs.rs/whoisbatch-pipeline/0.7.0")]

mod error;

pub mod block;
pub mod cache;
pub mod classify;
pub mod config;
pub mod deferred;
pub mod exit_nodes;
pub mod progress;
pub mod resolver;
pub mod scheduler;

pub use cache::{CacheSnapshot, LookupCache};
pub use config::{PipelineConfig, Preset};
pub use error::{PipelineError, PipelineResult};
pub use exit_nodes::ExitNodeDirectory;
pub use progress::{Progress, RunState};
pub use resolver::{Resolution, Resolve, Resolver, ResolverConfig};
pub use scheduler::{BatchReport, CancelHandle, Scheduler, SchedulerConfig};
