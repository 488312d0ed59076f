//! Publication runs for ES module source trees.
//!
//! This crate turns a list of publication targets (from `publish.json` or the
//! built-in docs/lib pair) into ordered build jobs, runs them through the
//! specifier rewriter of `modpub_core`, and reports the result.
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```no_run
//! use modpub_publish::{Config, run_publish};
//! use std::io::{BufWriter, Write};
//!
//! # fn main() -> anyhow::Result<()> {
//! let cfg = Config {
//!     root: Some(std::path::PathBuf::from("/path/to/project")),
//!     config: None,
//!     targets: vec!["docs".to_string()],
//! };
//!
//! let plan = cfg.load_plan()?;
//! let report = run_publish(&plan)?;
//!
//! let mut stdout = BufWriter::new(std::io::stdout());
//! modpub_publish::print_publish_summary(&mut stdout, &report)?;
//! stdout.flush()?;
//! # Ok(())
//! # }
//! ```

mod checker;
mod config;
mod constants;
mod plan;
mod publisher;
mod reporter;
mod types;

// Re-export public API
pub use checker::run_check;
pub use config::{
    Config, PublishFile, SourceConfig, TargetConfig, default_targets, find_project_root,
    read_publish_file,
};
pub use constants::{CONFIG_FILE_NAME, DOCS_GRIDCHEN_URL};
pub use plan::{BuildJob, BuildPlan};
pub use publisher::run_publish;
pub use reporter::{print_check_result, print_publish_summary};
pub use types::{CheckResult, JobReport, PublishReport, StaleFile, Staleness};
