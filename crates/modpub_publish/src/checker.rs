use anyhow::{Context, Result};
use log::{debug, info, trace};
use std::{
    collections::BTreeMap,
    fs, io,
    path::PathBuf,
};

use modpub_core::{render_file, walk};

use crate::{
    plan::{BuildJob, BuildPlan},
    types::{CheckResult, StaleFile, Staleness},
};

/// Compares what the plan would publish with what is on disk. Writes nothing.
pub fn run_check(plan: &BuildPlan) -> Result<CheckResult> {
    info!("Starting staleness check of {} job(s)", plan.jobs.len());

    // Later jobs win for the same destination, as they do when publishing.
    let mut expected: BTreeMap<PathBuf, (&BuildJob, PathBuf)> = BTreeMap::new();
    for job in &plan.jobs {
        for entry in walk(&job.source_dir, job.recursive) {
            let source = entry.with_context(|| format!("Job '{}' failed", job.label()))?;
            if job.is_output(&source) {
                continue;
            }
            let destination = job.destination_for(&source)?;
            expected.insert(destination, (job, source));
        }
    }
    debug!("{} destination file(s) to compare", expected.len());

    let mut stale = Vec::new();
    for (destination, (job, source)) in &expected {
        let rendered = render_file(source, &job.mapping)
            .with_context(|| format!("Failed to render {}", source.display()))?;

        let staleness = match fs::read(destination) {
            Ok(actual) if actual == rendered.bytes => {
                trace!("Up to date: {}", destination.display());
                continue;
            }
            Ok(_) => Staleness::Outdated,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Staleness::Missing,
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", destination.display()));
            }
        };
        debug!("{:?}: {}", staleness, destination.display());
        stale.push(StaleFile {
            destination: destination.clone(),
            source: source.clone(),
            target: job.target.clone(),
            staleness,
        });
    }

    info!("Staleness check complete. {} of {} file(s) stale", stale.len(), expected.len());
    Ok(CheckResult { stale, files_checked: expected.len() })
}
