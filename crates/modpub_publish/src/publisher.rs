use anyhow::{Context, Result};
use log::{debug, error, info, trace};

use modpub_core::{process_file, walk};

use crate::{
    plan::{BuildJob, BuildPlan},
    types::{JobReport, PublishReport},
};

/// Runs every job of the plan in order and stops at the first failure.
pub fn run_publish(plan: &BuildPlan) -> Result<PublishReport> {
    info!("Starting publish of {} job(s)", plan.jobs.len());
    let mut report = PublishReport::default();

    for (index, job) in plan.jobs.iter().enumerate() {
        info!(
            "Job {}/{}: {} -> {}",
            index + 1,
            plan.jobs.len(),
            job.label(),
            job.destination_root.display()
        );
        match run_job(job) {
            Ok(job_report) => {
                debug!(
                    "Job {} done: {} rewritten, {} unchanged, {} copied",
                    job.label(),
                    job_report.rewritten,
                    job_report.unchanged,
                    job_report.copied
                );
                report.jobs.push(job_report);
            }
            Err(e) => {
                error!(
                    "Publish aborted in job {}/{} ({}); output under {} is incomplete",
                    index + 1,
                    plan.jobs.len(),
                    job.label(),
                    job.destination_root.display()
                );
                return Err(e.context(format!("Job '{}' failed", job.label())));
            }
        }
    }

    info!("Publish complete: {} file(s) in {} job(s)", report.files(), report.jobs.len());
    Ok(report)
}

fn run_job(job: &BuildJob) -> Result<JobReport> {
    let mut report = JobReport {
        target: job.target.clone(),
        source_dir: job.source_dir.clone(),
        destination_root: job.destination_root.clone(),
        ..Default::default()
    };

    for entry in walk(&job.source_dir, job.recursive) {
        let source = entry?;
        if job.is_output(&source) {
            debug!("Skipping file inside destination: {}", source.display());
            report.skipped += 1;
            continue;
        }
        let destination = job.destination_for(&source)?;
        let outcome = process_file(&source, &destination, &job.mapping)
            .with_context(|| format!("Failed to publish {}", source.display()))?;
        report.record(outcome);
    }

    Ok(report)
}
