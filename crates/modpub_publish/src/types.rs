use std::path::PathBuf;

use modpub_core::FileOutcome;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobReport {
    pub target: String,
    pub source_dir: PathBuf,
    pub destination_root: PathBuf,
    pub rewritten: usize,
    pub unchanged: usize,
    pub copied: usize,
    pub substitutions: usize,
    /// Files found under the job's own destination root and left alone
    pub skipped: usize,
}

impl JobReport {
    pub(crate) fn record(&mut self, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Rewritten { substitutions } => {
                self.rewritten += 1;
                self.substitutions += substitutions;
            }
            FileOutcome::Unchanged => self.unchanged += 1,
            FileOutcome::Copied => self.copied += 1,
        }
    }

    pub fn files(&self) -> usize {
        self.rewritten + self.unchanged + self.copied
    }
}

#[derive(Debug, Clone, Default)]
pub struct PublishReport {
    pub jobs: Vec<JobReport>,
}

impl PublishReport {
    pub fn files(&self) -> usize {
        self.jobs.iter().map(JobReport::files).sum()
    }

    pub fn substitutions(&self) -> usize {
        self.jobs.iter().map(|j| j.substitutions).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Staleness {
    Missing,
    Outdated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaleFile {
    pub destination: PathBuf,
    pub source: PathBuf,
    pub target: String,
    pub staleness: Staleness,
}

#[derive(Debug, Clone, Default)]
pub struct CheckResult {
    pub stale: Vec<StaleFile>,
    pub files_checked: usize,
}
