use anyhow::{Result, anyhow, bail};
use log::{debug, trace};
use path_clean::clean;
use std::path::{Path, PathBuf};

use modpub_core::SpecifierMapping;

use crate::config::TargetConfig;

/// One source directory published into one destination with one mapping.
#[derive(Debug, Clone)]
pub struct BuildJob {
    pub target: String,
    /// Directory that output paths are made relative to (the project root).
    pub base: PathBuf,
    pub source_dir: PathBuf,
    pub recursive: bool,
    pub destination_root: PathBuf,
    pub mapping: SpecifierMapping,
}

impl BuildJob {
    /// `destination_root` joined with the source's path relative to `base`.
    pub fn destination_for(&self, source: &Path) -> Result<PathBuf> {
        let rel = source.strip_prefix(&self.base).map_err(|_| {
            anyhow!("{} is not under project root {}", source.display(), self.base.display())
        })?;
        Ok(self.destination_root.join(rel))
    }

    /// True for files that live inside this job's own output tree.
    pub fn is_output(&self, source: &Path) -> bool {
        source.starts_with(&self.destination_root)
    }

    pub fn label(&self) -> String {
        let rel = self.source_dir.strip_prefix(&self.base).unwrap_or(&self.source_dir);
        let rel = if rel.as_os_str().is_empty() { Path::new(".") } else { rel };
        format!("{}:{}", self.target, rel.display())
    }
}

/// Ordered list of jobs for one publish run.
#[derive(Debug, Clone)]
pub struct BuildPlan {
    pub root: PathBuf,
    pub jobs: Vec<BuildJob>,
}

impl BuildPlan {
    /// Expands targets into jobs, keeping configuration order.
    ///
    /// An empty `only` selects every target; otherwise each name must exist.
    pub fn new(root: PathBuf, targets: Vec<TargetConfig>, only: &[String]) -> Result<Self> {
        for name in only {
            if !targets.iter().any(|t| &t.name == name) {
                let available: Vec<&str> = targets.iter().map(|t| t.name.as_str()).collect();
                bail!("unknown target '{}' (available: {})", name, available.join(", "));
            }
        }

        let mut jobs = Vec::new();
        for target in targets {
            if !only.is_empty() && !only.contains(&target.name) {
                debug!("Target '{}' not selected", target.name);
                continue;
            }
            let mapping = SpecifierMapping::new(target.mapping.iter().cloned()).map_err(|e| {
                anyhow!(e).context(format!("invalid mapping in target '{}'", target.name))
            })?;
            let destination_root = clean(root.join(&target.destination));

            for source in &target.sources {
                let source_dir = clean(root.join(&source.path));
                if !source_dir.starts_with(&root) {
                    bail!(
                        "source '{}' of target '{}' is outside project root {}",
                        source.path.display(),
                        target.name,
                        root.display()
                    );
                }
                trace!(
                    "Job {}: {} -> {} (recursive: {})",
                    target.name,
                    source_dir.display(),
                    destination_root.display(),
                    source.recursive
                );
                jobs.push(BuildJob {
                    target: target.name.clone(),
                    base: root.clone(),
                    source_dir,
                    recursive: source.recursive,
                    destination_root: destination_root.clone(),
                    mapping: mapping.clone(),
                });
            }
        }

        debug!("Planned {} job(s)", jobs.len());
        Ok(Self { root, jobs })
    }
}
