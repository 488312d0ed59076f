use anyhow::{Context, Result, anyhow};
use clap::Parser;
use log::{debug, info, trace};
use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use modpub_core::SpecifierRule;

use crate::{
    constants::{CONFIG_FILE_NAME, DOCS_GRIDCHEN_URL},
    plan::BuildPlan,
};

#[derive(Debug, Clone, Parser)]
#[command(name = "publish")]
#[command(about = "Publish module sources with remapped import specifiers")]
pub struct Config {
    /// Project root (defaults to the nearest directory with publish.json or .git)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Publish configuration file (defaults to <root>/publish.json, else the built-in targets)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Only run the named target; may be repeated
    #[arg(long = "target", value_name = "NAME")]
    pub targets: Vec<String>,
}

/// Contents of `publish.json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PublishFile {
    pub targets: Vec<TargetConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    pub name: String,
    pub destination: PathBuf,
    #[serde(default)]
    pub mapping: Vec<SpecifierRule>,
    pub sources: Vec<SourceConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    pub path: PathBuf,
    #[serde(default)]
    pub recursive: bool,
}

impl Config {
    /// Resolves the root and the target list into a [`BuildPlan`].
    pub fn load_plan(&self) -> Result<BuildPlan> {
        let root = self.resolve_root()?;
        info!("Using root directory: {}", root.display());

        let targets = match &self.config {
            Some(path) => read_publish_file(path)?.targets,
            None => {
                let path = root.join(CONFIG_FILE_NAME);
                if path.is_file() {
                    read_publish_file(&path)?.targets
                } else {
                    info!("No {} in {}, using built-in targets", CONFIG_FILE_NAME, root.display());
                    default_targets()
                }
            }
        };
        debug!("Loaded {} target(s)", targets.len());

        BuildPlan::new(root, targets, &self.targets)
    }

    fn resolve_root(&self) -> Result<PathBuf> {
        match &self.root {
            Some(r) => {
                debug!("Using provided root directory: {:?}", r);
                r.canonicalize().with_context(|| format!("Invalid root directory {}", r.display()))
            }
            None => {
                debug!("No root provided, searching for project root");
                find_project_root(&env::current_dir()?)
            }
        }
    }
}

/// Walks up from `start` to the first directory holding `publish.json` or `.git`.
pub fn find_project_root(start: &Path) -> Result<PathBuf> {
    let mut current_dir = start.to_path_buf();
    trace!("Starting search from: {:?}", current_dir);

    loop {
        if current_dir.join(CONFIG_FILE_NAME).is_file() || current_dir.join(".git").exists() {
            debug!("Found project root at: {:?}", current_dir);
            return Ok(current_dir);
        }

        match current_dir.parent() {
            Some(parent) => current_dir = parent.to_path_buf(),
            None => {
                return Err(anyhow!(
                    "Could not find {} or .git in any parent of {}",
                    CONFIG_FILE_NAME,
                    start.display()
                ));
            }
        }
    }
}

pub fn read_publish_file(path: &Path) -> Result<PublishFile> {
    debug!("Reading publish configuration from {}", path.display());
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// The two publications of the widget library: the documentation site, which
/// loads grid modules from the public site, and the library tree.
pub fn default_targets() -> Vec<TargetConfig> {
    let source =
        |path: &str, recursive: bool| SourceConfig { path: PathBuf::from(path), recursive };
    vec![
        TargetConfig {
            name: "docs".to_string(),
            destination: PathBuf::from("docs"),
            mapping: vec![SpecifierRule::new("/gridchen/", DOCS_GRIDCHEN_URL)],
            sources: vec![source(".", false), source("demos", false), source("formchen", true)],
        },
        TargetConfig {
            name: "lib".to_string(),
            destination: PathBuf::from("lib"),
            mapping: vec![SpecifierRule::new("gridchen/", "/gridchen/")],
            sources: vec![source("formchen", true)],
        },
    ]
}
