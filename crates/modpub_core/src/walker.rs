use ignore::{Walk, WalkBuilder};
use log::{debug, trace};
use std::path::{Path, PathBuf};

use crate::error::{PublishError, PublishResult};

const VCS_DIR: &str = ".git";

/// Lazy enumeration of the publishable files below a source directory.
///
/// Yields regular files whose name contains a dot, the equivalent of a
/// `*.*` glob (flat) or `**/*.*` (recursive). Dotfiles such as `.nojekyll`
/// are included; `.git` is never entered.
pub struct SourceWalk {
    root: PathBuf,
    inner: Walk,
}

pub fn walk(source_root: &Path, recursive: bool) -> SourceWalk {
    debug!(
        "Walking {} ({})",
        source_root.display(),
        if recursive { "recursive" } else { "flat" }
    );
    let inner = WalkBuilder::new(source_root)
        .standard_filters(false)
        .hidden(false)
        .max_depth(if recursive { None } else { Some(1) })
        .filter_entry(|dent| dent.depth() == 0 || dent.file_name() != VCS_DIR)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();
    SourceWalk { root: source_root.to_path_buf(), inner }
}

fn has_extension(path: &Path) -> bool {
    path.file_name().and_then(|n| n.to_str()).is_some_and(|name| name.contains('.'))
}

impl Iterator for SourceWalk {
    type Item = PublishResult<PathBuf>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let dent = match self.inner.next()? {
                Ok(dent) => dent,
                Err(source) => {
                    return Some(Err(PublishError::Walk { root: self.root.clone(), source }));
                }
            };
            if !dent.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            let path = dent.into_path();
            if !has_extension(&path) {
                trace!("Skipping file without extension: {}", path.display());
                continue;
            }
            return Some(Ok(path));
        }
    }
}
