use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::constants::{MARKUP_EXTENSIONS, SCRIPT_EXTENSIONS};

/// One `prefix -> replacement` entry of a specifier mapping.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpecifierRule {
    pub prefix: String,
    pub replacement: String,
}

impl SpecifierRule {
    pub fn new(prefix: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self { prefix: prefix.into(), replacement: replacement.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Markup,
    Script,
    /// Copied byte-for-byte.
    Opaque,
}

impl FileKind {
    pub fn of(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if MARKUP_EXTENSIONS.contains(&ext) => FileKind::Markup,
            Some(ext) if SCRIPT_EXTENSIONS.contains(&ext) => FileKind::Script,
            _ => FileKind::Opaque,
        }
    }

    pub fn is_text(self) -> bool {
        !matches!(self, FileKind::Opaque)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceContent {
    Text(String),
    Bytes(Vec<u8>),
}

/// A source file read once from disk.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    pub path: PathBuf,
    pub kind: FileKind,
    pub content: SourceContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    Rewritten { substitutions: usize },
    Unchanged,
    Copied,
}
