//! Core of the module publisher.
//!
//! This crate rewrites the module specifiers of ES module sources and mirrors
//! source trees into publication trees, including:
//! - Locating the leading import/export block of a module without parsing it
//! - Remapping specifier prefixes according to an ordered rule list
//! - Processing single files (rewrite `.html`/`.js`, copy everything else)
//! - Walking source directories flat or recursively

mod constants;
mod error;
mod processor;
mod prologue;
mod remap;
mod rewrite;
mod types;
mod walker;

// Re-export public API
pub use constants::{BODY_KEYWORDS, MARKUP_EXTENSIONS, PROLOGUE_KEYWORDS, SCRIPT_EXTENSIONS};
pub use error::{PublishError, PublishResult};
pub use processor::{Rendered, process_file, render_file, render_unit};
pub use prologue::{Prologue, locate_prologue};
pub use remap::{Remapped, SpecifierMapping, remap_specifiers};
pub use rewrite::{rewrite_markup, rewrite_module};
pub use types::{FileKind, FileOutcome, SourceContent, SourceUnit, SpecifierRule};
pub use walker::{SourceWalk, walk};
