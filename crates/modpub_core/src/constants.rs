//! Constants for file kinds and module syntax.
//!
//! This module centralizes the extension and keyword tables so that the
//! processor, the walker and the prologue locator agree on what a rewritable
//! file is and where a module body starts.
//!
//! ## Rewritten Extensions
//!
//! - **Markup**: `.html` (whole document, then inline `<script type="module">`)
//! - **Script**: `.js`
//!
//! Every other extension is copied byte-for-byte.

/// Extensions of markup files whose inline module scripts are rewritten
pub const MARKUP_EXTENSIONS: &[&str] = &["html"];

/// Extensions of script files that are rewritten as ES modules
pub const SCRIPT_EXTENSIONS: &[&str] = &["js"];

/// Keywords that introduce the executable body of a module
pub const BODY_KEYWORDS: &[&str] = &["function", "const", "let", "var"];

/// Keywords that open a statement of the import/export prologue
pub const PROLOGUE_KEYWORDS: &[&str] = &["import", "export"];
