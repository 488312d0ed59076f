use log::trace;
use regex::Regex;
use std::sync::LazyLock;

use crate::constants::{BODY_KEYWORDS, PROLOGUE_KEYWORDS};

/// Whitespace interleaved with `/* ... */` and `// ...` comments, anchored at
/// the start of the text. Always matches, possibly with zero length.
static LEADING_COMMENTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\A(?:\s+|(?s:/\*.*?\*/)|//[^\n]*)*").expect("leading comment pattern is valid")
});

/// First keyword that starts the executable part of a module.
static BODY_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\b(?:{})\s", BODY_KEYWORDS.join("|")))
        .expect("body keyword pattern is valid")
});

/// A module text split into three consecutive regions.
///
/// `leading_comments + import_export_block + body` is always the original
/// text. When no import/export block was found the block is empty and the
/// body holds everything after the leading comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prologue<'a> {
    pub leading_comments: &'a str,
    pub import_export_block: &'a str,
    pub body: &'a str,
    pub has_import_export_block: bool,
}

impl<'a> Prologue<'a> {
    fn without_block(text: &'a str, lead_end: usize) -> Self {
        Self {
            leading_comments: &text[..lead_end],
            import_export_block: "",
            body: &text[lead_end..],
            has_import_export_block: false,
        }
    }

    /// Reassembles the module with `block` in place of the import/export block.
    pub fn assemble(&self, block: &str) -> String {
        let mut out =
            String::with_capacity(self.leading_comments.len() + block.len() + self.body.len());
        out.push_str(self.leading_comments);
        out.push_str(block);
        out.push_str(self.body);
        out
    }
}

/// Finds the leading import/export block of a module without parsing it.
///
/// The block runs from the end of the leading comments up to the first
/// `function`, `const`, `let` or `var` keyword, and only counts if it starts
/// with `import` or `export`. Anything else degrades to "no block".
pub fn locate_prologue(text: &str) -> Prologue<'_> {
    let lead_end = LEADING_COMMENTS.find(text).map_or(0, |m| m.end());

    let Some(keyword) = BODY_KEYWORD.find_at(text, lead_end) else {
        trace!("No body keyword after offset {}, module left as is", lead_end);
        return Prologue::without_block(text, lead_end);
    };

    let candidate = &text[lead_end..keyword.start()];
    let trimmed = candidate.trim_start();
    if !PROLOGUE_KEYWORDS.iter().any(|kw| trimmed.starts_with(kw)) {
        trace!("Text before first body keyword is not an import/export block");
        return Prologue::without_block(text, lead_end);
    }

    trace!(
        "Import/export block spans bytes {}..{} (body keyword '{}')",
        lead_end,
        keyword.start(),
        keyword.as_str().trim_end()
    );
    Prologue {
        leading_comments: &text[..lead_end],
        import_export_block: candidate,
        body: &text[keyword.start()..],
        has_import_export_block: true,
    }
}
