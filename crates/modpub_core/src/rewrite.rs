use log::{debug, trace};
use regex::Regex;
use std::sync::LazyLock;

use crate::{
    prologue::locate_prologue,
    remap::{Remapped, SpecifierMapping, remap_specifiers},
};

/// Body of an inline `<script type="module">` element (group 1).
static MODULE_SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"(?is)<script\b[^>]*?\stype\s*=\s*"#,
        r#"(?:"module"[^>]*|'module'[^>]*|module(?:\s[^>]*)?)>"#,
        r#"(.*?)</script\s*>"#,
    ))
    .expect("module script pattern is valid")
});

/// Rewrites the import/export prologue of a module, leaving the rest verbatim.
pub fn rewrite_module(text: &str, mapping: &SpecifierMapping) -> Remapped {
    let prologue = locate_prologue(text);
    if !prologue.has_import_export_block {
        return Remapped::unchanged(text);
    }

    let remapped = remap_specifiers(prologue.import_export_block, mapping);
    if !remapped.changed() {
        return Remapped::unchanged(text);
    }
    Remapped { text: prologue.assemble(&remapped.text), substitutions: remapped.substitutions }
}

/// Rewrites an HTML document.
///
/// A document that is itself a module prologue is handled like a script.
/// Otherwise every inline module script is rewritten on its own.
pub fn rewrite_markup(text: &str, mapping: &SpecifierMapping) -> Remapped {
    if locate_prologue(text).has_import_export_block {
        return rewrite_module(text, mapping);
    }

    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    let mut substitutions = 0;

    for caps in MODULE_SCRIPT.captures_iter(text) {
        let Some(body) = caps.get(1) else {
            continue;
        };
        let script = rewrite_module(body.as_str(), mapping);
        trace!(
            "Inline module script at byte {}: {} substitution(s)",
            body.start(),
            script.substitutions
        );
        if script.changed() {
            out.push_str(&text[last..body.start()]);
            out.push_str(&script.text);
            last = body.end();
            substitutions += script.substitutions;
        }
    }

    if substitutions == 0 {
        return Remapped::unchanged(text);
    }
    out.push_str(&text[last..]);
    debug!("Rewrote {} specifier(s) in inline module scripts", substitutions);
    Remapped { text: out, substitutions }
}
