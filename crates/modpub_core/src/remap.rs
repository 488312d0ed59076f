use log::{debug, trace};
use regex::{Captures, Regex};
use std::borrow::Cow;

use crate::{
    constants::PROLOGUE_KEYWORDS,
    error::{PublishError, PublishResult},
    types::SpecifierRule,
};

#[derive(Debug, Clone)]
struct CompiledRule {
    rule: SpecifierRule,
    /// Group 1 is everything from the keyword up to and including the quote.
    pattern: Regex,
}

/// Ordered specifier rules. Each rule sees the output of the rules before it.
#[derive(Debug, Clone, Default)]
pub struct SpecifierMapping {
    rules: Vec<CompiledRule>,
}

impl SpecifierMapping {
    pub fn new(rules: impl IntoIterator<Item = SpecifierRule>) -> PublishResult<Self> {
        let mut compiled = Vec::new();
        for (index, rule) in rules.into_iter().enumerate() {
            if rule.prefix.is_empty() {
                return Err(PublishError::EmptyPrefix { index });
            }
            let source = format!(
                r#"(?s)(\b(?:{})\b.*?["']){}"#,
                PROLOGUE_KEYWORDS.join("|"),
                regex::escape(&rule.prefix)
            );
            let pattern = Regex::new(&source)
                .map_err(|source| PublishError::Pattern { prefix: rule.prefix.clone(), source })?;
            trace!("Compiled rule #{}: '{}' -> '{}'", index, rule.prefix, rule.replacement);
            compiled.push(CompiledRule { rule, pattern });
        }
        Ok(Self { rules: compiled })
    }

    pub fn rules(&self) -> impl Iterator<Item = &SpecifierRule> {
        self.rules.iter().map(|c| &c.rule)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Text produced by a rewrite, with the number of specifiers it changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remapped {
    pub text: String,
    pub substitutions: usize,
}

impl Remapped {
    pub fn unchanged(text: &str) -> Self {
        Self { text: text.to_string(), substitutions: 0 }
    }

    pub fn changed(&self) -> bool {
        self.substitutions > 0
    }
}

/// Rewrites the specifiers of an import/export block.
///
/// A specifier is eligible when its opening quote follows an `import` or
/// `export` keyword and the prefix starts right after the quote. Only the
/// prefix is replaced; the quote and the rest of the specifier stay as they
/// are.
pub fn remap_specifiers(block: &str, mapping: &SpecifierMapping) -> Remapped {
    let mut text = block.to_string();
    let mut substitutions = 0;

    for compiled in &mapping.rules {
        let mut count = 0;
        let replaced = match compiled.pattern.replace_all(&text, |caps: &Captures| {
            count += 1;
            format!("{}{}", &caps[1], compiled.rule.replacement)
        }) {
            Cow::Owned(next) => Some(next),
            Cow::Borrowed(_) => None,
        };
        if let Some(next) = replaced {
            text = next;
        }
        if count > 0 {
            debug!(
                "Rule '{}' -> '{}' replaced {} specifier(s)",
                compiled.rule.prefix, compiled.rule.replacement, count
            );
        }
        substitutions += count;
    }

    Remapped { text, substitutions }
}
