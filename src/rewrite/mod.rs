use regex::Regex;
use std::sync::LazyLock;

pub mod feature;
pub mod imports;
pub mod patterns;

pub use feature::{Feature, FeatureSet};
pub use imports::{API_CLIENT_MODULE, ImportInjector, TrailingImports};
pub use patterns::{PatternEntry, PatternTable};

static LEGACY_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bfetch\(\s*['"`]/api/"#).expect("LEGACY_CALL regex is invalid")
});

static DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*['"]use [a-z]+['"];?\s*$"#).expect("DIRECTIVE regex is invalid")
});

/// Outcome of running one file's text through the table and the injector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub content: String,
    /// Match count per table entry, indexed like [`PatternTable::entries`].
    pub counts: Vec<usize>,
    pub features: FeatureSet,
    pub import_added: bool,
}

impl Rewrite {
    pub fn replacements(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Pattern substitution followed by import injection.
#[derive(Debug, Clone, Default)]
pub struct Rewriter {
    table: PatternTable,
    injector: ImportInjector,
}

impl Rewriter {
    pub fn new(table: PatternTable, injector: ImportInjector) -> Self {
        Self { table, injector }
    }

    pub fn table(&self) -> &PatternTable {
        &self.table
    }

    pub fn injector(&self) -> &ImportInjector {
        &self.injector
    }

    pub fn rewrite(&self, text: &str) -> Rewrite {
        let (replaced, counts) = self.table.apply(text);
        let features: FeatureSet = self
            .table
            .entries()
            .iter()
            .zip(&counts)
            .filter(|(_, hits)| **hits > 0)
            .map(|(entry, _)| entry.feature())
            .collect();

        let content = self.injector.inject(&replaced, &features);
        let import_added = content != replaced;
        Rewrite {
            content,
            counts,
            features,
            import_added,
        }
    }
}

/// Lines (1-based) that still call `fetch` on an `/api/` path.
pub fn find_legacy_calls(text: &str) -> Vec<(usize, &str)> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| LEGACY_CALL.is_match(line))
        .map(|(idx, line)| (idx + 1, line.trim()))
        .collect()
}

/// A `'use client'`-style directive (1-based line) that sits below an
/// import and so no longer takes effect.
pub fn find_displaced_directive(text: &str) -> Option<(usize, &str)> {
    let mut seen_import = false;
    for (idx, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if line.starts_with("import ") {
            seen_import = true;
            continue;
        }
        if DIRECTIVE.is_match(line) && seen_import {
            return Some((idx + 1, trimmed));
        }
        break;
    }
    None
}
