use super::feature::Feature;
use anyhow::{Context, Result};
use regex::Regex;
use std::borrow::Cow;

/// Built-in legacy call shapes and their API-client replacements.
///
/// Applied top to bottom, so an earlier entry wins when two overlap.
/// Replacements use `${n}` to re-emit capture groups.
const BUILTIN: &[(&str, &str, Feature)] = &[
    // auth
    (r"fetch\('/api/auth/logout'", "authAPI.logout(", Feature::Auth),
    (
        r"fetch\(`/api/user/balance\?userId=\$\{[^}]+\}`\)",
        "authAPI.me()",
        Feature::Auth,
    ),
    // games
    (r"fetch\('/api/games'\)", "gamesAPI.list()", Feature::Games),
    (
        r"fetch\(`/api/games/\$\{([^}]+)\}`\)",
        "gamesAPI.get(${1})",
        Feature::Games,
    ),
    // matches
    (
        r"fetch\(`/api/matches/\$\{([^}]+)\}`\)",
        "matchesAPI.get(${1})",
        Feature::Matches,
    ),
    // wallet
    (
        r"fetch\('/api/user/balance'\)",
        "walletAPI.getBalance()",
        Feature::Wallet,
    ),
    (
        r"fetch\('/api/user/transactions'\)",
        "walletAPI.getTransactions()",
        Feature::Wallet,
    ),
];

#[derive(Debug, Clone)]
pub struct PatternEntry {
    regex: Regex,
    replacement: String,
    feature: Feature,
}

impl PatternEntry {
    pub fn new(pattern: &str, replacement: impl Into<String>, feature: Feature) -> Result<Self> {
        let regex =
            Regex::new(pattern).with_context(|| format!("invalid pattern: {}", pattern))?;
        Ok(Self {
            regex,
            replacement: replacement.into(),
            feature,
        })
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    pub fn feature(&self) -> Feature {
        self.feature
    }

    /// Replace every match in `text`; returns the new text and the match count.
    pub fn apply<'t>(&self, text: &'t str) -> (Cow<'t, str>, usize) {
        let hits = self.regex.find_iter(text).count();
        if hits == 0 {
            return (Cow::Borrowed(text), 0);
        }
        (
            self.regex.replace_all(text, self.replacement.as_str()),
            hits,
        )
    }
}

/// Ordered, read-only collection of [`PatternEntry`].
#[derive(Debug, Clone)]
pub struct PatternTable {
    entries: Vec<PatternEntry>,
}

impl PatternTable {
    pub fn builtin() -> Self {
        let entries = BUILTIN
            .iter()
            .map(|(pattern, replacement, feature)| {
                PatternEntry::new(pattern, *replacement, *feature)
                    .expect("built-in pattern is invalid")
            })
            .collect();
        Self { entries }
    }

    /// Built-in entries followed by `extra`; built-ins keep precedence.
    pub fn with_extra(extra: Vec<PatternEntry>) -> Self {
        let mut table = Self::builtin();
        table.entries.extend(extra);
        table
    }

    pub fn entries(&self) -> &[PatternEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lookup(&self, pattern: &str) -> Option<&PatternEntry> {
        self.entries.iter().find(|e| e.pattern() == pattern)
    }

    /// Run every entry over `text` in order.
    ///
    /// The returned counts are indexed like [`entries`](Self::entries).
    pub fn apply(&self, text: &str) -> (String, Vec<usize>) {
        let mut current = text.to_string();
        let mut counts = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            let (next, hits) = entry.apply(&current);
            if hits > 0 {
                current = next.into_owned();
            }
            counts.push(hits);
        }
        (current, counts)
    }
}

impl Default for PatternTable {
    fn default() -> Self {
        Self::builtin()
    }
}
