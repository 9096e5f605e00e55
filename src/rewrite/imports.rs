use super::feature::{FeatureSet, import_names};
use anyhow::{Result, bail};

/// Shared module every migrated file imports the API groups from.
pub const API_CLIENT_MODULE: &str = "@/lib/api-client";

const IMPORT_KEYWORD: &str = "import ";

/// Where the import goes when a file holds nothing but import lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrailingImports {
    /// After the last line.
    #[default]
    Append,
    /// Before the first line.
    Prepend,
    /// Leave the text untouched.
    Skip,
}

impl TrailingImports {
    pub fn parse(name: &str) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "append" => Ok(Self::Append),
            "prepend" => Ok(Self::Prepend),
            "skip" => Ok(Self::Skip),
            other => bail!("unsupported all_imports policy: {}", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImportInjector {
    module_path: String,
    trailing: TrailingImports,
}

impl Default for ImportInjector {
    fn default() -> Self {
        Self::new(API_CLIENT_MODULE, TrailingImports::default())
    }
}

impl ImportInjector {
    pub fn new(module_path: impl Into<String>, trailing: TrailingImports) -> Self {
        Self {
            module_path: module_path.into(),
            trailing,
        }
    }

    pub fn module_path(&self) -> &str {
        &self.module_path
    }

    /// `import { authAPI, gamesAPI } from '@/lib/api-client'`, or `None` when
    /// `features` is empty.
    pub fn import_line(&self, features: &FeatureSet) -> Option<String> {
        let names = import_names(features);
        if names.is_empty() {
            return None;
        }
        Some(format!(
            "import {{ {} }} from '{}'",
            names.join(", "),
            self.module_path
        ))
    }

    /// Whether [`inject`](Self::inject) would change `content`.
    pub fn needs_import(&self, content: &str, features: &FeatureSet) -> bool {
        !features.is_empty() && !content.contains(self.module_path.as_str())
    }

    /// Insert the import for `features` after the leading import block of
    /// `content`, unless the module path already appears anywhere in it.
    ///
    /// The inserted line takes the file's line ending (`\r\n` when present).
    pub fn inject(&self, content: &str, features: &FeatureSet) -> String {
        if !self.needs_import(content, features) {
            return content.to_string();
        }
        let Some(import_line) = self.import_line(features) else {
            return content.to_string();
        };
        let eol = if content.contains("\r\n") { "\r\n" } else { "\n" };

        match (first_code_offset(content), self.trailing) {
            (Some(at), _) => {
                let (head, tail) = content.split_at(at);
                format!("{}{}{}{}", head, import_line, eol, tail)
            }
            (None, TrailingImports::Append) => format!("{}{}{}", content, eol, import_line),
            (None, TrailingImports::Prepend) => format!("{}{}{}", import_line, eol, content),
            (None, TrailingImports::Skip) => content.to_string(),
        }
    }

    /// Import names of `features` not listed by an existing import from the
    /// module path.
    pub fn missing_names(&self, content: &str, features: &FeatureSet) -> Vec<&'static str> {
        let imported: Vec<&str> = content
            .lines()
            .filter(|line| line.starts_with(IMPORT_KEYWORD))
            .filter(|line| line.contains(self.module_path.as_str()))
            .flat_map(braced_names)
            .collect();
        import_names(features)
            .into_iter()
            .filter(|name| !imported.contains(name))
            .collect()
    }
}

/// Byte offset of the first line not starting with the import keyword.
///
/// Text that is empty or ends with a newline has a final empty line, so this
/// is `None` only when every line is an import.
fn first_code_offset(content: &str) -> Option<usize> {
    let mut offset = 0usize;
    for line in content.split_inclusive('\n') {
        if !line.starts_with(IMPORT_KEYWORD) {
            return Some(offset);
        }
        offset += line.len();
    }
    if content.is_empty() || content.ends_with('\n') {
        Some(offset)
    } else {
        None
    }
}

/// `a`, `b` from `import { a, b as c } from '...'`.
fn braced_names(line: &str) -> Vec<&str> {
    let Some(open) = line.find('{') else {
        return Vec::new();
    };
    let Some(close) = line[open..].find('}') else {
        return Vec::new();
    };
    line[open + 1..open + close]
        .split(',')
        .filter_map(|name| name.split_whitespace().next())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewrite::feature::Feature;

    fn features(list: &[Feature]) -> FeatureSet {
        list.iter().copied().collect()
    }

    #[test]
    fn inserts_after_import_block() {
        let content = "import React from 'react'\nimport { useState } from 'react'\n\nexport default function Page() {}\n";
        let out = ImportInjector::default().inject(content, &features(&[Feature::Games]));
        assert_eq!(
            out,
            "import React from 'react'\nimport { useState } from 'react'\nimport { gamesAPI } from '@/lib/api-client'\n\nexport default function Page() {}\n"
        );
    }

    #[test]
    fn inserts_at_top_without_imports() {
        let content = "'use client'\nimport React from 'react'\n";
        let out = ImportInjector::default().inject(content, &features(&[Feature::Auth]));
        assert_eq!(
            out,
            "import { authAPI } from '@/lib/api-client'\n'use client'\nimport React from 'react'\n"
        );
    }

    #[test]
    fn lists_names_in_enumeration_order() {
        let out = ImportInjector::default().inject(
            "const x = 1",
            &features(&[Feature::Wallet, Feature::Games, Feature::Auth]),
        );
        assert_eq!(
            out,
            "import { authAPI, gamesAPI, walletAPI } from '@/lib/api-client'\nconst x = 1"
        );
    }

    #[test]
    fn existing_module_path_leaves_text_unchanged() {
        let content = "import { authAPI } from '@/lib/api-client'\nconst x = 1\n";
        let out = ImportInjector::default()
            .inject(content, &features(&[Feature::Games, Feature::Matches]));
        assert_eq!(out, content);
    }

    #[test]
    fn empty_feature_set_leaves_text_unchanged() {
        let content = "const x = 1\n";
        assert_eq!(
            ImportInjector::default().inject(content, &FeatureSet::new()),
            content
        );
    }

    #[test]
    fn empty_text_gets_import() {
        let out = ImportInjector::default().inject("", &features(&[Feature::Matches]));
        assert_eq!(out, "import { matchesAPI } from '@/lib/api-client'\n");
    }

    #[test]
    fn only_imports_appends_by_default() {
        let content = "import a from 'a'\nimport b from 'b'";
        let out = ImportInjector::default().inject(content, &features(&[Feature::Auth]));
        assert_eq!(
            out,
            "import a from 'a'\nimport b from 'b'\nimport { authAPI } from '@/lib/api-client'"
        );
    }

    #[test]
    fn only_imports_prepend_policy() {
        let content = "import a from 'a'\nimport b from 'b'";
        let injector = ImportInjector::new(API_CLIENT_MODULE, TrailingImports::Prepend);
        let out = injector.inject(content, &features(&[Feature::Auth]));
        assert_eq!(
            out,
            "import { authAPI } from '@/lib/api-client'\nimport a from 'a'\nimport b from 'b'"
        );
    }

    #[test]
    fn only_imports_skip_policy() {
        let content = "import a from 'a'\nimport b from 'b'";
        let injector = ImportInjector::new(API_CLIENT_MODULE, TrailingImports::Skip);
        assert_eq!(injector.inject(content, &features(&[Feature::Auth])), content);
    }

    #[test]
    fn custom_module_path() {
        let injector = ImportInjector::new("~/api", TrailingImports::Append);
        let out = injector.inject("x()", &features(&[Feature::Wallet]));
        assert_eq!(out, "import { walletAPI } from '~/api'\nx()");
        assert_eq!(injector.inject(&out, &features(&[Feature::Auth])), out);
    }

    #[test]
    fn keyword_needs_trailing_space() {
        let content = "importantValue()\n";
        let out = ImportInjector::default().inject(content, &features(&[Feature::Games]));
        assert!(out.starts_with("import { gamesAPI }"));
    }

    #[test]
    fn crlf_import_block_is_recognised() {
        let content = "import a from 'a'\r\nimport b from 'b'\r\nconst x = 1\r\n";
        let out = ImportInjector::default().inject(content, &features(&[Feature::Games]));
        assert_eq!(
            out,
            "import a from 'a'\r\nimport b from 'b'\r\nimport { gamesAPI } from '@/lib/api-client'\r\nconst x = 1\r\n"
        );
        assert!(!out.replace("\r\n", "").contains('\n'));
    }

    #[test]
    fn crlf_only_imports_append_keeps_line_endings() {
        let content = "import a from 'a'\r\nimport b from 'b'";
        let out = ImportInjector::default().inject(content, &features(&[Feature::Auth]));
        assert_eq!(
            out,
            "import a from 'a'\r\nimport b from 'b'\r\nimport { authAPI } from '@/lib/api-client'"
        );
    }

    #[test]
    fn trailing_newline_after_imports_inserts_before_it() {
        let content = "import a from 'a'\n";
        let out = ImportInjector::default().inject(content, &features(&[Feature::Auth]));
        assert_eq!(out, "import a from 'a'\nimport { authAPI } from '@/lib/api-client'\n");
    }

    #[test]
    fn missing_names_against_existing_import() {
        let content = "import { authAPI } from '@/lib/api-client'\nconst g = await gamesAPI.list()\n";
        let injector = ImportInjector::default();
        let set = features(&[Feature::Auth, Feature::Games]);

        assert_eq!(injector.inject(content, &set), content);
        assert_eq!(injector.missing_names(content, &set), vec!["gamesAPI"]);
    }

    #[test]
    fn missing_names_handles_aliases() {
        let injector = ImportInjector::default();
        let content = "import { gamesAPI as games, walletAPI } from '@/lib/api-client'\n";
        assert!(
            injector
                .missing_names(content, &features(&[Feature::Games, Feature::Wallet]))
                .is_empty()
        );

        // no import from the module at all
        assert_eq!(
            injector.missing_names("x()", &features(&[Feature::Matches])),
            vec!["matchesAPI"]
        );
    }

    #[test]
    fn parse_policy() {
        assert_eq!(TrailingImports::parse("Append").unwrap(), TrailingImports::Append);
        assert_eq!(TrailingImports::parse("prepend").unwrap(), TrailingImports::Prepend);
        assert_eq!(TrailingImports::parse("skip").unwrap(), TrailingImports::Skip);
        assert!(TrailingImports::parse("middle").is_err());
    }

    #[test]
    fn import_line_none_for_empty_set() {
        assert!(ImportInjector::default().import_line(&FeatureSet::new()).is_none());
    }
}
