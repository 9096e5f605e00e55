use super::{collect_sources, load_config};
use crate::rewrite::{Rewrite, Rewriter, find_displaced_directive, find_legacy_calls};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize)]
pub struct ReviewItem {
    pub line: usize,
    pub reason: &'static str,
    pub text: String,
}

/// What rewriting one file would do.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub replacements: usize,
    /// Import names the synthesized import line would add; empty if none.
    pub imports_added: Vec<&'static str>,
    /// Names the rewritten code uses but an existing import line lacks.
    pub missing_imports: Vec<&'static str>,
    pub manual_review: Vec<ReviewItem>,
    #[serde(skip)]
    pub rewrite: Rewrite,
    #[serde(skip)]
    pub original: String,
}

impl FileReport {
    pub fn changed(&self) -> bool {
        self.rewrite.content != self.original
    }
}

pub fn report_file(rewriter: &Rewriter, path: &Path) -> Result<FileReport> {
    let original =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let rewrite = rewriter.rewrite(&original);
    let imports_added = if rewrite.import_added {
        rewrite.features.iter().map(|f| f.import_name()).collect()
    } else {
        Vec::new()
    };
    let missing_imports = rewriter
        .injector()
        .missing_names(&rewrite.content, &rewrite.features);

    let mut manual_review: Vec<ReviewItem> = find_legacy_calls(&rewrite.content)
        .into_iter()
        .map(|(line, text)| ReviewItem {
            line,
            reason: "legacy call",
            text: text.to_string(),
        })
        .collect();
    if rewrite.import_added {
        if let Some((line, text)) = find_displaced_directive(&rewrite.content) {
            manual_review.push(ReviewItem {
                line,
                reason: "directive below import",
                text: text.to_string(),
            });
        }
    }
    manual_review.sort_by_key(|item| item.line);

    Ok(FileReport {
        path: path.to_path_buf(),
        replacements: rewrite.replacements(),
        imports_added,
        missing_imports,
        manual_review,
        rewrite,
        original,
    })
}

/// Dry-run over `files`.
pub fn scan_tree(rewriter: &Rewriter, files: &[PathBuf]) -> Result<Vec<FileReport>> {
    files.iter().map(|p| report_file(rewriter, p)).collect()
}

/// Execute the scan command
pub fn scan(config: Option<&Path>, root: Option<&Path>, json: bool) -> Result<()> {
    let cfg = load_config(config, root)?;
    tracing::info!(root=%cfg.root.display(), "scan start");

    let files = collect_sources(&cfg)?;
    let reports = scan_tree(&cfg.rewriter(), &files).context("scan failed")?;

    if json {
        let out = serde_json::to_string_pretty(&reports).context("failed to encode report")?;
        println!("{}", out);
        return Ok(());
    }

    let mut changed = 0usize;
    let mut replacements = 0usize;
    let mut review = 0usize;
    let mut missing = 0usize;
    for r in &reports {
        if !r.changed() && r.manual_review.is_empty() && r.missing_imports.is_empty() {
            continue;
        }
        println!("{}", r.path.display());
        if r.replacements > 0 {
            println!("  replacements : {}", r.replacements);
        }
        if !r.imports_added.is_empty() {
            println!("  import       : {}", r.imports_added.join(", "));
        }
        if !r.missing_imports.is_empty() {
            println!("  missing      : {}", r.missing_imports.join(", "));
        }
        for item in &r.manual_review {
            println!("  review {:>5} : {} ({})", item.line, item.text, item.reason);
        }
        if r.changed() {
            changed += 1;
        }
        replacements += r.replacements;
        review += r.manual_review.len();
        missing += r.missing_imports.len();
    }

    tracing::info!(
        "scan done: files={}, would_change={}, replacements={}, manual_review={}, missing_imports={}",
        reports.len(),
        changed,
        replacements,
        review,
        missing
    );
    Ok(())
}
