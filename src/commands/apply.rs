use super::scan::scan_tree;
use super::{collect_sources, load_config};
use crate::cli::NOTICE;
use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;

/// Execute the apply command
pub fn apply(config: Option<&Path>, root: Option<&Path>, yes: bool) -> Result<()> {
    let cfg = load_config(config, root)?;
    tracing::info!(root=%cfg.root.display(), "apply start");

    let files = collect_sources(&cfg)?;
    let reports = scan_tree(&cfg.rewriter(), &files).context("scan failed")?;
    let pending: Vec<_> = reports.iter().filter(|r| r.changed()).collect();

    if pending.is_empty() {
        tracing::info!("nothing to rewrite ({} files scanned)", reports.len());
    } else if !yes {
        bail!(
            "refusing to rewrite {} files without --yes (run `scan` to preview)",
            pending.len()
        );
    }

    for r in &pending {
        fs::write(&r.path, &r.rewrite.content)
            .with_context(|| format!("failed to write {}", r.path.display()))?;
        tracing::debug!(
            path=%r.path.display(),
            replacements=r.replacements,
            "rewritten"
        );
    }
    if !pending.is_empty() {
        tracing::info!("rewritten: {} files", pending.len());
    }

    for r in &reports {
        if !r.missing_imports.is_empty() {
            tracing::warn!(
                "{}: uses {} without importing it from {}",
                r.path.display(),
                r.missing_imports.join(", "),
                cfg.module_path
            );
        }
        for item in &r.manual_review {
            tracing::warn!("{}:{}: {} ({})", r.path.display(), item.line, item.text, item.reason);
        }
    }

    println!("{}", NOTICE);
    Ok(())
}
