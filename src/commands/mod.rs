mod apply;
mod patterns;
mod scan;

pub use apply::apply;
pub use patterns::patterns;
pub use scan::scan;

use crate::config::AppConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Config from `config`, with `root` replacing the configured root when given.
fn load_config(config: Option<&Path>, root: Option<&Path>) -> Result<AppConfig> {
    let mut cfg = AppConfig::load(config).context("failed to load config")?;
    if let Some(root) = root {
        cfg.root = root.to_path_buf();
    }
    Ok(cfg)
}

/// Source files under the configured root, sorted.
pub fn collect_sources(cfg: &AppConfig) -> Result<Vec<PathBuf>> {
    if !cfg.root.exists() {
        anyhow::bail!("root directory does not exist: {}", cfg.root.display());
    }

    let walker = WalkDir::new(&cfg.root).into_iter().filter_entry(|e| {
        let keep = e.depth() == 0 || !e.file_type().is_dir() || !cfg.is_excluded_dir(e.path());
        if !keep {
            tracing::trace!("pruned {}", e.path().display());
        }
        keep
    });

    let mut files = Vec::new();
    for entry in walker.filter_map(Result::ok) {
        let path = entry.path();
        if !entry.file_type().is_file() || !cfg.has_extension(path) {
            continue;
        }
        if cfg.is_excluded(path) {
            tracing::trace!("excluded {}", path.display());
            continue;
        }
        files.push(path.to_path_buf());
    }
    files.sort();
    tracing::debug!("{} source files under {}", files.len(), cfg.root.display());
    Ok(files)
}
