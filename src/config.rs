use crate::rewrite::{
    API_CLIENT_MODULE, Feature, ImportInjector, PatternEntry, PatternTable, Rewriter,
    TrailingImports,
};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "api-migrate.toml";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub root: PathBuf,
    pub extensions: Vec<String>,
    pub exclude: Vec<glob::Pattern>,
    pub module_path: String,
    pub all_imports: TrailingImports,
    pub patterns: Vec<PatternEntry>,
}

// --- Raw TOML structures ---
#[derive(Deserialize)]
struct ConfigFile {
    tool: Option<ToolSection>,
}

#[derive(Deserialize)]
struct ToolSection {
    api_migrate: Option<MigrateToml>,
}

#[derive(Deserialize, Default)]
struct MigrateToml {
    root: Option<String>,
    extensions: Option<Vec<String>>,
    exclude: Option<Vec<String>>,
    module_path: Option<String>,
    all_imports: Option<String>,
    patterns: Option<Vec<PatternToml>>,
}

#[derive(Deserialize)]
struct PatternToml {
    #[serde(rename = "match")]
    pattern: String,
    replace: String,
    feature: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        // Defaults come from an empty table; none of them can fail.
        Self::from_toml(MigrateToml::default()).expect("default config is valid")
    }
}

impl AppConfig {
    /// Load `path`, or `api-migrate.toml` in the working directory.
    ///
    /// A missing default file yields the built-in defaults; a missing
    /// explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    tracing::debug!("{} not found, using defaults", DEFAULT_CONFIG_FILE);
                    return Ok(Self::default());
                }
                default
            }
        };
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content).context("failed to parse config toml")?;
        let migrate = file
            .tool
            .and_then(|t| t.api_migrate)
            .unwrap_or_default();
        Self::from_toml(migrate)
    }

    fn from_toml(raw: MigrateToml) -> Result<Self> {
        let root = raw
            .root
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        let extensions = raw
            .extensions
            .unwrap_or_else(|| vec!["ts".into(), "tsx".into(), "js".into(), "jsx".into()])
            .into_iter()
            .map(|e| e.trim_start_matches('.').to_string())
            .collect();

        let exclude = raw
            .exclude
            .unwrap_or_else(|| vec!["**/node_modules/**".into(), "**/.next/**".into()])
            .iter()
            .map(|g| {
                glob::Pattern::new(g).with_context(|| format!("invalid exclude glob: {}", g))
            })
            .collect::<Result<Vec<_>>>()?;

        let module_path = raw
            .module_path
            .unwrap_or_else(|| API_CLIENT_MODULE.to_string());

        let all_imports = match raw.all_imports.as_deref() {
            Some(name) => TrailingImports::parse(name)?,
            None => TrailingImports::default(),
        };

        let patterns = raw
            .patterns
            .unwrap_or_default()
            .into_iter()
            .map(|p| PatternEntry::new(&p.pattern, p.replace, Feature::parse(&p.feature)?))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            root,
            extensions,
            exclude,
            module_path,
            all_imports,
            patterns,
        })
    }

    pub fn rewriter(&self) -> Rewriter {
        Rewriter::new(
            PatternTable::with_extra(self.patterns.clone()),
            ImportInjector::new(self.module_path.clone(), self.all_imports),
        )
    }

    pub fn is_excluded(&self, path: &Path) -> bool {
        self.exclude.iter().any(|p| p.matches_path(path))
    }

    /// Whether everything below `dir` is excluded; `**/x/**` only matches
    /// paths under `x/`, so the directory is tested with a trailing separator.
    pub fn is_excluded_dir(&self, dir: &Path) -> bool {
        self.is_excluded(&dir.join(""))
    }

    pub fn has_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| self.extensions.iter().any(|x| x == e))
    }
}
