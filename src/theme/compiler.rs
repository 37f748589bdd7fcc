//! Startup compilation of base theme stylesheets.
//!
//! Each configured theme source is compiled with `grass` and written to its
//! output path. Themes are compiled one after another; a failing theme is
//! logged and skipped so the rest still build and the server still starts.
//! Outputs replace any previous file by rename, so readers see either the old
//! stylesheet or the new one, never a partial write.

use std::io::Write;
use std::path::{Path, PathBuf};

use grass::{Options, OutputStyle};
use tempfile::NamedTempFile;

use crate::config::{AppConfig, ThemeSource};

/// Per-theme compilation error
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Sass(String),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("compiler task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Result of compiling one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileStatus {
    /// Output written
    Compiled,
    /// Source absent; output left alone
    Skipped,
    /// Compilation failed; output left alone
    Failed,
}

/// Startup record of one theme pair. Only used for logging and tests.
#[derive(Debug, Clone)]
pub struct CompiledTheme {
    pub name: String,
    pub source_path: PathBuf,
    pub dest_path: PathBuf,
    pub status: CompileStatus,
}

impl CompiledTheme {
    pub fn success(&self) -> bool {
        self.status == CompileStatus::Compiled
    }
}

/// Compiles preprocessor sources to CSS.
#[derive(Debug, Clone)]
pub struct ThemeCompiler {
    /// Searched after the source's own directory
    include_paths: Vec<PathBuf>,
}

impl ThemeCompiler {
    pub fn new(include_paths: Vec<PathBuf>) -> Self {
        Self { include_paths }
    }

    /// Compiler with include paths resolved against the configured root.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config
                .compiler
                .include_paths
                .iter()
                .map(|p| config.paths.resolve(p))
                .collect(),
        )
    }

    /// Compile `source` into `dest`.
    ///
    /// Returns `Ok(false)` when the source does not exist; the destination is
    /// not touched in that case.
    pub async fn compile_theme(&self, source: &Path, dest: &Path) -> Result<bool, CompileError> {
        let exists = tokio::fs::try_exists(source)
            .await
            .map_err(|e| CompileError::Read {
                path: source.to_path_buf(),
                source: e,
            })?;
        if !exists {
            return Ok(false);
        }

        let scss = tokio::fs::read_to_string(source)
            .await
            .map_err(|e| CompileError::Read {
                path: source.to_path_buf(),
                source: e,
            })?;

        let load_paths = self.load_paths_for(source);
        let css = tokio::task::spawn_blocking(move || compile_scss(&scss, &load_paths)).await??;

        let dest = dest.to_path_buf();
        tokio::task::spawn_blocking(move || write_atomic(&dest, css.as_bytes())).await??;

        Ok(true)
    }

    /// Compile every theme in order, isolating failures.
    pub async fn compile_all(&self, config: &AppConfig) -> Vec<CompiledTheme> {
        let mut results = Vec::with_capacity(config.themes.0.len());
        for theme in config.themes.iter() {
            results.push(self.compile_configured(config, theme).await);
        }
        results
    }

    async fn compile_configured(&self, config: &AppConfig, theme: &ThemeSource) -> CompiledTheme {
        let source_path = config.paths.resolve(&theme.source);
        let dest_path = config.paths.resolve(&theme.output);

        let status = match self.compile_theme(&source_path, &dest_path).await {
            Ok(true) => {
                tracing::info!(theme = %theme.name, dest = %dest_path.display(), "Compiled base theme");
                CompileStatus::Compiled
            }
            Ok(false) => {
                tracing::debug!(theme = %theme.name, source = %source_path.display(), "Theme source missing, skipped");
                CompileStatus::Skipped
            }
            Err(e) => {
                tracing::error!(theme = %theme.name, error = %e, "Failed to compile base theme");
                CompileStatus::Failed
            }
        };

        CompiledTheme {
            name: theme.name.clone(),
            source_path,
            dest_path,
            status,
        }
    }

    fn load_paths_for(&self, source: &Path) -> Vec<PathBuf> {
        let mut paths = Vec::with_capacity(self.include_paths.len() + 1);
        if let Some(dir) = source.parent() {
            paths.push(dir.to_path_buf());
        }
        paths.extend(self.include_paths.iter().cloned());
        paths
    }
}

fn compile_scss(scss: &str, load_paths: &[PathBuf]) -> Result<String, CompileError> {
    let options = Options::default()
        .load_paths(load_paths)
        .style(OutputStyle::Expanded);

    grass::from_string(scss, &options).map_err(|e| CompileError::Sass(e.to_string()))
}

/// Write `contents` to a temporary sibling of `dest`, then rename it into place.
fn write_atomic(dest: &Path, contents: &[u8]) -> Result<(), CompileError> {
    let write_err = |source: std::io::Error| CompileError::Write {
        path: dest.to_path_buf(),
        source,
    };

    let dir = match dest.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(write_err)?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(contents).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(dest).map_err(|e| write_err(e.error))?;
    Ok(())
}
