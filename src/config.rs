//! Configuration loading and constants.
//!
//! Loads application configuration from an optional TOML file, applies the
//! `PORT` environment override, and defines the constants that shape a
//! preview page: the splice marker, the fixed preview identity, the override
//! stylesheet and cache-control values. `AppConfig` is the root configuration
//! struct; every field has a default so the server runs without a file.

use const_format::formatcp;
use serde::Deserialize;
use std::path::{Path, PathBuf};

// =============================================================================
// HTTP Response Cache Control
// =============================================================================
// A local preview must always reflect the files on disk, so nothing is cached
// for long. Static files may be revalidated; preview pages are never stored.

/// Static assets and compiled themes - revalidate on every use
pub const HTTP_CACHE_STATIC_MAX_AGE: u32 = 0;

pub const CACHE_CONTROL_STATIC: &str =
    formatcp!("no-cache, max-age={}", HTTP_CACHE_STATIC_MAX_AGE);

pub const CACHE_CONTROL_PREVIEW: &str = "no-store";

// =============================================================================
// Preview Page Constants
// =============================================================================

/// Marker in the rendered document before which stylesheets are spliced
pub const SPLICE_MARKER: &str = "</head>";

/// Document kind handed to the renderer; selects `homebrew.html`
pub const DOCUMENT_KIND: &str = "homebrew";

/// Title of every preview document
pub const PREVIEW_TITLE: &str = "Preview Local";

/// Renderer variant of the previewed document and its base theme
pub const PREVIEW_RENDERER: &str = "V3";

/// Theme identity of the previewed document
pub const PREVIEW_THEME: &str = "5ePHB";

/// Stylesheet path of the synthetic base theme record. Nothing is served here;
/// the real stylesheet arrives through the spliced `<link>` elements.
pub const PREVIEW_THEME_PATH: &str =
    formatcp!("themes/{}/{}/style.less", PREVIEW_RENDERER, PREVIEW_THEME);

/// Rules appended after the theme stylesheets in preview mode
pub const PREVIEW_OVERRIDE_CSS: &str = "\
.homebrew { margin-top: 0 !important; height: 100vh; }
body { background-color: #333; }";

// =============================================================================
// Default Paths and Strings
// =============================================================================

/// Crate name used as the tracing target
pub const CRATE_TARGET: &str = "brew_preview";

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = formatcp!("{}=debug,tower_http=debug", CRATE_TARGET);

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

/// Environment variable overriding the listener port
pub const PORT_ENV: &str = "PORT";

pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";
pub const DEFAULT_HTTP_PORT: u16 = 8000;

pub const DEFAULT_DOCUMENT_PATH: &str = "Manual.txt";
pub const DEFAULT_STYLE_PATH: &str = "Manual.css";
pub const DEFAULT_BUILD_DIR: &str = "build";
pub const DEFAULT_ASSETS_DIR: &str = "themes/assets";
pub const DEFAULT_FONTS_DIR: &str = "themes/fonts";

/// Subdirectory of the build tree that `/themes` is aliased to
pub const BUILD_THEMES_SUBDIR: &str = "themes";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener configuration
    pub http: HttpServerConfig,
    /// Input and output locations, relative to `paths.root`
    pub paths: PathsConfig,
    /// Preprocessor settings shared by all themes
    pub compiler: CompilerConfig,
    /// Base themes compiled at startup, linked in this order
    #[serde(rename = "theme")]
    pub themes: ThemeList,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HTTP_HOST.to_string(),
            port: DEFAULT_HTTP_PORT,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Process root every other path is resolved against
    pub root: PathBuf,
    /// Required document text
    pub document: PathBuf,
    /// Optional document stylesheet
    pub style: PathBuf,
    /// Compiled output tree
    pub build: PathBuf,
    pub assets: PathBuf,
    pub fonts: PathBuf,
    /// Glob of extra Tera templates (e.g. "templates/**/*.html")
    pub templates: Option<String>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            document: PathBuf::from(DEFAULT_DOCUMENT_PATH),
            style: PathBuf::from(DEFAULT_STYLE_PATH),
            build: PathBuf::from(DEFAULT_BUILD_DIR),
            assets: PathBuf::from(DEFAULT_ASSETS_DIR),
            fonts: PathBuf::from(DEFAULT_FONTS_DIR),
            templates: None,
        }
    }
}

impl PathsConfig {
    /// Resolve a configured path against the root. Absolute paths pass through.
    pub fn resolve<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.root.join(path)
    }

    pub fn document_path(&self) -> PathBuf {
        self.resolve(&self.document)
    }

    pub fn style_path(&self) -> PathBuf {
        self.resolve(&self.style)
    }

    pub fn build_dir(&self) -> PathBuf {
        self.resolve(&self.build)
    }

    pub fn build_themes_dir(&self) -> PathBuf {
        self.build_dir().join(BUILD_THEMES_SUBDIR)
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.resolve(&self.assets)
    }

    pub fn fonts_dir(&self) -> PathBuf {
        self.resolve(&self.fonts)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Extra `@use`/`@import` search directories, after the source's own directory
    pub include_paths: Vec<PathBuf>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            include_paths: vec![PathBuf::from("shared"), PathBuf::from("node_modules")],
        }
    }
}

/// One base theme: a preprocessor source, its compiled output and the URL the
/// output is served under.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ThemeSource {
    pub name: String,
    pub source: PathBuf,
    pub output: PathBuf,
    pub href: String,
}

impl ThemeSource {
    fn v3(name: &str) -> Self {
        Self {
            name: name.to_string(),
            source: PathBuf::from(format!("themes/V3/{}/style.scss", name)),
            output: PathBuf::from(format!("build/themes/V3/{}/style.css", name)),
            href: format!("/themes/V3/{}/style.css", name),
        }
    }
}

/// Ordered list of base themes. Defaults to Blank followed by 5ePHB.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ThemeList(pub Vec<ThemeSource>);

impl Default for ThemeList {
    fn default() -> Self {
        Self(vec![ThemeSource::v3("Blank"), ThemeSource::v3(PREVIEW_THEME)])
    }
}

impl ThemeList {
    pub fn iter(&self) -> std::slice::Iter<'_, ThemeSource> {
        self.0.iter()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    #[serde(default = "LoggingConfig::default_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_LOG_FORMAT.to_string(),
        }
    }
}

impl LoggingConfig {
    fn default_format() -> String {
        DEFAULT_LOG_FORMAT.to_string()
    }

    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides, reading variables through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup(PORT_ENV) {
            self.http.port = port.trim().parse().map_err(|_| {
                ConfigError::Validation(format!("{} must be a port number, got {:?}", PORT_ENV, port))
            })?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for theme in self.themes.iter() {
            if !theme.href.starts_with('/') {
                return Err(ConfigError::Validation(format!(
                    "theme {:?}: href must be an absolute URL path, got {:?}",
                    theme.name, theme.href
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}
