//! Configuration primitives and loader for markdown-paginate.
//!
//! The loader resolves configuration using a fixed precedence stack:
//! override flag → working directory → git root → built-in defaults.
//! Parsed settings are normalised into typed structures so the CLI never
//! touches raw TOML.

use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

const CONFIG_FILE_NAME: &str = ".markdown-paginate.toml";

pub const DEFAULT_DENSITY: usize = 30;
pub const DEFAULT_DIRECTORY: &str = "cards";
pub const DEFAULT_EXTENSION: &str = "md";

/// Complete configuration resolved from defaults and on-disk overrides.
#[derive(Clone, Debug)]
pub struct Config {
    pub paginate: PaginateSettings,
    pub output: OutputSettings,
    pub sources: ConfigSources,
}

/// Settings that drive the paginator itself.
#[derive(Clone, Debug)]
pub struct PaginateSettings {
    /// Maximum cumulative block weight per card.
    pub density: usize,
}

/// Settings covering how cards are emitted.
#[derive(Clone, Debug)]
pub struct OutputSettings {
    pub format: OutputFormat,
    /// Absolute directory for `files` output.
    pub directory: PathBuf,
    pub extension: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OutputFormat {
    /// Cards on stdout separated by `+++` lines.
    Plain,
    Json,
    /// One file per card.
    Files,
}

impl OutputFormat {
    pub const ALL: &'static [OutputFormat] =
        &[OutputFormat::Plain, OutputFormat::Json, OutputFormat::Files];

    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Plain => "plain",
            OutputFormat::Json => "json",
            OutputFormat::Files => "files",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "plain" => Ok(OutputFormat::Plain),
            "json" => Ok(OutputFormat::Json),
            "files" => Ok(OutputFormat::Files),
            _ => Err(()),
        }
    }
}

/// Provenance information for resolved configuration.
#[derive(Clone, Debug)]
pub struct ConfigSources {
    pub working_directory: PathBuf,
    pub layers: Vec<ConfigSource>,
}

/// Specific layer of configuration (default/git/local/override).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigSource {
    pub kind: ConfigSourceKind,
    pub path: Option<PathBuf>,
    pub base_dir: PathBuf,
}

impl ConfigSource {
    fn default(base_dir: PathBuf) -> Self {
        ConfigSource {
            kind: ConfigSourceKind::Default,
            path: None,
            base_dir,
        }
    }

    fn for_file(kind: ConfigSourceKind, path: PathBuf) -> Self {
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        ConfigSource {
            kind,
            path: Some(path),
            base_dir,
        }
    }

    fn describe(&self) -> String {
        match (&self.kind, &self.path) {
            (ConfigSourceKind::Default, _) => "built-in defaults".to_owned(),
            (kind, Some(path)) => format!("{} at {}", kind, path.display()),
            (kind, None) => kind.to_string(),
        }
    }
}

/// Kinds of configuration sources, ordered from lowest to highest precedence.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfigSourceKind {
    Default,
    GitRoot,
    Local,
    Override,
}

impl fmt::Display for ConfigSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConfigSourceKind::Default => "defaults",
            ConfigSourceKind::GitRoot => "git-root config",
            ConfigSourceKind::Local => "local config",
            ConfigSourceKind::Override => "override config",
        };
        f.write_str(label)
    }
}

/// Loader options, typically supplied by the CLI layer.
#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub override_path: Option<PathBuf>,
    pub working_dir: Option<PathBuf>,
}

impl LoadOptions {
    pub fn with_override_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.override_path = Some(path.into());
        self
    }

    pub fn with_working_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(path.into());
        self
    }
}

/// Errors surfaced while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to resolve working directory {attempted}: {source}")]
    WorkingDirectory {
        attempted: PathBuf,
        source: io::Error,
    },
    #[error("override config {path} not found")]
    OverrideNotFound { path: PathBuf },
    #[error("failed to read config {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("configuration validation failed:\n{0}")]
    Validation(ConfigValidationErrors),
}

impl Config {
    /// Loads configuration using the precedence rules and returns typed settings.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let working_dir = resolve_working_dir(options.working_dir)?;
        let override_path = options
            .override_path
            .map(|path| make_absolute(&path, &working_dir));

        if let Some(path) = &override_path {
            if !path.exists() {
                return Err(ConfigError::OverrideNotFound { path: path.clone() });
            }
        }

        let default_source = ConfigSource::default(working_dir.clone());
        let mut merged = PartialConfig::default();
        merged.merge(defaults_layer(default_source.clone()));

        let mut source_layers = vec![default_source];

        let git_root = find_git_root(&working_dir);
        let git_config_path = git_root.as_ref().map(|root| root.join(CONFIG_FILE_NAME));
        let local_config_path = working_dir.join(CONFIG_FILE_NAME);

        if let Some(path) = git_config_path.as_ref() {
            if path.exists() && Some(path) != override_path.as_ref() && path != &local_config_path {
                let source = ConfigSource::for_file(ConfigSourceKind::GitRoot, path.clone());
                merged.merge(load_layer(path, source.clone())?);
                source_layers.push(source);
            }
        }

        if local_config_path.exists() && Some(&local_config_path) != override_path.as_ref() {
            let source = ConfigSource::for_file(ConfigSourceKind::Local, local_config_path.clone());
            merged.merge(load_layer(&local_config_path, source.clone())?);
            source_layers.push(source);
        }

        if let Some(path) = override_path {
            let source = ConfigSource::for_file(ConfigSourceKind::Override, path.clone());
            merged.merge(load_layer(&path, source.clone())?);
            source_layers.push(source);
        }

        let config = merged.finalize().map_err(ConfigError::Validation)?;
        Ok(Config {
            paginate: config.paginate,
            output: config.output,
            sources: ConfigSources {
                working_directory: working_dir,
                layers: source_layers,
            },
        })
    }
}

fn resolve_working_dir(override_dir: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    match override_dir {
        Some(path) => fs::canonicalize(&path).map_err(|source| ConfigError::WorkingDirectory {
            attempted: path,
            source,
        }),
        None => env::current_dir().map_err(|source| ConfigError::WorkingDirectory {
            attempted: PathBuf::from("."),
            source,
        }),
    }
}

fn make_absolute(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn load_layer(path: &Path, source: ConfigSource) -> Result<PartialConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.into(),
        source,
    })?;
    let raw: RawConfig = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.into(),
        source,
    })?;
    Ok(raw.into_partial(source))
}

fn defaults_layer(source: ConfigSource) -> PartialConfig {
    PartialConfig {
        paginate: Some(PaginatePartial {
            density: Some(Located::new(DEFAULT_DENSITY as i64, source.clone())),
        }),
        output: Some(OutputPartial {
            format: Some(Located::new(
                OutputFormat::Plain.as_str().into(),
                source.clone(),
            )),
            directory: Some(Located::new(
                PathBuf::from(DEFAULT_DIRECTORY),
                source.clone(),
            )),
            extension: Some(Located::new(DEFAULT_EXTENSION.into(), source)),
        }),
    }
}

fn find_git_root(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        if dir.join(".git").exists() {
            return Some(dir.to_path_buf());
        }
        current = dir.parent();
    }
    None
}

#[derive(Clone, Debug, Default)]
struct PartialConfig {
    paginate: Option<PaginatePartial>,
    output: Option<OutputPartial>,
}

impl PartialConfig {
    fn merge(&mut self, mut other: PartialConfig) {
        if let Some(other_paginate) = other.paginate.take() {
            match &mut self.paginate {
                Some(paginate) => paginate.merge(other_paginate),
                None => self.paginate = Some(other_paginate),
            }
        }

        if let Some(other_output) = other.output.take() {
            match &mut self.output {
                Some(output) => output.merge(other_output),
                None => self.output = Some(other_output),
            }
        }
    }

    fn finalize(self) -> Result<ResolvedConfig, ConfigValidationErrors> {
        let mut errors = Vec::new();

        let paginate_partial = self.paginate.unwrap_or_default();
        let density = paginate_partial
            .density
            .unwrap_or_else(|| Located::new(DEFAULT_DENSITY as i64, fallback_source()));

        let density_value = match usize::try_from(density.value) {
            Ok(value) if value > 0 => value,
            _ => {
                errors.push(ConfigValidationError::new(
                    Some(density.source.clone()),
                    format!(
                        "paginate.density must be a positive integer (received {})",
                        density.value
                    ),
                ));
                DEFAULT_DENSITY
            }
        };

        let output_partial = self.output.unwrap_or_default();
        let format = output_partial.format.unwrap_or_else(|| {
            Located::new(OutputFormat::Plain.as_str().into(), fallback_source())
        });
        let format_value = format.value.parse::<OutputFormat>().unwrap_or_else(|_| {
            let expected: Vec<&str> = OutputFormat::ALL.iter().map(|f| f.as_str()).collect();
            errors.push(ConfigValidationError::new(
                Some(format.source.clone()),
                format!(
                    "output.format must be one of {} (received '{}')",
                    expected.join(", "),
                    format.value
                ),
            ));
            OutputFormat::Plain
        });

        let directory = output_partial
            .directory
            .unwrap_or_else(|| Located::new(PathBuf::from(DEFAULT_DIRECTORY), fallback_source()));

        let extension = output_partial
            .extension
            .unwrap_or_else(|| Located::new(DEFAULT_EXTENSION.into(), fallback_source()));

        if let Some(problem) = extension_problem(&extension.value) {
            errors.push(ConfigValidationError::new(
                Some(extension.source.clone()),
                format!("output.extension {problem} (received '{}')", extension.value),
            ));
        }

        if !errors.is_empty() {
            return Err(ConfigValidationErrors(errors));
        }

        Ok(ResolvedConfig {
            paginate: PaginateSettings {
                density: density_value,
            },
            output: OutputSettings {
                format: format_value,
                directory: resolve_path(&directory),
                extension: extension.value,
            },
        })
    }
}

fn extension_problem(extension: &str) -> Option<&'static str> {
    if extension.trim().is_empty() {
        Some("cannot be empty")
    } else if extension.starts_with('.') {
        Some("must not start with '.'")
    } else if extension.contains('/') || extension.contains('\\') {
        Some("must not contain path separators")
    } else {
        None
    }
}

fn fallback_source() -> ConfigSource {
    ConfigSource::default(PathBuf::from("."))
}

#[derive(Clone, Debug, Default)]
struct PaginatePartial {
    density: Option<Located<i64>>,
}

impl PaginatePartial {
    fn merge(&mut self, other: PaginatePartial) {
        if other.density.is_some() {
            self.density = other.density;
        }
    }
}

#[derive(Clone, Debug, Default)]
struct OutputPartial {
    format: Option<Located<String>>,
    directory: Option<Located<PathBuf>>,
    extension: Option<Located<String>>,
}

impl OutputPartial {
    fn merge(&mut self, other: OutputPartial) {
        if other.format.is_some() {
            self.format = other.format;
        }
        if other.directory.is_some() {
            self.directory = other.directory;
        }
        if other.extension.is_some() {
            self.extension = other.extension;
        }
    }
}

#[derive(Clone, Debug)]
struct Located<T> {
    value: T,
    source: ConfigSource,
}

impl<T> Located<T> {
    fn new(value: T, source: ConfigSource) -> Self {
        Located { value, source }
    }
}

fn resolve_path(located: &Located<PathBuf>) -> PathBuf {
    let path = &located.value;
    if path.is_absolute() {
        path.clone()
    } else {
        located.source.base_dir.join(path)
    }
}

#[derive(Debug)]
struct ResolvedConfig {
    paginate: PaginateSettings,
    output: OutputSettings,
}

/// Container for validation failures, formatted as a bullet list.
#[derive(Debug)]
pub struct ConfigValidationErrors(pub Vec<ConfigValidationError>);

impl fmt::Display for ConfigValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, err) in self.0.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "- {err}")?;
        }
        Ok(())
    }
}

impl ConfigValidationErrors {
    pub fn iter(&self) -> impl Iterator<Item = &ConfigValidationError> {
        self.0.iter()
    }
}

/// Validation failure with optional provenance.
#[derive(Clone, Debug)]
pub struct ConfigValidationError {
    pub source: Option<ConfigSource>,
    pub message: String,
}

impl ConfigValidationError {
    fn new(source: Option<ConfigSource>, message: String) -> Self {
        ConfigValidationError { source, message }
    }
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(source) = &self.source {
            write!(f, " ({})", source.describe())?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    paginate: Option<RawPaginate>,
    #[serde(default)]
    output: Option<RawOutput>,
}

impl RawConfig {
    fn into_partial(self, source: ConfigSource) -> PartialConfig {
        PartialConfig {
            paginate: self
                .paginate
                .map(|paginate| paginate.into_partial(source.clone())),
            output: self.output.map(|output| output.into_partial(source)),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPaginate {
    #[serde(default)]
    density: Option<i64>,
}

impl RawPaginate {
    fn into_partial(self, source: ConfigSource) -> PaginatePartial {
        PaginatePartial {
            density: self.density.map(|value| Located::new(value, source)),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawOutput {
    #[serde(default)]
    format: Option<String>,
    #[serde(default)]
    directory: Option<PathBuf>,
    #[serde(default)]
    extension: Option<String>,
}

impl RawOutput {
    fn into_partial(self, source: ConfigSource) -> OutputPartial {
        OutputPartial {
            format: self.format.map(|value| Located::new(value, source.clone())),
            directory: self
                .directory
                .map(|value| Located::new(value, source.clone())),
            extension: self.extension.map(|value| Located::new(value, source)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> ConfigSource {
        ConfigSource::for_file(
            ConfigSourceKind::Local,
            PathBuf::from("/work/.markdown-paginate.toml"),
        )
    }

    #[test]
    fn later_layers_override_earlier_fields() {
        let mut merged = PartialConfig::default();
        merged.merge(defaults_layer(ConfigSource::default(PathBuf::from("/work"))));
        let raw: RawConfig = toml::from_str("[paginate]\ndensity = 12\n").unwrap();
        merged.merge(raw.into_partial(source()));

        let resolved = merged.finalize().unwrap();
        assert_eq!(resolved.paginate.density, 12);
        assert_eq!(resolved.output.format, OutputFormat::Plain);
        assert_eq!(resolved.output.directory, PathBuf::from("/work/cards"));
    }

    #[test]
    fn collects_every_validation_failure() {
        let mut merged = PartialConfig::default();
        merged.merge(defaults_layer(ConfigSource::default(PathBuf::from("/work"))));
        let raw: RawConfig = toml::from_str(
            "[paginate]\ndensity = 0\n\n[output]\nformat = \"pdf\"\nextension = \".md\"\n",
        )
        .unwrap();
        merged.merge(raw.into_partial(source()));

        let errors = merged.finalize().unwrap_err();
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        assert_eq!(messages.len(), 3);
        assert!(messages[0].contains("paginate.density must be a positive integer"));
        assert!(messages[0].contains("local config at /work/.markdown-paginate.toml"));
        assert!(messages[1].contains("output.format must be one of plain, json, files"));
        assert!(messages[2].contains("must not start with '.'"));
    }

    #[test]
    fn rejects_negative_density() {
        let raw: RawConfig = toml::from_str("[paginate]\ndensity = -4\n").unwrap();
        let errors = raw.into_partial(source()).finalize().unwrap_err();
        assert!(errors.to_string().contains("received -4"));
    }

    #[test]
    fn parses_output_formats() {
        assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("files".parse::<OutputFormat>(), Ok(OutputFormat::Files));
        assert!("html".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Files.to_string(), "files");
    }
}
