use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use dialbook_core::DEFAULT_NO_NAME_LABEL;
use serde::Deserialize;
use thiserror::Error;

const APP_DIR: &str = "dialbook";
const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_PLACEHOLDER: &str = "-";

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub source: Option<SourceConfig>,
    pub display: DisplayConfig,
}

/// Where contacts are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceConfig {
    Vcf { path: PathBuf },
    Json { path: PathBuf },
    Macos { group: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayConfig {
    pub no_name_label: String,
    pub placeholder: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            no_name_label: DEFAULT_NO_NAME_LABEL.to_string(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Vcf,
    Json,
    Macos,
}

impl fmt::Display for SourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceConfig::Vcf { path } => write!(f, "vcf:{}", path.display()),
            SourceConfig::Json { path } => write!(f, "json:{}", path.display()),
            SourceConfig::Macos { group: Some(group) } => write!(f, "macos:{group}"),
            SourceConfig::Macos { group: None } => f.write_str("macos"),
        }
    }
}

/// Parses `vcf:PATH`, `json:PATH`, `macos` or `macos:GROUP`.
impl FromStr for SourceConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let (kind, rest) = match trimmed.split_once(':') {
            Some((kind, rest)) => (kind, Some(rest.trim())),
            None => (trimmed, None),
        };
        match kind.to_ascii_lowercase().as_str() {
            "vcf" => Ok(SourceConfig::Vcf {
                path: required_path(rest, trimmed)?,
            }),
            "json" => Ok(SourceConfig::Json {
                path: required_path(rest, trimmed)?,
            }),
            "macos" => Ok(SourceConfig::Macos {
                group: rest.filter(|group| !group.is_empty()).map(str::to_string),
            }),
            _ => Err(ConfigError::InvalidSourceSpec(trimmed.to_string())),
        }
    }
}

fn required_path(raw: Option<&str>, spec: &str) -> Result<PathBuf> {
    match raw {
        Some(path) if !path.is_empty() => Ok(expand_home(path)),
        _ => Err(ConfigError::InvalidSourceSpec(spec.to_string())),
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("invalid contact source: {0} (expected vcf:PATH, json:PATH or macos[:GROUP])")]
    InvalidSourceSpec(String),
    #[error("invalid source.{field}: {message}")]
    InvalidSourceField {
        field: &'static str,
        message: &'static str,
    },
    #[error("invalid display.{field}: {message}")]
    InvalidDisplayField {
        field: &'static str,
        message: &'static str,
    },
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    source: Option<SourceFile>,
    display: Option<DisplayFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SourceFile {
    kind: SourceKind,
    path: Option<String>,
    group: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DisplayFile {
    no_name_label: Option<String>,
    placeholder: Option<String>,
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(source) = parsed.source {
        config.source = Some(merge_source(source)?);
    }

    if let Some(display) = parsed.display {
        if let Some(label) = display.no_name_label {
            if label.trim().is_empty() {
                return Err(ConfigError::InvalidDisplayField {
                    field: "no_name_label",
                    message: "must not be empty",
                });
            }
            config.display.no_name_label = label;
        }
        if let Some(placeholder) = display.placeholder {
            config.display.placeholder = placeholder;
        }
    }

    Ok(config)
}

fn merge_source(source: SourceFile) -> Result<SourceConfig> {
    let path = source
        .path
        .as_deref()
        .map(str::trim)
        .filter(|path| !path.is_empty());
    match source.kind {
        SourceKind::Vcf | SourceKind::Json => {
            if source.group.is_some() {
                return Err(ConfigError::InvalidSourceField {
                    field: "group",
                    message: "only supported for macos sources",
                });
            }
            let path = path.map(expand_home).ok_or(ConfigError::InvalidSourceField {
                field: "path",
                message: "required for file sources",
            })?;
            if source.kind == SourceKind::Vcf {
                Ok(SourceConfig::Vcf { path })
            } else {
                Ok(SourceConfig::Json { path })
            }
        }
        SourceKind::Macos => {
            if path.is_some() {
                return Err(ConfigError::InvalidSourceField {
                    field: "path",
                    message: "not supported for macos sources",
                });
            }
            let group = source
                .group
                .map(|group| group.trim().to_string())
                .filter(|group| !group.is_empty());
            Ok(SourceConfig::Macos { group })
        }
    }
}

fn expand_home(raw: &str) -> PathBuf {
    if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(raw)
}
