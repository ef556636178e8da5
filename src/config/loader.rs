use miette::{IntoDiagnostic, Result, WrapErr};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Configuration errors that surface while validating a loaded config
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid component name pattern '{pattern}': {source}")]
    InvalidComponentPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Configuration for a deadsweep analysis run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Glob patterns (relative to the project root) excluded from discovery
    pub exclude: Vec<String>,

    /// File extensions considered source files
    pub extensions: Vec<String>,

    /// Hard limit for directory enumeration, in seconds
    pub discovery_timeout_secs: u64,

    /// Respect .gitignore files while walking
    pub respect_gitignore: bool,

    /// Backup directory, relative to the project root
    pub backup_dir: PathBuf,

    /// Analyze files on the rayon thread pool
    pub parallel: bool,

    /// Detection configuration
    pub detection: DetectionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Report files that nothing imports
    pub unused_files: bool,

    /// Report components never rendered in their own file
    pub unused_components: bool,

    /// Report exported utilities never called in their own file
    pub unused_utilities: bool,

    /// Regex a binding name must match to count as a component
    pub component_pattern: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exclude: vec![
                "node_modules/**".to_string(),
                "dist/**".to_string(),
                "build/**".to_string(),
                ".next/**".to_string(),
            ],
            extensions: vec![
                "js".to_string(),
                "jsx".to_string(),
                "ts".to_string(),
                "tsx".to_string(),
            ],
            discovery_timeout_secs: 10,
            respect_gitignore: false,
            backup_dir: PathBuf::from("backups"),
            parallel: true,
            detection: DetectionConfig::default(),
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            unused_files: true,
            unused_components: true,
            unused_utilities: true,
            component_pattern: "^[A-Z][a-zA-Z0-9]*$".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a file (YAML or TOML)
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match extension {
            "yml" | "yaml" => serde_yaml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse YAML config"),
            "toml" => toml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse TOML config"),
            _ => {
                // Try YAML first, then TOML
                if let Ok(config) = serde_yaml::from_str(&contents) {
                    Ok(config)
                } else {
                    toml::from_str(&contents)
                        .into_diagnostic()
                        .wrap_err("Failed to parse config file")
                }
            }
        }
    }

    /// Try to load configuration from default locations
    pub fn from_default_locations(project_root: &Path) -> Result<Self> {
        let default_names = [
            ".deadsweep.yml",
            ".deadsweep.yaml",
            ".deadsweep.toml",
            "deadsweep.yml",
            "deadsweep.yaml",
            "deadsweep.toml",
        ];

        for name in &default_names {
            let path = project_root.join(name);
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }

    pub fn discovery_timeout(&self) -> Duration {
        Duration::from_secs(self.discovery_timeout_secs)
    }

    /// Whether files with this extension are collected
    pub fn accepts_extension(&self, extension: &str) -> bool {
        self.extensions
            .iter()
            .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(extension))
    }

    /// Compile the component naming convention
    pub fn component_regex(&self) -> std::result::Result<Regex, ConfigError> {
        Regex::new(&self.detection.component_pattern).map_err(|source| {
            ConfigError::InvalidComponentPattern {
                pattern: self.detection.component_pattern.clone(),
                source,
            }
        })
    }
}
