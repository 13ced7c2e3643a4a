use std::{collections::HashMap, path::PathBuf};

use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Could not load configuration from the environment: {0}")]
    Load(#[from] ConfigError),
    #[error("Remote repository `{id}` has an invalid url `{url}`, expected http(s):// or file://")]
    InvalidRemoteUrl { id: String, url: String },
    #[error("Remote repository with url `{0}` has an empty id")]
    EmptyRepositoryId(String),
    #[error("Remote repository id `{0}` is declared more than once")]
    DuplicateRepositoryId(String),
    #[error("Local repository {0} exists but is not a directory")]
    LocalRepositoryNotDirectory(String),
    #[error("Could not find home dir to locate the local repository. Please define $HOME env variable or set the local repository explicitly.")]
    NoHomeDirectory,
}

/// Settings read from `CLASSPATH_GEN_*` environment variables.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ClasspathGenConfig {
    pub output_directory: Option<PathBuf>,
    pub sort: Option<bool>,
    pub skip: Option<bool>,
    pub local_repository: Option<PathBuf>,
}

impl ClasspathGenConfig {
    pub fn load() -> Result<Self, ConfigurationError> {
        Ok(RawConfig::load(None)?.into())
    }
}

impl From<RawConfig> for ClasspathGenConfig {
    fn from(raw: RawConfig) -> Self {
        Self {
            output_directory: raw.output.directory,
            sort: raw.output.sort,
            skip: raw.output.skip,
            local_repository: raw.repository.local,
        }
    }
}

#[derive(Default, Debug, Deserialize, PartialEq, Eq)]
struct RawConfig {
    #[serde(default)]
    output: OutputConfig,
    #[serde(default)]
    repository: RepositoryConfig,
}

#[derive(Default, Debug, Deserialize, PartialEq, Eq)]
struct OutputConfig {
    directory: Option<PathBuf>,
    sort: Option<bool>,
    skip: Option<bool>,
}

#[derive(Default, Debug, Deserialize, PartialEq, Eq)]
struct RepositoryConfig {
    local: Option<PathBuf>,
}

impl RawConfig {
    fn load(env: Option<HashMap<String, String>>) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(
                Environment::with_prefix("CLASSPATH_GEN")
                    .separator("_")
                    .source(env),
            )
            .build()?
            .try_deserialize()
    }
}
