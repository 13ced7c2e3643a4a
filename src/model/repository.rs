use std::{
    collections::BTreeSet,
    fmt::Display,
    path::{Path, PathBuf},
    sync::OnceLock,
};

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::config::ConfigurationError;

pub const MAVEN_CENTRAL_ID: &str = "central";
pub const MAVEN_CENTRAL_URL: &str = "https://repo.maven.apache.org/maven2";

/// Directory artifacts are cached in on this machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalRepository {
    pub path: PathBuf,
}

impl LocalRepository {
    /// A path that does not exist yet is accepted, the resolver creates it on demand.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, ConfigurationError> {
        let path = path.into();
        if path.exists() && !path.is_dir() {
            return Err(ConfigurationError::LocalRepositoryNotDirectory(
                path.display().to_string(),
            ));
        }
        Ok(LocalRepository { path })
    }

    /// `$HOME/.m2/repository`
    pub fn default_location() -> Result<Self, ConfigurationError> {
        let mut path = home::home_dir().ok_or(ConfigurationError::NoHomeDirectory)?;
        path.push(".m2/repository");
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RemoteRepository {
    pub id: String,
    pub url: String,
}

impl RemoteRepository {
    pub fn central() -> Self {
        RemoteRepository {
            id: MAVEN_CENTRAL_ID.to_owned(),
            url: MAVEN_CENTRAL_URL.to_owned(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        static URL: OnceLock<Regex> = OnceLock::new();
        let re = URL.get_or_init(|| {
            Regex::new(r"^(?:(?:https?)://[^\s/]+|file://)(?:/[^\s]*)?$")
                .expect("repository url regex is valid")
        });
        if self.id.trim().is_empty() {
            return Err(ConfigurationError::EmptyRepositoryId(self.url.clone()));
        }
        if !re.is_match(&self.url) {
            return Err(ConfigurationError::InvalidRemoteUrl {
                id: self.id.clone(),
                url: self.url.clone(),
            });
        }
        Ok(())
    }

    /// Validates every repository and rejects repeated ids.
    pub fn validate_all(repositories: &[RemoteRepository]) -> Result<(), ConfigurationError> {
        let mut seen = BTreeSet::new();
        for repository in repositories {
            repository.validate()?;
            if !seen.insert(repository.id.as_str()) {
                return Err(ConfigurationError::DuplicateRepositoryId(
                    repository.id.clone(),
                ));
            }
        }
        Ok(())
    }
}

impl Display for RemoteRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.id, self.url)
    }
}
