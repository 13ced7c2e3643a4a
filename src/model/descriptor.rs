use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use log::{debug, error};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    config::ConfigurationError,
    model::{
        coordinate::{ArtifactCoordinate, ModuleIdentity, DEFAULT_TYPE},
        repository::RemoteRepository,
        ParseError,
    },
};

#[derive(Error, Debug)]
pub enum DescriptorError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// One module of the reactor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    #[serde(default = "default_packaging")]
    pub packaging: String,
    /// Base directory of the module, relative to the build root.
    #[serde(default = "default_module_path")]
    pub path: PathBuf,
}

fn default_packaging() -> String {
    DEFAULT_TYPE.to_owned()
}

fn default_module_path() -> PathBuf {
    PathBuf::from(".")
}

impl Module {
    pub fn identity(&self) -> ModuleIdentity {
        ModuleIdentity::new(self.group_id.clone(), self.artifact_id.clone())
    }

    /// The artifact this module produces.
    pub fn artifact(&self) -> ArtifactCoordinate {
        ArtifactCoordinate::new(&self.group_id, &self.artifact_id, &self.version)
            .with_type(&self.packaging)
    }

    pub fn base_directory(&self, root: &Path) -> PathBuf {
        root.join(&self.path)
    }
}

/// The reactor: every module built together plus the repositories to resolve against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildDescriptor {
    pub modules: Vec<Module>,
    pub local_repository: Option<PathBuf>,
    pub remote_repositories: Vec<RemoteRepository>,
}

#[derive(Debug, Deserialize)]
struct RawDescriptor {
    #[serde(default)]
    repositories: RawRepositories,
    #[serde(default)]
    modules: Vec<Module>,
}

#[derive(Debug, Default, Deserialize)]
struct RawRepositories {
    local: Option<PathBuf>,
    remote: Option<Vec<RemoteRepository>>,
}

impl BuildDescriptor {
    pub fn from_file(path: &Path) -> Result<BuildDescriptor, DescriptorError> {
        debug!("Reading build descriptor from {}", path.display());
        let contents = std::fs::read_to_string(path).map_err(|source| ParseError::IO {
            path: path.display().to_string(),
            source,
        })?;

        let descriptor = BuildDescriptor::from_toml_str(&contents);
        if let Err(err) = &descriptor {
            error!(
                "Could not build a valid descriptor from {} due to err {err}",
                path.display()
            )
        }
        descriptor
    }

    pub fn from_toml_str(data: &str) -> Result<BuildDescriptor, DescriptorError> {
        let raw = toml::from_str::<RawDescriptor>(data).map_err(ParseError::from)?;

        let mut seen = BTreeSet::new();
        for module in &raw.modules {
            for (field, value) in [
                ("group_id", &module.group_id),
                ("artifact_id", &module.artifact_id),
                ("version", &module.version),
            ] {
                if value.trim().is_empty() {
                    return Err(
                        ParseError::EmptyField(field, module.identity().to_string()).into(),
                    );
                }
            }
            if !seen.insert(module.identity()) {
                return Err(ParseError::DuplicateModule(module.identity().to_string()).into());
            }
        }

        let remote_repositories = raw
            .repositories
            .remote
            .unwrap_or_else(|| vec![RemoteRepository::central()]);
        RemoteRepository::validate_all(&remote_repositories)?;

        Ok(BuildDescriptor {
            modules: raw.modules,
            local_repository: raw.repositories.local,
            remote_repositories,
        })
    }

    pub fn identities(&self) -> impl Iterator<Item = ModuleIdentity> + '_ {
        self.modules.iter().map(Module::identity)
    }

    pub fn module(&self, identity: &ModuleIdentity) -> Option<&Module> {
        self.modules.iter().find(|m| &m.identity() == identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn load_valid_descriptor() {
        let str = r#"
            [repositories]
            local = "/tmp/m2"
            remote = [
                { id = "central", url = "https://repo.maven.apache.org/maven2" },
                { id = "internal", url = "https://nexus.example.com/repository/maven" },
            ]

            [[modules]]
            group_id = "com.example"
            artifact_id = "parent"
            version = "1.0.0-SNAPSHOT"
            packaging = "pom"

            [[modules]]
            group_id = "com.example"
            artifact_id = "core"
            version = "1.0.0-SNAPSHOT"
            path = "core"
        "#;
        let expected = BuildDescriptor {
            modules: vec![
                Module {
                    group_id: "com.example".to_owned(),
                    artifact_id: "parent".to_owned(),
                    version: "1.0.0-SNAPSHOT".to_owned(),
                    packaging: "pom".to_owned(),
                    path: PathBuf::from("."),
                },
                Module {
                    group_id: "com.example".to_owned(),
                    artifact_id: "core".to_owned(),
                    version: "1.0.0-SNAPSHOT".to_owned(),
                    packaging: "jar".to_owned(),
                    path: PathBuf::from("core"),
                },
            ],
            local_repository: Some(PathBuf::from("/tmp/m2")),
            remote_repositories: vec![
                RemoteRepository::central(),
                RemoteRepository {
                    id: "internal".to_owned(),
                    url: "https://nexus.example.com/repository/maven".to_owned(),
                },
            ],
        };
        assert_eq!(BuildDescriptor::from_toml_str(str).unwrap(), expected);
    }

    #[test]
    fn defaults_to_maven_central() {
        let descriptor = BuildDescriptor::from_toml_str(
            r#"
            [[modules]]
            group_id = "g"
            artifact_id = "a"
            version = "1"
            "#,
        )
        .unwrap();
        assert_eq!(
            descriptor.remote_repositories,
            vec![RemoteRepository::central()]
        );
        assert_eq!(descriptor.local_repository, None);
    }

    #[test]
    fn empty_descriptor_has_no_modules() {
        let descriptor = BuildDescriptor::from_toml_str("").unwrap();
        assert!(descriptor.modules.is_empty());
    }

    #[test]
    fn module_artifact_uses_packaging() {
        let module = Module {
            group_id: "com.example".to_owned(),
            artifact_id: "web".to_owned(),
            version: "2.0".to_owned(),
            packaging: "war".to_owned(),
            path: PathBuf::from("web"),
        };
        assert_eq!(module.artifact().render(true, true), "com.example:web:war:2.0");
        assert_eq!(
            module.base_directory(Path::new("/build")),
            PathBuf::from("/build/web")
        );
    }

    #[test]
    fn load_invalid_repository_url() {
        let str = r#"
            [repositories]
            remote = [{ id = "bad", url = "ftp://example.com/maven" }]
        "#;
        assert!(matches!(
            BuildDescriptor::from_toml_str(str),
            Err(DescriptorError::Configuration(
                ConfigurationError::InvalidRemoteUrl { .. }
            ))
        ));
    }

    #[test]
    fn load_duplicate_module() {
        let str = r#"
            [[modules]]
            group_id = "g"
            artifact_id = "a"
            version = "1"

            [[modules]]
            group_id = "g"
            artifact_id = "a"
            version = "2"
        "#;
        assert!(matches!(
            BuildDescriptor::from_toml_str(str),
            Err(DescriptorError::Parse(ParseError::DuplicateModule(key))) if key == "g:a"
        ));
    }

    #[test]
    fn load_missing_version() {
        let str = r#"
            [[modules]]
            group_id = "g"
            artifact_id = "a"
        "#;
        assert!(BuildDescriptor::from_toml_str(str).is_err());
    }
}
