use std::{collections::BTreeMap, path::Path};

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::model::{
    coordinate::{ArtifactCoordinate, Scope, DEFAULT_TYPE},
    ParseError,
};

use super::{DependencyResolver, ResolutionError, ResolutionRequest};

const VERSION: i64 = 1;

/// Dependency graphs exported by the host build tool, keyed by `groupId:artifactId`
/// of the module they were resolved for.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolutionSnapshot {
    #[serde(default)]
    pub modules: BTreeMap<String, ResolvedModule>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolvedModule {
    #[serde(default)]
    pub artifacts: Vec<ResolvedArtifact>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolvedArtifact {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    #[serde(rename = "type", default = "default_type")]
    pub r#type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,
    #[serde(default)]
    pub scope: Scope,
    /// 1 for direct dependencies of the module.
    #[serde(default = "default_depth")]
    pub depth: u32,
}

fn default_type() -> String {
    DEFAULT_TYPE.to_owned()
}

fn default_depth() -> u32 {
    1
}

impl From<&ResolvedArtifact> for ArtifactCoordinate {
    fn from(artifact: &ResolvedArtifact) -> Self {
        let coordinate =
            ArtifactCoordinate::new(&artifact.group_id, &artifact.artifact_id, &artifact.version)
                .with_type(&artifact.r#type)
                .with_scope(artifact.scope.clone());
        match &artifact.classifier {
            Some(classifier) => coordinate.with_classifier(classifier),
            None => coordinate,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
struct VersionedSnapshot<'a> {
    pub version: i64,
    #[serde(flatten)]
    pub content: &'a ResolutionSnapshot,
}

impl ResolutionSnapshot {
    pub fn from_file(file: &Path) -> Result<ResolutionSnapshot, ResolutionError> {
        let contents = std::fs::read_to_string(file).map_err(|source| ParseError::IO {
            path: file.display().to_string(),
            source,
        })?;
        ResolutionSnapshot::from_str(&contents)
    }

    pub fn from_str(s: &str) -> Result<ResolutionSnapshot, ResolutionError> {
        let mut table = toml::from_str::<toml::Table>(s).map_err(ParseError::from)?;
        match table.remove("version") {
            Some(toml::Value::Integer(VERSION)) => table
                .try_into::<ResolutionSnapshot>()
                .map_err(|e| ResolutionError::from(ParseError::from(e))),
            Some(other) => Err(ResolutionError::UnsupportedVersion(other)),
            None => Err(ResolutionError::MissingVersion),
        }
    }

    pub fn to_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(&VersionedSnapshot {
            version: VERSION,
            content: self,
        })
    }
}

/// Serves resolutions from a [`ResolutionSnapshot`].
///
/// Repositories in the request are only logged, the snapshot already holds
/// the resolved graph.
pub struct SnapshotResolver {
    snapshot: ResolutionSnapshot,
}

impl SnapshotResolver {
    pub fn new(snapshot: ResolutionSnapshot) -> Self {
        Self { snapshot }
    }

    pub fn from_file(path: &Path) -> Result<Self, ResolutionError> {
        debug!("Loading resolution snapshot from {}", path.display());
        Ok(Self::new(ResolutionSnapshot::from_file(path)?))
    }
}

impl DependencyResolver for SnapshotResolver {
    fn resolve(
        &self,
        request: &ResolutionRequest,
    ) -> Result<Vec<ArtifactCoordinate>, ResolutionError> {
        let root = &request.root;
        debug!(
            "Resolving {} (local repository {}, remote repositories [{}])",
            root,
            request.local_repository.path().display(),
            request
                .remote_repositories
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        );

        let module = self
            .snapshot
            .modules
            .get(&root.membership_key())
            .ok_or_else(|| ResolutionError::Unresolvable(root.to_string()))?;

        let mut artifacts = Vec::with_capacity(module.artifacts.len() + 1);
        if request.resolve_root {
            artifacts.push(root.clone());
        }
        for artifact in &module.artifacts {
            if !request.transitive && artifact.depth > 1 {
                trace!(
                    "Skipping transitive dependency {}:{}",
                    artifact.group_id,
                    artifact.artifact_id
                );
                continue;
            }
            artifacts.push(ArtifactCoordinate::from(artifact));
        }
        debug!("Resolved {} artifacts for {}", artifacts.len(), root);
        Ok(artifacts)
    }
}
