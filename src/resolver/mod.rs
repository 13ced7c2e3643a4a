mod snapshot;

use thiserror::Error;

use crate::model::{
    coordinate::ArtifactCoordinate,
    repository::{LocalRepository, RemoteRepository},
    ParseError,
};

pub use snapshot::{ResolutionSnapshot, SnapshotResolver};

/// Resolves the transitive dependencies of one root artifact.
///
/// Implementations either return the complete set or fail; an unreachable
/// source is an error, never an empty set.
pub trait DependencyResolver {
    fn resolve(
        &self,
        request: &ResolutionRequest,
    ) -> Result<Vec<ArtifactCoordinate>, ResolutionError>;
}

impl<R: DependencyResolver + ?Sized> DependencyResolver for &R {
    fn resolve(
        &self,
        request: &ResolutionRequest,
    ) -> Result<Vec<ArtifactCoordinate>, ResolutionError> {
        (**self).resolve(request)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionRequest {
    pub root: ArtifactCoordinate,
    pub local_repository: LocalRepository,
    pub remote_repositories: Vec<RemoteRepository>,
    /// Include the root artifact itself in the result.
    pub resolve_root: bool,
    pub transitive: bool,
}

impl ResolutionRequest {
    pub fn new(
        root: ArtifactCoordinate,
        local_repository: LocalRepository,
        remote_repositories: Vec<RemoteRepository>,
    ) -> Self {
        Self {
            root,
            local_repository,
            remote_repositories,
            resolve_root: false,
            transitive: true,
        }
    }
}

#[derive(Error, Debug)]
pub enum ResolutionError {
    #[error("Could not load resolution snapshot: {0}")]
    Snapshot(#[from] ParseError),
    #[error("Unsupported resolution snapshot version {0}")]
    UnsupportedVersion(toml::Value),
    #[error("Resolution snapshot has no version field")]
    MissingVersion,
    #[error("Could not resolve {0}: no entry in the resolution snapshot")]
    Unresolvable(String),
}
