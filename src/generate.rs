use std::path::PathBuf;

use log::{debug, info};
use thiserror::Error;

use crate::{
    emit::Renderer,
    model::{
        coordinate::ArtifactCoordinate,
        descriptor::{BuildDescriptor, Module},
        repository::LocalRepository,
    },
    output::{Outcome, OutputController, OutputError},
    reactor::ReactorIndex,
    resolver::{DependencyResolver, ResolutionError, ResolutionRequest},
    scope::{classify, Classification},
};

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Dependency resolution failed: {0}")]
    Resolution(#[from] ResolutionError),
    #[error(transparent)]
    Output(#[from] OutputError),
}

/// A file to write, or to delete when `contents` is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedOutput {
    pub path: PathBuf,
    pub contents: Option<String>,
}

/// Resolves reactor modules and turns the results into file contents.
pub struct Generator<'a, R> {
    resolver: R,
    descriptor: &'a BuildDescriptor,
    local_repository: LocalRepository,
    index: ReactorIndex,
    sort: bool,
}

impl<'a, R: DependencyResolver> Generator<'a, R> {
    pub fn new(
        resolver: R,
        descriptor: &'a BuildDescriptor,
        local_repository: LocalRepository,
        sort: bool,
    ) -> Self {
        let index = ReactorIndex::new(descriptor.identities());
        debug!("Reactor has {} modules", index.len());
        Self {
            resolver,
            descriptor,
            local_repository,
            index,
            sort,
        }
    }

    fn resolve(&self, module: &Module) -> Result<Vec<ArtifactCoordinate>, ResolutionError> {
        let request = ResolutionRequest::new(
            module.artifact(),
            self.local_repository.clone(),
            self.descriptor.remote_repositories.clone(),
        );
        self.resolver.resolve(&request)
    }

    pub fn classify_module(&self, module: &Module) -> Result<Classification, ResolutionError> {
        info!("Classifying dependencies of {}", module.identity());
        Ok(classify(self.resolve(module)?, &self.index, self.sort))
    }

    /// Classifies the union of every module's dependencies.
    pub fn classify_reactor(&self) -> Result<Classification, ResolutionError> {
        let mut raw = Vec::new();
        for module in &self.descriptor.modules {
            raw.extend(self.resolve(module)?);
        }
        info!(
            "Classifying {} resolved artifacts across {} modules",
            raw.len(),
            self.descriptor.modules.len()
        );
        Ok(classify(raw, &self.index, self.sort))
    }

    pub fn plan_module(
        &self,
        module: &Module,
        renderer: &Renderer,
        path: PathBuf,
    ) -> Result<PlannedOutput, GenerateError> {
        let classification = self.classify_module(module)?;
        Ok(PlannedOutput {
            path,
            contents: renderer.render(&classification),
        })
    }

    pub fn plan_reactor(
        &self,
        renderer: &Renderer,
        path: PathBuf,
    ) -> Result<PlannedOutput, GenerateError> {
        let classification = self.classify_reactor()?;
        Ok(PlannedOutput {
            path,
            contents: renderer.render(&classification),
        })
    }
}

/// Applies every planned output. Nothing is touched unless all outputs were
/// computed, so callers plan first and write last.
pub fn apply(
    controller: &OutputController,
    outputs: &[PlannedOutput],
) -> Result<Vec<Outcome>, GenerateError> {
    let outcomes = outputs
        .iter()
        .map(|output| controller.apply(&output.path, output.contents.as_deref()))
        .collect::<Result<Vec<_>, OutputError>>()?;
    Ok(outcomes)
}
