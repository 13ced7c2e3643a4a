use std::path::{Path, PathBuf};

use crate::{
    cli::command_handlers::{do_bazel, do_classpath, do_clean, do_workspace, Settings},
    model::coordinate::ModuleIdentity,
    output::Outcome,
};

mod builder;

pub use builder::ClasspathGenBuilder;

pub struct ClasspathGen {
    root: PathBuf,
    descriptor_file_name: PathBuf,
    resolution_file_name: PathBuf,
    output_directory: Option<PathBuf>,
    local_repository: Option<PathBuf>,
    sort: bool,
    skip: bool,
}

impl ClasspathGen {
    pub fn builder() -> ClasspathGenBuilder {
        ClasspathGenBuilder::default()
    }

    /// Writes the flat classpath of every module, or only of `module` when given
    pub fn classpath(
        &self,
        module: Option<&ModuleIdentity>,
        file_name: Option<&Path>,
        header: bool,
    ) -> anyhow::Result<Vec<Outcome>> {
        do_classpath(&self.settings(), module, file_name, header)
    }

    /// Writes the scope-partitioned Bazel manifest of every module, or only of `module` when given
    pub fn bazel(
        &self,
        module: Option<&ModuleIdentity>,
        file_name: Option<&Path>,
        prefix: Option<&str>,
    ) -> anyhow::Result<Vec<Outcome>> {
        do_bazel(&self.settings(), module, file_name, prefix)
    }

    /// Writes the aggregate Bazel manifest for the whole reactor
    pub fn workspace(
        &self,
        file_name: Option<&Path>,
        prefix: Option<&str>,
    ) -> anyhow::Result<Outcome> {
        do_workspace(&self.settings(), file_name, prefix)
    }

    /// Delete every generated file
    pub fn clean(&self) -> anyhow::Result<Vec<Outcome>> {
        do_clean(&self.settings())
    }

    fn settings(&self) -> Settings<'_> {
        Settings {
            root: &self.root,
            descriptor_file_name: &self.descriptor_file_name,
            resolution_file_name: &self.resolution_file_name,
            output_directory: self.output_directory.as_deref(),
            local_repository: self.local_repository.as_deref(),
            sort: self.sort,
            skip: self.skip,
        }
    }
}
