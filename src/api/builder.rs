use std::{env, path::PathBuf};

use crate::{config::ClasspathGenConfig, ClasspathGen};

/// Settings left unset fall back to `CLASSPATH_GEN_*` environment variables,
/// then to the defaults documented on each method.
#[derive(Default)]
pub struct ClasspathGenBuilder {
    // All other paths are relative to `root`
    root: Option<PathBuf>,
    descriptor_file_name: Option<PathBuf>,
    resolution_file_name: Option<PathBuf>,
    output_directory: Option<PathBuf>,
    local_repository: Option<PathBuf>,
    sort: Option<bool>,
    skip: Option<bool>,
}

impl ClasspathGenBuilder {
    /// Build root directory. Module paths are relative to it.
    ///
    /// Defaults to the current directory.
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Name of the build descriptor listing the reactor modules.
    ///
    /// Defaults to `reactor.toml`.
    pub fn descriptor_file_name(mut self, path: impl Into<PathBuf>) -> Self {
        self.descriptor_file_name = Some(path.into());
        self
    }

    /// Name of the resolution snapshot exported by the build tool.
    ///
    /// Defaults to `resolved.toml`.
    pub fn resolution_file_name(mut self, path: impl Into<PathBuf>) -> Self {
        self.resolution_file_name = Some(path.into());
        self
    }

    /// Directory generated files are written to, relative to each module's
    /// base directory (or the root for the aggregate manifest).
    ///
    /// Defaults to the base directory itself.
    pub fn output_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_directory = Some(path.into());
        self
    }

    /// Location of the local artifact repository.
    ///
    /// Defaults to the descriptor's setting, then `$HOME/.m2/repository`.
    pub fn local_repository(mut self, path: impl Into<PathBuf>) -> Self {
        self.local_repository = Some(path.into());
        self
    }

    /// Sort generated lines. Defaults to `true`; turning it off keeps resolver order.
    pub fn sort(mut self, sort: bool) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Leave every output untouched. Defaults to `false`.
    pub fn skip(mut self, skip: bool) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn try_build(self) -> anyhow::Result<ClasspathGen> {
        let config = ClasspathGenConfig::load()?;
        self.build_with(config)
    }

    fn build_with(self, config: ClasspathGenConfig) -> anyhow::Result<ClasspathGen> {
        let Self {
            root,
            descriptor_file_name,
            resolution_file_name,
            output_directory,
            local_repository,
            sort,
            skip,
        } = self;
        let root = match root {
            Some(root) => root,
            None => env::current_dir()?,
        };

        Ok(ClasspathGen {
            root,
            descriptor_file_name: descriptor_file_name
                .unwrap_or_else(|| PathBuf::from("reactor.toml")),
            resolution_file_name: resolution_file_name
                .unwrap_or_else(|| PathBuf::from("resolved.toml")),
            output_directory: output_directory.or(config.output_directory),
            local_repository: local_repository.or(config.local_repository),
            sort: sort.or(config.sort).unwrap_or(true),
            skip: skip.or(config.skip).unwrap_or(false),
        })
    }
}
