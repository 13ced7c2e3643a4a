use anyhow::{bail, Context};
use log::{debug, info};

use crate::{
    emit::{Renderer, DEFAULT_PREFIX},
    generate::{self, Generator, PlannedOutput},
    model::{
        coordinate::ModuleIdentity,
        descriptor::{BuildDescriptor, Module},
        repository::LocalRepository,
    },
    output::{Outcome, OutputController},
    resolver::SnapshotResolver,
};
use std::path::{Path, PathBuf};

pub const DEFAULT_CLASSPATH_FILE_NAME: &str = "classpath.txt";
pub const DEFAULT_BAZEL_FILE_NAME: &str = "BUILD-maven.bzl";
pub const DEFAULT_WORKSPACE_FILE_NAME: &str = "WORKSPACE-maven.bzl";

/// Everything the handlers need besides the per-command options.
pub struct Settings<'a> {
    pub root: &'a Path,
    pub descriptor_file_name: &'a Path,
    pub resolution_file_name: &'a Path,
    pub output_directory: Option<&'a Path>,
    pub local_repository: Option<&'a Path>,
    pub sort: bool,
    pub skip: bool,
}

impl Settings<'_> {
    fn controller(&self) -> OutputController {
        OutputController::new(self.skip)
    }

    fn output_path(&self, base: &Path, file_name: &Path) -> PathBuf {
        match self.output_directory {
            Some(directory) => base.join(directory).join(file_name),
            None => base.join(file_name),
        }
    }
}

/// Handler to classpath command
pub fn do_classpath(
    settings: &Settings<'_>,
    module: Option<&ModuleIdentity>,
    file_name: Option<&Path>,
    header: bool,
) -> anyhow::Result<Vec<Outcome>> {
    let file_name = file_name.unwrap_or(Path::new(DEFAULT_CLASSPATH_FILE_NAME));
    per_module(settings, module, file_name, |module| Renderer::Flat {
        header: header.then(|| module.artifact()),
    })
}

/// Handler to bazel command
pub fn do_bazel(
    settings: &Settings<'_>,
    module: Option<&ModuleIdentity>,
    file_name: Option<&Path>,
    prefix: Option<&str>,
) -> anyhow::Result<Vec<Outcome>> {
    let file_name = file_name.unwrap_or(Path::new(DEFAULT_BAZEL_FILE_NAME));
    let prefix = prefix.unwrap_or(DEFAULT_PREFIX);
    per_module(settings, module, file_name, |_| Renderer::ScopePartitioned {
        prefix: prefix.to_owned(),
    })
}

/// Handler to workspace command
/// Resolves every module of the reactor and writes one aggregate list at the build root
pub fn do_workspace(
    settings: &Settings<'_>,
    file_name: Option<&Path>,
    prefix: Option<&str>,
) -> anyhow::Result<Outcome> {
    let controller = settings.controller();
    if controller.skips() {
        debug!("Skipping execution.");
        return Ok(Outcome::Skipped);
    }

    let descriptor = load_descriptor(settings)?;
    let resolver = load_resolver(settings)?;
    let generator = Generator::new(
        &resolver,
        &descriptor,
        local_repository(settings, &descriptor)?,
        settings.sort,
    );

    let renderer = Renderer::Aggregate {
        prefix: prefix.unwrap_or(DEFAULT_PREFIX).to_owned(),
    };
    let path = settings.output_path(
        settings.root,
        file_name.unwrap_or(Path::new(DEFAULT_WORKSPACE_FILE_NAME)),
    );
    let planned = generator.plan_reactor(&renderer, path)?;

    let outcome = controller.apply(&planned.path, planned.contents.as_deref())?;
    Ok(outcome)
}

/// Deletes every file the other commands may have generated, with default file names
pub fn do_clean(settings: &Settings<'_>) -> anyhow::Result<Vec<Outcome>> {
    let controller = settings.controller();
    if controller.skips() {
        debug!("Skipping execution.");
        return Ok(vec![Outcome::Skipped]);
    }

    let descriptor = load_descriptor(settings)?;

    let mut outputs = Vec::new();
    for module in &descriptor.modules {
        let base = module.base_directory(settings.root);
        for file_name in [DEFAULT_CLASSPATH_FILE_NAME, DEFAULT_BAZEL_FILE_NAME] {
            outputs.push(PlannedOutput {
                path: settings.output_path(&base, Path::new(file_name)),
                contents: None,
            });
        }
    }
    outputs.push(PlannedOutput {
        path: settings.output_path(settings.root, Path::new(DEFAULT_WORKSPACE_FILE_NAME)),
        contents: None,
    });

    info!("Cleaning {} generated files.", outputs.len());
    Ok(generate::apply(&controller, &outputs)?)
}

fn per_module<F>(
    settings: &Settings<'_>,
    selection: Option<&ModuleIdentity>,
    file_name: &Path,
    renderer: F,
) -> anyhow::Result<Vec<Outcome>>
where
    F: Fn(&Module) -> Renderer,
{
    let controller = settings.controller();
    if controller.skips() {
        debug!("Skipping execution.");
        return Ok(vec![Outcome::Skipped]);
    }

    let descriptor = load_descriptor(settings)?;
    let modules = select_modules(&descriptor, selection)?;
    let resolver = load_resolver(settings)?;
    let generator = Generator::new(
        &resolver,
        &descriptor,
        local_repository(settings, &descriptor)?,
        settings.sort,
    );

    let planned = modules
        .into_iter()
        .map(|module| {
            let path = settings.output_path(&module.base_directory(settings.root), file_name);
            generator.plan_module(module, &renderer(module), path)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(generate::apply(&controller, &planned)?)
}

fn select_modules<'a>(
    descriptor: &'a BuildDescriptor,
    selection: Option<&ModuleIdentity>,
) -> anyhow::Result<Vec<&'a Module>> {
    match selection {
        Some(identity) => match descriptor.module(identity) {
            Some(module) => Ok(vec![module]),
            None => bail!("Module {} is not part of the build", identity),
        },
        None => Ok(descriptor.modules.iter().collect()),
    }
}

fn load_descriptor(settings: &Settings<'_>) -> anyhow::Result<BuildDescriptor> {
    let path = settings.root.join(settings.descriptor_file_name);
    BuildDescriptor::from_file(&path)
        .with_context(|| format!("Could not load build descriptor {}", path.display()))
}

fn load_resolver(settings: &Settings<'_>) -> anyhow::Result<SnapshotResolver> {
    let path = settings.root.join(settings.resolution_file_name);
    Ok(SnapshotResolver::from_file(&path)?)
}

/// Explicit setting, then the descriptor, then `~/.m2/repository`
fn local_repository(
    settings: &Settings<'_>,
    descriptor: &BuildDescriptor,
) -> anyhow::Result<LocalRepository> {
    let configured = settings
        .local_repository
        .or(descriptor.local_repository.as_deref());
    let repository = match configured {
        Some(path) => LocalRepository::new(settings.root.join(path))?,
        None => LocalRepository::default_location()?,
    };
    Ok(repository)
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use std::fs;

    /// Copies the multi-module fixture into a scratch build root.
    fn fixture() -> tempfile::TempDir {
        let source = project_root::get_project_root()
            .unwrap()
            .join("resources/multi-module");
        let root = tempfile::tempdir().unwrap();
        for file in ["reactor.toml", "resolved.toml"] {
            fs::copy(source.join(file), root.path().join(file)).unwrap();
        }
        root
    }

    fn settings(root: &Path) -> Settings<'_> {
        Settings {
            root,
            descriptor_file_name: Path::new("reactor.toml"),
            resolution_file_name: Path::new("resolved.toml"),
            output_directory: None,
            local_repository: Some(Path::new("m2")),
            sort: true,
            skip: false,
        }
    }

    #[test]
    fn bazel_writes_one_manifest_per_module() {
        let root = fixture();
        let settings = settings(root.path());

        let outcomes = do_bazel(&settings, None, None, None).unwrap();

        // parent pom only depends on its children
        assert_eq!(
            outcomes,
            vec![Outcome::Absent, Outcome::Written, Outcome::Written]
        );
        assert!(!root.path().join(DEFAULT_BAZEL_FILE_NAME).exists());
        let web = fs::read_to_string(root.path().join("web").join(DEFAULT_BAZEL_FILE_NAME)).unwrap();
        assert!(web.contains("maven_compile = [\n    artifact(\"com.google.guava:guava\"),\n    artifact(\"org.slf4j:slf4j-api\"),\n]\n"));
        assert!(web.contains("maven_provided = [\n    artifact(\"javax.servlet:javax.servlet-api\"),\n]\n"));
        assert!(!web.contains("com.example:core"));
    }

    #[test]
    fn bazel_deletes_manifest_of_module_without_external_dependencies() {
        let root = fixture();
        let settings = settings(root.path());
        let stale = root.path().join(DEFAULT_BAZEL_FILE_NAME);
        fs::write(&stale, "maven_compile = []\n").unwrap();

        let parent = ModuleIdentity::new("com.example", "parent");
        let outcomes = do_bazel(&settings, Some(&parent), None, None).unwrap();

        assert_eq!(outcomes, vec![Outcome::Deleted]);
        assert!(!stale.exists());
    }

    #[test]
    fn classpath_for_selected_module() {
        let root = fixture();
        let settings = Settings {
            output_directory: Some(Path::new("target")),
            ..settings(root.path())
        };

        let core = ModuleIdentity::new("com.example", "core");
        do_classpath(&settings, Some(&core), None, true).unwrap();

        assert_eq!(
            fs::read_to_string(root.path().join("core/target/classpath.txt")).unwrap(),
            "com.example:core:1.0.0-SNAPSHOT:jar\ncom.google.guava:guava:33.0.0-jre:jar\njunit:junit:4.13.2:jar\norg.slf4j:slf4j-api:2.0.9:jar\n"
        );
        assert!(!root.path().join("web/target/classpath.txt").exists());
    }

    #[test]
    fn workspace_lists_every_external_artifact_once() {
        let root = fixture();
        let settings = settings(root.path());

        let outcome = do_workspace(&settings, None, None).unwrap();

        assert_eq!(outcome, Outcome::Written);
        assert_eq!(
            fs::read_to_string(root.path().join(DEFAULT_WORKSPACE_FILE_NAME)).unwrap(),
            r#"maven_artifacts = [
    "com.google.guava:guava:33.0.0-jre",
    "javax.servlet:javax.servlet-api:4.0.1",
    "junit:junit:4.13.2",
    "org.slf4j:slf4j-api:2.0.9",
]
"#
        );
    }

    #[test]
    fn skip_does_not_touch_outputs_or_inputs() {
        let root = tempfile::tempdir().unwrap();
        let stale = root.path().join(DEFAULT_WORKSPACE_FILE_NAME);
        fs::write(&stale, "stale").unwrap();
        let settings = Settings {
            skip: true,
            ..settings(root.path())
        };

        // no descriptor or snapshot exists, skipping must not read them
        assert_eq!(
            do_workspace(&settings, None, None).unwrap(),
            Outcome::Skipped
        );
        assert_eq!(
            do_bazel(&settings, None, None, None).unwrap(),
            vec![Outcome::Skipped]
        );
        assert_eq!(fs::read_to_string(stale).unwrap(), "stale");
    }

    #[test]
    fn clean_is_a_no_op_when_skipping() {
        let root = fixture();
        let generated = root.path().join(DEFAULT_WORKSPACE_FILE_NAME);
        fs::write(&generated, "maven_artifacts = [\n]\n").unwrap();
        let settings = Settings {
            skip: true,
            ..settings(root.path())
        };

        assert_eq!(do_clean(&settings).unwrap(), vec![Outcome::Skipped]);
        assert!(generated.exists());
    }

    #[test]
    fn unknown_module_is_an_error() {
        let root = fixture();
        let settings = settings(root.path());
        let missing = ModuleIdentity::new("com.example", "missing");
        assert!(do_classpath(&settings, Some(&missing), None, false).is_err());
    }

    #[test]
    fn missing_snapshot_fails_without_writing() {
        let root = fixture();
        fs::remove_file(root.path().join("resolved.toml")).unwrap();
        let settings = settings(root.path());

        assert!(do_workspace(&settings, None, None).is_err());
        assert!(!root.path().join(DEFAULT_WORKSPACE_FILE_NAME).exists());
    }

    #[test]
    fn clean_removes_generated_files() {
        let root = fixture();
        let settings = settings(root.path());
        do_bazel(&settings, None, None, None).unwrap();
        do_workspace(&settings, None, None).unwrap();

        do_clean(&settings).unwrap();

        assert!(!root.path().join("core").join(DEFAULT_BAZEL_FILE_NAME).exists());
        assert!(!root.path().join("web").join(DEFAULT_BAZEL_FILE_NAME).exists());
        assert!(!root.path().join(DEFAULT_WORKSPACE_FILE_NAME).exists());
        assert!(root.path().join("reactor.toml").exists());
    }
}
