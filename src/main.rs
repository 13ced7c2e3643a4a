use std::{error::Error, path::Path};

use clap::Parser;

use classpath_gen::{
    cli::args::{CliArgs, Command},
    model::coordinate::ModuleIdentity,
    output::Outcome,
    ClasspathGen,
};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli_args: CliArgs = CliArgs::parse();

    let mut builder = ClasspathGen::builder()
        .root(&cli_args.root)
        .descriptor_file_name(&cli_args.descriptor)
        .resolution_file_name(&cli_args.resolution);
    if let Some(output_directory) = &cli_args.output_directory {
        builder = builder.output_directory(output_directory);
    }
    if let Some(local_repository) = &cli_args.local_repository {
        builder = builder.local_repository(local_repository);
    }
    if cli_args.no_sort {
        builder = builder.sort(false);
    }
    if cli_args.skip {
        builder = builder.skip(true);
    }
    let generator = builder.try_build()?;

    let outcomes = match cli_args.cmd {
        Command::Classpath {
            module,
            file,
            header,
        } => {
            let module = parse_module(module.as_deref())?;
            generator.classpath(module.as_ref(), file.as_deref().map(Path::new), header)?
        }
        Command::Bazel {
            module,
            file,
            prefix,
        } => {
            let module = parse_module(module.as_deref())?;
            generator.bazel(
                module.as_ref(),
                file.as_deref().map(Path::new),
                prefix.as_deref(),
            )?
        }
        Command::Workspace { file, prefix } => {
            vec![generator.workspace(file.as_deref().map(Path::new), prefix.as_deref())?]
        }
        Command::Clean => generator.clean()?,
    };
    summarize(&outcomes);
    Ok(())
}

fn parse_module(module: Option<&str>) -> Result<Option<ModuleIdentity>, Box<dyn Error>> {
    Ok(module.map(str::parse::<ModuleIdentity>).transpose()?)
}

fn summarize(outcomes: &[Outcome]) {
    let count = |outcome: Outcome| outcomes.iter().filter(|o| **o == outcome).count();
    log::debug!(
        "{} written, {} deleted, {} skipped, {} absent",
        count(Outcome::Written),
        count(Outcome::Deleted),
        count(Outcome::Skipped),
        count(Outcome::Absent)
    );
}
