use clap::Parser;

/// Generates classpath and Bazel dependency manifests for a Maven reactor.
#[derive(Debug, Parser)]
#[clap(version)]
pub struct CliArgs {
    #[clap(subcommand)]
    pub cmd: Command,
    /// Root directory of the build, module paths are relative to it
    #[clap(short, long, default_value = ".")]
    pub root: String,
    /// Build descriptor listing the reactor modules
    #[clap(short, long, default_value = "reactor.toml")]
    pub descriptor: String,
    /// Resolution snapshot exported by the build tool
    #[clap(long, default_value = "resolved.toml")]
    pub resolution: String,
    /// Directory generated files are written to, relative to each module
    #[clap(short, long)]
    pub output_directory: Option<String>,
    /// Local artifact repository, defaults to ~/.m2/repository
    #[clap(long)]
    pub local_repository: Option<String>,
    /// Keep resolver order instead of sorting generated lines
    #[clap(long)]
    pub no_sort: bool,
    /// Do not touch any output file
    #[clap(long)]
    pub skip: bool,
}

#[derive(Debug, Parser)]
pub enum Command {
    ///Writes the flat classpath listing of each module
    Classpath {
        /// Only generate for this module, as groupId:artifactId
        #[clap(short, long)]
        module: Option<String>,
        #[clap(short, long)]
        file: Option<String>,
        /// Start the listing with the module's own coordinate
        #[clap(long)]
        header: bool,
    },
    ///Writes the scope-partitioned Bazel manifest of each module
    Bazel {
        /// Only generate for this module, as groupId:artifactId
        #[clap(short, long)]
        module: Option<String>,
        #[clap(short, long)]
        file: Option<String>,
        /// Prefix of the generated variable names
        #[clap(short, long)]
        prefix: Option<String>,
    },
    ///Writes the aggregate Bazel manifest for the whole reactor
    Workspace {
        #[clap(short, long)]
        file: Option<String>,
        /// Prefix of the generated variable name
        #[clap(short, long)]
        prefix: Option<String>,
    },
    ///Deletes every generated file
    Clean,
}
