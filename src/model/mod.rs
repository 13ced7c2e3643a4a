use thiserror::Error;

pub mod coordinate;
pub mod descriptor;
pub mod repository;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error reading {path}: {source}")]
    IO {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid module coordinate `{0}`, expected groupId:artifactId[:version]")]
    InvalidModuleCoordinate(String),
    #[error("Duplicate module `{0}` in the build descriptor")]
    DuplicateModule(String),
    #[error("Missing field `{0}` in `{1}`")]
    EmptyField(&'static str, String),
}
