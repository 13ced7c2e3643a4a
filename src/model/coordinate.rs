use std::{
    borrow::Cow,
    fmt::{Display, Write},
    str::FromStr,
    sync::OnceLock,
};

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::model::ParseError;

/// Packaging type assumed when none is given. Left out of rendered keys.
pub const DEFAULT_TYPE: &str = "jar";

/// Build lifecycle phase in which a dependency is needed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scope {
    #[default]
    Compile,
    Runtime,
    Test,
    Provided,
    System,
    Import,
    /// A scope name this crate does not know about, kept verbatim.
    Other(String),
}

impl Scope {
    /// The scopes that get their own list in the scope manifest, in emission order.
    pub const PRIMARY: [Scope; 5] = [
        Scope::Compile,
        Scope::Test,
        Scope::System,
        Scope::Provided,
        Scope::Runtime,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Scope::Compile => "compile",
            Scope::Runtime => "runtime",
            Scope::Test => "test",
            Scope::Provided => "provided",
            Scope::System => "system",
            Scope::Import => "import",
            Scope::Other(name) => name,
        }
    }
}

impl From<&str> for Scope {
    fn from(value: &str) -> Self {
        match value {
            "compile" => Scope::Compile,
            "runtime" => Scope::Runtime,
            "test" => Scope::Test,
            "provided" => Scope::Provided,
            "system" => Scope::System,
            "import" => Scope::Import,
            other => Scope::Other(other.to_owned()),
        }
    }
}

impl Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Scope {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Scope {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Scope::from(value.as_str()))
    }
}

/// A resolved artifact.
///
/// `version` always holds the base version: a timestamped snapshot such as
/// `1.0-20240101.120000-3` is stored as `1.0-SNAPSHOT`, see [`base_version`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactCoordinate {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub r#type: String,
    pub classifier: Option<String>,
    pub scope: Scope,
}

impl ArtifactCoordinate {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl AsRef<str>,
    ) -> Self {
        ArtifactCoordinate {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: base_version(version.as_ref()).into_owned(),
            r#type: DEFAULT_TYPE.to_owned(),
            classifier: None,
            scope: Scope::default(),
        }
    }

    pub fn with_type(mut self, r#type: impl Into<String>) -> Self {
        self.r#type = r#type.into();
        self
    }

    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        self.classifier = Some(classifier.into());
        self
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// `group:artifact[:type][:classifier][:version]`.
    ///
    /// The type is skipped when it is `jar`, unless a classifier follows it.
    pub fn render(&self, include_type: bool, include_version: bool) -> String {
        let mut out = self.membership_key();
        if include_type && (self.r#type != DEFAULT_TYPE || self.classifier.is_some()) {
            out.push(':');
            out.push_str(&self.r#type);
        }
        if let Some(classifier) = &self.classifier {
            out.push(':');
            out.push_str(classifier);
        }
        if include_version {
            out.push(':');
            out.push_str(&self.version);
        }
        out
    }

    /// `group:artifact`, the key reactor exclusion is decided on.
    pub fn membership_key(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }

    /// `group:artifact:version:type[:classifier]`, the flat classpath line format.
    pub fn classpath_line(&self) -> String {
        let mut out = format!(
            "{}:{}:{}:{}",
            self.group_id, self.artifact_id, self.version, self.r#type
        );
        if let Some(classifier) = &self.classifier {
            let _ = write!(out, ":{}", classifier);
        }
        out
    }
}

impl Display for ArtifactCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render(true, true))
    }
}

/// `groupId:artifactId` of a module built inside the current reactor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleIdentity {
    pub group_id: String,
    pub artifact_id: String,
}

impl ModuleIdentity {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        ModuleIdentity {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
        }
    }
}

impl Display for ModuleIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)
    }
}

impl FromStr for ModuleIdentity {
    type Err = ParseError;

    /// Accepts `group:artifact` and `group:artifact:version`; the version is ignored.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let parts = value.split(':').collect::<Vec<_>>();
        match parts.as_slice() {
            [group, artifact] | [group, artifact, _]
                if !group.is_empty() && !artifact.is_empty() =>
            {
                Ok(ModuleIdentity::new(*group, *artifact))
            }
            _ => Err(ParseError::InvalidModuleCoordinate(value.to_owned())),
        }
    }
}

/// Maps a timestamped snapshot version back to its `-SNAPSHOT` base version.
pub fn base_version(version: &str) -> Cow<'_, str> {
    static SNAPSHOT_TIMESTAMP: OnceLock<Regex> = OnceLock::new();
    let re = SNAPSHOT_TIMESTAMP.get_or_init(|| {
        Regex::new(r"^(?P<base>.+)-(?P<timestamp>[0-9]{8}\.[0-9]{6})-(?P<build>[0-9]+)$")
            .expect("snapshot timestamp regex is valid")
    });
    match re.captures(version).and_then(|c| c.name("base")) {
        Some(base) => Cow::Owned(format!("{}-SNAPSHOT", base.as_str())),
        None => Cow::Borrowed(version),
    }
}
