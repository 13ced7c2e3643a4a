//! Text renderings of a [`Classification`].
//!
//! Every renderer goes through [`canonicalize`] with the line it is about to
//! write as the key, so two coordinates producing the same line are written
//! once and line order never depends on resolver order.

use std::fmt::Write;

use crate::{
    model::coordinate::{ArtifactCoordinate, Scope},
    scope::{canonicalize, Classification, CompositeScope},
};

pub const GENERATED_WARNING: &str = "# Note: this file is generated!";
pub const LOAD_STATEMENT: &str = r#"load("@rules_jvm_external//:defs.bzl", "artifact")"#;
pub const DEFAULT_PREFIX: &str = "maven";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Renderer {
    /// `group:artifact:version:type`, one per line. With a header, the root
    /// module is written first.
    Flat { header: Option<ArtifactCoordinate> },
    /// Bazel list per primary scope plus the composite scope assignments.
    ScopePartitioned { prefix: String },
    /// One Bazel list of `group:artifact[:type]:version` strings.
    Aggregate { prefix: String },
}

impl Renderer {
    /// Returns `None` when there is nothing to write for this classification.
    pub fn render(&self, classification: &Classification) -> Option<String> {
        match self {
            Renderer::Flat { header } => {
                if classification.is_empty() {
                    return None;
                }
                Some(render_flat(header.as_ref(), classification))
            }
            Renderer::ScopePartitioned { prefix } => {
                if classification.buckets.is_empty() {
                    return None;
                }
                Some(render_scope_partitioned(prefix, classification))
            }
            Renderer::Aggregate { prefix } => {
                if classification.is_empty() {
                    return None;
                }
                Some(render_aggregate(prefix, classification))
            }
        }
    }
}

fn lines<'a, F>(
    artifacts: impl IntoIterator<Item = &'a ArtifactCoordinate>,
    sort: bool,
    line: F,
) -> Vec<String>
where
    F: Fn(&ArtifactCoordinate) -> String,
{
    canonicalize(artifacts.into_iter().cloned(), sort, &line)
        .iter()
        .map(line)
        .collect()
}

fn render_flat(header: Option<&ArtifactCoordinate>, classification: &Classification) -> String {
    let mut out = String::new();
    if let Some(header) = header {
        out.push_str(&header.classpath_line());
        out.push('\n');
    }
    for line in lines(
        &classification.artifacts,
        classification.buckets.sorted(),
        ArtifactCoordinate::classpath_line,
    ) {
        out.push_str(&line);
        out.push('\n');
    }
    out
}

fn render_scope_partitioned(prefix: &str, classification: &Classification) -> String {
    let mut out = String::new();
    out.push_str(GENERATED_WARNING);
    out.push_str("\n\n");
    out.push_str(LOAD_STATEMENT);
    out.push('\n');

    for scope in &Scope::PRIMARY {
        let _ = writeln!(out, "\n{} = [", list_name(prefix, scope));
        for key in lines(
            classification.buckets.get(scope),
            classification.buckets.sorted(),
            |a: &ArtifactCoordinate| a.render(true, false),
        ) {
            let _ = writeln!(out, "    artifact(\"{}\"),", key);
        }
        out.push_str("]\n");
    }

    out.push('\n');
    for composite in CompositeScope::ALL {
        let members = composite
            .members()
            .iter()
            .map(|scope| list_name(prefix, scope))
            .collect::<Vec<_>>();
        let _ = writeln!(out, "{} = {}", composite.name(), members.join(" + "));
    }
    out
}

fn render_aggregate(prefix: &str, classification: &Classification) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}_artifacts = [", prefix);
    for line in lines(
        &classification.artifacts,
        classification.buckets.sorted(),
        |a: &ArtifactCoordinate| a.render(true, true),
    ) {
        let _ = writeln!(out, "    \"{}\",", line);
    }
    out.push_str("]\n");
    out
}

fn list_name(prefix: &str, scope: &Scope) -> String {
    format!("{}_{}", prefix, scope)
}
