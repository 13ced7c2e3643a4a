use std::collections::BTreeSet;

use crate::model::coordinate::{ArtifactCoordinate, ModuleIdentity};

/// Keys of the modules produced by the current build.
///
/// Anything matching one of them on `groupId:artifactId` is satisfied inside
/// the build and must not be listed as an external dependency, whatever its
/// version, type or classifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReactorIndex {
    members: BTreeSet<String>,
}

impl ReactorIndex {
    pub fn new(modules: impl IntoIterator<Item = ModuleIdentity>) -> Self {
        ReactorIndex {
            members: modules.into_iter().map(|m| m.to_string()).collect(),
        }
    }

    pub fn is_member(&self, coordinate: &ArtifactCoordinate) -> bool {
        self.members.contains(&coordinate.membership_key())
    }

    /// Drops every reactor member from `artifacts`.
    pub fn exclude<'a, I>(&'a self, artifacts: I) -> impl Iterator<Item = ArtifactCoordinate> + 'a
    where
        I: IntoIterator<Item = ArtifactCoordinate>,
        I::IntoIter: 'a,
    {
        artifacts.into_iter().filter(move |a| {
            let member = self.is_member(a);
            if member {
                log::trace!("Excluding reactor member {}", a);
            }
            !member
        })
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
