use std::collections::{BTreeMap, HashSet};

use log::debug;

use crate::{
    model::coordinate::{ArtifactCoordinate, Scope},
    reactor::ReactorIndex,
};

/// Named unions of primary scopes exposed to consumers of the scope manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompositeScope {
    Compile,
    Runtime,
    Test,
}

impl CompositeScope {
    pub const ALL: [CompositeScope; 3] = [
        CompositeScope::Compile,
        CompositeScope::Runtime,
        CompositeScope::Test,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CompositeScope::Compile => "scope_compile",
            CompositeScope::Runtime => "scope_runtime",
            CompositeScope::Test => "scope_test",
        }
    }

    /// Primary scopes making up the union, in the order they are written out.
    pub fn members(&self) -> &'static [Scope] {
        match self {
            CompositeScope::Compile => &[Scope::Compile],
            CompositeScope::Runtime => &[Scope::Compile, Scope::Runtime],
            CompositeScope::Test => &[
                Scope::Compile,
                Scope::System,
                Scope::Provided,
                Scope::Runtime,
                Scope::Test,
            ],
        }
    }
}

/// The five primary scope buckets of one classification.
///
/// Every primary scope has a bucket, possibly empty. Buckets hold coordinates
/// deduplicated on their full rendering and, unless sorting was turned off,
/// sorted by it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeBuckets {
    buckets: BTreeMap<Scope, Vec<ArtifactCoordinate>>,
    sort: bool,
}

impl ScopeBuckets {
    pub fn get(&self, scope: &Scope) -> &[ArtifactCoordinate] {
        self.buckets.get(scope).map(Vec::as_slice).unwrap_or_default()
    }

    /// Recomputed from the primary buckets on every call.
    pub fn composite(&self, composite: CompositeScope) -> Vec<ArtifactCoordinate> {
        let union = composite
            .members()
            .iter()
            .flat_map(|scope| self.get(scope).iter().cloned());
        canonicalize(union, self.sort, full_key)
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.values().all(Vec::is_empty)
    }

    /// Whether buckets were sorted, or kept in resolver order.
    pub fn sorted(&self) -> bool {
        self.sort
    }
}

/// A raw resolution result with reactor members removed, both as one flat
/// listing and split into scope buckets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub artifacts: Vec<ArtifactCoordinate>,
    pub buckets: ScopeBuckets,
}

impl Classification {
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

pub fn classify(
    raw: impl IntoIterator<Item = ArtifactCoordinate>,
    index: &ReactorIndex,
    sort: bool,
) -> Classification {
    let filtered = index.exclude(raw).collect::<Vec<_>>();

    let mut by_scope: BTreeMap<Scope, Vec<ArtifactCoordinate>> = Scope::PRIMARY
        .iter()
        .map(|scope| (scope.clone(), Vec::new()))
        .collect();
    for artifact in &filtered {
        match by_scope.get_mut(&artifact.scope) {
            Some(bucket) => bucket.push(artifact.clone()),
            None => debug!(
                "Leaving {} out of the scope buckets, scope `{}` has no bucket",
                artifact, artifact.scope
            ),
        }
    }
    let buckets = by_scope
        .into_iter()
        .map(|(scope, bucket)| (scope, canonicalize(bucket, sort, full_key)))
        .collect();

    Classification {
        artifacts: canonicalize(filtered, sort, full_key),
        buckets: ScopeBuckets { buckets, sort },
    }
}

/// Deduplicates `artifacts` on `key`, keeping the first occurrence, then sorts by
/// `key` when `sort` is set.
pub fn canonicalize<F>(
    artifacts: impl IntoIterator<Item = ArtifactCoordinate>,
    sort: bool,
    key: F,
) -> Vec<ArtifactCoordinate>
where
    F: Fn(&ArtifactCoordinate) -> String,
{
    let mut seen = HashSet::new();
    let mut keyed = artifacts
        .into_iter()
        .map(|artifact| (key(&artifact), artifact))
        .filter(|(key, _)| seen.insert(key.clone()))
        .collect::<Vec<_>>();
    if sort {
        keyed.sort_by(|(a, _), (b, _)| a.cmp(b));
    }
    keyed.into_iter().map(|(_, artifact)| artifact).collect()
}

pub fn full_key(artifact: &ArtifactCoordinate) -> String {
    artifact.render(true, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::coordinate::ModuleIdentity;
    use pretty_assertions::assert_eq;

    fn artifact(artifact_id: &str, version: &str, scope: Scope) -> ArtifactCoordinate {
        ArtifactCoordinate::new("g", artifact_id, version).with_scope(scope)
    }

    fn rendered(artifacts: &[ArtifactCoordinate]) -> Vec<String> {
        artifacts.iter().map(full_key).collect()
    }

    #[test]
    fn duplicate_artifacts_collapse() {
        let raw = vec![
            artifact("A", "1", Scope::Compile),
            artifact("B", "2", Scope::Runtime),
            artifact("A", "1", Scope::Compile),
        ];
        let classification = classify(raw, &ReactorIndex::default(), true);
        let buckets = &classification.buckets;

        assert_eq!(rendered(buckets.get(&Scope::Compile)), vec!["g:A:1"]);
        assert_eq!(rendered(buckets.get(&Scope::Runtime)), vec!["g:B:2"]);
        assert_eq!(
            rendered(&buckets.composite(CompositeScope::Runtime)),
            vec!["g:A:1", "g:B:2"]
        );
        assert_eq!(rendered(&classification.artifacts), vec!["g:A:1", "g:B:2"]);
    }

    #[test]
    fn every_primary_bucket_exists() {
        let classification = classify(Vec::new(), &ReactorIndex::default(), true);
        for scope in Scope::PRIMARY {
            assert!(classification.buckets.get(&scope).is_empty());
        }
        assert!(classification.buckets.is_empty());
        assert!(classification.is_empty());
    }

    #[test]
    fn reactor_members_are_excluded_from_every_bucket() {
        let index = ReactorIndex::new([ModuleIdentity::new("g", "M")]);
        let raw = vec![
            artifact("M", "1", Scope::Compile),
            artifact("M", "1", Scope::Test).with_type("test-jar"),
        ];
        let classification = classify(raw, &index, true);
        assert!(classification.buckets.is_empty());
        assert!(classification.is_empty());
        for composite in CompositeScope::ALL {
            assert!(classification.buckets.composite(composite).is_empty());
        }
    }

    #[test]
    fn unknown_and_import_scopes_are_not_bucketed() {
        let raw = vec![
            artifact("custom", "1", Scope::Other("annotation".to_owned())),
            artifact("bom", "1", Scope::Import).with_type("pom"),
            artifact("lib", "1", Scope::Provided),
        ];
        let classification = classify(raw, &ReactorIndex::default(), true);
        assert_eq!(
            rendered(&classification.buckets.composite(CompositeScope::Test)),
            vec!["g:lib:1"]
        );
        assert_eq!(
            rendered(&classification.artifacts),
            vec!["g:bom:pom:1", "g:custom:1", "g:lib:1"]
        );
    }

    #[test]
    fn buckets_are_sorted_by_rendered_string() {
        let raw = vec![
            artifact("zeta", "1", Scope::Test),
            artifact("alpha", "2", Scope::Test),
            artifact("alpha", "10", Scope::Test),
        ];
        let classification = classify(raw, &ReactorIndex::default(), true);
        assert_eq!(
            rendered(classification.buckets.get(&Scope::Test)),
            vec!["g:alpha:10", "g:alpha:2", "g:zeta:1"]
        );
    }

    #[test]
    fn unsorted_keeps_first_seen_order() {
        let raw = vec![
            artifact("zeta", "1", Scope::Compile),
            artifact("alpha", "1", Scope::Compile),
            artifact("zeta", "1", Scope::Compile),
        ];
        let classification = classify(raw, &ReactorIndex::default(), false);
        assert_eq!(
            rendered(classification.buckets.get(&Scope::Compile)),
            vec!["g:zeta:1", "g:alpha:1"]
        );
    }

    #[test]
    fn composites_are_unions_of_primary_buckets() {
        let raw = vec![
            artifact("c", "1", Scope::Compile),
            artifact("r", "1", Scope::Runtime),
            artifact("t", "1", Scope::Test),
            artifact("p", "1", Scope::Provided),
            artifact("s", "1", Scope::System),
            // same artifact reached through two scopes
            artifact("c", "1", Scope::Runtime),
        ];
        let buckets = classify(raw, &ReactorIndex::default(), true).buckets;
        assert_eq!(
            rendered(&buckets.composite(CompositeScope::Compile)),
            vec!["g:c:1"]
        );
        assert_eq!(
            rendered(&buckets.composite(CompositeScope::Runtime)),
            vec!["g:c:1", "g:r:1"]
        );
        assert_eq!(
            rendered(&buckets.composite(CompositeScope::Test)),
            vec!["g:c:1", "g:p:1", "g:r:1", "g:s:1", "g:t:1"]
        );
    }

    #[test]
    fn classification_is_order_independent() {
        let raw = vec![
            artifact("b", "1", Scope::Compile),
            artifact("a", "1", Scope::Runtime),
            artifact("c", "1", Scope::Test),
        ];
        let mut reversed = raw.clone();
        reversed.reverse();
        let index = ReactorIndex::default();
        assert_eq!(classify(raw, &index, true), classify(reversed, &index, true));
    }
}
