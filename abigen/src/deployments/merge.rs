use abigen_types::DeploymentsPerAddress;
use indexmap::IndexSet;

/// Task ids split by whether every manifest has them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedIds {
    /// Ids present in every manifest, in the first manifest's order.
    pub required: Vec<String>,
    /// Ids present in some manifests only, in first-seen order.
    pub optional: Vec<String>,
}

impl MergedIds {
    pub fn is_empty(&self) -> bool {
        self.required.is_empty() && self.optional.is_empty()
    }

    /// Keeps only the ids `keep` accepts and returns the others.
    pub fn retain(&mut self, keep: impl Fn(&str) -> bool) -> Vec<String> {
        let mut removed = Vec::new();
        for ids in [&mut self.required, &mut self.optional] {
            ids.retain(|id| {
                let kept = keep(id.as_str());
                if !kept {
                    removed.push(id.clone());
                }
                kept
            });
        }
        removed
    }

    /// Required ids followed by optional ids.
    pub fn all(&self) -> impl Iterator<Item = &str> + '_ {
        self.required
            .iter()
            .chain(&self.optional)
            .map(String::as_str)
    }
}

/// Partitions the union of `sets` into required and optional ids.
///
/// The first set is the reference: required ids keep its order, and an id missing
/// only from it is optional like any other id not present everywhere.
pub fn merge<S: AsRef<str>>(sets: &[Vec<S>]) -> MergedIds {
    let Some((first, rest)) = sets.split_first() else {
        return MergedIds::default();
    };
    let in_every_other = |id: &str| {
        rest.iter()
            .all(|set| set.iter().any(|other| other.as_ref() == id))
    };
    let required = first
        .iter()
        .map(AsRef::as_ref)
        .filter(|id| in_every_other(*id))
        .collect::<IndexSet<&str>>();
    let optional = sets
        .iter()
        .flatten()
        .map(AsRef::as_ref)
        .collect::<IndexSet<&str>>()
        .into_iter()
        .filter(|id| !required.contains(id))
        .map(str::to_string)
        .collect();
    MergedIds {
        required: required.into_iter().map(str::to_string).collect(),
        optional,
    }
}

/// The merged shape of every manifest, contracts and scripts partitioned apart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploymentSchema {
    pub contracts: MergedIds,
    pub scripts: MergedIds,
}

impl DeploymentSchema {
    pub fn from_manifests(manifests: &[&DeploymentsPerAddress]) -> Self {
        let contracts = manifests
            .iter()
            .map(|manifest| manifest.contracts.keys().collect::<Vec<_>>())
            .collect::<Vec<_>>();
        let scripts = manifests
            .iter()
            .map(|manifest| manifest.scripts.keys().collect::<Vec<_>>())
            .collect::<Vec<_>>();
        Self {
            contracts: merge(&contracts),
            scripts: merge(&scripts),
        }
    }

    pub fn has_scripts(&self) -> bool {
        !self.scripts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ids(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn no_manifests_no_ids() {
        let sets: Vec<Vec<&str>> = vec![];
        assert_eq!(merge(&sets), MergedIds::default());
    }

    #[test]
    fn single_manifest_is_all_required() {
        let merged = merge(&[vec!["B", "A"]]);
        assert_eq!(merged.required, ids(&["B", "A"]));
        assert!(merged.optional.is_empty());
    }

    #[test]
    fn common_ids_are_required() {
        let merged = merge(&[vec!["A", "B", "C"], vec!["A", "B"], vec!["A", "C"]]);
        assert_eq!(merged.required, ids(&["A"]));
        assert_eq!(merged.optional, ids(&["B", "C"]));
        assert_eq!(merged.all().collect::<Vec<_>>(), vec!["A", "B", "C"]);
    }

    #[test]
    fn id_missing_only_from_first_manifest_is_optional() {
        let merged = merge(&[vec!["A"], vec!["A", "D"], vec!["D", "A"]]);
        assert_eq!(merged.required, ids(&["A"]));
        assert_eq!(merged.optional, ids(&["D"]));
    }

    #[test]
    fn partitions_cover_the_union_disjointly() {
        let sets = vec![vec!["X", "Y"], vec!["Y", "Z"], vec!["Y"]];
        let merged = merge(&sets);
        let union = sets.iter().flatten().copied().collect::<IndexSet<_>>();
        let all = merged.all().collect::<IndexSet<_>>();
        assert_eq!(all, union);
        assert!(merged.required.iter().all(|id| !merged.optional.contains(id)));
        assert_eq!(merged.required, ids(&["Y"]));
    }

    #[test]
    fn retain_reports_removed_ids() {
        let mut merged = merge(&[vec!["A", "B:x", "C"], vec!["A", "C"]]);
        let removed = merged.retain(|id| !id.starts_with('B') && id != "C");
        assert_eq!(removed, ids(&["C", "B:x"]));
        assert_eq!(merged.required, ids(&["A"]));
        assert!(merged.optional.is_empty());
    }
}
