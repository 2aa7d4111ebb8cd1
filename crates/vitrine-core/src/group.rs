//! Group view: several sources of the same product collapsed into one set.
//!
//! The storefront shows one artifact per output dimension for a product.
//! Which source backs each dimension is a caller choice held in
//! [`Favorites`]; the pipeline itself stays stateless.

use std::collections::HashMap;

use crate::batch::{Artifact, ArtifactSet};

/// Name given to a group set when the caller has none.
pub const DEFAULT_GROUP_NAME: &str = "Product group";

/// Caller-held choice of source per output dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Favorites {
    by_dimension: HashMap<(u32, u32), usize>,
}

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick `source_index` for artifacts of `width x height`, replacing any
    /// previous choice.
    pub fn set(&mut self, width: u32, height: u32, source_index: usize) {
        self.by_dimension.insert((width, height), source_index);
    }

    pub fn get(&self, width: u32, height: u32) -> Option<usize> {
        self.by_dimension.get(&(width, height)).copied()
    }

    /// Forget the choice for one dimension.
    pub fn unset(&mut self, width: u32, height: u32) -> Option<usize> {
        self.by_dimension.remove(&(width, height))
    }

    pub fn is_empty(&self) -> bool {
        self.by_dimension.is_empty()
    }
}

impl FromIterator<((u32, u32), usize)> for Favorites {
    fn from_iter<I: IntoIterator<Item = ((u32, u32), usize)>>(iter: I) -> Self {
        Self {
            by_dimension: iter.into_iter().collect(),
        }
    }
}

/// Merge finished per-source sets into a single set named `name`.
///
/// Artifacts are deduplicated by `(width, height)`, dimensions keep their
/// order of first appearance. For each dimension the favorite source's
/// artifact is kept when one is set and that source produced it; otherwise
/// the last artifact seen wins. Failures of every set are carried over.
///
/// Only call this once every contributing set is complete.
pub fn group_sets(sets: Vec<ArtifactSet>, favorites: &Favorites, name: &str) -> ArtifactSet {
    let mut source_indices = Vec::new();
    let mut failures = Vec::new();
    let mut order: Vec<(u32, u32)> = Vec::new();
    let mut chosen: HashMap<(u32, u32), Artifact> = HashMap::new();

    for set in sets {
        for index in set.source_indices {
            if !source_indices.contains(&index) {
                source_indices.push(index);
            }
        }
        failures.extend(set.failures);

        for artifact in set.artifacts {
            let dims = artifact.dimensions();
            let favorite = favorites.get(dims.0, dims.1);

            match chosen.get(&dims) {
                None => order.push(dims),
                // A favorite already in place is never displaced
                Some(current) if favorite == Some(current.source_index) => continue,
                Some(_) => {}
            }
            chosen.insert(dims, artifact);
        }
    }

    let artifacts: Vec<Artifact> = order
        .iter()
        .filter_map(|dims| chosen.remove(dims))
        .collect();

    log::debug!(
        "grouped {} sources into {:?}: {} artifacts, {} failures",
        source_indices.len(),
        name,
        artifacts.len(),
        failures.len()
    );

    ArtifactSet {
        name: name.to_string(),
        source_indices,
        artifacts,
        failures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::{TargetSpec, UnitFailure};
    use crate::composite::Strategy;
    use crate::encode::OutputFormat;
    use crate::error::PipelineError;

    fn artifact(source_index: usize, width: u32, height: u32) -> Artifact {
        Artifact {
            file_name: format!("processed_{}x{}_src{}.jpg", width, height, source_index),
            format: OutputFormat::Jpeg,
            bytes: vec![source_index as u8; 4],
            width,
            height,
            source_index,
            strategy: Strategy::CoverCrop,
            quality: Some(95),
            within_budget: true,
        }
    }

    fn set(source_index: usize, dims: &[(u32, u32)]) -> ArtifactSet {
        ArtifactSet {
            name: format!("src{}.jpg", source_index),
            source_indices: vec![source_index],
            artifacts: dims
                .iter()
                .map(|&(w, h)| artifact(source_index, w, h))
                .collect(),
            failures: Vec::new(),
        }
    }

    fn summary(group: &ArtifactSet) -> Vec<(u32, u32, usize)> {
        group
            .artifacts
            .iter()
            .map(|a| (a.width, a.height, a.source_index))
            .collect()
    }

    const STANDARD: [(u32, u32); 2] = [(2000, 2000), (1300, 2000)];

    #[test]
    fn test_last_seen_wins_without_favorites() {
        let sets = vec![set(0, &STANDARD), set(1, &STANDARD), set(2, &STANDARD)];
        let group = group_sets(sets, &Favorites::new(), DEFAULT_GROUP_NAME);

        assert_eq!(group.name, "Product group");
        assert_eq!(group.source_indices, vec![0, 1, 2]);
        assert_eq!(
            summary(&group),
            vec![(2000, 2000, 2), (1300, 2000, 2)]
        );
    }

    #[test]
    fn test_favorite_wins_regardless_of_position() {
        let mut favorites = Favorites::new();
        favorites.set(1300, 2000, 0);
        favorites.set(2000, 2000, 1);

        let sets = vec![set(0, &STANDARD), set(1, &STANDARD), set(2, &STANDARD)];
        let group = group_sets(sets, &favorites, "Dress");

        assert_eq!(
            summary(&group),
            vec![(2000, 2000, 1), (1300, 2000, 0)]
        );
    }

    #[test]
    fn test_missing_favorite_falls_back_to_last_seen() {
        let mut favorites = Favorites::new();
        // Source 5 is not part of this group
        favorites.set(2000, 2000, 5);

        let sets = vec![set(0, &STANDARD), set(1, &STANDARD)];
        let group = group_sets(sets, &favorites, DEFAULT_GROUP_NAME);
        assert_eq!(
            summary(&group),
            vec![(2000, 2000, 1), (1300, 2000, 1)]
        );
    }

    #[test]
    fn test_dimension_order_is_first_appearance() {
        let sets = vec![
            set(0, &[(1300, 2000)]),
            set(1, &[(800, 800), (1300, 2000)]),
            set(2, &[(2000, 2000), (800, 800)]),
        ];
        let group = group_sets(sets, &Favorites::new(), DEFAULT_GROUP_NAME);
        assert_eq!(
            summary(&group),
            vec![(1300, 2000, 1), (800, 800, 2), (2000, 2000, 2)]
        );
    }

    #[test]
    fn test_failures_are_carried_over() {
        let mut broken = set(1, &[(1300, 2000)]);
        broken.failures.push(UnitFailure {
            source_index: 1,
            target: Some(TargetSpec::hero(2000, 2000)),
            error: PipelineError::MalformedRaster {
                expected: 12,
                actual: 3,
            },
        });

        let group = group_sets(
            vec![set(0, &STANDARD), broken],
            &Favorites::new(),
            DEFAULT_GROUP_NAME,
        );
        assert_eq!(group.failures.len(), 1);
        assert_eq!(group.failures[0].source_index, 1);
        assert_eq!(group.artifacts.len(), 2);
        assert!(!group.is_complete());
    }

    #[test]
    fn test_empty_input() {
        let group = group_sets(Vec::new(), &Favorites::new(), "Empty");
        assert_eq!(group.name, "Empty");
        assert!(group.source_indices.is_empty());
        assert!(group.artifacts.is_empty());
    }

    #[test]
    fn test_favorites_editing() {
        let mut favorites: Favorites = [((2000, 2000), 3)].into_iter().collect();
        assert_eq!(favorites.get(2000, 2000), Some(3));

        favorites.set(2000, 2000, 4);
        assert_eq!(favorites.get(2000, 2000), Some(4));
        assert_eq!(favorites.unset(2000, 2000), Some(4));
        assert!(favorites.is_empty());
    }
}
