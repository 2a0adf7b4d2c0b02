mod common;

use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;

use arcmap_map::{SimilarityMatrix, select_matches};
use arcmap_model::{CandidateMatch, DictionaryField};

use common::{categorical, field};

fn dictionary(prefix: &str, categorical_flags: &[bool]) -> Vec<DictionaryField> {
    categorical_flags
        .iter()
        .enumerate()
        .map(|(idx, &is_categorical)| {
            let name = format!("{prefix}{idx}");
            if is_categorical {
                categorical(&name, &name, &[("1", "yes")])
            } else {
                field(&name, &name)
            }
        })
        .collect()
}

fn case() -> impl Strategy<Value = (Vec<bool>, Vec<bool>, Vec<f32>)> {
    (1usize..6, 1usize..6).prop_flat_map(|(rows, cols)| {
        (
            prop::collection::vec(any::<bool>(), rows),
            prop::collection::vec(any::<bool>(), cols),
            prop::collection::vec(0.0f32..1.0, rows * cols),
        )
    })
}

fn pairs(rows: &[CandidateMatch]) -> BTreeSet<(String, String)> {
    rows.iter()
        .map(|r| (r.raw_variable.clone(), r.arc_variable.clone()))
        .collect()
}

proptest! {
    #[test]
    fn at_most_num_matches_per_variable(
        (source_flags, target_flags, values) in case(),
        num_matches in 1usize..4,
        threshold in 0.01f32..1.0,
    ) {
        let source = dictionary("s", &source_flags);
        let target = dictionary("t", &target_flags);
        let matrix = SimilarityMatrix::new(source.len(), target.len(), values).unwrap();
        let rows = select_matches(&source, &target, &matrix, num_matches, threshold).unwrap();

        let mut per_variable: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for row in &rows {
            per_variable.entry(row.raw_variable.as_str()).or_default().push(row.rank);
        }
        for ranks in per_variable.values() {
            prop_assert!(ranks.len() <= num_matches);
            let expected: Vec<usize> = (0..ranks.len()).collect();
            prop_assert_eq!(ranks, &expected);
        }
    }

    #[test]
    fn higher_threshold_prunes_monotonically(
        (source_flags, target_flags, values) in case(),
        num_matches in 1usize..4,
        low in 0.01f32..0.5,
        delta in 0.0f32..0.5,
    ) {
        let source = dictionary("s", &source_flags);
        let target = dictionary("t", &target_flags);
        let matrix = SimilarityMatrix::new(source.len(), target.len(), values).unwrap();

        let loose = select_matches(&source, &target, &matrix, num_matches, low).unwrap();
        let strict = select_matches(&source, &target, &matrix, num_matches, low + delta).unwrap();
        prop_assert!(pairs(&strict).is_subset(&pairs(&loose)));
    }

    #[test]
    fn categorical_sources_never_pair_with_mismatched_types(
        (source_flags, target_flags, values) in case(),
        threshold in 0.01f32..1.0,
    ) {
        let source = dictionary("s", &source_flags);
        let target = dictionary("t", &target_flags);
        let matrix = SimilarityMatrix::new(source.len(), target.len(), values).unwrap();
        let rows = select_matches(&source, &target, &matrix, 5, threshold).unwrap();

        if source_flags.iter().any(|&flag| flag) {
            for row in &rows {
                prop_assert_eq!(row.raw_response.is_some(), row.arc_response.is_some());
            }
        }
        for row in &rows {
            let s: usize = row.raw_variable[1..].parse().unwrap();
            let t: usize = row.arc_variable[1..].parse().unwrap();
            prop_assert!(matrix.get(s, t).unwrap() > threshold);
        }
    }

    #[test]
    fn selection_is_deterministic(
        (source_flags, target_flags, values) in case(),
    ) {
        let source = dictionary("s", &source_flags);
        let target = dictionary("t", &target_flags);
        let matrix = SimilarityMatrix::new(source.len(), target.len(), values).unwrap();
        let first = select_matches(&source, &target, &matrix, 3, 0.2).unwrap();
        let second = select_matches(&source, &target, &matrix, 3, 0.2).unwrap();
        prop_assert_eq!(first, second);
    }
}
