//! Ancestry diff
//!
//! Splits two leaf-first chains into the part they share from the root down
//! and the two branches below it, for side-by-side display.

use lineage_types::{AncestryDiff, FamilyComparisonResult};

/// Split two leaf-first chains at their divergence point.
///
/// The shared prefix is the longest run of names equal position by position
/// from the root. Output lists read root to leaf and are not padded.
pub fn ancestry_diff(guess_chain: &[String], correct_chain: &[String]) -> AncestryDiff {
    let guess: Vec<&String> = guess_chain.iter().rev().collect();
    let correct: Vec<&String> = correct_chain.iter().rev().collect();

    let shared = guess
        .iter()
        .zip(&correct)
        .take_while(|(g, c)| g == c)
        .count();

    AncestryDiff {
        shared_prefix: guess[..shared].iter().map(|s| s.to_string()).collect(),
        guess_branch: guess[shared..].iter().map(|s| s.to_string()).collect(),
        correct_branch: correct[shared..].iter().map(|s| s.to_string()).collect(),
    }
}

/// Diff the two chains carried by a comparison result.
pub fn diff_result(result: &FamilyComparisonResult) -> AncestryDiff {
    ancestry_diff(&result.guess_ancestry, &result.correct_ancestry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_english_german() {
        let diff = ancestry_diff(
            &names(&["English", "Germanic", "Indo-European"]),
            &names(&["German", "Germanic", "Indo-European"]),
        );
        assert_eq!(diff.shared_prefix, names(&["Indo-European", "Germanic"]));
        assert_eq!(diff.guess_branch, names(&["English"]));
        assert_eq!(diff.correct_branch, names(&["German"]));
        assert_eq!(diff.branch_steps(), 1);
    }

    #[test]
    fn test_uneven_branches_not_padded() {
        let diff = ancestry_diff(
            &names(&["English", "Anglic", "West Germanic", "Germanic", "Indo-European"]),
            &names(&["Swedish", "Germanic", "Indo-European"]),
        );
        assert_eq!(diff.guess_branch, names(&["West Germanic", "Anglic", "English"]));
        assert_eq!(diff.correct_branch, names(&["Swedish"]));
        assert_eq!(diff.branch_steps(), 3);
    }

    #[test]
    fn test_identical_chains_are_siblings_below_100() {
        let chain = names(&["English", "Germanic", "Indo-European"]);
        let diff = ancestry_diff(&chain, &chain);
        assert!(diff.guess_branch.is_empty());
        assert!(diff.correct_branch.is_empty());
        assert!(diff.is_siblings(99));
        assert!(!diff.is_siblings(100));
    }

    #[test]
    fn test_unrelated_chains_share_nothing() {
        let diff = ancestry_diff(
            &names(&["Basque"]),
            &names(&["Mandarin Chinese", "Sino-Tibetan"]),
        );
        assert!(diff.shared_prefix.is_empty());
        assert_eq!(diff.correct_root(), Some("Sino-Tibetan"));
    }

    #[test]
    fn test_diff_result_uses_result_chains() {
        let result = FamilyComparisonResult {
            common_ancestor: Some("Germanic".to_string()),
            distance_score: 50,
            guess_ancestry: names(&["English", "Germanic"]),
            correct_ancestry: names(&["German", "Germanic"]),
        };
        let diff = diff_result(&result);
        assert_eq!(diff.common_ancestor(), Some("Germanic"));
    }

    fn chain() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec("[A-E]", 0..8)
    }

    proptest! {
        #[test]
        fn diff_rebuilds_both_chains(guess in chain(), correct in chain()) {
            let diff = ancestry_diff(&guess, &correct);

            let mut guess_root_first = guess.clone();
            guess_root_first.reverse();
            let mut correct_root_first = correct.clone();
            correct_root_first.reverse();

            prop_assert_eq!(diff.guess_root_first(), guess_root_first);
            prop_assert_eq!(diff.correct_root_first(), correct_root_first);
            prop_assert!(diff.guess_branch.first() != diff.correct_branch.first()
                || diff.guess_branch.is_empty());
        }
    }
}
