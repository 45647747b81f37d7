//! Marks which reference candidates were chosen, for checkbox and selector
//! re-rendering

use std::collections::HashSet;

use serde::Serialize;

use super::validation::parse_identity;
use crate::models::Record;

/// A candidate with its selection state. Serializes as the candidate's own
/// fields plus `checked`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selectable<T> {
    #[serde(flatten)]
    pub item: T,
    pub checked: bool,
}

/// Mark each candidate whose identity is among `chosen`. Candidate order is
/// kept.
pub fn annotate<T: Record>(candidates: Vec<T>, chosen: &[i32]) -> Vec<Selectable<T>> {
    let chosen: HashSet<i32> = chosen.iter().copied().collect();
    candidates
        .into_iter()
        .map(|item| {
            let checked = chosen.contains(&item.id());
            Selectable { item, checked }
        })
        .collect()
}

/// Identities from submitted text values. Values that are not identities
/// cannot match any candidate and are skipped.
pub fn chosen_ids<S: AsRef<str>>(values: &[S]) -> Vec<i32> {
    values
        .iter()
        .filter_map(|value| parse_identity(value.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Genre;

    fn genre(id: i32, name: &str) -> Genre {
        Genre {
            id,
            name: name.to_string(),
        }
    }

    fn checked_names(selection: &[Selectable<Genre>]) -> Vec<&str> {
        selection
            .iter()
            .filter(|s| s.checked)
            .map(|s| s.item.name.as_str())
            .collect()
    }

    #[test]
    fn test_only_chosen_candidate_is_checked() {
        let candidates = vec![genre(1, "A"), genre(2, "B"), genre(3, "C")];

        let selection = annotate(candidates, &[2]);

        assert_eq!(selection.len(), 3);
        assert_eq!(checked_names(&selection), vec!["B"]);
        let order: Vec<_> = selection.iter().map(|s| s.item.id).collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn test_stable_under_reordering() {
        let forward = annotate(vec![genre(1, "A"), genre(2, "B"), genre(3, "C")], &[3, 2]);
        let backward = annotate(vec![genre(3, "C"), genre(2, "B"), genre(1, "A")], &[2, 3]);

        assert_eq!(checked_names(&forward), vec!["B", "C"]);
        assert_eq!(checked_names(&backward), vec!["C", "B"]);
    }

    #[test]
    fn test_nothing_chosen() {
        let selection = annotate(vec![genre(1, "A")], &[]);
        assert!(!selection[0].checked);
    }

    #[test]
    fn test_chosen_ids_skip_garbage() {
        assert_eq!(chosen_ids(&["2", "x", "5"][..]), vec![2, 5]);
    }

    #[test]
    fn test_serializes_flat() {
        let selection = annotate(vec![genre(1, "Poetry")], &[1]);
        let json = serde_json::to_value(&selection[0]).unwrap();
        assert_eq!(json, serde_json::json!({"id": 1, "name": "Poetry", "checked": true}));
    }
}
