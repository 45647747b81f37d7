//! Canonical shapes for raw form fields

use crate::models::{FieldBag, FieldValue};

/// Zero-or-more selection as a sequence: absent is empty, a lone value is a
/// one-element sequence, a repeated field stays as submitted.
pub fn into_sequence(value: Option<FieldValue>) -> Vec<String> {
    match value {
        None => Vec::new(),
        Some(FieldValue::Text(value)) => vec![value],
        Some(FieldValue::List(values)) => values,
    }
}

/// Rewrite a multi-valued field of the bag in place so that later rules can
/// work element by element
pub fn normalize_selection(bag: &mut FieldBag, field: &str) {
    let values = into_sequence(bag.take(field));
    bag.insert(field, FieldValue::List(values));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_becomes_empty_sequence() {
        let mut bag = FieldBag::new();
        normalize_selection(&mut bag, "genre");
        assert_eq!(bag.get("genre"), Some(&FieldValue::List(vec![])));
    }

    #[test]
    fn test_scalar_becomes_single_element() {
        let mut bag = FieldBag::new().with("genre", "Fantasy");
        normalize_selection(&mut bag, "genre");
        assert_eq!(bag.get("genre"), Some(&FieldValue::from(vec!["Fantasy"])));
    }

    #[test]
    fn test_list_is_unchanged() {
        let mut bag = FieldBag::new().with("genre", vec!["Fantasy", "Noir"]);
        normalize_selection(&mut bag, "genre");
        assert_eq!(bag.get("genre"), Some(&FieldValue::from(vec!["Fantasy", "Noir"])));
    }

    #[test]
    fn test_other_fields_untouched() {
        let mut bag = FieldBag::new().with("title", "Dune");
        normalize_selection(&mut bag, "genre");
        assert_eq!(bag.text("title"), "Dune");
    }
}
