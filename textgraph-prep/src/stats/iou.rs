//! Intersection-over-union of label sets.

use std::collections::BTreeSet;

/// `|A ∩ B| / |A ∪ B|` with duplicates collapsed. Two empty sets score 0.
pub fn label_iou(labels1: &[String], labels2: &[String]) -> f32 {
    let a: BTreeSet<&str> = labels1.iter().map(String::as_str).collect();
    let b: BTreeSet<&str> = labels2.iter().map(String::as_str).collect();
    let union = a.union(&b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(&b).count() as f32 / union as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &[&str]) -> Vec<String> {
        v.iter().map(|x| x.to_string()).collect()
    }

    #[test]
    fn partial_overlap() {
        assert_eq!(label_iou(&s(&["a", "b"]), &s(&["b", "c"])), 1.0 / 3.0);
    }

    #[test]
    fn disjoint_and_identical() {
        assert_eq!(label_iou(&s(&["a"]), &s(&["b"])), 0.0);
        assert_eq!(label_iou(&s(&["a", "a", "b"]), &s(&["b", "a"])), 1.0);
    }

    #[test]
    fn empty_sets_score_zero() {
        assert_eq!(label_iou(&[], &[]), 0.0);
        assert_eq!(label_iou(&s(&["a"]), &[]), 0.0);
    }
}
