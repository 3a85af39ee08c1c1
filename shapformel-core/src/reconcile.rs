//! Intersection of the attribution ranking with the sufficient reason.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A feature that is both highly ranked and part of the sufficient reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplainedFeature {
    pub name: String,
    pub literal: String,
}

/// Explained features in attribution rank order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReconciledExplanation {
    features: Vec<ExplainedFeature>,
}

impl ReconciledExplanation {
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.features.iter().any(|f| f.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.features
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.literal.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExplainedFeature> {
        self.features.iter()
    }

    /// Feature names, in rank order.
    pub fn names(&self) -> Vec<String> {
        self.features.iter().map(|f| f.name.clone()).collect()
    }

    /// Unordered view, usable as the sufficient-reason side of [`reconcile`].
    pub fn to_map(&self) -> HashMap<String, String> {
        self.features
            .iter()
            .map(|f| (f.name.clone(), f.literal.clone()))
            .collect()
    }
}

impl<'a> IntoIterator for &'a ReconciledExplanation {
    type Item = &'a ExplainedFeature;
    type IntoIter = std::slice::Iter<'a, ExplainedFeature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.iter()
    }
}

/// Keep the top features that also appear in the sufficient reason, in
/// `top_features` order.
pub fn reconcile(
    sufficient: &HashMap<String, String>,
    top_features: &[String],
) -> ReconciledExplanation {
    let mut features: Vec<ExplainedFeature> = Vec::new();
    for name in top_features {
        if features.iter().any(|f| &f.name == name) {
            continue;
        }
        if let Some(literal) = sufficient.get(name) {
            features.push(ExplainedFeature {
                name: name.clone(),
                literal: literal.clone(),
            });
        }
    }
    ReconciledExplanation { features }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_reconcile_keeps_rank_order() {
        let sufficient = map(&[("SEXE", "SEXE == 0"), ("AGE", "AGE > 45"), ("CSP", "CSP == 2")]);
        let top = names(&["AGE", "IMC", "SEXE"]);
        let result = reconcile(&sufficient, &top);
        assert_eq!(result.names(), vec!["AGE", "SEXE"]);
        assert_eq!(result.get("AGE"), Some("AGE > 45"));
        assert!(!result.contains("CSP"));
    }

    #[test]
    fn test_reconcile_empty_inputs() {
        assert!(reconcile(&HashMap::new(), &names(&["AGE"])).is_empty());
        assert!(reconcile(&map(&[("AGE", "AGE > 1")]), &[]).is_empty());
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let first = reconcile(
            &map(&[("b", "b < 1"), ("a", "a > 2")]),
            &names(&["a", "c", "b"]),
        );
        let again = reconcile(&first.to_map(), &first.names());
        assert_eq!(again, first);
    }

    #[test]
    fn test_serializes_as_list() {
        let result = reconcile(&map(&[("a", "a > 2")]), &names(&["a"]));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json, serde_json::json!([{"name": "a", "literal": "a > 2"}]));
    }
}
