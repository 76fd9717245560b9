//! Client-side output filters for listed resources

use serde_json::Value;

use crate::domain::entities::field_str;

/// How a field value is compared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchRule {
    Exact(String),
    Prefix(String),
    Suffix(String),
    /// Case-insensitive substring
    Like(String),
}

impl MatchRule {
    fn matches(&self, candidate: &str) -> bool {
        match self {
            MatchRule::Exact(s) => candidate == s,
            MatchRule::Prefix(s) => candidate.starts_with(s.as_str()),
            MatchRule::Suffix(s) => candidate.ends_with(s.as_str()),
            MatchRule::Like(s) => candidate.to_lowercase().contains(&s.to_lowercase()),
        }
    }
}

/// Filter on one string field of listed items (`name`, `id`).
///
/// An item passes when every rule matches; a filter without rules passes
/// everything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFilter {
    field: &'static str,
    rules: Vec<MatchRule>,
}

impl FieldFilter {
    pub fn new(field: &'static str) -> Self {
        Self {
            field,
            rules: Vec::new(),
        }
    }

    pub fn with_rule(mut self, rule: MatchRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn matches(&self, item: &Value) -> bool {
        if self.rules.is_empty() {
            return true;
        }
        match field_str(item, self.field) {
            Some(value) => self.rules.iter().all(|r| r.matches(value)),
            None => false,
        }
    }

    pub fn apply(&self, items: Vec<Value>) -> Vec<Value> {
        items.into_iter().filter(|i| self.matches(i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn given_like_rule_when_matching_then_ignores_case() {
        let f = FieldFilter::new("name").with_rule(MatchRule::Like("PROD".into()));
        assert!(f.matches(&json!({"name": "net-prod-1"})));
        assert!(!f.matches(&json!({"name": "net-dev-1"})));
    }

    #[test]
    fn given_prefix_and_suffix_when_matching_then_both_must_hold() {
        let f = FieldFilter::new("id")
            .with_rule(MatchRule::Prefix("ab".into()))
            .with_rule(MatchRule::Suffix("yz".into()));
        assert!(f.matches(&json!({"id": "ab-xyz"})));
        assert!(!f.matches(&json!({"id": "ab-xy"})));
        assert!(!f.matches(&json!({"name": "ab-xyz"})));
    }
}
