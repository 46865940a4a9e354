//! Retention policy rules and family matching

use regex::Regex;
use std::collections::HashSet;
use std::fmt;

use crate::{Error, Result};

/// Family name pattern supporting a single wildcard token (`*`).
///
/// `*` matches any sequence of characters, every other character matches
/// literally, and the pattern is anchored on both ends.
#[derive(Debug, Clone)]
pub struct FamilyPattern {
    raw: String,
    regex: Regex,
}

impl FamilyPattern {
    pub fn new(pattern: &str) -> Result<Self> {
        if pattern.is_empty() {
            return Err(Error::EmptyPattern);
        }

        let body = pattern
            .split('*')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");

        let regex = Regex::new(&format!("(?s)^{body}$")).map_err(|source| Error::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(Self {
            raw: pattern.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn matches(&self, family: &str) -> bool {
        self.regex.is_match(family)
    }
}

impl fmt::Display for FamilyPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// A single retention rule: which families, and how many active revisions to keep
#[derive(Debug, Clone)]
pub struct PolicyRule {
    pub pattern: FamilyPattern,
    pub keep_count: usize,
}

impl PolicyRule {
    pub fn new(pattern: &str, keep_count: usize) -> Result<Self> {
        Ok(Self {
            pattern: FamilyPattern::new(pattern)?,
            keep_count,
        })
    }
}

/// Selects families for each rule of a run, first match wins.
///
/// A family claimed by an earlier rule is never emitted again.
#[derive(Debug, Default)]
pub struct FamilyMatcher {
    claimed: HashSet<String>,
}

impl FamilyMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Families matching `pattern` in platform order, skipping already claimed ones
    pub fn select(&mut self, pattern: &FamilyPattern, families: &[String]) -> Vec<String> {
        let mut selected = Vec::new();

        for family in families {
            if !pattern.matches(family) {
                continue;
            }
            if self.claimed.insert(family.clone()) {
                selected.push(family.clone());
            }
        }

        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn families(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_wildcard_is_anchored() {
        let pattern = FamilyPattern::new("svc-*").unwrap();

        assert!(pattern.matches("svc-api"));
        assert!(pattern.matches("svc-"));
        assert!(!pattern.matches("other-svc-api"));
        assert!(!pattern.matches("svc"));
    }

    #[test]
    fn test_exact_pattern() {
        let pattern = FamilyPattern::new("svc-api").unwrap();

        assert!(pattern.matches("svc-api"));
        assert!(!pattern.matches("svc-api-v2"));
        assert!(!pattern.matches("my-svc-api"));
        assert!(!pattern.matches("SVC-API"));
    }

    #[test]
    fn test_wildcard_in_middle_and_multiple() {
        let pattern = FamilyPattern::new("app-*-worker").unwrap();
        assert!(pattern.matches("app-billing-worker"));
        assert!(pattern.matches("app--worker"));
        assert!(!pattern.matches("app-billing-worker-2"));

        let pattern = FamilyPattern::new("*").unwrap();
        assert!(pattern.matches("anything"));
        assert!(pattern.matches(""));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let pattern = FamilyPattern::new("web.app").unwrap();
        assert!(pattern.matches("web.app"));
        assert!(!pattern.matches("webXapp"));

        let pattern = FamilyPattern::new("a+(b)*").unwrap();
        assert!(pattern.matches("a+(b)-anything"));
        assert!(!pattern.matches("aa(b)"));
    }

    #[test]
    fn test_empty_pattern_rejected() {
        assert!(matches!(FamilyPattern::new(""), Err(Error::EmptyPattern)));
    }

    #[test]
    fn test_select_preserves_platform_order() {
        let mut matcher = FamilyMatcher::new();
        let all = families(&["web-b", "api", "web-a", "web-c"]);
        let pattern = FamilyPattern::new("web-*").unwrap();

        assert_eq!(matcher.select(&pattern, &all), families(&["web-b", "web-a", "web-c"]));
    }

    #[test]
    fn test_first_rule_wins() {
        let mut matcher = FamilyMatcher::new();
        let all = families(&["web-app", "web-admin", "worker"]);

        let first = matcher.select(&FamilyPattern::new("web-app").unwrap(), &all);
        let second = matcher.select(&FamilyPattern::new("w*").unwrap(), &all);

        assert_eq!(first, families(&["web-app"]));
        assert_eq!(second, families(&["web-admin", "worker"]));
    }

    #[test]
    fn test_duplicate_platform_entries_emitted_once() {
        let mut matcher = FamilyMatcher::new();
        let all = families(&["web-app", "web-app"]);
        let pattern = FamilyPattern::new("web-*").unwrap();

        assert_eq!(matcher.select(&pattern, &all), families(&["web-app"]));
    }
}
