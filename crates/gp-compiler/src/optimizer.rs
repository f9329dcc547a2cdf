use std::collections::BTreeMap;

use serde::Serialize;

/// Value stored for every domain; only key presence matters.
const PRESENT: u8 = 1;

/// Deduplicated reduced domains, serialized as `{"domain": 1, ...}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DomainSet {
    domains: BTreeMap<String, u8>,
}

impl DomainSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a domain. Returns `false` if it was already present.
    pub fn insert(&mut self, domain: impl Into<String>) -> bool {
        self.domains.insert(domain.into(), PRESENT).is_none()
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.domains.contains_key(domain)
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Domains in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.domains.keys().map(String::as_str)
    }
}

pub struct DomainSetStats {
    pub before: usize,
    pub after: usize,
    pub deduped: usize,
}

pub fn build_domain_set<I, S>(domains: I) -> (DomainSet, DomainSetStats)
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut set = DomainSet::new();
    let mut before = 0usize;
    let mut deduped = 0usize;

    for domain in domains {
        before += 1;
        if !set.insert(domain) {
            deduped += 1;
        }
    }

    let after = set.len();
    log::info!("domain set: {before} -> {after} (dedupe removed {deduped})");

    (set, DomainSetStats { before, after, deduped })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_is_idempotent() {
        let mut once = DomainSet::new();
        once.insert("example.com");

        let mut twice = DomainSet::new();
        assert!(twice.insert("example.com"));
        assert!(!twice.insert("example.com"));

        assert_eq!(once.len(), twice.len());
        assert_eq!(once, twice);
    }

    #[test]
    fn builds_with_stats() {
        let (set, stats) = build_domain_set(["b.com", "a.com", "b.com", "c.org", "a.com"]);

        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["a.com", "b.com", "c.org"]);
        assert_eq!(stats.before, 5);
        assert_eq!(stats.after, 3);
        assert_eq!(stats.deduped, 2);
    }

    #[test]
    fn serializes_as_presence_map() {
        let (set, _) = build_domain_set(["google.com", "co.uk"]);
        let json = serde_json::to_string(&set).expect("domain set should serialize");
        assert_eq!(json, r#"{"co.uk":1,"google.com":1}"#);

        let json = serde_json::to_string(&DomainSet::new()).expect("empty set should serialize");
        assert_eq!(json, "{}");
    }
}
