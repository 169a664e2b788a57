//! Immutable stop registry.

use std::collections::HashMap;

use crate::domain::{Stop, StopId};

use super::error::LookupError;
use super::normalize::normalize_name;

/// Read-only id → stop lookup, built once from the topology document.
///
/// Carries a secondary index from normalized name to id, used only as a
/// display-name fallback when a configured stop has no explicit friendly
/// name. Polling is always keyed by the authoritative id.
///
/// The registry is never mutated after construction, so it can be shared
/// across polling tasks behind an `Arc` without synchronization.
pub struct StopRegistry {
    stops: HashMap<StopId, Stop>,
    by_name: HashMap<String, StopId>,
}

impl StopRegistry {
    /// Build a registry from parsed stops.
    ///
    /// Duplicate ids overwrite earlier entries (last-parsed-wins); the name
    /// index follows the same rule.
    pub fn build(stops: Vec<Stop>) -> Self {
        let mut by_id = HashMap::with_capacity(stops.len());
        let mut by_name = HashMap::new();

        for stop in stops {
            let key = normalize_name(&stop.name);
            if !key.is_empty() {
                by_name.insert(key, stop.id.clone());
            }
            by_id.insert(stop.id.clone(), stop);
        }

        Self {
            stops: by_id,
            by_name,
        }
    }

    /// Look up a stop by its authoritative id.
    pub fn resolve(&self, id: &StopId) -> Result<&Stop, LookupError> {
        self.stops.get(id).ok_or_else(|| LookupError(id.clone()))
    }

    /// Look up a stop id by normalized name.
    ///
    /// The query is normalized with the same rules as the index, so the
    /// caller may pass a raw display name.
    pub fn resolve_by_name(&self, name: &str) -> Option<&StopId> {
        self.by_name.get(&normalize_name(name))
    }

    /// Search stops whose normalized name contains the normalized query.
    ///
    /// Results are sorted by name for deterministic output. Returns nothing
    /// for an empty query rather than the whole network.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&Stop> {
        let needle = normalize_name(query);
        if needle.is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<&Stop> = self
            .stops
            .values()
            .filter(|s| normalize_name(&s.name).contains(&needle))
            .collect();

        matches.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        matches.truncate(limit);
        matches
    }

    /// Number of stops in the registry.
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop(id: &str, name: &str) -> Stop {
        Stop {
            id: StopId::parse(id).unwrap(),
            name: name.to_string(),
        }
    }

    #[test]
    fn resolve_known_stop() {
        let registry = StopRegistry::build(vec![stop("STOP:1", "Gare de l'Est")]);
        let found = registry.resolve(&StopId::parse("STOP:1").unwrap()).unwrap();
        assert_eq!(found.name, "Gare de l'Est");
    }

    #[test]
    fn resolve_unknown_stop_is_error() {
        let registry = StopRegistry::build(vec![stop("STOP:1", "Gare de l'Est")]);
        let missing = StopId::parse("STOP:404").unwrap();
        assert_eq!(
            registry.resolve(&missing),
            Err(LookupError(missing.clone()))
        );
    }

    #[test]
    fn one_entry_per_distinct_id() {
        let registry = StopRegistry::build(vec![
            stop("STOP:1", "Gare"),
            stop("STOP:2", "Mairie"),
            stop("STOP:3", "Plage"),
        ]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn duplicate_id_last_wins() {
        let registry = StopRegistry::build(vec![
            stop("STOP:1", "Old Name"),
            stop("STOP:1", "New Name"),
        ]);
        assert_eq!(registry.len(), 1);
        let found = registry.resolve(&StopId::parse("STOP:1").unwrap()).unwrap();
        assert_eq!(found.name, "New Name");
    }

    #[test]
    fn name_lookup_is_case_and_diacritic_insensitive() {
        let registry = StopRegistry::build(vec![stop("STOP:1", "Gare de l'Est")]);

        let id = StopId::parse("STOP:1").unwrap();
        assert_eq!(registry.resolve_by_name("gare de l est"), Some(&id));
        assert_eq!(registry.resolve_by_name("GARE DE L'EST"), Some(&id));
        assert_eq!(registry.resolve_by_name("Mairie"), None);
    }

    #[test]
    fn search_matches_substrings() {
        let registry = StopRegistry::build(vec![
            stop("STOP:1", "Gare de l'Est"),
            stop("STOP:2", "Gare du Nord"),
            stop("STOP:3", "Mairie"),
        ]);

        let results = registry.search("gare", 10);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].name, "Gare de l'Est");
        assert_eq!(results[1].name, "Gare du Nord");

        assert!(registry.search("", 10).is_empty());
        assert_eq!(registry.search("gare", 1).len(), 1);
    }

    #[test]
    fn search_is_diacritic_insensitive() {
        let registry = StopRegistry::build(vec![stop("STOP:1", "Place des Fêtes")]);
        assert_eq!(registry.search("fetes", 10).len(), 1);
        assert_eq!(registry.search("Fêtes", 10).len(), 1);
    }
}
