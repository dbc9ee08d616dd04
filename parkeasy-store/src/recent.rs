use chrono::Utc;
use serde::Serialize;
use std::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct RecentSearch {
    pub id: String,
    pub query: String,
    pub timestamp: i64,
}

/// Search history: most-recent-first, deduplicated case-insensitively,
/// capped so the list never grows past the configured size.
pub struct RecentSearches {
    entries: RwLock<Vec<RecentSearch>>,
    cap: usize,
}

impl RecentSearches {
    pub fn new(cap: usize) -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            cap,
        }
    }

    pub fn record(&self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }

        let mut entries = self.entries.write().expect("search history lock poisoned");

        // A repeated query moves to the front instead of duplicating
        let lowered = query.to_lowercase();
        entries.retain(|entry| entry.query.to_lowercase() != lowered);

        entries.insert(
            0,
            RecentSearch {
                id: format!("search_{}", Uuid::new_v4().simple()),
                query: query.to_string(),
                timestamp: Utc::now().timestamp_millis(),
            },
        );

        entries.truncate(self.cap);
    }

    pub fn list(&self) -> Vec<RecentSearch> {
        self.entries
            .read()
            .expect("search history lock poisoned")
            .clone()
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .expect("search history lock poisoned")
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeat_queries_move_to_front() {
        let searches = RecentSearches::new(10);

        searches.record("Hitech City");
        searches.record("Banjara Hills");
        searches.record("HITECH CITY");

        let entries = searches.list();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].query, "HITECH CITY");
        assert_eq!(entries[1].query, "Banjara Hills");
    }

    #[test]
    fn test_history_is_capped() {
        let searches = RecentSearches::new(10);

        for i in 0..15 {
            searches.record(&format!("query {}", i));
        }

        let entries = searches.list();
        assert_eq!(entries.len(), 10);
        // Newest survives, oldest fell off
        assert_eq!(entries[0].query, "query 14");
        assert!(entries.iter().all(|e| e.query != "query 0"));
    }

    #[test]
    fn test_blank_queries_are_ignored() {
        let searches = RecentSearches::new(10);
        searches.record("   ");
        assert!(searches.list().is_empty());
    }

    #[test]
    fn test_clear() {
        let searches = RecentSearches::new(10);
        searches.record("Gachibowli");
        searches.clear();
        assert!(searches.list().is_empty());
    }
}
