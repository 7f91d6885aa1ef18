//! Session-scoped document store
//!
//! A plain key-value map with typed accessors for the two extracted texts.
//! The key names match what browser clients already keep in storage.

use std::collections::HashMap;

/// Key holding the primary document's extracted text
pub const PRIMARY_TEXT_KEY: &str = "cloudflareText";

/// Key holding the peer document's extracted text
pub const PEER_TEXT_KEY: &str = "peerText";

#[derive(Debug, Default, Clone)]
pub struct DocumentStore {
    entries: HashMap<String, String>,
    /// Bumped on every write so mounted pages can tell they are stale
    generation: u64,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
        self.generation += 1;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Primary text, treating an empty value as absent
    pub fn primary_text(&self) -> Option<&str> {
        self.get(PRIMARY_TEXT_KEY).filter(|t| !t.is_empty())
    }

    /// Peer text, treating an empty value as absent
    pub fn peer_text(&self) -> Option<&str> {
        self.get(PEER_TEXT_KEY).filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_values_count_as_absent() {
        let mut store = DocumentStore::new();
        store.set(PRIMARY_TEXT_KEY, "annual report text");
        store.set(PEER_TEXT_KEY, "");
        assert_eq!(store.primary_text(), Some("annual report text"));
        assert_eq!(store.get(PEER_TEXT_KEY), Some(""));
        assert_eq!(store.peer_text(), None);
    }

    #[test]
    fn test_generation_tracks_writes() {
        let mut store = DocumentStore::new();
        let start = store.generation();
        store.set(PEER_TEXT_KEY, "peer");
        assert_eq!(store.generation(), start + 1);
        store.set(PEER_TEXT_KEY, "");
        assert_eq!(store.generation(), start + 2);
        assert!(store.peer_text().is_none());
    }

    proptest! {
        /// Property: what is written is what is read back
        #[test]
        fn stored_text_round_trips(primary in ".*", peer in ".*") {
            let mut store = DocumentStore::new();
            store.set(PRIMARY_TEXT_KEY, primary.clone());
            store.set(PEER_TEXT_KEY, peer.clone());
            prop_assert_eq!(store.get(PRIMARY_TEXT_KEY), Some(primary.as_str()));
            prop_assert_eq!(store.get(PEER_TEXT_KEY), Some(peer.as_str()));
        }
    }
}
