//! Event storage.
//!
//! [`EventStore`] is the interface the surrounding relay engine consumes.
//! Implementations must be thread-safe and handle concurrent access; the
//! trait is fallible throughout so that persistent backends (SQLite,
//! Postgres) can surface their own failure modes without changing the
//! contract.
//!
//! [`MemoryStore`] is the in-memory implementation: a single mutex over a
//! map from event id to event. Queries snapshot the matching set while
//! holding the lock and release it before handing results to the caller,
//! so a slow or abandoning consumer can never block writers.

use crate::error::{RelayError, Result};
use crate::event::Event;
use crate::filter::Filter;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

/// Storage interface for relay events.
pub trait EventStore: Send + Sync {
    /// Store an event, overwriting any previous event with the same id.
    fn insert(&self, event: &Event) -> Result<()>;

    /// Delete an event by id.
    ///
    /// Returns `Ok(true)` if the event was deleted, `Ok(false)` if no
    /// event with that id existed. An absent id is not an error.
    fn delete(&self, id: &str) -> Result<bool>;

    /// Query events matching a filter.
    ///
    /// Results are a point-in-time snapshot ordered newest first and
    /// truncated to the filter's `limit`.
    fn query(&self, filter: &Filter) -> Result<QueryResults>;

    /// Get a single event by id.
    fn get(&self, id: &str) -> Result<Option<Event>>;

    /// Count events matching a filter (ignores `limit`).
    fn count(&self, filter: &Filter) -> Result<usize>;

    /// Check if an event exists.
    fn has(&self, id: &str) -> Result<bool> {
        Ok(self.get(id)?.is_some())
    }
}

/// Lazy, finite iterator over a query snapshot.
///
/// The snapshot is taken under the store lock; iteration happens after the
/// lock is released, so it is safe to consume slowly or abandon early.
/// The iterator is not restartable.
#[derive(Debug)]
pub struct QueryResults {
    inner: std::vec::IntoIter<Event>,
}

impl QueryResults {
    fn new(events: Vec<Event>) -> Self {
        Self {
            inner: events.into_iter(),
        }
    }

    /// Number of events remaining in the snapshot.
    pub fn remaining(&self) -> usize {
        self.inner.len()
    }
}

impl Iterator for QueryResults {
    type Item = Event;

    fn next(&mut self) -> Option<Event> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for QueryResults {}

/// In-memory event store: one mutex over an id -> event map.
///
/// The simplest correct design at this scale. All operations take the
/// lock; `query` holds it only while copying the matching set.
#[derive(Debug, Default)]
pub struct MemoryStore {
    events: Mutex<HashMap<String, Event>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored events.
    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Event>>> {
        self.events
            .lock()
            .map_err(|_| RelayError::Store("event map mutex poisoned".to_string()))
    }
}

impl EventStore for MemoryStore {
    fn insert(&self, event: &Event) -> Result<()> {
        self.lock()?.insert(event.id.clone(), event.clone());
        debug!(event_id = %event.id, kind = event.kind, "stored event");
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<bool> {
        let removed = self.lock()?.remove(id).is_some();
        if removed {
            debug!(event_id = %id, "deleted event");
        }
        Ok(removed)
    }

    fn query(&self, filter: &Filter) -> Result<QueryResults> {
        filter.validate()?;

        // Copy the matching set under the lock, then release it before
        // the caller starts consuming. Holding the lock across the
        // hand-off would let one slow reader starve every writer.
        let mut matched: Vec<Event> = {
            let events = self.lock()?;
            events
                .values()
                .filter(|event| filter.matches(event))
                .cloned()
                .collect()
        };

        // Newest first; id breaks ties so each snapshot has one order.
        matched.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        if let Some(limit) = filter.limit {
            matched.truncate(limit);
        }

        Ok(QueryResults::new(matched))
    }

    fn get(&self, id: &str) -> Result<Option<Event>> {
        Ok(self.lock()?.get(id).cloned())
    }

    fn count(&self, filter: &Filter) -> Result<usize> {
        let events = self.lock()?;
        Ok(events.values().filter(|event| filter.matches(event)).count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_event(id: &str, kind: u16, created_at: u64) -> Event {
        Event {
            id: id.to_string(),
            pubkey: "pk".to_string(),
            created_at,
            kind,
            tags: vec![],
            content: "test".to_string(),
            sig: "sig".to_string(),
        }
    }

    #[test]
    fn test_insert_and_get() {
        let store = MemoryStore::new();
        let event = make_event("e1", 1, 1000);

        store.insert(&event).unwrap();

        let got = store.get("e1").unwrap();
        assert_eq!(got, Some(event));
        assert!(store.has("e1").unwrap());
        assert!(!store.has("missing").unwrap());
    }

    #[test]
    fn test_insert_overwrites_same_id() {
        let store = MemoryStore::new();
        store.insert(&make_event("e1", 1, 1000)).unwrap();

        let mut replacement = make_event("e1", 1, 1000);
        replacement.content = "edited".to_string();
        store.insert(&replacement).unwrap();

        assert_eq!(store.len().unwrap(), 1);
        assert_eq!(store.get("e1").unwrap().unwrap().content, "edited");
    }

    #[test]
    fn test_reinsert_is_idempotent() {
        let store = MemoryStore::new();
        let event = make_event("e1", 1, 1000);

        store.insert(&event).unwrap();
        store.insert(&event).unwrap();

        assert_eq!(store.len().unwrap(), 1);
        assert_eq!(store.get("e1").unwrap(), Some(event));
    }

    #[test]
    fn test_delete() {
        let store = MemoryStore::new();
        store.insert(&make_event("e1", 1, 1000)).unwrap();

        assert!(store.delete("e1").unwrap());
        assert!(store.get("e1").unwrap().is_none());

        // Absent id is a no-op, not an error.
        assert!(!store.delete("e1").unwrap());
    }

    #[test]
    fn test_deleted_event_never_queried() {
        let store = MemoryStore::new();
        store.insert(&make_event("e1", 1, 1000)).unwrap();
        store.insert(&make_event("e2", 1, 1001)).unwrap();
        store.delete("e1").unwrap();

        let ids: Vec<String> = store
            .query(&Filter::new())
            .unwrap()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec!["e2".to_string()]);
    }

    #[test]
    fn test_empty_filter_returns_everything() {
        let store = MemoryStore::new();
        for i in 0..5 {
            store.insert(&make_event(&format!("e{}", i), 1, i)).unwrap();
        }

        let results: Vec<Event> = store.query(&Filter::new()).unwrap().collect();
        assert_eq!(results.len(), 5);
    }

    #[test]
    fn test_query_matches_filter() {
        let store = MemoryStore::new();
        store.insert(&make_event("e1", 1, 1000)).unwrap();
        store.insert(&make_event("e2", 7, 1000)).unwrap();

        let results: Vec<Event> = store.query(&Filter::new().kinds([7])).unwrap().collect();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "e2");
    }

    #[test]
    fn test_query_newest_first_with_limit() {
        let store = MemoryStore::new();
        for i in 0..10 {
            store
                .insert(&make_event(&format!("e{}", i), 1, 1000 + i))
                .unwrap();
        }

        let results: Vec<Event> = store
            .query(&Filter::new().limit(3))
            .unwrap()
            .collect();

        let timestamps: Vec<u64> = results.iter().map(|e| e.created_at).collect();
        assert_eq!(timestamps, vec![1009, 1008, 1007]);
    }

    #[test]
    fn test_query_rejects_invalid_filter() {
        let store = MemoryStore::new();
        let result = store.query(&Filter::new().limit(100_000));
        assert!(matches!(result, Err(RelayError::Filter(_))));
    }

    #[test]
    fn test_query_is_a_snapshot() {
        let store = MemoryStore::new();
        store.insert(&make_event("e1", 1, 1000)).unwrap();

        let results = store.query(&Filter::new()).unwrap();

        // Mutations after the snapshot must not appear mid-iteration.
        store.insert(&make_event("e2", 1, 1001)).unwrap();
        store.delete("e1").unwrap();

        let ids: Vec<String> = results.map(|e| e.id).collect();
        assert_eq!(ids, vec!["e1".to_string()]);
    }

    #[test]
    fn test_abandoned_query_does_not_block_writes() {
        let store = MemoryStore::new();
        for i in 0..100 {
            store.insert(&make_event(&format!("e{}", i), 1, i)).unwrap();
        }

        let mut results = store.query(&Filter::new()).unwrap();
        let _first = results.next();
        drop(results);

        store.insert(&make_event("late", 1, 5000)).unwrap();
        assert_eq!(store.len().unwrap(), 101);
    }

    #[test]
    fn test_count_ignores_limit() {
        let store = MemoryStore::new();
        for i in 0..5 {
            store.insert(&make_event(&format!("e{}", i), 1, i)).unwrap();
        }

        let filter = Filter::new().limit(2);
        assert_eq!(store.count(&filter).unwrap(), 5);
        assert_eq!(store.query(&filter).unwrap().remaining(), 2);
    }
}
