//! Subscription filters.
//!
//! Filters define which stored events a query selects. They support:
//! - Event IDs (or prefixes)
//! - Authors/pubkeys (or prefixes)
//! - Event kinds
//! - Time ranges (since/until, both inclusive)
//! - Tag queries (#e, #p, etc.)
//! - Result limits
//!
//! All present clauses are ANDed; a filter with no clauses matches every
//! event.

use crate::error::{RelayError, Result};
use crate::event::Event;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Largest limit a query filter may request.
pub const MAX_QUERY_LIMIT: usize = 5000;

/// Filter for store queries and subscription requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    /// Event IDs (or prefixes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ids: Option<Vec<String>>,

    /// Authors (pubkeys or prefixes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<String>>,

    /// Event kinds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kinds: Option<Vec<u16>>,

    /// Events created at or after this timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<u64>,

    /// Events created at or before this timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub until: Option<u64>,

    /// Maximum number of events to return
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,

    /// Generic tag queries (#e, #p, etc.)
    /// Keys include the # prefix; keys without it are ignored when matching.
    #[serde(flatten)]
    pub tags: HashMap<String, Vec<String>>,
}

impl Filter {
    /// Create a new empty filter (matches all events).
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by event IDs.
    pub fn ids(mut self, ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.ids = Some(ids.into_iter().map(|s| s.into()).collect());
        self
    }

    /// Filter by authors.
    pub fn authors(mut self, authors: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.authors = Some(authors.into_iter().map(|s| s.into()).collect());
        self
    }

    /// Filter by kinds.
    pub fn kinds(mut self, kinds: impl IntoIterator<Item = u16>) -> Self {
        self.kinds = Some(kinds.into_iter().collect());
        self
    }

    /// Filter events created at or after the timestamp.
    pub fn since(mut self, timestamp: u64) -> Self {
        self.since = Some(timestamp);
        self
    }

    /// Filter events created at or before the timestamp.
    pub fn until(mut self, timestamp: u64) -> Self {
        self.until = Some(timestamp);
        self
    }

    /// Limit the number of results.
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Add a tag filter.
    pub fn tag(
        mut self,
        tag_name: &str,
        values: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        let key = if tag_name.starts_with('#') {
            tag_name.to_string()
        } else {
            format!("#{}", tag_name)
        };
        self.tags
            .insert(key, values.into_iter().map(|s| s.into()).collect());
        self
    }

    /// Filter by #e (event reference) tags.
    pub fn references_events(self, event_ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tag("e", event_ids)
    }

    /// Filter by #p (pubkey reference) tags.
    pub fn references_pubkeys(self, pubkeys: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tag("p", pubkeys)
    }

    /// Check if an event matches this filter.
    ///
    /// An explicitly empty clause (e.g. `ids: Some(vec![])`) matches
    /// nothing: the empty set contains no events.
    pub fn matches(&self, event: &Event) -> bool {
        // Check IDs (prefix match)
        if let Some(ref ids) = self.ids
            && !ids.iter().any(|id| event.id.starts_with(id))
        {
            return false;
        }

        // Check authors (prefix match)
        if let Some(ref authors) = self.authors
            && !authors.iter().any(|a| event.pubkey.starts_with(a))
        {
            return false;
        }

        // Check kinds
        if let Some(ref kinds) = self.kinds
            && !kinds.contains(&event.kind)
        {
            return false;
        }

        // Check since (inclusive)
        if let Some(since) = self.since
            && event.created_at < since
        {
            return false;
        }

        // Check until (inclusive)
        if let Some(until) = self.until
            && event.created_at > until
        {
            return false;
        }

        // Check tag filters
        for (tag_key, values) in &self.tags {
            // Unrecognized keys without the # prefix are ignored, so new
            // top-level filter fields don't break older events.
            if !tag_key.starts_with('#') {
                continue;
            }
            let tag_name = &tag_key[1..];

            let has_match = event.tags.iter().any(|tag| {
                tag.len() >= 2
                    && tag[0] == tag_name
                    && values.iter().any(|v| tag[1].starts_with(v))
            });

            if !has_match {
                return false;
            }
        }

        true
    }

    /// Check if this filter is valid.
    pub fn validate(&self) -> Result<()> {
        if let Some(limit) = self.limit
            && limit > MAX_QUERY_LIMIT
        {
            return Err(RelayError::Filter(format!(
                "limit too large (max {})",
                MAX_QUERY_LIMIT
            )));
        }

        Ok(())
    }
}
