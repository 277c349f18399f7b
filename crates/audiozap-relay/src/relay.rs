//! Engine-facing glue.
//!
//! [`Relay`] wires one store, one policy chain, and a metrics collector
//! into the three hooks the external relay engine calls: ingest on EVENT,
//! delete on deletion requests, query on REQ. The engine owns everything
//! else (transport, framing, signatures, subscriptions).

use crate::config::RelayConfig;
use crate::error::Result;
use crate::event::Event;
use crate::filter::Filter;
use crate::metrics::RelayMetrics;
use crate::policy::{PolicyChain, Verdict};
use crate::store::{EventStore, MemoryStore, QueryResults};
use std::sync::Arc;

/// Result of pushing an event through the ingest path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Event passed every policy and was stored.
    Stored,
    /// A policy refused the event; the reason goes back to the client.
    Rejected(String),
}

impl IngestOutcome {
    pub fn is_stored(&self) -> bool {
        matches!(self, IngestOutcome::Stored)
    }
}

/// An assembled relay core: store + policy chain + metrics.
pub struct Relay {
    store: MemoryStore,
    policies: PolicyChain,
    metrics: Arc<RelayMetrics>,
}

impl Relay {
    /// Assemble a relay core from configuration.
    pub fn new(config: &RelayConfig) -> Self {
        Self::with_policies(config.policy_chain())
    }

    /// Assemble a relay core around an explicit policy chain.
    pub fn with_policies(policies: PolicyChain) -> Self {
        Self {
            store: MemoryStore::new(),
            policies,
            metrics: Arc::new(RelayMetrics::new()),
        }
    }

    /// Ingest one inbound event: policy gate first, store on acceptance.
    ///
    /// A rejection is a normal outcome, not an error; `Err` only means
    /// the store itself failed.
    pub fn ingest(&self, event: &Event) -> Result<IngestOutcome> {
        self.metrics.event_received();

        match self.policies.evaluate(event) {
            Verdict::Reject(reason) => {
                self.metrics.event_rejected();
                Ok(IngestOutcome::Rejected(reason))
            }
            Verdict::Accept => {
                self.store.insert(event)?;
                self.metrics.event_stored();
                Ok(IngestOutcome::Stored)
            }
        }
    }

    /// Delete a stored event by id. Absent ids are a no-op.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let removed = self.store.delete(id)?;
        if removed {
            self.metrics.event_deleted();
        }
        Ok(removed)
    }

    /// Answer a backlog query for a subscription.
    pub fn query(&self, filter: &Filter) -> Result<QueryResults> {
        let results = self.store.query(filter)?;
        self.metrics.query_served();
        Ok(results)
    }

    /// The underlying store, for engine hooks that need direct access.
    pub fn store(&self) -> &impl EventStore {
        &self.store
    }

    /// Shared metrics handle.
    pub fn metrics(&self) -> Arc<RelayMetrics> {
        Arc::clone(&self.metrics)
    }
}
