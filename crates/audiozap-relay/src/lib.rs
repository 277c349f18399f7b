//! Relay core for the AudioZap music relay.
//!
//! This crate supplies the two pieces of the relay with real design
//! content: an in-memory concurrent event store with filtered querying,
//! and an ordered ingress policy chain. Everything else — WebSocket
//! transport, protocol framing, signature verification, subscription
//! fan-out — is owned by the external relay engine, which consumes this
//! crate through three hooks:
//!
//! ```text
//!  inbound EVENT ──▶ PolicyChain ──reject──▶ reason to client
//!                        │
//!                      accept
//!                        ▼
//!                   MemoryStore ◀── delete hook
//!                        │
//!  inbound REQ ──────▶ query ────▶ snapshot iterator to engine
//! ```
//!
//! The domain rule: audio track events (kind 31337) must carry a
//! zap-split tag granting the platform its configured revenue share,
//! or they are rejected before storage.

mod config;
mod error;
mod event;
mod filter;
mod metrics;
mod policy;
mod relay;
mod store;

pub use config::{RelayConfig, SplitConfig};
pub use error::{RelayError, Result};
pub use event::{
    Event, KIND_AUDIO_TRACK, KIND_DELETION, KIND_METADATA, KIND_SHORT_TEXT_NOTE,
    validate_event_structure,
};
pub use filter::{Filter, MAX_QUERY_LIMIT};
pub use metrics::{MetricsSnapshot, RelayMetrics};
pub use policy::{Policy, PolicyChain, SplitPolicy, ValidationPolicy, Verdict};
pub use relay::{IngestOutcome, Relay};
pub use store::{EventStore, MemoryStore, QueryResults};
