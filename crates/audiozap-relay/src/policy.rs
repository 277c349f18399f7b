//! Ingress policies.
//!
//! Every inbound event passes through a [`PolicyChain`] before it is
//! stored. Policies run in registration order; the first rejection wins
//! and its reason is sent back to the submitting client verbatim. A
//! rejection is an expected outcome, not an error: chains log an
//! informational accept/reject record and nothing else.
//!
//! Policies are total functions of the event and the configuration they
//! captured at construction. A chain is built once at startup and is
//! immutable afterwards, so the same event always gets the same verdict.

use crate::event::{Event, validate_event_structure};
use std::fmt;
use tracing::{debug, info};

/// Outcome of evaluating an event against a policy or a chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Let the event through.
    Accept,
    /// Refuse the event, with a human-readable reason for the client.
    Reject(String),
}

impl Verdict {
    /// Convenience for building a rejection.
    pub fn reject(reason: impl Into<String>) -> Self {
        Verdict::Reject(reason.into())
    }

    /// True if this verdict lets the event through.
    pub fn is_accept(&self) -> bool {
        matches!(self, Verdict::Accept)
    }

    /// The rejection reason, if any.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Verdict::Accept => None,
            Verdict::Reject(reason) => Some(reason),
        }
    }
}

/// A single ingress rule.
pub trait Policy: Send + Sync {
    /// Short name used in accept/reject log records.
    fn name(&self) -> &str;

    /// Decide whether the event may be stored.
    fn evaluate(&self, event: &Event) -> Verdict;
}

/// Ordered list of policies with first-reject-wins evaluation.
#[derive(Default)]
pub struct PolicyChain {
    policies: Vec<Box<dyn Policy>>,
}

impl PolicyChain {
    /// Create an empty chain (accepts everything).
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a policy. Order of registration is order of evaluation.
    pub fn with(mut self, policy: impl Policy + 'static) -> Self {
        self.policies.push(Box::new(policy));
        self
    }

    /// Number of registered policies.
    pub fn len(&self) -> usize {
        self.policies.len()
    }

    /// Check if the chain has no policies.
    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    /// Run the chain against an event.
    ///
    /// Stops at the first rejecting policy and returns its reason
    /// verbatim; if every policy passes, the event is accepted.
    pub fn evaluate(&self, event: &Event) -> Verdict {
        for policy in &self.policies {
            if let Verdict::Reject(reason) = policy.evaluate(event) {
                info!(
                    event_id = %event.id,
                    kind = event.kind,
                    policy = policy.name(),
                    reason = %reason,
                    "event rejected"
                );
                return Verdict::Reject(reason);
            }
        }

        debug!(event_id = %event.id, kind = event.kind, "event accepted");
        Verdict::Accept
    }
}

impl fmt::Debug for PolicyChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolicyChain")
            .field(
                "policies",
                &self.policies.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Rejects events whose id, pubkey, or sig are not well-formed hex.
///
/// Signature verification itself belongs to the surrounding engine; this
/// only keeps garbage out of the store.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationPolicy;

impl Policy for ValidationPolicy {
    fn name(&self) -> &str {
        "validation"
    }

    fn evaluate(&self, event: &Event) -> Verdict {
        if validate_event_structure(event) {
            Verdict::Accept
        } else {
            Verdict::reject("invalid: malformed event structure")
        }
    }
}

/// Enforces the platform revenue split on a designated event kind.
///
/// Events of `target_kind` must carry at least one zap-split tag
/// (`["zap", recipient, relay_hint, weight]`) directing `minimum_weight`
/// percent or more to `platform_pubkey`. Any single qualifying tag
/// suffices; weights are not summed across tags.
#[derive(Debug, Clone)]
pub struct SplitPolicy {
    target_kind: u16,
    platform_pubkey: String,
    minimum_weight: u32,
}

impl SplitPolicy {
    pub fn new(target_kind: u16, platform_pubkey: impl Into<String>, minimum_weight: u32) -> Self {
        Self {
            target_kind,
            platform_pubkey: platform_pubkey.into(),
            minimum_weight,
        }
    }

    fn has_platform_split(&self, event: &Event) -> bool {
        event.tags_named("zap").any(|tag| {
            // Tag format: ["zap", recipient, relay_hint, weight]
            if tag.len() < 4 || tag[1] != self.platform_pubkey {
                return false;
            }
            // A malformed weight counts as 0, never as a parse error.
            let weight: u32 = tag[3].parse().unwrap_or(0);
            weight >= self.minimum_weight
        })
    }
}

impl Policy for SplitPolicy {
    fn name(&self) -> &str {
        "zap-split"
    }

    fn evaluate(&self, event: &Event) -> Verdict {
        if event.kind != self.target_kind {
            return Verdict::Accept;
        }

        if self.has_platform_split(event) {
            Verdict::Accept
        } else {
            Verdict::reject(format!(
                "blocked: audio track events must include a zap split of at least {}% to the platform",
                self.minimum_weight
            ))
        }
    }
}
