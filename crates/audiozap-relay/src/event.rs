//! Core event structure shared by the store and the policy gate.
//!
//! Events arrive already signed; the surrounding engine verifies
//! signatures before handing them to this core, so only structural
//! validation lives here:
//! - Event structure (id, pubkey, created_at, kind, tags, content, sig)
//! - Hex-shape checks for id, pubkey, and sig
//! - Tag access helpers used by filters and policies

use serde::{Deserialize, Serialize};

// Standard event kinds
pub const KIND_METADATA: u16 = 0;
pub const KIND_SHORT_TEXT_NOTE: u16 = 1;
pub const KIND_DELETION: u16 = 5;

/// Audio track events carry the platform's revenue-split requirement.
pub const KIND_AUDIO_TRACK: u16 = 31337;

/// A signed event submitted by a client.
///
/// Immutable once stored: an update is a new event plus a deletion of
/// the old id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// 32-bytes lowercase hex-encoded sha256 of the serialized event data
    pub id: String,
    /// 32-bytes lowercase hex-encoded public key of the event creator
    pub pubkey: String,
    /// Unix timestamp in seconds
    pub created_at: u64,
    /// Event kind (integer between 0 and 65535)
    pub kind: u16,
    /// Array of arrays of strings (tags)
    pub tags: Vec<Vec<String>>,
    /// Arbitrary string content
    pub content: String,
    /// 64-bytes lowercase hex signature
    pub sig: String,
}

impl Event {
    /// Iterate over tags whose first element equals `name`.
    ///
    /// Each yielded slice still includes the tag name at position 0.
    pub fn tags_named<'a, 'b>(
        &'a self,
        name: &'b str,
    ) -> impl Iterator<Item = &'a [String]> + use<'a, 'b> {
        self.tags
            .iter()
            .filter(move |tag| tag.first().map(String::as_str) == Some(name))
            .map(Vec::as_slice)
    }

    /// First value of the first tag with the given name, if any.
    pub fn tag_value(&self, name: &str) -> Option<&str> {
        self.tags_named(name)
            .find_map(|tag| tag.get(1).map(String::as_str))
    }
}

fn is_lower_hex(s: &str, len: usize) -> bool {
    s.len() == len
        && s.chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
}

/// Validate a signed event's structure (not including signature verification).
///
/// Checks that id, pubkey, and sig are hex strings of the expected length.
/// Tags are permissive: empty tag records are tolerated and simply never
/// match anything.
pub fn validate_event_structure(event: &Event) -> bool {
    is_lower_hex(&event.id, 64) && is_lower_hex(&event.pubkey, 64) && is_lower_hex(&event.sig, 128)
}
