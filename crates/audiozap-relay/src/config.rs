//! Relay configuration.
//!
//! Plain data handed to the store and policy constructors at startup.
//! Nothing here is process-global, so several independently configured
//! relays can share one process (tests rely on this).

use crate::event::KIND_AUDIO_TRACK;
use crate::policy::{PolicyChain, SplitPolicy, ValidationPolicy};

/// Pubkey receiving the platform's share when no override is configured.
const DEFAULT_PLATFORM_PUBKEY: &str =
    "4a1d950a6dbed94974f260388e63ec9d93e878701e6ef855140e6c55ccbdae3d";

/// Minimum revenue share, in percent.
const DEFAULT_MINIMUM_SPLIT: u32 = 10;

/// Revenue-split enforcement settings.
#[derive(Debug, Clone)]
pub struct SplitConfig {
    /// Event kind the rule applies to
    pub target_kind: u16,
    /// Pubkey that must appear as a zap-split recipient
    pub platform_pubkey: String,
    /// Minimum split weight, in percent
    pub minimum_weight: u32,
}

impl Default for SplitConfig {
    fn default() -> Self {
        // Environment overrides for deployment; code defaults otherwise.
        let platform_pubkey = std::env::var("AUDIOZAP_PLATFORM_PUBKEY")
            .unwrap_or_else(|_| DEFAULT_PLATFORM_PUBKEY.to_string());

        let minimum_weight = std::env::var("AUDIOZAP_MINIMUM_SPLIT")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(DEFAULT_MINIMUM_SPLIT);

        Self {
            target_kind: KIND_AUDIO_TRACK,
            platform_pubkey,
            minimum_weight,
        }
    }
}

/// Relay core configuration.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Relay name advertised by the surrounding engine
    pub name: String,
    /// Relay description advertised by the surrounding engine
    pub description: String,
    /// Revenue-split enforcement settings
    pub split: SplitConfig,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            name: "AudioZap Music Relay".to_string(),
            description: "A relay for music that enforces revenue splits.".to_string(),
            split: SplitConfig::default(),
        }
    }
}

impl RelayConfig {
    /// Build the standard ingress policy chain for this configuration.
    pub fn policy_chain(&self) -> PolicyChain {
        PolicyChain::new()
            .with(ValidationPolicy)
            .with(SplitPolicy::new(
                self.split.target_kind,
                self.split.platform_pubkey.clone(),
                self.split.minimum_weight,
            ))
    }
}
