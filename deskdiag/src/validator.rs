// ABOUTME: arbitrates every command string against the global block patterns and the platform allow-list.
// ABOUTME: block patterns win over allow-list matches; matching is on a lowercased copy only.

use deskdiag_common::ValidationVerdict;
use tracing::warn;

use crate::config::EngineConfig;
use crate::os::OsProfile;

/// The platform-independent deny set. Patterns are lowercased at construction
/// and matched as plain substrings of the normalized command.
#[derive(Debug, Clone)]
pub struct BlockPatternSet {
    patterns: Vec<String>,
}

impl BlockPatternSet {
    pub fn from_config(config: &EngineConfig) -> Self {
        let patterns = config
            .blocked_patterns
            .iter()
            .map(|pattern| pattern.to_lowercase())
            .collect();

        Self { patterns }
    }

    pub fn first_match(&self, normalized_command: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|pattern| normalized_command.contains(pattern.as_str()))
            .map(String::as_str)
    }
}

/// Validate a raw command string for one platform. The command is lowercased
/// for matching only; callers execute the original string untouched.
pub fn validate(command: &str, profile: &OsProfile, blocked: &BlockPatternSet) -> ValidationVerdict {
    let normalized = command.to_lowercase();

    if let Some(pattern) = blocked.first_match(&normalized) {
        warn!(os = profile.os().as_str(), pattern, "command rejected by block pattern");
        return ValidationVerdict {
            allowed: false,
            reason: Some(format!("blocked pattern: {pattern}")),
        };
    }

    if profile
        .approved_prefixes()
        .iter()
        .any(|prefix| normalized.starts_with(prefix.as_str()))
    {
        return ValidationVerdict {
            allowed: true,
            reason: None,
        };
    }

    warn!(os = profile.os().as_str(), "command not in approved list");
    ValidationVerdict {
        allowed: false,
        reason: Some("not in approved list".to_string()),
    }
}
