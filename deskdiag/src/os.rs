// ABOUTME: detects the running platform and builds the per-platform approved-prefix profile.
// ABOUTME: profiles are constructed once from config and shared read-only afterwards.

use deskdiag_common::OsKind;

use crate::config::EngineConfig;

/// Map the running platform to its profile identity. Unknown unix platforms
/// validate against the linux profile.
pub fn detect_os() -> OsKind {
    match std::env::consts::OS {
        "windows" => OsKind::Windows,
        "macos" => OsKind::Darwin,
        _ => OsKind::Linux,
    }
}

/// The read-only allow-list view for one platform. Prefixes are lowercased at
/// construction so validation never re-normalizes the registry.
#[derive(Debug, Clone)]
pub struct OsProfile {
    os: OsKind,
    approved_prefixes: Vec<String>,
}

impl OsProfile {
    pub fn from_config(config: &EngineConfig, os: OsKind) -> Self {
        let approved_prefixes = config
            .approved_commands(os)
            .iter()
            .map(|prefix| prefix.to_lowercase())
            .collect();

        Self {
            os,
            approved_prefixes,
        }
    }

    pub fn os(&self) -> OsKind {
        self.os
    }

    pub fn approved_prefixes(&self) -> &[String] {
        &self.approved_prefixes
    }
}
