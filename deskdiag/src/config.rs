// ABOUTME: engine configuration with built-in defaults and an optional toml overlay.
// ABOUTME: loaded once at startup; immutable for the lifetime of the engine.

use std::path::Path;
use std::time::Duration;

use deskdiag_common::OsKind;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Wall-clock bound for one raw command execution, in seconds.
    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,

    /// Output cap in characters; longer output is truncated and marked.
    #[serde(default = "default_max_command_output")]
    pub max_command_output: usize,

    /// Bound for one ping invocation, in seconds.
    #[serde(default = "default_ping_timeout_secs")]
    pub ping_timeout_secs: u64,

    /// Bound for one dns lookup, in seconds.
    #[serde(default = "default_dns_timeout_secs")]
    pub dns_timeout_secs: u64,

    /// Approved command prefixes per platform.
    #[serde(default = "default_windows_commands")]
    pub windows_commands: Vec<String>,

    #[serde(default = "default_macos_commands")]
    pub macos_commands: Vec<String>,

    #[serde(default = "default_linux_commands")]
    pub linux_commands: Vec<String>,

    /// Substrings that disqualify a command on every platform, before any
    /// allow-list check.
    #[serde(default = "default_blocked_patterns")]
    pub blocked_patterns: Vec<String>,
}

fn default_command_timeout_secs() -> u64 {
    30
}

fn default_max_command_output() -> usize {
    10_000
}

fn default_ping_timeout_secs() -> u64 {
    5
}

fn default_dns_timeout_secs() -> u64 {
    3
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn default_windows_commands() -> Vec<String> {
    strings(&[
        "ipconfig",
        "ping",
        "nslookup",
        "systeminfo",
        "tasklist",
        "sfc",
        "chkdsk",
        "netstat",
        "tracert",
        "route",
        "arp",
        "getmac",
        "wmic",
        "dir",
        "type",
        "echo",
    ])
}

fn default_macos_commands() -> Vec<String> {
    strings(&[
        "ifconfig",
        "ping",
        "nslookup",
        "system_profiler",
        "ps",
        "diskutil",
        "netstat",
        "traceroute",
        "route",
        "arp",
        "networksetup",
        "scutil",
        "ls",
        "cat",
        "echo",
        "df",
    ])
}

fn default_linux_commands() -> Vec<String> {
    strings(&[
        "ifconfig",
        "ping",
        "nslookup",
        "ps",
        "df",
        "free",
        "netstat",
        "traceroute",
        "route",
        "arp",
        "ls",
        "cat",
        "echo",
        "uname",
        "uptime",
        "who",
        "w",
        "top",
    ])
}

fn default_blocked_patterns() -> Vec<String> {
    strings(&[
        "rm -rf",
        "del /s",
        "format",
        "fdisk",
        "dd",
        "sudo",
        "su",
        "chmod 777",
        "chown root",
        "wget",
        "curl",
        "nc",
        "telnet",
        "ssh",
        "> /dev/",
        ">> /dev/",
        "| bash",
        "| sh",
    ])
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            command_timeout_secs: default_command_timeout_secs(),
            max_command_output: default_max_command_output(),
            ping_timeout_secs: default_ping_timeout_secs(),
            dns_timeout_secs: default_dns_timeout_secs(),
            windows_commands: default_windows_commands(),
            macos_commands: default_macos_commands(),
            linux_commands: default_linux_commands(),
            blocked_patterns: default_blocked_patterns(),
        }
    }
}

impl EngineConfig {
    /// Load an overlay from a toml file. Keys that are absent keep their
    /// built-in defaults.
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let content = std::fs::read_to_string(path).map_err(|source| EngineError::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| EngineError::ConfigParse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    pub fn ping_timeout(&self) -> Duration {
        Duration::from_secs(self.ping_timeout_secs)
    }

    pub fn dns_timeout(&self) -> Duration {
        Duration::from_secs(self.dns_timeout_secs)
    }

    pub fn approved_commands(&self, os: OsKind) -> &[String] {
        match os {
            OsKind::Windows => &self.windows_commands,
            OsKind::Darwin => &self.macos_commands,
            OsKind::Linux => &self.linux_commands,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_documented_values() {
        let config = EngineConfig::default();
        assert_eq!(config.command_timeout_secs, 30);
        assert_eq!(config.max_command_output, 10_000);
        assert_eq!(config.ping_timeout_secs, 5);
        assert_eq!(config.dns_timeout_secs, 3);
        assert!(config.windows_commands.iter().any(|c| c == "ipconfig"));
        assert!(config.macos_commands.iter().any(|c| c == "networksetup"));
        assert!(config.linux_commands.iter().any(|c| c == "free"));
        assert!(config.blocked_patterns.iter().any(|p| p == "rm -rf"));
        assert!(config.blocked_patterns.iter().any(|p| p == "| bash"));
    }

    #[test]
    fn approved_commands_selects_per_platform() {
        let config = EngineConfig::default();
        assert!(config
            .approved_commands(OsKind::Windows)
            .iter()
            .any(|c| c == "tracert"));
        assert!(config
            .approved_commands(OsKind::Darwin)
            .iter()
            .any(|c| c == "diskutil"));
        assert!(config
            .approved_commands(OsKind::Linux)
            .iter()
            .any(|c| c == "uptime"));
    }

    #[test]
    fn load_applies_partial_overlay_over_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "command_timeout_secs = 5").unwrap();
        writeln!(file, "max_command_output = 200").unwrap();

        let config = EngineConfig::load(file.path()).unwrap();
        assert_eq!(config.command_timeout_secs, 5);
        assert_eq!(config.max_command_output, 200);
        assert_eq!(config.ping_timeout_secs, 5);
        assert!(config.blocked_patterns.iter().any(|p| p == "sudo"));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        let err = EngineConfig::load(&missing).unwrap_err();
        assert!(err.to_string().contains("read config file"));
    }

    #[test]
    fn load_reports_malformed_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "command_timeout_secs = {{nope}}").unwrap();

        let err = EngineConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("parse config file"));
    }

    #[test]
    fn timeout_accessors_expose_durations() {
        let config = EngineConfig::default();
        assert_eq!(config.command_timeout(), Duration::from_secs(30));
        assert_eq!(config.ping_timeout(), Duration::from_secs(5));
        assert_eq!(config.dns_timeout(), Duration::from_secs(3));
    }
}
