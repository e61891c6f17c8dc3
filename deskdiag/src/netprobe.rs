// ABOUTME: fixed-battery network diagnostics: connectivity, dns, local network, interfaces.
// ABOUTME: probe families run concurrently; every probe is validated and its failure stays data.

use std::collections::BTreeMap;
use std::net::UdpSocket;
use std::time::Duration;

use deskdiag_common::{ExecutionResult, LocalNetworkReport, NetworkReport, OsKind, ProbeResult};
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::executor;
use crate::os::OsProfile;
use crate::validator::{self, BlockPatternSet};

/// Connectivity battery: two public resolvers and one name that exercises DNS.
pub const PROBE_HOSTS: [&str; 3] = ["8.8.8.8", "1.1.1.1", "google.com"];

/// Resolution battery: names that are up if anything is.
pub const PROBE_DOMAINS: [&str; 3] = ["google.com", "microsoft.com", "apple.com"];

const BATTERY_PING_COUNT: u32 = 2;
const MAX_GATEWAY_TESTS: usize = 2;
const ROUTE_TIMEOUT: Duration = Duration::from_secs(10);
const NETWORK_INFO_TIMEOUT: Duration = Duration::from_secs(15);

/// Runs the fixed probe battery and the standalone network probes. Holds
/// borrowed engine state; construct one per call site.
pub struct NetworkProbeOrchestrator<'a> {
    os: OsKind,
    config: &'a EngineConfig,
    profile: &'a OsProfile,
    blocked: &'a BlockPatternSet,
}

impl<'a> NetworkProbeOrchestrator<'a> {
    pub fn new(
        os: OsKind,
        config: &'a EngineConfig,
        profile: &'a OsProfile,
        blocked: &'a BlockPatternSet,
    ) -> Self {
        Self {
            os,
            config,
            profile,
            blocked,
        }
    }

    /// Full battery run. The four families execute concurrently and the
    /// report always carries all four sections; probes that were rejected,
    /// timed out or failed show up as failed entries.
    pub async fn run(&self) -> NetworkReport {
        info!(os = ?self.os, "running network diagnostics battery");

        let (connectivity, dns, local_network, interfaces) = tokio::join!(
            self.connectivity(),
            self.dns(),
            self.local_network(),
            self.interfaces(),
        );

        NetworkReport {
            connectivity,
            dns,
            local_network,
            interfaces,
        }
    }

    /// One ping with a caller-chosen count. The host must be a plain name or
    /// address; anything shell-flavored is refused before validation.
    pub async fn ping_host(
        &self,
        host: &str,
        count: u32,
    ) -> Result<ExecutionResult, EngineError> {
        if !is_safe_probe_target(host) {
            return Err(EngineError::InvalidTarget {
                target: host.to_string(),
            });
        }
        let command = ping_command(self.os, host, count);
        self.run_validated(&command, self.config.ping_timeout()).await
    }

    /// One resolver query for a caller-chosen domain.
    pub async fn dns_lookup(&self, domain: &str) -> Result<ExecutionResult, EngineError> {
        if !is_safe_probe_target(domain) {
            return Err(EngineError::InvalidTarget {
                target: domain.to_string(),
            });
        }
        let command = nslookup_command(domain);
        self.run_validated(&command, self.config.dns_timeout()).await
    }

    /// Full interface configuration dump for the current platform.
    pub async fn network_config(&self) -> ExecutionResult {
        let command = network_config_command(self.os);
        match self.run_validated(command, NETWORK_INFO_TIMEOUT).await {
            Ok(result) => result,
            Err(err) => rejection_as_result(err),
        }
    }

    async fn connectivity(&self) -> BTreeMap<String, ProbeResult> {
        let mut results = BTreeMap::new();
        for host in PROBE_HOSTS {
            let command = ping_command(self.os, host, BATTERY_PING_COUNT);
            let probe = self
                .probe(host, &command, self.config.ping_timeout())
                .await;
            results.insert(host.to_string(), probe);
        }
        results
    }

    async fn dns(&self) -> BTreeMap<String, ProbeResult> {
        let mut results = BTreeMap::new();
        for domain in PROBE_DOMAINS {
            let command = nslookup_command(domain);
            let probe = self
                .probe(domain, &command, self.config.dns_timeout())
                .await;
            results.insert(domain.to_string(), probe);
        }
        results
    }

    async fn local_network(&self) -> LocalNetworkReport {
        let local_ip = local_ip();
        if local_ip.is_none() {
            debug!("local address lookup failed; continuing with gateways only");
        }

        let mut gateway_tests = BTreeMap::new();
        for gateway in self.discover_gateways().await {
            let command = ping_command(self.os, &gateway, BATTERY_PING_COUNT);
            let probe = self
                .probe(&gateway, &command, self.config.ping_timeout())
                .await;
            gateway_tests.insert(gateway, probe);
        }

        LocalNetworkReport {
            local_ip,
            gateway_tests,
        }
    }

    async fn interfaces(&self) -> ProbeResult {
        let command = interfaces_command(self.os);
        self.probe(command, command, NETWORK_INFO_TIMEOUT).await
    }

    async fn discover_gateways(&self) -> Vec<String> {
        let command = route_command(self.os);
        let result = match self.run_validated(command, ROUTE_TIMEOUT).await {
            Ok(result) => result,
            Err(err) => {
                warn!(error = %err, "route lookup refused");
                return Vec::new();
            }
        };
        if !result.success {
            debug!("route lookup failed; skipping gateway tests");
            return Vec::new();
        }

        let candidates = parse_gateways(self.os, &result.output);
        let selected = select_gateways(candidates);
        debug!(gateways = ?selected, "gateway candidates selected");
        selected
    }

    /// Validate-then-execute for probes whose failure should surface in the
    /// report rather than abort it.
    async fn probe(&self, target: &str, command: &str, timeout: Duration) -> ProbeResult {
        let result = match self.run_validated(command, timeout).await {
            Ok(result) => result,
            Err(err) => rejection_as_result(err),
        };
        ProbeResult {
            target: target.to_string(),
            result,
        }
    }

    async fn run_validated(
        &self,
        command: &str,
        timeout: Duration,
    ) -> Result<ExecutionResult, EngineError> {
        let verdict = validator::validate(command, self.profile, self.blocked);
        if !verdict.allowed {
            return Err(EngineError::Rejected {
                reason: verdict.reason.unwrap_or_default(),
            });
        }
        Ok(executor::execute(command, timeout, self.config.max_command_output).await)
    }
}

fn rejection_as_result(err: EngineError) -> ExecutionResult {
    ExecutionResult {
        success: false,
        output: String::new(),
        error: Some(err.to_string()),
        return_code: None,
        truncated: false,
        duration_ms: 0,
    }
}

/// Plain hostnames and addresses only; a leading dash would read as an extra
/// option rather than a target. This is the gate for every string that
/// reaches a command line without coming from our own tables.
pub fn is_safe_probe_target(target: &str) -> bool {
    !target.is_empty()
        && !target.starts_with('-')
        && target
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | ':' | '_'))
}

fn ping_command(os: OsKind, host: &str, count: u32) -> String {
    match os {
        OsKind::Windows => format!("ping -n {count} {host}"),
        OsKind::Darwin | OsKind::Linux => format!("ping -c {count} {host}"),
    }
}

fn nslookup_command(domain: &str) -> String {
    format!("nslookup {domain}")
}

fn route_command(os: OsKind) -> &'static str {
    match os {
        OsKind::Windows => "route print | findstr \"0.0.0.0\"",
        OsKind::Darwin | OsKind::Linux => "route -n | grep \"^0.0.0.0\"",
    }
}

fn interfaces_command(os: OsKind) -> &'static str {
    match os {
        OsKind::Windows => "ipconfig",
        OsKind::Darwin => "networksetup -listallnetworkservices",
        OsKind::Linux => "ifconfig",
    }
}

fn network_config_command(os: OsKind) -> &'static str {
    match os {
        OsKind::Windows => "ipconfig /all",
        OsKind::Darwin => "ifconfig && networksetup -listallnetworkservices",
        OsKind::Linux => "ifconfig",
    }
}

/// Pull default-gateway candidates out of raw route output. On Windows the
/// gateway sits in the fourth column of the 0.0.0.0 rows; on Unix-likes the
/// filtered rows carry it in the second column.
fn parse_gateways(os: OsKind, route_output: &str) -> Vec<String> {
    let mut gateways = Vec::new();
    for line in route_output.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        match os {
            OsKind::Windows => {
                if line.contains("0.0.0.0") && parts.len() >= 4 {
                    gateways.push(parts[3].to_string());
                }
            }
            OsKind::Darwin | OsKind::Linux => {
                if parts.len() >= 2 {
                    gateways.push(parts[1].to_string());
                }
            }
        }
    }
    gateways
}

/// Dedupe in first-seen order, drop anything that is not a plain address,
/// keep at most two.
fn select_gateways(candidates: Vec<String>) -> Vec<String> {
    let mut selected: Vec<String> = Vec::new();
    for candidate in candidates {
        if selected.contains(&candidate) {
            continue;
        }
        if !is_safe_probe_target(&candidate) {
            warn!(candidate = %candidate, "discarding gateway candidate");
            continue;
        }
        selected.push(candidate);
        if selected.len() == MAX_GATEWAY_TESTS {
            break;
        }
    }
    selected
}

fn local_ip() -> Option<String> {
    // Connecting a UDP socket never sends a packet; it only asks the kernel
    // which source address would be used for this destination.
    let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect("8.8.8.8:80").ok()?;
    Some(socket.local_addr().ok()?.ip().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orchestrator_parts(config: &EngineConfig, os: OsKind) -> (OsProfile, BlockPatternSet) {
        (
            OsProfile::from_config(config, os),
            BlockPatternSet::from_config(config),
        )
    }

    #[test]
    fn ping_command_matches_platform_conventions() {
        assert_eq!(
            ping_command(OsKind::Windows, "8.8.8.8", 2),
            "ping -n 2 8.8.8.8"
        );
        assert_eq!(
            ping_command(OsKind::Linux, "192.168.1.1", 4),
            "ping -c 4 192.168.1.1"
        );
        assert_eq!(
            ping_command(OsKind::Darwin, "google.com", 2),
            "ping -c 2 google.com"
        );
    }

    #[test]
    fn probe_commands_are_platform_specific() {
        assert_eq!(route_command(OsKind::Windows), "route print | findstr \"0.0.0.0\"");
        assert_eq!(route_command(OsKind::Linux), "route -n | grep \"^0.0.0.0\"");
        assert_eq!(interfaces_command(OsKind::Windows), "ipconfig");
        assert_eq!(
            interfaces_command(OsKind::Darwin),
            "networksetup -listallnetworkservices"
        );
        assert_eq!(interfaces_command(OsKind::Linux), "ifconfig");
        assert_eq!(network_config_command(OsKind::Windows), "ipconfig /all");
        assert_eq!(
            network_config_command(OsKind::Darwin),
            "ifconfig && networksetup -listallnetworkservices"
        );
    }

    #[test]
    fn parse_gateways_windows_takes_the_fourth_column() {
        let output = "          0.0.0.0          0.0.0.0      192.168.1.1     192.168.1.34     25\n";
        assert_eq!(
            parse_gateways(OsKind::Windows, output),
            vec!["192.168.1.34".to_string()]
        );
    }

    #[test]
    fn parse_gateways_unix_takes_the_second_column() {
        let output = "\
0.0.0.0         192.168.1.1     0.0.0.0         UG        0 0          0 eth0
0.0.0.0         10.0.0.1        0.0.0.0         UG        0 0          0 wlan0
";
        assert_eq!(
            parse_gateways(OsKind::Linux, output),
            vec!["192.168.1.1".to_string(), "10.0.0.1".to_string()]
        );
    }

    #[test]
    fn parse_gateways_skips_short_and_blank_lines() {
        let output = "\n0.0.0.0\n\n0.0.0.0         172.16.0.1      0.0.0.0         UG\n";
        assert_eq!(
            parse_gateways(OsKind::Linux, output),
            vec!["172.16.0.1".to_string()]
        );
    }

    #[test]
    fn select_gateways_dedupes_and_caps_at_two() {
        let candidates = vec![
            "192.168.1.1".to_string(),
            "192.168.1.1".to_string(),
            "10.0.0.1".to_string(),
            "172.16.0.1".to_string(),
        ];
        assert_eq!(
            select_gateways(candidates),
            vec!["192.168.1.1".to_string(), "10.0.0.1".to_string()]
        );
    }

    #[test]
    fn select_gateways_discards_unsafe_candidates() {
        let candidates = vec![
            "192.168.1.1; reboot".to_string(),
            "$(true)".to_string(),
            "-f".to_string(),
            "10.0.0.1".to_string(),
        ];
        assert_eq!(select_gateways(candidates), vec!["10.0.0.1".to_string()]);
    }

    #[test]
    fn safe_targets_are_plain_names_and_addresses() {
        assert!(is_safe_probe_target("8.8.8.8"));
        assert!(is_safe_probe_target("google.com"));
        assert!(is_safe_probe_target("fe80::1"));
        assert!(is_safe_probe_target("my_host-1"));
        assert!(!is_safe_probe_target(""));
        assert!(!is_safe_probe_target("-f"));
        assert!(!is_safe_probe_target("--help"));
        assert!(!is_safe_probe_target("host; ls"));
        assert!(!is_safe_probe_target("a b"));
        assert!(!is_safe_probe_target("`true`"));
        assert!(!is_safe_probe_target("host|cat"));
    }

    #[tokio::test]
    async fn rejected_probes_stay_in_the_report_as_failures() {
        // No approved prefixes at all: every probe is refused before spawn,
        // yet all four sections are still present.
        let config = EngineConfig {
            linux_commands: Vec::new(),
            ..EngineConfig::default()
        };
        let (profile, blocked) = orchestrator_parts(&config, OsKind::Linux);
        let orchestrator =
            NetworkProbeOrchestrator::new(OsKind::Linux, &config, &profile, &blocked);

        let report = orchestrator.run().await;

        assert_eq!(report.connectivity.len(), PROBE_HOSTS.len());
        for (host, probe) in &report.connectivity {
            assert_eq!(&probe.target, host);
            assert!(!probe.result.success);
            let error = probe.result.error.as_deref().unwrap_or("");
            assert!(error.contains("not in approved list"), "got {error:?}");
            assert_eq!(probe.result.return_code, None);
        }
        assert_eq!(report.dns.len(), PROBE_DOMAINS.len());
        assert!(report.local_network.gateway_tests.is_empty());
        assert!(!report.interfaces.result.success);
    }

    #[tokio::test]
    async fn ping_host_refuses_shell_metacharacters() {
        let config = EngineConfig::default();
        let (profile, blocked) = orchestrator_parts(&config, OsKind::Linux);
        let orchestrator =
            NetworkProbeOrchestrator::new(OsKind::Linux, &config, &profile, &blocked);

        let err = orchestrator
            .ping_host("8.8.8.8; cat /etc/passwd", 1)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidTarget { .. }));

        let err = orchestrator.dns_lookup("$(hostname).com").await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidTarget { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn battery_report_always_has_four_sections() {
        let config = EngineConfig {
            ping_timeout_secs: 1,
            dns_timeout_secs: 1,
            ..EngineConfig::default()
        };
        let (profile, blocked) = orchestrator_parts(&config, OsKind::Linux);
        let orchestrator =
            NetworkProbeOrchestrator::new(OsKind::Linux, &config, &profile, &blocked);

        let report = orchestrator.run().await;

        for host in PROBE_HOSTS {
            assert!(report.connectivity.contains_key(host));
        }
        for domain in PROBE_DOMAINS {
            assert!(report.dns.contains_key(domain));
        }
        assert!(report.local_network.gateway_tests.len() <= MAX_GATEWAY_TESTS);
        assert_eq!(report.interfaces.target, interfaces_command(OsKind::Linux));
    }
}
