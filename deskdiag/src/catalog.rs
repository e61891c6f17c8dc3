// ABOUTME: static per-platform registry of curated diagnostic commands.
// ABOUTME: every entry is phrased so the validator for that platform accepts it.

use std::collections::BTreeMap;

use deskdiag_common::{Category, DiagnosticCommand, OsKind, RiskLevel};

/// Curated diagnostics for one platform, held in registration order.
#[derive(Debug, Clone)]
pub struct DiagnosticCatalog {
    commands: Vec<DiagnosticCommand>,
}

impl DiagnosticCatalog {
    pub fn for_os(os: OsKind) -> Self {
        let commands = match os {
            OsKind::Windows => windows_commands(),
            OsKind::Darwin => darwin_commands(),
            OsKind::Linux => linux_commands(),
        };
        Self { commands }
    }

    pub fn from_commands(commands: Vec<DiagnosticCommand>) -> Self {
        Self { commands }
    }

    /// Entries for one category, in registration order. Unknown or empty
    /// categories yield an empty list rather than an error.
    pub fn suggested(&self, category: Category) -> Vec<DiagnosticCommand> {
        self.commands
            .iter()
            .filter(|command| command.category == category)
            .cloned()
            .collect()
    }

    /// The full registry keyed by category. Every category appears, so
    /// callers can enumerate without probing for missing keys.
    pub fn all(&self) -> BTreeMap<Category, Vec<DiagnosticCommand>> {
        Category::ALL
            .iter()
            .map(|category| (*category, self.suggested(*category)))
            .collect()
    }

    pub fn commands(&self) -> &[DiagnosticCommand] {
        &self.commands
    }
}

fn entry(
    name: &str,
    description: &str,
    command_template: &str,
    category: Category,
    risk_level: RiskLevel,
) -> DiagnosticCommand {
    DiagnosticCommand {
        name: name.to_string(),
        description: description.to_string(),
        command_template: command_template.to_string(),
        category,
        risk_level,
    }
}

fn windows_commands() -> Vec<DiagnosticCommand> {
    use Category::*;
    use RiskLevel::*;

    vec![
        entry(
            "ping_test",
            "Reachability of a well-known public address",
            "ping -n 4 8.8.8.8",
            Network,
            Low,
        ),
        entry(
            "dns_lookup",
            "Name resolution against the configured resolver",
            "nslookup google.com",
            Network,
            Low,
        ),
        entry(
            "network_config",
            "Adapter addresses, DNS servers and lease details",
            "ipconfig /all",
            Network,
            Low,
        ),
        entry(
            "routing_table",
            "Active routes and gateway assignments",
            "route print",
            Network,
            Low,
        ),
        entry(
            "trace_route",
            "Per-hop path to a public address",
            "tracert 8.8.8.8",
            Network,
            Medium,
        ),
        entry(
            "hardware_summary",
            "Machine manufacturer and model",
            "wmic computersystem get manufacturer,model",
            Hardware,
            Low,
        ),
        entry(
            "disk_space",
            "Capacity and free space per logical disk",
            "wmic logicaldisk get size,freespace,caption",
            Hardware,
            Low,
        ),
        entry(
            "memory_modules",
            "Installed memory modules and their speed",
            "wmic memorychip get capacity,speed",
            Hardware,
            Low,
        ),
        entry(
            "process_list",
            "Running processes with memory usage",
            "tasklist",
            Software,
            Low,
        ),
        entry(
            "installed_software",
            "Installed MSI packages; slow on large installs",
            "wmic product get name,version",
            Software,
            Medium,
        ),
        entry(
            "system_summary",
            "OS build, uptime and patch level",
            "systeminfo",
            System,
            Low,
        ),
        entry(
            "system_file_check",
            "Scan protected system files and repair from cache",
            "sfc /scannow",
            System,
            High,
        ),
        entry(
            "open_connections",
            "All open sockets and listening ports",
            "netstat -an",
            Security,
            Low,
        ),
        entry(
            "disk_integrity",
            "Read-only file system consistency check",
            "chkdsk",
            Security,
            Medium,
        ),
        entry(
            "arp_cache",
            "Recently seen peers on the local segment",
            "arp -a",
            Security,
            Low,
        ),
        entry("echo_test", "End-to-end engine check", "echo test", General, Low),
        entry(
            "mac_addresses",
            "Physical addresses of all adapters",
            "getmac",
            General,
            Low,
        ),
    ]
}

fn darwin_commands() -> Vec<DiagnosticCommand> {
    use Category::*;
    use RiskLevel::*;

    vec![
        entry(
            "ping_test",
            "Reachability of a well-known public address",
            "ping -c 4 8.8.8.8",
            Network,
            Low,
        ),
        entry(
            "dns_lookup",
            "Name resolution against the configured resolver",
            "nslookup google.com",
            Network,
            Low,
        ),
        entry(
            "network_config",
            "Interface addresses and link state",
            "ifconfig",
            Network,
            Low,
        ),
        entry(
            "network_services",
            "Configured network services in priority order",
            "networksetup -listallnetworkservices",
            Network,
            Low,
        ),
        entry(
            "dns_config",
            "Resolver configuration as the system sees it",
            "scutil --dns",
            Network,
            Low,
        ),
        entry(
            "trace_route",
            "Per-hop path to a public address",
            "traceroute 8.8.8.8",
            Network,
            Medium,
        ),
        entry(
            "hardware_summary",
            "Model, chip and memory overview",
            "system_profiler SPHardwareDataType",
            Hardware,
            Low,
        ),
        entry(
            "disk_list",
            "Attached disks, partitions and containers",
            "diskutil list",
            Hardware,
            Low,
        ),
        entry(
            "disk_space",
            "Mounted volumes with free space",
            "df -h",
            Hardware,
            Low,
        ),
        entry(
            "process_list",
            "Running processes with CPU and memory usage",
            "ps aux",
            Software,
            Low,
        ),
        entry(
            "installed_software",
            "Applications known to the system profiler",
            "system_profiler SPApplicationsDataType",
            Software,
            Medium,
        ),
        entry(
            "system_summary",
            "OS version, kernel and boot details",
            "system_profiler SPSoftwareDataType",
            System,
            Low,
        ),
        entry(
            "volume_check",
            "Live verification of the boot volume structure",
            "diskutil verifyVolume /",
            System,
            Medium,
        ),
        entry(
            "open_connections",
            "All open sockets and listening ports",
            "netstat -an",
            Security,
            Low,
        ),
        entry(
            "firewall_state",
            "Application firewall mode and allowed apps",
            "system_profiler SPFirewallDataType",
            Security,
            Low,
        ),
        entry(
            "arp_cache",
            "Recently seen peers on the local segment",
            "arp -a",
            Security,
            Low,
        ),
        entry("echo_test", "End-to-end engine check", "echo test", General, Low),
        entry(
            "hostname",
            "Local host name as configured",
            "scutil --get LocalHostName",
            General,
            Low,
        ),
    ]
}

fn linux_commands() -> Vec<DiagnosticCommand> {
    use Category::*;
    use RiskLevel::*;

    vec![
        entry(
            "ping_test",
            "Reachability of a well-known public address",
            "ping -c 4 8.8.8.8",
            Network,
            Low,
        ),
        entry(
            "dns_lookup",
            "Name resolution against the configured resolver",
            "nslookup google.com",
            Network,
            Low,
        ),
        entry(
            "network_config",
            "Interface addresses and link state",
            "ifconfig",
            Network,
            Low,
        ),
        entry(
            "routing_table",
            "Kernel routing table with gateways",
            "route -n",
            Network,
            Low,
        ),
        entry(
            "trace_route",
            "Per-hop path to a public address",
            "traceroute 8.8.8.8",
            Network,
            Medium,
        ),
        entry(
            "memory_usage",
            "Free and used memory including swap",
            "free -m",
            Hardware,
            Low,
        ),
        entry(
            "disk_space",
            "Mounted file systems with free space",
            "df -h",
            Hardware,
            Low,
        ),
        entry(
            "cpu_info",
            "Processor model and core details",
            "cat /proc/cpuinfo",
            Hardware,
            Low,
        ),
        entry(
            "process_list",
            "Running processes with CPU and memory usage",
            "ps aux",
            Software,
            Low,
        ),
        entry(
            "top_processes",
            "One batch snapshot of the busiest processes",
            "top -bn1",
            Software,
            Low,
        ),
        entry(
            "system_summary",
            "Kernel release and architecture",
            "uname -a",
            System,
            Low,
        ),
        entry(
            "uptime_load",
            "Uptime and load averages",
            "uptime",
            System,
            Low,
        ),
        entry(
            "logged_in_users",
            "Who is logged in and from where",
            "who",
            Security,
            Low,
        ),
        entry(
            "open_connections",
            "Listening TCP and UDP sockets",
            "netstat -tuln",
            Security,
            Low,
        ),
        entry(
            "arp_cache",
            "Recently seen peers on the local segment",
            "arp -a",
            Security,
            Low,
        ),
        entry("echo_test", "End-to-end engine check", "echo test", General, Low),
        entry(
            "session_overview",
            "Logged-in sessions and what they are running",
            "w",
            General,
            Low,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::os::OsProfile;
    use crate::validator::{validate, BlockPatternSet};

    const ALL_OS: [OsKind; 3] = [OsKind::Windows, OsKind::Darwin, OsKind::Linux];

    #[test]
    fn every_entry_passes_its_platform_validator() {
        let config = EngineConfig::default();
        let blocked = BlockPatternSet::from_config(&config);

        for os in ALL_OS {
            let profile = OsProfile::from_config(&config, os);
            for command in DiagnosticCatalog::for_os(os).commands() {
                let verdict = validate(&command.command_template, &profile, &blocked);
                assert!(
                    verdict.allowed,
                    "{:?} catalog entry {} rejected: {:?}",
                    os, command.name, verdict.reason
                );
            }
        }
    }

    #[test]
    fn network_suggestions_lead_with_low_risk_ping() {
        for os in ALL_OS {
            let suggestions = DiagnosticCatalog::for_os(os).suggested(Category::Network);
            let first = suggestions.first().unwrap_or_else(|| {
                panic!("{:?} catalog has no network suggestions", os);
            });
            assert!(first.command_template.starts_with("ping"));
            assert_eq!(first.risk_level, RiskLevel::Low);
        }
    }

    #[test]
    fn every_category_is_populated_on_every_platform() {
        for os in ALL_OS {
            let catalog = DiagnosticCatalog::for_os(os).all();
            assert_eq!(catalog.len(), Category::ALL.len());
            for (category, commands) in &catalog {
                assert!(
                    !commands.is_empty(),
                    "{:?} catalog has no {:?} entries",
                    os,
                    category
                );
            }
        }
    }

    #[test]
    fn empty_catalog_yields_empty_suggestions() {
        let catalog = DiagnosticCatalog::from_commands(Vec::new());
        for category in Category::ALL {
            assert!(catalog.suggested(category).is_empty());
        }
        // Enumeration still exposes every category.
        assert_eq!(catalog.all().len(), Category::ALL.len());
    }

    #[test]
    fn platform_catalogs_use_platform_tools() {
        let windows = DiagnosticCatalog::for_os(OsKind::Windows);
        assert!(windows
            .commands()
            .iter()
            .any(|c| c.command_template == "ipconfig /all"));
        assert!(!windows
            .commands()
            .iter()
            .any(|c| c.command_template.starts_with("ifconfig")));

        let linux = DiagnosticCatalog::for_os(OsKind::Linux);
        assert!(!linux
            .commands()
            .iter()
            .any(|c| c.command_template.starts_with("ipconfig")));
        assert!(!linux
            .commands()
            .iter()
            .any(|c| c.command_template.starts_with("tracert ")));
    }
}
