// ABOUTME: rendering helpers that turn engine results into terminal text.
// ABOUTME: pure functions; the binary decides between these and raw json.

use deskdiag_common::{
    Category, DiagnosticCommand, ExecutionResult, NetworkReport, OsKind, SuggestedDiagnostics,
    SystemInfo,
};
use std::collections::BTreeMap;

fn status(success: bool) -> &'static str {
    if success {
        "✓"
    } else {
        "✗"
    }
}

/// The battery report, one status line per probe. Sections appear in a fixed
/// order and probes are sorted by target.
pub fn render_network_report(report: &NetworkReport) -> String {
    let mut out = String::new();
    out.push_str("Network Diagnostics Results\n");
    out.push_str(&"=".repeat(50));
    out.push_str("\n\n");

    out.push_str("Internet Connectivity:\n");
    for (host, probe) in &report.connectivity {
        out.push_str(&format!("  {} {host}\n", status(probe.result.success)));
    }
    out.push('\n');

    out.push_str("DNS Resolution:\n");
    for (domain, probe) in &report.dns {
        out.push_str(&format!("  {} {domain}\n", status(probe.result.success)));
    }
    out.push('\n');

    if let Some(local_ip) = &report.local_network.local_ip {
        out.push_str(&format!("Local IP: {local_ip}\n"));
    }
    out.push_str("Gateway Tests:\n");
    for (gateway, probe) in &report.local_network.gateway_tests {
        out.push_str(&format!("  {} {gateway}\n", status(probe.result.success)));
    }
    out.push('\n');

    out.push_str("Network Interfaces:\n");
    out.push_str(&format!(
        "  {} {}\n",
        status(report.interfaces.result.success),
        report.interfaces.target
    ));

    out
}

/// One execution outcome. Output comes first; error text is only repeated
/// when it is not already the output; failed runs end with a status line.
pub fn render_execution_result(result: &ExecutionResult) -> String {
    let mut out = String::new();

    if !result.output.is_empty() {
        out.push_str(result.output.trim_end_matches('\n'));
        out.push('\n');
    }

    if let Some(error) = result.error.as_deref() {
        if error != result.output {
            out.push_str(error.trim_end_matches('\n'));
            out.push('\n');
        }
    }

    if !result.success {
        match result.return_code {
            Some(code) => out.push_str(&format!("command failed (exit code {code})\n")),
            None => out.push_str("command failed\n"),
        }
    }

    out
}

pub fn render_suggestions(suggested: &SuggestedDiagnostics) -> String {
    let mut out = format!("Detected category: {}\n\n", suggested.category.as_str());

    if suggested.suggestions.is_empty() {
        out.push_str("No curated diagnostics for this category.\n");
        return out;
    }

    for command in &suggested.suggestions {
        out.push_str(&format!(
            "  {} [{} risk]\n    {}\n    $ {}\n\n",
            command.name,
            command.risk_level.as_str(),
            command.description,
            command.command_template
        ));
    }

    out
}

/// Every curated diagnostic for one platform, grouped by category.
pub fn render_listing(os: OsKind, listing: &BTreeMap<Category, Vec<DiagnosticCommand>>) -> String {
    let mut out = format!("Curated diagnostics for {}\n\n", os.as_str());

    for (category, commands) in listing {
        out.push_str(&format!("{}:\n", category.as_str()));
        for command in commands {
            out.push_str(&format!(
                "  {} [{} risk]\n    $ {}\n",
                command.name,
                command.risk_level.as_str(),
                command.command_template
            ));
        }
        out.push('\n');
    }

    out
}

pub fn render_system_info(info: &SystemInfo) -> String {
    let os_line = match &info.os_version {
        Some(version) => format!("{} ({version})", info.os_type.as_str()),
        None => info.os_type.as_str().to_string(),
    };

    let mut out = String::new();
    out.push_str(&format!("OS:           {os_line}\n"));
    out.push_str(&format!("Architecture: {}\n", info.architecture));
    out.push_str(&format!(
        "Processor:    {}\n",
        info.processor.as_deref().unwrap_or("unknown")
    ));
    out.push_str(&format!(
        "Hostname:     {}\n",
        info.hostname.as_deref().unwrap_or("unknown")
    ));
    out.push_str(&format!("CPUs:         {}\n", info.cpu_count));
    out.push_str(&format!(
        "Memory:       {} available of {}\n",
        fmt_bytes(info.memory_available),
        fmt_bytes(info.memory_total)
    ));

    if !info.disks.is_empty() {
        out.push_str("Disks:\n");
        for disk in &info.disks {
            out.push_str(&format!(
                "  {}: {} free of {}\n",
                disk.mount_point,
                fmt_bytes(disk.free),
                fmt_bytes(disk.total)
            ));
        }
    }

    out
}

fn fmt_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}
