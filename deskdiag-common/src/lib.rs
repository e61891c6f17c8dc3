// ABOUTME: defines the shared diagnostic record types produced by the deskdiag engine.
// ABOUTME: keeps every boundary record flat and strictly parsed so collaborators stay lossless.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OsKind {
    Windows,
    Darwin,
    Linux,
}

impl OsKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OsKind::Windows => "windows",
            OsKind::Darwin => "darwin",
            OsKind::Linux => "linux",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

/// Issue categories, listed in classifier priority order. `General` is the
/// fallback when no keyword matches.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Network,
    Hardware,
    Software,
    System,
    Security,
    General,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Network,
        Category::Hardware,
        Category::Software,
        Category::System,
        Category::Security,
        Category::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Network => "network",
            Category::Hardware => "hardware",
            Category::Software => "software",
            Category::System => "system",
            Category::Security => "security",
            Category::General => "general",
        }
    }
}

/// One suggestible diagnostic command, as registered in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DiagnosticCommand {
    pub name: String,
    pub description: String,
    pub command_template: String,
    pub category: Category,
    pub risk_level: RiskLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ValidationVerdict {
    pub allowed: bool,
    pub reason: Option<String>,
}

/// Outcome of exactly one command invocation. Durations are carried as whole
/// milliseconds so the record stays flat in JSON.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ExecutionResult {
    pub success: bool,
    pub output: String,
    pub error: Option<String>,
    pub return_code: Option<i32>,
    pub truncated: bool,
    pub duration_ms: u64,
}

/// One probe of a network report: the target it examined and what happened.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ProbeResult {
    pub target: String,
    pub result: ExecutionResult,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LocalNetworkReport {
    pub local_ip: Option<String>,
    pub gateway_tests: BTreeMap<String, ProbeResult>,
}

/// Aggregated result of one full diagnostic run. All four sections are always
/// present; failed probes appear as failed entries rather than omissions.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct NetworkReport {
    pub connectivity: BTreeMap<String, ProbeResult>,
    pub dns: BTreeMap<String, ProbeResult>,
    pub local_network: LocalNetworkReport,
    pub interfaces: ProbeResult,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SuggestedDiagnostics {
    pub category: Category,
    pub suggestions: Vec<DiagnosticCommand>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DiskUsage {
    pub device: String,
    pub mount_point: String,
    pub total: u64,
    pub free: u64,
}

/// Natively collected machine facts. Fields the platform cannot report come
/// back as null instead of failing the whole snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SystemInfo {
    pub os_type: OsKind,
    pub os_version: Option<String>,
    pub architecture: String,
    pub processor: Option<String>,
    pub hostname: Option<String>,
    pub cpu_count: usize,
    pub memory_total: u64,
    pub memory_available: u64,
    pub disks: Vec<DiskUsage>,
}

pub fn parse_execution_result(input: &str) -> Result<ExecutionResult, serde_json::Error> {
    serde_json::from_str(input)
}

pub fn parse_network_report(input: &str) -> Result<NetworkReport, serde_json::Error> {
    serde_json::from_str(input)
}
