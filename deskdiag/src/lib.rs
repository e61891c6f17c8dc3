// ABOUTME: safe diagnostic command engine: validate, execute, suggest, categorize, probe.
// ABOUTME: the Engine facade owns config and platform state; every operation is stateless per call.

pub mod catalog;
pub mod categorizer;
pub mod config;
pub mod error;
pub mod executor;
pub mod netprobe;
pub mod os;
pub mod system_info;
pub mod validator;

pub use catalog::DiagnosticCatalog;
pub use config::EngineConfig;
pub use error::EngineError;
pub use executor::TRUNCATION_MARKER;
pub use netprobe::NetworkProbeOrchestrator;

use std::collections::BTreeMap;

use deskdiag_common::{
    Category, DiagnosticCommand, ExecutionResult, NetworkReport, OsKind, SuggestedDiagnostics,
    SystemInfo, ValidationVerdict,
};
use tracing::info;

use crate::os::OsProfile;
use crate::validator::BlockPatternSet;

/// One engine per process is the expected shape: construct it once from
/// config, then call operations. Nothing is cached between calls.
pub struct Engine {
    config: EngineConfig,
    os: OsKind,
    profile: OsProfile,
    blocked: BlockPatternSet,
    catalog: DiagnosticCatalog,
}

impl Engine {
    /// Engine for the platform we are actually running on.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_os(config, os::detect_os())
    }

    /// Engine pinned to an explicit platform. The approval profile, catalog
    /// and probe tables follow the pinned platform; execution still happens
    /// on the local machine.
    pub fn with_os(config: EngineConfig, os: OsKind) -> Self {
        let profile = OsProfile::from_config(&config, os);
        let blocked = BlockPatternSet::from_config(&config);
        let catalog = DiagnosticCatalog::for_os(os);
        Self {
            config,
            os,
            profile,
            blocked,
            catalog,
        }
    }

    /// Platform the approval profile and catalog were built for.
    pub fn os(&self) -> OsKind {
        self.os
    }

    /// Verdict only; nothing is executed.
    pub fn validate(&self, command: &str) -> ValidationVerdict {
        validator::validate(command, &self.profile, &self.blocked)
    }

    /// Validate, then execute under the configured bounds. Rejection is an
    /// error and nothing is spawned; everything after the spawn travels back
    /// as result data, including failures.
    pub async fn validate_and_execute(
        &self,
        command: &str,
    ) -> Result<ExecutionResult, EngineError> {
        let verdict = self.validate(command);
        if !verdict.allowed {
            return Err(EngineError::Rejected {
                reason: verdict.reason.unwrap_or_default(),
            });
        }

        info!(command, "command approved for execution");
        Ok(executor::execute(
            command,
            self.config.command_timeout(),
            self.config.max_command_output,
        )
        .await)
    }

    /// Categorize a free-text problem description and return the catalog
    /// entries for that category.
    pub fn suggest_diagnostics(&self, text: &str) -> SuggestedDiagnostics {
        let category = categorizer::categorize(text);
        SuggestedDiagnostics {
            category,
            suggestions: self.catalog.suggested(category),
        }
    }

    pub fn list_all_diagnostics(&self) -> BTreeMap<Category, Vec<DiagnosticCommand>> {
        self.catalog.all()
    }

    /// The full fixed battery: connectivity, dns, local network, interfaces.
    pub async fn run_network_diagnostics(&self) -> NetworkReport {
        self.orchestrator().run().await
    }

    pub async fn ping_host(&self, host: &str, count: u32) -> Result<ExecutionResult, EngineError> {
        self.orchestrator().ping_host(host, count).await
    }

    pub async fn dns_lookup(&self, domain: &str) -> Result<ExecutionResult, EngineError> {
        self.orchestrator().dns_lookup(domain).await
    }

    pub async fn network_config(&self) -> ExecutionResult {
        self.orchestrator().network_config().await
    }

    /// Native snapshot; never shells out.
    pub fn system_info(&self) -> SystemInfo {
        system_info::collect()
    }

    fn orchestrator(&self) -> NetworkProbeOrchestrator<'_> {
        NetworkProbeOrchestrator::new(self.os, &self.config, &self.profile, &self.blocked)
    }
}
