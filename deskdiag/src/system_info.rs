// ABOUTME: native system snapshot via sysinfo, no shell involved.
// ABOUTME: fields a platform cannot report come back as None, never as an error.

use deskdiag_common::{DiskUsage, SystemInfo};
use sysinfo::{Disks, System};
use tracing::debug;

use crate::os::detect_os;

pub fn collect() -> SystemInfo {
    let mut sys = System::new_all();
    sys.refresh_all();

    let processor = sys
        .cpus()
        .first()
        .map(|cpu| cpu.brand().trim().to_string())
        .filter(|brand| !brand.is_empty());

    let disks = Disks::new_with_refreshed_list()
        .list()
        .iter()
        .map(|disk| DiskUsage {
            device: disk.name().to_string_lossy().into_owned(),
            mount_point: disk.mount_point().display().to_string(),
            total: disk.total_space(),
            free: disk.available_space(),
        })
        .collect();

    let info = SystemInfo {
        os_type: detect_os(),
        os_version: System::os_version(),
        architecture: std::env::consts::ARCH.to_string(),
        processor,
        hostname: System::host_name(),
        cpu_count: sys.cpus().len(),
        memory_total: sys.total_memory(),
        memory_available: sys.available_memory(),
        disks,
    };

    debug!(
        cpu_count = info.cpu_count,
        disks = info.disks.len(),
        "collected system snapshot"
    );
    info
}
