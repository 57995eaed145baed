use serde::Serialize;
use sysinfo::System;

/// Snapshot of the worker machine, attached to every report so a saturated
/// worker can be told apart from a saturated bulkhead.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct HardwareInfo {
    pub cpu_cores: u64,
    pub total_memory: u64,
    pub available_memory: u64,
}

pub fn get_hardware_info() -> HardwareInfo {
    let mut sys = System::new_all();
    sys.refresh_all();

    HardwareInfo {
        cpu_cores: sys.cpus().len() as u64,
        total_memory: sys.total_memory(),
        available_memory: sys.available_memory(),
    }
}
