//! System resource statistics

/// Point-in-time resource statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SystemStats {
    /// Core clock in MHz
    pub cpu_mhz: u32,
    /// Free heap bytes
    pub free_heap: u32,
    /// Lowest free heap observed since boot
    pub min_free_heap: u32,
    /// Largest contiguous free heap block, if the allocator can report it
    pub largest_free_block: Option<u32>,
    /// Free external RAM (PSRAM), if fitted
    pub free_external: Option<u32>,
}

/// Source of resource statistics for the periodic diagnostic snapshot
///
/// Takes `&mut self` so implementations can track low-water marks.
pub trait SystemMonitor {
    /// Sample current statistics
    fn stats(&mut self) -> SystemStats;
}

/// Monitor for targets without heap instrumentation
///
/// Always reports zeroed statistics.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMonitor;

impl SystemMonitor for NoMonitor {
    fn stats(&mut self) -> SystemStats {
        SystemStats::default()
    }
}
