//! System status snapshot

use touchdeck_hal::SystemStats;

/// Resource statistics at one point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SystemSnapshot {
    pub stats: SystemStats,
    /// Time since boot
    pub uptime_ms: u32,
    /// Heap fragmentation in tenths of a percent, when computable
    pub fragmentation_permille: Option<u16>,
}

impl SystemSnapshot {
    /// Build a snapshot from raw statistics
    pub fn capture(stats: SystemStats, uptime_ms: u32) -> Self {
        Self {
            stats,
            uptime_ms,
            fragmentation_permille: fragmentation_permille(&stats),
        }
    }

    /// Emit the status block at debug level
    pub fn log(&self) {
        #[cfg(feature = "defmt")]
        {
            defmt::debug!("=== System Status ===");
            defmt::debug!("CPU: {=u32} MHz", self.stats.cpu_mhz);
            defmt::debug!("Free heap: {=u32} bytes", self.stats.free_heap);
            defmt::debug!("Min free heap: {=u32} bytes", self.stats.min_free_heap);
            match self.fragmentation_permille {
                Some(f) => defmt::debug!("Heap fragmentation: {=u16}.{=u16}%", f / 10, f % 10),
                None => defmt::debug!("Heap fragmentation: unknown"),
            }
            if let Some(external) = self.stats.free_external {
                defmt::debug!("Free PSRAM: {=u32} bytes", external);
            }
            defmt::debug!("Uptime: {=u32} s", self.uptime_ms / 1000);
        }
    }
}

/// Fragmentation as `1000 - largest_block * 1000 / free_heap`
///
/// `None` when the allocator cannot report its largest block or the heap
/// is exhausted.
fn fragmentation_permille(stats: &SystemStats) -> Option<u16> {
    let largest = stats.largest_free_block?;
    if stats.free_heap == 0 {
        return None;
    }
    let contiguous = (u64::from(largest) * 1000 / u64::from(stats.free_heap)).min(1000);
    Some(1000 - contiguous as u16)
}
