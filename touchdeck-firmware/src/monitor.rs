//! Heap statistics for the diagnostic snapshot

use embassy_rp::clocks::clk_sys_freq;
use embedded_alloc::LlffHeap as Heap;
use touchdeck_hal::{SystemMonitor, SystemStats};

/// [`SystemMonitor`] backed by the global allocator
pub struct HeapMonitor {
    heap: &'static Heap,
    min_free: u32,
}

impl HeapMonitor {
    pub fn new(heap: &'static Heap) -> Self {
        Self {
            heap,
            min_free: heap.free() as u32,
        }
    }
}

impl SystemMonitor for HeapMonitor {
    fn stats(&mut self) -> SystemStats {
        let free = self.heap.free() as u32;
        self.min_free = self.min_free.min(free);

        SystemStats {
            cpu_mhz: clk_sys_freq() / 1_000_000,
            free_heap: free,
            min_free_heap: self.min_free,
            // The linked-list allocator does not expose its block list
            largest_free_block: None,
            // No PSRAM on RP2040 boards
            free_external: None,
        }
    }
}
