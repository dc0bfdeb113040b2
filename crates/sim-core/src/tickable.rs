//! Trait for components that can be advanced one system cycle at a time.

use crate::Cycles;

/// A discrete sequential block driven by the shared system clock.
///
/// This is the core abstraction of the simulator: every component (`Fifo`,
/// `Ram`, `RamModule`, `InputReader`, the table controllers, `Stitcher`) is
/// `Tickable`. Within one call to `next_clock_cycle`, a component reads its
/// own previously-published state and the previously-published outputs of
/// its upstream neighbours, updates its private state, and republishes its
/// own outputs for the next cycle to observe. Nothing may read another
/// component's output from *within* the same `next_clock_cycle` call that
/// produced it — the top-level driver enforces the tick order that makes
/// this sound (see the driver's fixed component ordering).
pub trait Tickable {
    /// Advance the component by one system clock cycle.
    fn next_clock_cycle(&mut self);

    /// Advance the component by multiple system clock cycles.
    ///
    /// Default implementation calls `next_clock_cycle()` in a loop. Only
    /// useful for components with no upstream dependencies (e.g. in unit
    /// tests); the top-level driver always ticks one cycle across the whole
    /// network at a time.
    fn run(&mut self, count: Cycles) {
        for _ in 0..count.get() {
            self.next_clock_cycle();
        }
    }
}
