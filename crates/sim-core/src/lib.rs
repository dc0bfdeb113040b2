//! Core traits and types shared by every component of the accelerator simulator.
//!
//! Everything here ticks at the shared system clock. All component timing —
//! DRAM bank busy windows, FIFO depth, stitcher backpressure — derives from
//! one cycle counter owned by the top-level driver. No exceptions.

mod clock;
mod cycles;
mod fifo;
mod tickable;

pub use clock::SystemClock;
pub use cycles::Cycles;
pub use fifo::Fifo;
pub use tickable::Tickable;
