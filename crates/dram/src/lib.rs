//! Cycle-accurate DRAM timing model: a single-chip bank controller
//! ([`Ram`]) and a fairness-scheduled, reorder-buffered multi-port,
//! multi-chip facade built on top of it ([`RamModule`]).

mod ram;
mod ram_module;

pub use ram::{Ram, RamConfig, BURST_LENGTH};
pub use ram_module::{RamModule, RamModuleConfig};
