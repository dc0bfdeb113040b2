//! Tunable parameters for every block in the pipeline.
//!
//! Kept as plain configuration records threaded through constructors rather
//! than process-wide constants, so a driver can size the input reader, the
//! interval table, and the position table independently (and so tests can
//! use tiny geometries instead of production-scale ones).

use dram::RamConfig;
use sim_core::SystemClock;

/// Geometry and timing for one block's `RamModule`, plus the FIFO depths
/// that surround it.
#[derive(Debug, Clone, Copy)]
pub struct RamBlockParams {
    pub num_rams: u32,
    pub num_ports: u32,
    pub row_width: u32,
    pub col_width: u32,
    pub bank_width: u32,
    pub system_clock_freq_mhz: u64,
    pub memory_clock_freq_mhz: u64,
    pub trcd_cycles: u64,
    pub tcl_cycles: u64,
    pub trp_cycles: u64,
    pub fifo_length: usize,
    pub rob_capacity: usize,
}

impl RamBlockParams {
    #[must_use]
    pub fn ram_config(&self) -> RamConfig {
        RamConfig {
            addr_row_width: self.row_width,
            addr_col_width: self.col_width,
            addr_bank_width: self.bank_width,
            clock: SystemClock::new(self.system_clock_freq_mhz, self.memory_clock_freq_mhz),
            trcd_cycles: self.trcd_cycles,
            tcl_cycles: self.tcl_cycles,
            trp_cycles: self.trp_cycles,
        }
    }
}

/// Full set of tunables for one run of the pipeline: the read/subread
/// geometry plus one [`RamBlockParams`] per DRAM-backed block.
#[derive(Debug, Clone, Copy)]
pub struct SimParams {
    /// Number of subreads per read (`K`).
    pub subreads_per_read: u32,
    /// Number of nucleotides in one subread.
    pub subread_length: u32,
    pub input_reader: RamBlockParams,
    pub interval_table: RamBlockParams,
    pub position_table: RamBlockParams,
}

/// Production-scale defaults for one RAM-backed block, mirroring the
/// reference implementation's `params.h` constants. `num_rams` and
/// `num_ports` are filled in by the caller (the former comes from the CLI,
/// the latter from the read/stitcher geometry); everything else is a fixed
/// tunable.
#[must_use]
pub fn input_reader_defaults(num_rams: u32, num_ports: u32) -> RamBlockParams {
    RamBlockParams {
        num_rams,
        num_ports,
        row_width: 5,
        col_width: 5,
        bank_width: 3,
        system_clock_freq_mhz: 200,
        memory_clock_freq_mhz: 400,
        trcd_cycles: 8,
        tcl_cycles: 7,
        trp_cycles: 8,
        fifo_length: 64,
        rob_capacity: 64,
    }
}

#[must_use]
pub fn interval_table_defaults(num_rams: u32, num_ports: u32) -> RamBlockParams {
    RamBlockParams {
        num_rams,
        num_ports,
        row_width: 8,
        col_width: 8,
        bank_width: 2,
        system_clock_freq_mhz: 200,
        memory_clock_freq_mhz: 400,
        trcd_cycles: 8,
        tcl_cycles: 8,
        trp_cycles: 8,
        fifo_length: 16,
        rob_capacity: 64,
    }
}

#[must_use]
pub fn position_table_defaults(num_rams: u32, num_ports: u32) -> RamBlockParams {
    RamBlockParams {
        num_rams,
        num_ports,
        row_width: 10,
        col_width: 8,
        bank_width: 2,
        system_clock_freq_mhz: 200,
        memory_clock_freq_mhz: 400,
        trcd_cycles: 8,
        tcl_cycles: 8,
        trp_cycles: 8,
        fifo_length: 16,
        rob_capacity: 64,
    }
}

/// A reasonable small-scale default, primarily useful for tests: two chips
/// per block, one bank each, `tRCD=tCL=tRP=8` at matched 400MHz clocks.
#[must_use]
pub fn small_test_params(subreads_per_read: u32, subread_length: u32) -> SimParams {
    let block = RamBlockParams {
        num_rams: 2,
        num_ports: subreads_per_read.max(1),
        row_width: 4,
        col_width: 4,
        bank_width: 1,
        system_clock_freq_mhz: 400,
        memory_clock_freq_mhz: 400,
        trcd_cycles: 8,
        tcl_cycles: 8,
        trp_cycles: 8,
        fifo_length: 8,
        rob_capacity: 4,
    };
    SimParams {
        subreads_per_read,
        subread_length,
        input_reader: block,
        interval_table: block,
        position_table: block,
    }
}
