//! Top-level network: owns every component and is the sole caller of the
//! shared clock. Tick order is fixed: `InputReader`, both `RamModule`s, all
//! `PositionTableCtrl`s, all `IntervalTableCtrl`s, all `Stitcher`s. This
//! order (not the leaves-first construction order) is what makes a
//! component's reads of its upstream's published state land on the cycle
//! the reference implementation's benchmark driver produces.

use dram::{RamModule, RamModuleConfig};
use sim_core::{Cycles, Tickable};

use crate::bank_layout::BankPartition;
use crate::input_reader::InputReader;
use crate::interval_table_ctrl::IntervalTableCtrl;
use crate::model::ReadPosition;
use crate::params::RamBlockParams;
use crate::position_table_ctrl::PositionTableCtrl;
use crate::stitcher::Stitcher;

/// Geometry for one run: read/subread shape, per-read-lane stitcher count,
/// and the three RAM-backed blocks' tunables.
#[derive(Debug, Clone, Copy)]
pub struct DriverConfig {
    pub subreads_per_read: u32,
    pub subread_length: u32,
    pub num_reads: u32,
    pub num_stitchers: u32,
    pub input_reader: RamBlockParams,
    pub interval_table: RamBlockParams,
    pub position_table: RamBlockParams,
}

impl DriverConfig {
    #[must_use]
    pub fn num_itcs(&self) -> u32 {
        self.subreads_per_read * self.num_stitchers
    }
}

/// The fully wired pipeline: one `InputReader`, two `RamModule`s, `num_itcs`
/// `IntervalTableCtrl`/`PositionTableCtrl` lanes, and `num_stitchers`
/// `Stitcher`s, each owning a contiguous slice of `subreads_per_read`
/// position-table lanes.
pub struct Driver {
    input_reader: InputReader,
    interval_table_ram: RamModule<u32>,
    position_table_ram: RamModule<u32>,
    itcs: Vec<IntervalTableCtrl>,
    ptcs: Vec<PositionTableCtrl>,
    stitchers: Vec<Stitcher>,
    ptcs_per_stitcher: usize,
    cycle_count: Cycles,
}

impl Driver {
    /// `subread_data` is row-major `[read][subread_offset]`, matching
    /// `format_seedtable::SubreadFile::data`. `interval_table` and
    /// `position_table` are each a table's on-disk entries in seed order.
    #[must_use]
    pub fn new(
        config: DriverConfig,
        subread_data: &[u64],
        interval_table: &[u32],
        position_table: &[u32],
    ) -> Self {
        let num_itcs = config.num_itcs();

        let input_reader = InputReader::new(
            config.input_reader,
            config.subreads_per_read,
            config.subread_length,
            config.num_reads,
            subread_data,
        );

        let interval_table_ram = Self::build_table_ram(&config.interval_table, num_itcs, interval_table);
        let position_table_ram = Self::build_table_ram(&config.position_table, num_itcs, position_table);

        let itcs = (0..num_itcs as usize)
            .map(|port| IntervalTableCtrl::new(port, &config.interval_table, interval_table.len() as u32))
            .collect();
        let ptcs = (0..num_itcs as usize)
            .map(|port| PositionTableCtrl::new(port, &config.position_table, position_table.len() as u32))
            .collect();

        let ptcs_per_stitcher = config.subreads_per_read as usize;
        let stitchers = (0..config.num_stitchers as usize)
            .map(|_| Stitcher::new(config.position_table.fifo_length))
            .collect();

        Self {
            input_reader,
            interval_table_ram,
            position_table_ram,
            itcs,
            ptcs,
            stitchers,
            ptcs_per_stitcher,
            cycle_count: Cycles::ZERO,
        }
    }

    fn build_table_ram(params: &RamBlockParams, num_ports: u32, table: &[u32]) -> RamModule<u32> {
        let ram_config = params.ram_config();
        let mut ram: RamModule<u32> = RamModule::new(RamModuleConfig {
            chip: ram_config,
            num_chips: params.num_rams,
            num_ports,
            port_input_fifo_length: params.fifo_length,
            port_rob_capacity: params.rob_capacity,
        });
        let partition = BankPartition::new(
            table.len() as u32,
            params.num_rams,
            ram_config.addr_row_width,
            ram_config.addr_col_width,
            ram_config.addr_bank_width,
        );
        ram.preload(&partition.build_preload_array(table));
        ram
    }

    #[must_use]
    pub fn cycle_count(&self) -> Cycles {
        self.cycle_count
    }

    /// Advance the whole network by one system cycle.
    pub fn tick(&mut self) {
        self.input_reader.next_clock_cycle();

        self.interval_table_ram.next_clock_cycle();
        self.position_table_ram.next_clock_cycle();

        for (ptc, itc) in self.ptcs.iter_mut().zip(self.itcs.iter_mut()) {
            ptc.tick(itc, &mut self.position_table_ram);
        }
        for itc in &mut self.itcs {
            itc.tick(&mut self.input_reader, &mut self.interval_table_ram);
        }
        for (stitcher, lanes) in self.stitchers.iter_mut().zip(self.ptcs.chunks_mut(self.ptcs_per_stitcher)) {
            stitcher.tick(lanes);
        }

        self.cycle_count += Cycles::new(1);
    }

    /// Pop every `ReadPosition` ready this cycle, across all stitchers.
    pub fn drain_ready(&mut self) -> Vec<ReadPosition> {
        let mut out = Vec::new();
        for stitcher in &mut self.stitchers {
            if stitcher.read_position_ready() {
                out.push(stitcher.read_position_data());
                stitcher.read_request();
            }
        }
        out
    }

    /// The simulation has drained every read: the input reader has issued
    /// (and every lane has consumed) every subread, and no controller or
    /// stitcher still holds unfinished work.
    #[must_use]
    pub fn done(&self) -> bool {
        self.input_reader.done()
            && self.itcs.iter().all(IntervalTableCtrl::is_idle)
            && self.ptcs.iter().all(PositionTableCtrl::is_idle)
            && self.stitchers.iter().all(Stitcher::is_idle)
    }

    /// Run until `done()`, draining `ReadPosition`s as they appear via
    /// `on_result` (called with the result and the cycle count at which it
    /// was observed). Returns the number of cycles elapsed.
    pub fn run(&mut self, mut on_result: impl FnMut(ReadPosition, Cycles)) -> Cycles {
        loop {
            let done_before_tick = self.done();
            let cycle_count = self.cycle_count;
            for result in self.drain_ready() {
                on_result(result, cycle_count);
            }
            if done_before_tick {
                return self.cycle_count;
            }
            self.tick();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::input_reader_defaults;

    // Reference "TCGACGAT", k=2.
    const INTERVAL_TABLE: [u32; 17] = [0, 0, 1, 1, 2, 2, 2, 4, 4, 6, 6, 6, 6, 6, 7, 7, 7];
    const POSITION_TABLE: [u32; 7] = [3, 6, 1, 4, 2, 5, 0];

    fn small_block(num_ports: u32) -> RamBlockParams {
        RamBlockParams {
            num_rams: 2,
            num_ports,
            row_width: 4,
            col_width: 4,
            bank_width: 1,
            system_clock_freq_mhz: 400,
            memory_clock_freq_mhz: 400,
            trcd_cycles: 4,
            tcl_cycles: 4,
            trp_cycles: 4,
            fifo_length: 8,
            rob_capacity: 4,
        }
    }

    #[test]
    fn end_to_end_single_read_single_stitcher() {
        // Read "CGAT" split into subreads "CG" (seed 6) and "AT" (seed 3).
        let subreads_per_read = 2;
        let num_stitchers = 1;
        let num_itcs = subreads_per_read * num_stitchers;
        let config = DriverConfig {
            subreads_per_read,
            subread_length: 2,
            num_reads: 1,
            num_stitchers,
            input_reader: input_reader_defaults(2, num_itcs),
            interval_table: small_block(num_itcs),
            position_table: small_block(num_itcs),
        };
        let mut driver = Driver::new(config, &[6u64, 3u64], &INTERVAL_TABLE, &POSITION_TABLE);

        let mut results = Vec::new();
        let cycles = driver.run(|rp, _cycles| results.push(rp));

        assert_eq!(results, vec![ReadPosition { read_id: 0, position: 4 }]);
        assert!(cycles.get() > 0);
    }

    #[test]
    fn two_reads_split_across_two_stitcher_lanes() {
        let subreads_per_read = 1;
        let num_stitchers = 2;
        let num_itcs = subreads_per_read * num_stitchers;
        let config = DriverConfig {
            subreads_per_read,
            subread_length: 3,
            num_reads: 2,
            num_stitchers,
            input_reader: input_reader_defaults(2, num_itcs),
            interval_table: small_block(num_itcs),
            position_table: small_block(num_itcs),
        };
        // Two single-subread reads, each looked up directly (K=1): seed 6
        // ("CGA"-equivalent under this table) -> {1,4}; seed 3 -> {6}.
        let mut driver = Driver::new(config, &[6u64, 3u64], &INTERVAL_TABLE, &POSITION_TABLE);

        let mut results = Vec::new();
        driver.run(|rp, _cycles| results.push(rp));

        let mut by_read: Vec<_> = results.into_iter().map(|rp| (rp.read_id, rp.position)).collect();
        by_read.sort_unstable();
        assert_eq!(by_read, vec![(0, 1), (0, 4), (1, 6)]);
    }
}
