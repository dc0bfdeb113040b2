//! Streams every position in a resolved interval out of the position table,
//! filtering candidates whose adjusted position would underflow.

use dram::RamModule;
use sim_core::Fifo;

use crate::bank_layout::BankPartition;
use crate::interval_table_ctrl::IntervalTableCtrl;
use crate::model::{PositionTableInterval, PositionTableResult, SubRead, SubReadInterval};
use crate::params::RamBlockParams;

pub struct PositionTableCtrl {
    port: usize,
    partition: BankPartition,
    in_flight: Fifo<SubReadInterval>,
    output: Fifo<PositionTableResult>,
    /// Subread/start/length of the interval currently being dispatched,
    /// valid while `dispatched_count > 0`.
    current_subread: SubRead,
    current_start: u32,
    current_length: u32,
    /// Positions dispatched so far for the current interval. Tracked
    /// separately from `output_position_index` (how many completions have
    /// come back) so a RAM port stall never causes the two to disagree
    /// about which interval is still open.
    dispatched_count: u32,
    output_position_index: u32,
}

impl PositionTableCtrl {
    #[must_use]
    pub fn new(port: usize, params: &RamBlockParams, position_table_size: u32) -> Self {
        let ram_config = params.ram_config();
        Self {
            port,
            partition: BankPartition::new(
                position_table_size,
                params.num_rams,
                ram_config.addr_row_width,
                ram_config.addr_col_width,
                ram_config.addr_bank_width,
            ),
            in_flight: Fifo::new(params.fifo_length),
            output: Fifo::new(params.fifo_length),
            current_subread: SubRead {
                read_id: 0,
                subread_offset: 0,
                length: 0,
                data: 0,
            },
            current_start: 0,
            current_length: 0,
            dispatched_count: 0,
            output_position_index: 0,
        }
    }

    #[must_use]
    pub fn position_ready(&self) -> bool {
        !self.output.is_empty()
    }

    #[must_use]
    pub fn position_data(&self) -> PositionTableResult {
        self.output.read_data()
    }

    pub fn read_request(&mut self) {
        self.output.read_request();
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.in_flight.is_empty() && self.output.is_empty()
    }

    pub fn tick(&mut self, itc: &mut IntervalTableCtrl, ram: &mut RamModule<u32>) {
        self.handle_arrival(ram);
        self.dispatch(itc, ram);
        self.in_flight.next_clock_cycle();
        self.output.next_clock_cycle();
    }

    fn handle_arrival(&mut self, ram: &mut RamModule<u32>) {
        if self.in_flight.is_empty() {
            return;
        }
        if self.in_flight.read_data().interval.length == 0 {
            let sri = self.in_flight.read_data();
            self.in_flight.read_request();
            self.output.write_request(PositionTableResult {
                subread: sri.subread,
                position: 0,
                last: true,
                empty: true,
            });
            return;
        }
        if !ram.is_read_ready(self.port) {
            return;
        }
        let position = ram.read_data(self.port);
        let sri = self.in_flight.read_data();
        self.in_flight.read_request();

        self.output_position_index += 1;
        let last = self.output_position_index == sri.interval.length;
        if last {
            self.output_position_index = 0;
        }

        let threshold = sri.subread.length * sri.subread.subread_offset;
        if position >= threshold {
            self.output.write_request(PositionTableResult {
                subread: sri.subread,
                position: position - threshold,
                last,
                empty: false,
            });
        } else if last {
            self.output.write_request(PositionTableResult {
                subread: sri.subread,
                position: 0,
                last: true,
                empty: true,
            });
        }
    }

    fn dispatch(&mut self, itc: &mut IntervalTableCtrl, ram: &mut RamModule<u32>) {
        let port_ready = !ram.is_port_request_fifo_full(self.port);
        let has_room = !self.in_flight.is_full() && !self.output.is_full();

        if self.dispatched_count == 0 {
            if itc.interval_ready() && has_room && port_ready {
                let sri = itc.interval_data();
                itc.read_request();
                self.current_subread = sri.subread;
                self.current_start = sri.interval.start;
                self.current_length = sri.interval.length;
                self.in_flight.write_request(sri);
                if sri.interval.length > 0 {
                    ram.read_request(self.port, self.partition.address_of(sri.interval.start));
                    self.dispatched_count = if sri.interval.length == 1 { 0 } else { 1 };
                }
            }
        } else if has_room && port_ready {
            let index = self.current_start + self.dispatched_count;
            ram.read_request(self.port, self.partition.address_of(index));
            self.in_flight.write_request(SubReadInterval {
                subread: self.current_subread,
                interval: PositionTableInterval {
                    start: self.current_start,
                    length: self.current_length,
                },
            });
            self.dispatched_count += 1;
            if self.dispatched_count == self.current_length {
                self.dispatched_count = 0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input_reader::InputReader;
    use crate::params::small_test_params;
    use dram::RamModuleConfig;
    use sim_core::Tickable;

    // Reference "TCGACGAT", k=2. Seed 8 ("GA", base0*4+base1 encoding) covers [4, 6)
    // of the position table, i.e. positions {2, 5}.
    const INTERVAL_TABLE: [u32; 17] = [0, 0, 1, 1, 2, 2, 2, 4, 4, 6, 6, 6, 6, 6, 7, 7, 7];
    const POSITION_TABLE: [u32; 7] = [3, 6, 1, 4, 2, 5, 0];

    fn make_table_ram(params: &RamBlockParams, table: &[u32]) -> RamModule<u32> {
        let ram_config = params.ram_config();
        let mut ram: RamModule<u32> = RamModule::new(RamModuleConfig {
            chip: ram_config,
            num_chips: params.num_rams,
            num_ports: params.num_ports,
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

    #[test]
    fn streams_every_position_in_the_resolved_interval() {
        let sim_params = small_test_params(1, 2);
        let mut interval_ram = make_table_ram(&sim_params.interval_table, &INTERVAL_TABLE);
        let mut position_ram = make_table_ram(&sim_params.position_table, &POSITION_TABLE);
        let mut reader = InputReader::new(sim_params.input_reader, 1, 2, 1, &[8u64]);
        let mut itc = IntervalTableCtrl::new(0, &sim_params.interval_table, INTERVAL_TABLE.len() as u32);
        let mut ptc = PositionTableCtrl::new(0, &sim_params.position_table, POSITION_TABLE.len() as u32);

        let mut results = Vec::new();
        let mut cycles = 0;
        while results.len() < 2 && cycles < 1000 {
            reader.next_clock_cycle();
            interval_ram.next_clock_cycle();
            itc.tick(&mut reader, &mut interval_ram);
            position_ram.next_clock_cycle();
            ptc.tick(&mut itc, &mut position_ram);
            if ptc.position_ready() {
                results.push(ptc.position_data());
                ptc.read_request();
            }
            cycles += 1;
        }

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].position, 2);
        assert!(!results[0].last);
        assert!(!results[0].empty);
        assert_eq!(results[1].position, 5);
        assert!(results[1].last);
        assert!(!results[1].empty);
    }

    #[test]
    fn empty_interval_retires_synthetically_with_no_ram_reads() {
        let sim_params = small_test_params(1, 2);
        let mut interval_ram = make_table_ram(&sim_params.interval_table, &INTERVAL_TABLE);
        let mut position_ram = make_table_ram(&sim_params.position_table, &POSITION_TABLE);
        // Seed 0 ("AA") never occurs: interval(0) = (0, 0).
        let mut reader = InputReader::new(sim_params.input_reader, 1, 2, 1, &[0u64]);
        let mut itc = IntervalTableCtrl::new(0, &sim_params.interval_table, INTERVAL_TABLE.len() as u32);
        let mut ptc = PositionTableCtrl::new(0, &sim_params.position_table, POSITION_TABLE.len() as u32);

        let mut result = None;
        let mut cycles = 0;
        while result.is_none() && cycles < 1000 {
            reader.next_clock_cycle();
            interval_ram.next_clock_cycle();
            itc.tick(&mut reader, &mut interval_ram);
            position_ram.next_clock_cycle();
            ptc.tick(&mut itc, &mut position_ram);
            if ptc.position_ready() {
                result = Some(ptc.position_data());
            }
            cycles += 1;
        }

        let result = result.expect("empty interval must still retire with a result");
        assert!(result.empty);
        assert!(result.last);
    }

    #[test]
    fn length_one_interval_retires_exactly_once_and_goes_idle() {
        let sim_params = small_test_params(1, 2);
        let mut interval_ram = make_table_ram(&sim_params.interval_table, &INTERVAL_TABLE);
        let mut position_ram = make_table_ram(&sim_params.position_table, &POSITION_TABLE);
        // Seed 3 ("AC") covers interval (start=1, length=1): a single position, 6.
        let mut reader = InputReader::new(sim_params.input_reader, 1, 2, 1, &[3u64]);
        let mut itc = IntervalTableCtrl::new(0, &sim_params.interval_table, INTERVAL_TABLE.len() as u32);
        let mut ptc = PositionTableCtrl::new(0, &sim_params.position_table, POSITION_TABLE.len() as u32);

        let mut results = Vec::new();
        let mut cycles = 0;
        // Keep ticking well past the point the one result arrives, to catch
        // a dispatcher that keeps issuing reads past the end of the interval.
        while cycles < 1000 {
            reader.next_clock_cycle();
            interval_ram.next_clock_cycle();
            itc.tick(&mut reader, &mut interval_ram);
            position_ram.next_clock_cycle();
            ptc.tick(&mut itc, &mut position_ram);
            if ptc.position_ready() {
                results.push(ptc.position_data());
                ptc.read_request();
            }
            cycles += 1;
        }

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].position, 6);
        assert!(results[0].last);
        assert!(!results[0].empty);
        assert!(ptc.is_idle());
    }
}
