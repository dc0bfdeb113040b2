//! Looks up each subread's seed in the interval table, emitting
//! `[start, length)` position-table intervals for the matching `PositionTableCtrl`.

use dram::RamModule;
use sim_core::Fifo;

use crate::bank_layout::BankPartition;
use crate::input_reader::InputReader;
use crate::model::{PositionTableInterval, SubRead, SubReadInterval};
use crate::params::RamBlockParams;

/// One lane of the interval-table lookup pipeline: two sequential reads
/// (`seed`, `seed+1`) resolve to one `[start, length)` interval.
pub struct IntervalTableCtrl {
    port: usize,
    partition: BankPartition,
    in_flight: Fifo<SubRead>,
    output: Fifo<SubReadInterval>,
    awaiting_first_request: bool,
    awaiting_first_read: bool,
    first_lookup_data: u32,
    second_lookup: u32,
}

impl IntervalTableCtrl {
    #[must_use]
    pub fn new(port: usize, params: &RamBlockParams, interval_table_size: u32) -> Self {
        let ram_config = params.ram_config();
        Self {
            port,
            partition: BankPartition::new(
                interval_table_size,
                params.num_rams,
                ram_config.addr_row_width,
                ram_config.addr_col_width,
                ram_config.addr_bank_width,
            ),
            in_flight: Fifo::new(params.fifo_length),
            output: Fifo::new(params.fifo_length),
            awaiting_first_request: true,
            awaiting_first_read: true,
            first_lookup_data: 0,
            second_lookup: 0,
        }
    }

    #[must_use]
    pub fn interval_ready(&self) -> bool {
        !self.output.is_empty()
    }

    #[must_use]
    pub fn interval_data(&self) -> SubReadInterval {
        self.output.read_data()
    }

    pub fn read_request(&mut self) {
        self.output.read_request();
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.in_flight.is_empty() && self.output.is_empty()
    }

    pub fn tick(&mut self, input_reader: &mut InputReader, ram: &mut RamModule<u32>) {
        if ram.is_read_ready(self.port) {
            let data = ram.read_data(self.port);
            if self.awaiting_first_read {
                self.first_lookup_data = data;
                self.awaiting_first_read = false;
            } else {
                let subread = self.in_flight.read_data();
                self.in_flight.read_request();
                self.output.write_request(SubReadInterval {
                    subread,
                    interval: PositionTableInterval {
                        start: self.first_lookup_data,
                        length: data.saturating_sub(self.first_lookup_data),
                    },
                });
                self.awaiting_first_read = true;
            }
        }

        let port_ready = !ram.is_port_request_fifo_full(self.port);
        let output_has_room = !self.output.is_full() && !self.in_flight.is_full();
        if input_reader.subread_ready(self.port) && self.awaiting_first_request && output_has_room && port_ready {
            let subread = input_reader.subread_request(self.port);
            ram.read_request(self.port, self.partition.address_of(subread.data as u32));
            self.in_flight.write_request(subread);
            self.second_lookup = subread.data as u32 + 1;
            self.awaiting_first_request = false;
        } else if !self.awaiting_first_request && port_ready {
            ram.read_request(self.port, self.partition.address_of(self.second_lookup));
            self.awaiting_first_request = true;
        }

        self.in_flight.next_clock_cycle();
        self.output.next_clock_cycle();
    }
}
