//! Fetches subreads out of a preloaded `RamModule<u64>`, one port per
//! downstream `IntervalTableCtrl` lane.

use dram::{RamModule, RamModuleConfig};
use sim_core::{Fifo, Tickable};

use crate::model::SubRead;
use crate::params::RamBlockParams;

/// How many requests (in flight + completed-but-unconsumed) a port may have
/// outstanding before the reader stops issuing more for it.
const FILL_THRESHOLD: usize = 4;

struct Port {
    read_id_request: Fifo<u32>,
    subread: Fifo<SubRead>,
    read_counter: u64,
    done: bool,
}

/// Streams subreads for `num_reads` reads, `subreads_per_read` lanes each,
/// out of a preloaded subread table.
pub struct InputReader {
    ram: RamModule<u64>,
    ports: Vec<Port>,
    subreads_per_read: u32,
    subread_length: u32,
    num_reads: u32,
    ram_banks: u32,
    total_banks: u32,
    ram_addr_width: u32,
    bank_shift: u32,
}

impl InputReader {
    /// `subread_data` is flat, indexed by `subread_id = read_id *
    /// subreads_per_read + subread_offset`, holding each subread's packed
    /// nucleotide data. Preloaded bank-interleaved per the address formula
    /// below, independent of the table's natural on-disk order.
    #[must_use]
    pub fn new(
        params: RamBlockParams,
        subreads_per_read: u32,
        subread_length: u32,
        num_reads: u32,
        subread_data: &[u64],
    ) -> Self {
        let num_itcs = params.num_ports;
        let ram_config = params.ram_config();
        let ram_banks = ram_config.num_banks() as u32;
        let total_banks = params.num_rams * ram_banks;
        let bank_shift = ram_config.addr_row_width + ram_config.addr_col_width;
        let ram_addr_width = bank_shift + ram_config.addr_bank_width;

        let mut ram: RamModule<u64> = RamModule::new(RamModuleConfig {
            chip: ram_config,
            num_chips: params.num_rams,
            num_ports: num_itcs,
            port_input_fifo_length: params.fifo_length,
            port_rob_capacity: params.rob_capacity,
        });

        let capacity = params.num_rams as usize * (1usize << ram_addr_width);
        let mut array = vec![0u64; capacity];
        for (subread_id, &value) in subread_data.iter().enumerate() {
            let subread_id = subread_id as u64;
            let bank_id = (subread_id % u64::from(total_banks)) as u32;
            let ram_id = bank_id / ram_banks;
            let ram_bank = bank_id % ram_banks;
            let offset = subread_id / u64::from(total_banks);
            let address = (u64::from(ram_id) << ram_addr_width) | (u64::from(ram_bank) << bank_shift) | offset;
            array[address as usize] = value;
        }
        ram.preload(&array);

        let ports = (0..num_itcs)
            .map(|_| Port {
                read_id_request: Fifo::new(params.fifo_length),
                subread: Fifo::new(params.fifo_length),
                read_counter: 0,
                done: false,
            })
            .collect();

        Self {
            ram,
            ports,
            subreads_per_read,
            subread_length,
            num_reads,
            ram_banks,
            total_banks,
            ram_addr_width,
            bank_shift,
        }
    }

    #[must_use]
    pub fn subread_ready(&self, port: usize) -> bool {
        !self.ports[port].subread.is_empty()
    }

    /// Peek-and-pop the head of port `p`'s subread FIFO.
    ///
    /// # Panics
    /// Panics if `subread_ready(p)` is false.
    pub fn subread_request(&mut self, port: usize) -> SubRead {
        assert!(self.subread_ready(port), "subread_request on an empty port");
        let value = self.ports[port].subread.read_data();
        self.ports[port].subread.read_request();
        value
    }

    #[must_use]
    pub fn done(&self) -> bool {
        self.ports
            .iter()
            .all(|p| p.done && p.read_id_request.is_empty() && p.subread.is_empty())
    }

    fn dram_address(&self, subread_id: u64) -> u64 {
        let bank_id = (subread_id % u64::from(self.total_banks)) as u32;
        let ram_id = bank_id / self.ram_banks;
        let ram_bank = bank_id % self.ram_banks;
        let offset = subread_id / u64::from(self.total_banks);
        (u64::from(ram_id) << self.ram_addr_width) | (u64::from(ram_bank) << self.bank_shift) | offset
    }
}

impl Tickable for InputReader {
    fn next_clock_cycle(&mut self) {
        let s = self.subreads_per_read;
        let num_itcs = self.ports.len() as u64;

        for p in 0..self.ports.len() {
            if self.ram.is_read_ready(p) && !self.ports[p].read_id_request.is_empty() {
                let read_id = self.ports[p].read_id_request.read_data();
                self.ports[p].read_id_request.read_request();
                let data = self.ram.read_data(p);
                let subread = SubRead {
                    read_id,
                    subread_offset: p as u32 % s,
                    length: self.subread_length,
                    data,
                };
                self.ports[p].subread.write_request(subread);
            }

            let outstanding = self.ports[p].read_id_request.size() + self.ports[p].subread.size();
            let port_ready = !self.ram.is_port_request_fifo_full(p);
            if port_ready && outstanding < FILL_THRESHOLD && !self.ports[p].done {
                let read_id = self.ports[p].read_counter * (num_itcs / u64::from(s)) + (p as u64 / u64::from(s));
                if read_id >= u64::from(self.num_reads) {
                    self.ports[p].done = true;
                } else {
                    let subread_id = self.ports[p].read_counter * num_itcs + p as u64;
                    let address = self.dram_address(subread_id);
                    self.ram.read_request(p, address);
                    self.ports[p].read_id_request.write_request(read_id as u32);
                    self.ports[p].read_counter += 1;
                }
            }
        }

        for port in &mut self.ports {
            port.read_id_request.next_clock_cycle();
            port.subread.next_clock_cycle();
        }
        self.ram.next_clock_cycle();
    }
}
