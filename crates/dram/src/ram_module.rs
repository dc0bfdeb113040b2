//! Multi-port, multi-chip RAM module: round-robin fairness arbitration per
//! chip plus a per-port reorder buffer so out-of-order chip completions are
//! retired back to requesters in the order they were issued.

use std::collections::VecDeque;

use sim_core::Tickable;

use crate::ram::{Ram, RamConfig};

/// Geometry and timing shared by every chip in a [`RamModule`], plus the
/// module-level queue depths that aren't properties of a single chip.
#[derive(Debug, Clone, Copy)]
pub struct RamModuleConfig {
    pub chip: RamConfig,
    pub num_chips: u32,
    pub num_ports: u32,
    /// Depth of each port's inbound request FIFO.
    pub port_input_fifo_length: usize,
    /// Depth of each port's reorder buffer. Bounds how many reads a port may
    /// have in flight across all chips at once.
    pub port_rob_capacity: usize,
}

impl RamModuleConfig {
    fn chip_address_bits(&self) -> u32 {
        self.chip.addr_row_width + self.chip.addr_col_width + self.chip.addr_bank_width
    }

    fn decompose(&self, address: u64) -> (usize, u64) {
        let bits = self.chip_address_bits();
        let chip_id = (address >> bits) as usize;
        let chip_address = address & ((1u64 << bits) - 1);
        (chip_id, chip_address)
    }
}

#[derive(Clone, Copy)]
enum RobEntry<T> {
    Pending(u64),
    Ready(u64, T),
}

impl<T> RobEntry<T> {
    fn ticket(&self) -> u64 {
        match *self {
            Self::Pending(ticket) | Self::Ready(ticket, _) => ticket,
        }
    }
}

/// Per-chip record of which port and ROB ticket a dispatched read belongs
/// to, so a chip's `read_ready` pulse — which arrives in that chip's own
/// dispatch order, not the port's global dispatch order — can be routed
/// back to the right ROB slot even when a port has reads outstanding on
/// more than one chip at once.
struct InFlight {
    port: usize,
    ticket: u64,
}

#[derive(Clone, Copy)]
enum PortRequest {
    Read { address: u64 },
    Write { address: u64 },
}

/// A fairness-scheduled façade over `num_chips` [`Ram`] chips, exposing
/// `num_ports` independent request/response interfaces.
///
/// Each port has its own inbound request FIFO and its own reorder buffer
/// (ROB). A read is dispatched from a port's FIFO to the chip its address
/// maps to, in program order; because different addresses land on different
/// chips and chips retire at different times, a port's ROB reassembles
/// in-order completions. Round-robin arbitration among ports contending for
/// the same chip guarantees no port starves.
pub struct RamModule<T> {
    config: RamModuleConfig,
    chips: Vec<Ram<T>>,

    port_requests: Vec<VecDeque<(PortRequest, Option<T>)>>,
    port_rob: Vec<VecDeque<RobEntry<T>>>,
    port_read_ready: Vec<bool>,
    port_read_data: Vec<Option<T>>,

    /// In-flight reads per chip, oldest first, matching that chip's own
    /// FIFO-ordered `Ram::read_ready` pulses back to a `(port, address)`.
    chip_in_flight: Vec<VecDeque<InFlight>>,
    /// Next port to favor when a chip has more than one contending request,
    /// one counter per chip.
    port_counter: Vec<usize>,
    /// Total reads+writes dispatched to each chip, for utilization reporting.
    chip_access_count: Vec<u64>,
    /// Monotonic ROB ticket source, one per port.
    next_ticket: Vec<u64>,
}

impl<T: Copy + Default> RamModule<T> {
    #[must_use]
    pub fn new(config: RamModuleConfig) -> Self {
        let num_chips = config.num_chips as usize;
        let num_ports = config.num_ports as usize;
        Self {
            chips: (0..num_chips).map(|_| Ram::new(config.chip)).collect(),
            port_requests: (0..num_ports)
                .map(|_| VecDeque::with_capacity(config.port_input_fifo_length))
                .collect(),
            port_rob: (0..num_ports)
                .map(|_| VecDeque::with_capacity(config.port_rob_capacity))
                .collect(),
            port_read_ready: vec![false; num_ports],
            port_read_data: vec![None; num_ports],
            chip_in_flight: (0..num_chips).map(|_| VecDeque::new()).collect(),
            port_counter: vec![0; num_chips],
            chip_access_count: vec![0; num_chips],
            next_ticket: vec![0; num_ports],
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> RamModuleConfig {
        self.config
    }

    /// Distribute `data` across chips in address order, bypassing timing.
    /// Meant for loading reference/table contents before the simulation
    /// starts.
    pub fn preload(&mut self, data: &[T]) {
        for (address, &value) in data.iter().enumerate() {
            let (chip_id, chip_address) = self.config.decompose(address as u64);
            self.chips[chip_id].direct_write(chip_address, value);
        }
    }

    /// Number of reads and writes this chip has serviced so far.
    #[must_use]
    pub fn chip_access_count(&self, chip_id: usize) -> u64 {
        self.chip_access_count[chip_id]
    }

    #[must_use]
    pub fn is_port_request_fifo_full(&self, port: usize) -> bool {
        self.port_requests[port].len() >= self.config.port_input_fifo_length
    }

    /// Enqueue a read against `port`. Completion is signalled later by
    /// [`RamModule::is_read_ready`].
    ///
    /// # Panics
    /// Panics if the port's request FIFO is already full.
    pub fn read_request(&mut self, port: usize, address: u64) {
        assert!(
            !self.is_port_request_fifo_full(port),
            "read_request on a full port input FIFO"
        );
        self.port_requests[port].push_back((PortRequest::Read { address }, None));
    }

    /// Enqueue a write against `port`.
    ///
    /// # Panics
    /// Panics if the port's request FIFO is already full.
    pub fn write_request(&mut self, port: usize, address: u64, value: T) {
        assert!(
            !self.is_port_request_fifo_full(port),
            "write_request on a full port input FIFO"
        );
        self.port_requests[port].push_back((PortRequest::Write { address }, Some(value)));
    }

    /// True once a read issued on `port` has a value ready this cycle.
    #[must_use]
    pub fn is_read_ready(&self, port: usize) -> bool {
        self.port_read_ready[port]
    }

    #[must_use]
    pub fn read_data(&self, port: usize) -> T {
        self.port_read_data[port].expect("read_data on a port with no ready read")
    }

    /// True if a port's ROB has no free slot for another dispatched read.
    fn is_rob_full(&self, port: usize) -> bool {
        self.port_rob[port].len() >= self.config.port_rob_capacity
    }

    /// Dispatch phase: for each chip independently, scan ports starting from
    /// that chip's round-robin pointer, looking for the first port whose
    /// head request targets this chip. A read is only dispatched if that
    /// port's ROB has free capacity; otherwise the scan continues to the
    /// next port rather than blocking the chip for a cycle.
    ///
    /// A port's request FIFO can pop at most one head element per cycle, so
    /// once a port has fed one chip this cycle it is skipped for the rest of
    /// the chips' scans.
    fn dispatch(&mut self) {
        let num_ports = self.config.num_ports as usize;
        let mut dispatched_port_this_cycle = vec![false; num_ports];
        for chip_id in 0..self.chips.len() {
            for offset in 0..num_ports {
                let port = (self.port_counter[chip_id] + offset) % num_ports;
                if dispatched_port_this_cycle[port] {
                    continue;
                }
                let Some(&(request, value)) = self.port_requests[port].front() else {
                    continue;
                };
                let address = match request {
                    PortRequest::Read { address } | PortRequest::Write { address } => address,
                };
                let (target_chip, chip_address) = self.config.decompose(address);
                if target_chip != chip_id {
                    continue;
                }
                if matches!(request, PortRequest::Read { .. }) && self.is_rob_full(port) {
                    continue;
                }

                dispatched_port_this_cycle[port] = true;
                self.port_requests[port].pop_front();
                self.chip_access_count[chip_id] += 1;
                match request {
                    PortRequest::Read { .. } => {
                        self.chips[chip_id].read_request(chip_address);
                        let ticket = self.next_ticket[port];
                        self.next_ticket[port] += 1;
                        self.chip_in_flight[chip_id].push_back(InFlight { port, ticket });
                        self.port_rob[port].push_back(RobEntry::Pending(ticket));
                    }
                    PortRequest::Write { .. } => {
                        let value = value.expect("write request carries a value");
                        self.chips[chip_id].write_request(chip_address, value);
                    }
                }
                self.port_counter[chip_id] = (port + 1) % num_ports;
                break;
            }
        }
    }

    /// Fill phase: route each chip's `read_ready` pulse back to the matching
    /// in-flight entry's port and mark that port's ROB slot ready.
    fn fill(&mut self) {
        for chip_id in 0..self.chips.len() {
            if !self.chips[chip_id].read_ready() {
                continue;
            }
            let value = self.chips[chip_id].read_data();
            let entry = self.chip_in_flight[chip_id]
                .pop_front()
                .expect("a ready chip must have a matching in-flight entry");
            let rob = &mut self.port_rob[entry.port];
            let slot = rob
                .iter_mut()
                .find(|slot| slot.ticket() == entry.ticket)
                .expect("the in-flight entry's ticket must own a ROB slot on its port");
            *slot = RobEntry::Ready(entry.ticket, value);
        }
    }

    /// Retire phase: for each port, if the ROB head is ready, publish it and
    /// pop it so the next cycle's head is the next read in program order.
    fn retire(&mut self) {
        for port in 0..self.port_rob.len() {
            self.port_read_ready[port] = false;
            if let Some(RobEntry::Ready(..)) = self.port_rob[port].front() {
                let Some(RobEntry::Ready(_, value)) = self.port_rob[port].pop_front() else {
                    unreachable!("front checked ready above");
                };
                self.port_read_ready[port] = true;
                self.port_read_data[port] = Some(value);
            }
        }
    }
}

impl<T: Copy + Default> Tickable for RamModule<T> {
    fn next_clock_cycle(&mut self) {
        self.dispatch();
        self.fill();
        self.retire();
        for chip in &mut self.chips {
            chip.next_clock_cycle();
        }
    }
}
