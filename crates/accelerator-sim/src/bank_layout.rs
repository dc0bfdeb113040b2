//! Non-uniform element-to-bank partitioning shared by `IntervalTableCtrl`
//! and `PositionTableCtrl`.
//!
//! A table of `total_elems` entries is split across `num_rams * 2^bank_w`
//! banks as evenly as possible: each bank holds `total_elems / partitions`
//! entries, and the first `total_elems % partitions` banks hold one extra.
//! `chip_address` walks that partition table linearly to turn a flat table
//! index into a `RamModule` address; `build_preload_array` lays a table out
//! in partition order so a single sequential `RamModule::preload` call
//! reproduces the same layout.

pub struct BankPartition {
    elems_per_partition: Vec<u32>,
    banks_per_ram: u32,
    ram_addr_width: u32,
    bank_addr_width: u32,
}

impl BankPartition {
    #[must_use]
    pub fn new(total_elems: u32, num_rams: u32, row_width: u32, col_width: u32, bank_width: u32) -> Self {
        let banks_per_ram = 1u32 << bank_width;
        let partitions = num_rams * banks_per_ram;
        let base = total_elems / partitions;
        let remainder = total_elems % partitions;
        let elems_per_partition = (0..partitions)
            .map(|i| base + u32::from(i < remainder))
            .collect();
        Self {
            elems_per_partition,
            banks_per_ram,
            ram_addr_width: row_width + col_width + bank_width,
            bank_addr_width: row_width + col_width,
        }
    }

    /// Translate a flat table index into a `RamModule` address by walking
    /// partitions in order until `index` falls inside one.
    ///
    /// # Panics
    /// Panics if `index` is beyond the table's total length.
    #[must_use]
    pub fn address_of(&self, mut index: u32) -> u64 {
        let mut partition = 0usize;
        while index >= self.elems_per_partition[partition] {
            index -= self.elems_per_partition[partition];
            partition += 1;
        }
        let ram_id = partition as u32 / self.banks_per_ram;
        let bank_id = partition as u32 % self.banks_per_ram;
        (u64::from(ram_id) << self.ram_addr_width)
            + (u64::from(bank_id) << self.bank_addr_width)
            + u64::from(index)
    }

    /// Lay `entries` out across a zero-filled array sized for
    /// `RamModule::preload`, i.e. `num_rams * 2^ram_addr_width` elements, so
    /// that entry `i` lands at `address_of(i)`.
    #[must_use]
    pub fn build_preload_array<T: Copy + Default>(&self, entries: &[T]) -> Vec<T> {
        let num_rams = self.elems_per_partition.len() as u32 / self.banks_per_ram;
        let mut array = vec![T::default(); (num_rams as usize) << self.ram_addr_width];
        for (i, &value) in entries.iter().enumerate() {
            array[self.address_of(i as u32) as usize] = value;
        }
        array
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_split_across_partitions() {
        // 2 rams * 2^1 banks = 4 partitions, 16 entries -> 4 each.
        let partition = BankPartition::new(16, 2, 2, 2, 1);
        assert_eq!(partition.elems_per_partition, vec![4, 4, 4, 4]);
    }

    #[test]
    fn remainder_distributed_to_first_partitions() {
        let partition = BankPartition::new(10, 2, 2, 2, 1); // 4 partitions, 10/4=2 r=2
        assert_eq!(partition.elems_per_partition, vec![3, 3, 2, 2]);
    }

    #[test]
    fn preload_array_round_trip_through_ram_module() {
        use dram::{RamModule, RamModuleConfig};
        use sim_core::{SystemClock, Tickable};

        let total = 10u32;
        let partition = BankPartition::new(total, 2, 2, 2, 1);
        let entries: Vec<u32> = (0..total).collect();
        let array = partition.build_preload_array(&entries);

        let mut module: RamModule<u32> = RamModule::new(RamModuleConfig {
            chip: dram::RamConfig {
                addr_row_width: 2,
                addr_col_width: 2,
                addr_bank_width: 1,
                clock: SystemClock::new(400, 400),
                trcd_cycles: 2,
                tcl_cycles: 2,
                trp_cycles: 2,
            },
            num_chips: 2,
            num_ports: 1,
            port_input_fifo_length: 4,
            port_rob_capacity: 4,
        });
        module.preload(&array);

        for i in 0..total {
            module.read_request(0, partition.address_of(i));
            loop {
                module.next_clock_cycle();
                if module.is_read_ready(0) {
                    break;
                }
            }
            assert_eq!(module.read_data(0), i);
        }
    }
}
