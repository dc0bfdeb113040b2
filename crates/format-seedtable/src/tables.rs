//! Interval table and position table files built by the genome preprocessor
//! and consumed by `IntervalTableCtrl` / `PositionTableCtrl`.

use crate::error::{read_u32, FormatError};

/// Maps each seed of length `k` to the start index of its block in the
/// position table. Size is `4^k + 1`; the last entry is the table's total
/// length.
#[derive(Debug, Clone)]
pub struct IntervalTable {
    pub entries: Vec<u32>,
}

impl IntervalTable {
    pub fn parse(data: &[u8]) -> Result<Self, FormatError> {
        let mut pos = 0;
        let size = read_u32(data, &mut pos, "interval table header")?;
        let mut entries = Vec::with_capacity(size as usize);
        for _ in 0..size {
            entries.push(read_u32(data, &mut pos, "interval table body")?);
        }
        Ok(Self { entries })
    }

    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(4 + self.entries.len() * 4);
        out.extend_from_slice(&(self.entries.len() as u32).to_le_bytes());
        for entry in &self.entries {
            out.extend_from_slice(&entry.to_le_bytes());
        }
        out
    }

    /// `[start, length)` of the position table block for `seed`.
    #[must_use]
    pub fn interval(&self, seed: usize) -> (u32, u32) {
        let start = self.entries[seed];
        let end = self.entries[seed + 1];
        (start, end - start)
    }
}

/// Concatenation of every seed's sorted candidate positions in the reference.
#[derive(Debug, Clone)]
pub struct PositionTable {
    pub ref_seq_length: u32,
    pub seed_length: u32,
    pub positions: Vec<u32>,
}

impl PositionTable {
    pub fn parse(data: &[u8]) -> Result<Self, FormatError> {
        let mut pos = 0;
        let ref_seq_length = read_u32(data, &mut pos, "position table header")?;
        let seed_length = read_u32(data, &mut pos, "position table header")?;
        let count = ref_seq_length as usize - seed_length as usize + 1;
        let mut positions = Vec::with_capacity(count);
        for _ in 0..count {
            positions.push(read_u32(data, &mut pos, "position table body")?);
        }
        Ok(Self {
            ref_seq_length,
            seed_length,
            positions,
        })
    }

    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(8 + self.positions.len() * 4);
        out.extend_from_slice(&self.ref_seq_length.to_le_bytes());
        out.extend_from_slice(&self.seed_length.to_le_bytes());
        for position in &self.positions {
            out.extend_from_slice(&position.to_le_bytes());
        }
        out
    }
}
