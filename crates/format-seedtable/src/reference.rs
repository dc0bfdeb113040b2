//! Reference sequence file: `u32` length followed by 2-bit-packed bases.

use crate::dna::{self, Base};
use crate::error::{read_u32, FormatError};

#[derive(Debug, Clone)]
pub struct ReferenceSequence {
    pub length: u32,
    packed: Vec<u8>,
}

impl ReferenceSequence {
    #[must_use]
    pub fn from_bases(bases: &[Base]) -> Self {
        Self {
            length: bases.len() as u32,
            packed: dna::pack_bytes(bases),
        }
    }

    pub fn parse(data: &[u8]) -> Result<Self, FormatError> {
        let mut pos = 0;
        let length = read_u32(data, &mut pos, "reference sequence header")?;
        let packed_len = (length as usize).div_ceil(4);
        let packed = data
            .get(pos..pos + packed_len)
            .ok_or(FormatError::Truncated {
                context: "reference sequence body",
            })?
            .to_vec();
        Ok(Self { length, packed })
    }

    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(4 + self.packed.len());
        out.extend_from_slice(&self.length.to_le_bytes());
        out.extend_from_slice(&self.packed);
        out
    }

    #[must_use]
    pub fn bases(&self) -> Vec<Base> {
        dna::unpack_bytes(&self.packed, self.length as usize)
    }

    #[must_use]
    pub fn base_at(&self, index: usize) -> Base {
        let byte = self.packed[index / 4];
        let shift = 6 - 2 * (index % 4);
        Base::from_code((byte >> shift) & 0b11)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let bases = [Base::T, Base::C, Base::G, Base::A, Base::C, Base::G, Base::A, Base::T];
        let seq = ReferenceSequence::from_bases(&bases);
        let bytes = seq.to_bytes();
        let parsed = ReferenceSequence::parse(&bytes).expect("valid");
        assert_eq!(parsed.length, 8);
        assert_eq!(parsed.bases(), bases);
    }

    #[test]
    fn base_at_matches_bases() {
        let bases = [Base::A, Base::C, Base::G, Base::T, Base::A];
        let seq = ReferenceSequence::from_bases(&bases);
        for (i, &b) in bases.iter().enumerate() {
            assert_eq!(seq.base_at(i), b);
        }
    }

    #[test]
    fn truncated_header_is_an_error() {
        assert!(ReferenceSequence::parse(&[1, 2]).is_err());
    }
}
