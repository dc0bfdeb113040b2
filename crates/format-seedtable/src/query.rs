//! Query file: `u32 num_queries`, `u32 query_length`, then each query
//! 2-bit-packed and byte-aligned.

use crate::dna::{self, Base};
use crate::error::{read_u32, FormatError};

#[derive(Debug, Clone)]
pub struct QuerySet {
    pub num_queries: u32,
    pub query_length: u32,
    bytes_per_query: usize,
    packed: Vec<u8>,
}

impl QuerySet {
    #[must_use]
    pub fn from_queries(query_length: u32, queries: &[Vec<Base>]) -> Self {
        let bytes_per_query = (query_length as usize).div_ceil(4);
        let mut packed = Vec::with_capacity(queries.len() * bytes_per_query);
        for query in queries {
            debug_assert_eq!(query.len(), query_length as usize);
            packed.extend(dna::pack_bytes(query));
        }
        Self {
            num_queries: queries.len() as u32,
            query_length,
            bytes_per_query,
            packed,
        }
    }

    pub fn parse(data: &[u8]) -> Result<Self, FormatError> {
        let mut pos = 0;
        let num_queries = read_u32(data, &mut pos, "query file header")?;
        let query_length = read_u32(data, &mut pos, "query file header")?;
        let bytes_per_query = (query_length as usize).div_ceil(4);
        let total = num_queries as usize * bytes_per_query;
        let packed = data
            .get(pos..pos + total)
            .ok_or(FormatError::Truncated {
                context: "query file body",
            })?
            .to_vec();
        Ok(Self {
            num_queries,
            query_length,
            bytes_per_query,
            packed,
        })
    }

    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(8 + self.packed.len());
        out.extend_from_slice(&self.num_queries.to_le_bytes());
        out.extend_from_slice(&self.query_length.to_le_bytes());
        out.extend_from_slice(&self.packed);
        out
    }

    #[must_use]
    pub fn query(&self, index: usize) -> Vec<Base> {
        let start = index * self.bytes_per_query;
        let end = start + self.bytes_per_query;
        dna::unpack_bytes(&self.packed[start..end], self.query_length as usize)
    }
}
