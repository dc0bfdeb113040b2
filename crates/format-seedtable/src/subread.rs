//! Subread file: `u32 num_queries`, `u32 num_subreads_per_query`,
//! `u32 subread_length`, then one `u64` per subread holding its bases
//! right-justified, 2 bits each.

use crate::error::{read_u32, read_u64, FormatError};

#[derive(Debug, Clone)]
pub struct SubreadFile {
    pub num_queries: u32,
    pub num_subreads_per_query: u32,
    pub subread_length: u32,
    /// Row-major: `[query][subread]`.
    pub data: Vec<u64>,
}

impl SubreadFile {
    pub fn parse(data: &[u8]) -> Result<Self, FormatError> {
        let mut pos = 0;
        let num_queries = read_u32(data, &mut pos, "subread file header")?;
        let num_subreads_per_query = read_u32(data, &mut pos, "subread file header")?;
        let subread_length = read_u32(data, &mut pos, "subread file header")?;
        if subread_length > 32 {
            return Err(FormatError::SubreadTooLong {
                length: subread_length,
            });
        }
        let total = num_queries as usize * num_subreads_per_query as usize;
        let mut values = Vec::with_capacity(total);
        for _ in 0..total {
            values.push(read_u64(data, &mut pos, "subread file body")?);
        }
        Ok(Self {
            num_queries,
            num_subreads_per_query,
            subread_length,
            data: values,
        })
    }

    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(12 + self.data.len() * 8);
        out.extend_from_slice(&self.num_queries.to_le_bytes());
        out.extend_from_slice(&self.num_subreads_per_query.to_le_bytes());
        out.extend_from_slice(&self.subread_length.to_le_bytes());
        for value in &self.data {
            out.extend_from_slice(&value.to_le_bytes());
        }
        out
    }

    #[must_use]
    pub fn subread(&self, query: usize, subread: usize) -> u64 {
        self.data[query * self.num_subreads_per_query as usize + subread]
    }
}
