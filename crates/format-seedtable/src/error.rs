use std::fmt;

/// Parse failure for one of this crate's binary formats.
#[derive(Debug)]
pub enum FormatError {
    /// The buffer ended before a fixed-size header or an array it declared
    /// could be fully read.
    Truncated { context: &'static str },
    /// A subread length field exceeded the 32-base limit a `u64` can pack.
    SubreadTooLong { length: u32 },
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated { context } => write!(f, "truncated {context}"),
            Self::SubreadTooLong { length } => {
                write!(f, "subread length {length} exceeds the 32-base limit")
            }
        }
    }
}

impl std::error::Error for FormatError {}

pub(crate) fn read_u32(data: &[u8], pos: &mut usize, context: &'static str) -> Result<u32, FormatError> {
    let bytes = data
        .get(*pos..*pos + 4)
        .ok_or(FormatError::Truncated { context })?;
    *pos += 4;
    Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

pub(crate) fn read_u64(data: &[u8], pos: &mut usize, context: &'static str) -> Result<u64, FormatError> {
    let bytes = data
        .get(*pos..*pos + 8)
        .ok_or(FormatError::Truncated { context })?;
    *pos += 8;
    let mut array = [0u8; 8];
    array.copy_from_slice(bytes);
    Ok(u64::from_le_bytes(array))
}
