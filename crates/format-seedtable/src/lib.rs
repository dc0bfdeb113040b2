//! Binary file formats for the DNA sequence alignment accelerator's
//! reference/query/subread inputs, the interval/position lookup tables, and
//! the text results file.
//!
//! Every file is little-endian packed binary. Parsing takes a whole buffer
//! (the caller reads the file with `std::fs::read`) rather than streaming,
//! matching how this workspace's other binary-format crates work.

pub mod dna;
mod error;
pub mod query;
pub mod reference;
pub mod results;
pub mod subread;
pub mod tables;

pub use error::FormatError;
pub use query::QuerySet;
pub use reference::ReferenceSequence;
pub use subread::SubreadFile;
pub use tables::{IntervalTable, PositionTable};
