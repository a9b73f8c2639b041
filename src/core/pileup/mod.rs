use thiserror::Error;

pub use column::{ColumnPileup, ColumnStats, PileupColumn};
pub use row::{PileupRow, RowPileup};

mod column;
mod row;

#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum PileupError {
    #[error("read {read}: base symbol {symbol:?} is not one of {{A, C, G, T, N, -}}")]
    UnexpectedSymbol { read: String, symbol: char },
    #[error("read {read}: CIGAR operation {op} has no aligned-space encoding")]
    MalformedCigar { read: String, op: String },
    #[error("read {read}: decoded {decoded} bases but the record stores {stored} quality values")]
    LengthMismatch { read: String, decoded: usize, stored: usize },
}
