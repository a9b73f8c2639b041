pub use bam::{load, BamRead};
pub use msa::write_counts;

mod bam;
mod msa;
