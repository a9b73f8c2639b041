pub use haplotype::{Haplotype, HaplotypeFlags};
pub use phaser::{FilteredCounts, HaplotypePhaser, Phasing};

mod haplotype;
mod phaser;
