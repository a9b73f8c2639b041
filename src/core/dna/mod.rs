pub use alphabet::Nuc;
pub use codon::Codon;
pub use ncounts::NucCounts;

mod alphabet;
mod codon;
mod ncounts;

// Sentinel for row slots not covered by the read
pub const BLANK: u8 = b' ';
