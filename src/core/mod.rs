pub mod calling;
pub mod dna;
pub mod io;
pub mod phasing;
pub mod pileup;
pub mod read;
pub mod report;
pub mod stats;
pub mod targets;
pub mod variants;
