pub use fisher::fisher_exact;

mod fisher;
