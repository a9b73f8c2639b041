pub use args::all as args;
pub use run::run;

pub mod args;
pub mod parse;
pub(crate) mod run;
