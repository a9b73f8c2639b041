pub use crate::cli::call::args::all as args;
pub use run::run;

mod run;
