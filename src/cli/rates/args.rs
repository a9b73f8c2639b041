use std::path::PathBuf;

use clap::{Arg, ArgMatches};
use indicatif::ProgressBar;

use crate::cli::shared::args::defaults;
use crate::cli::shared::validate;

use super::parse;

pub mod estimation {
    use super::*;

    pub const MIN_COVERAGE: &str = "min-coverage";
    pub const SAVETO: &str = "saveto";

    pub const SECTION_NAME: &str = "Estimation";

    pub fn args<'a>() -> Vec<Arg<'a>> {
        let args = vec![
            Arg::new(MIN_COVERAGE)
                .long(MIN_COVERAGE)
                .settings(&defaults())
                .validator(validate::numeric(1u32, u32::MAX))
                .default_value("100")
                .long_about("Estimate error rates only from pileup columns with coverage above the threshold."),
            Arg::new(SAVETO)
                .short('o')
                .long(SAVETO)
                .settings(&defaults())
                .validator(validate::writable)
                .default_value("/dev/stdout")
                .long_about("Path to the output tsv file. By default, the results are printed to stdout."),
        ];
        args.into_iter().map(|x| x.help_heading(Some(SECTION_NAME))).collect()
    }
}

pub fn all<'a>() -> Vec<Arg<'a>> {
    crate::cli::shared::args::all().into_iter().chain(estimation::args()).collect()
}

pub struct RatesArgs {
    pub min_coverage: u32,
    pub saveto: PathBuf,
}

impl RatesArgs {
    pub fn new(args: &ArgMatches, factory: &impl Fn() -> ProgressBar) -> Self {
        Self { min_coverage: parse::min_coverage(factory(), args), saveto: parse::saveto(factory(), args) }
    }
}
