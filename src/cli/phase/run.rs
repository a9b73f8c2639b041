use clap::ArgMatches;
use indicatif::ProgressBar;

use crate::cli::shared::args::CoreArgs;

pub fn run(args: &ArgMatches, core: CoreArgs, factory: impl Fn() -> ProgressBar) {
    crate::cli::call::run::execute(args, core, true, factory)
}
