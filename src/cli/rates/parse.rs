use std::path::PathBuf;

use clap::ArgMatches;
use indicatif::ProgressBar;

use super::args;

pub fn min_coverage(pbar: ProgressBar, matches: &ArgMatches) -> u32 {
    pbar.set_message("Parsing the coverage cutoff...");
    let result = matches.value_of(args::estimation::MIN_COVERAGE).and_then(|x| x.parse().ok()).unwrap();
    pbar.finish_with_message(format!("Rates are estimated from columns with coverage > {}", result));
    result
}

pub fn saveto(pbar: ProgressBar, matches: &ArgMatches) -> PathBuf {
    pbar.set_message("Parsing output path...");
    let result: PathBuf = matches.value_of(args::estimation::SAVETO).unwrap().into();
    pbar.finish_with_message(format!("Estimated rates will be saved to {}", result.display()));
    result
}
