use std::ops::Range;
use std::path::{Path, PathBuf};

use bio_types::genome::Position;
use clap::ArgMatches;
use indicatif::ProgressBar;

use crate::core::io;
use crate::core::io::BamRead;
use crate::core::read::QvThresholds;

use super::args;

pub fn threads(pbar: ProgressBar, matches: &ArgMatches) -> usize {
    pbar.set_message("Parsing number of threads allowed to launch...");
    let result = matches.value_of(args::core::THREADS).and_then(|x| x.parse().ok()).unwrap();
    pbar.finish_with_message(format!(
        "Using thread pool with at most {} threads(+ 1 thread to render progress bar)",
        result
    ));
    result
}

pub fn input(pbar: ProgressBar, matches: &ArgMatches) -> PathBuf {
    pbar.set_message("Parsing path to the input alignments...");
    let result: PathBuf = matches.value_of(args::core::INPUT).unwrap().into();
    pbar.finish_with_message(format!("Input file path: {}", result.display()));
    result
}

pub fn region(pbar: ProgressBar, matches: &ArgMatches) -> Option<Range<Position>> {
    pbar.set_message("Parsing the target region...");
    let result = matches.value_of(args::core::REGION).map(|x| {
        let (start, end) = x.split_once('-').unwrap();
        start.parse().unwrap()..end.parse().unwrap()
    });
    match &result {
        Some(region) => {
            pbar.finish_with_message(format!("Analysis is restricted to [{}, {})", region.start, region.end))
        }
        None => pbar.finish_with_message("Analysis covers the whole pileup window"),
    }
    result
}

pub fn thresholds(pbar: ProgressBar, matches: &ArgMatches) -> QvThresholds {
    pbar.set_message("Parsing quality thresholds...");
    let threshold = |key: &str| matches.value_of(key).map(|x| x.parse().unwrap());
    let result = QvThresholds::new(
        threshold(args::quality::MIN_QUAL),
        threshold(args::quality::MIN_SUB_QV),
        threshold(args::quality::MIN_DEL_QV),
        threshold(args::quality::MIN_INS_QV),
    );

    let display = |x: &Option<u8>| x.map_or("off".to_string(), |x| x.to_string());
    pbar.finish_with_message(format!(
        "Quality thresholds (bases below are masked as N): qual {}, sub {}, del {}, ins {}",
        display(result.qual()),
        display(result.sub()),
        display(result.del()),
        display(result.ins())
    ));
    result
}

pub fn reads(pbar: ProgressBar, input: &Path, region: &Option<Range<Position>>) -> Vec<BamRead> {
    pbar.set_message(format!("Parsing alignments from {}...", input.display()));
    let result = io::load(input, region.as_ref()).unwrap_or_else(|error| panic!("{}", error));
    assert!(!result.is_empty(), "There are no usable alignments in {}", input.display());
    pbar.finish_with_message(format!("Parsed {} aligned reads", result.len()));
    result
}
