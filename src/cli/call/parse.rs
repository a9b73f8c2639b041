use std::path::{Path, PathBuf};

use clap::ArgMatches;
use indicatif::ProgressBar;
use itertools::Itertools;

use crate::core::calling::{CallerOptions, ErrorRates};
use crate::core::io::BamRead;
use crate::core::read::AlignedRead;
use crate::core::report;
use crate::core::targets::TargetConfig;

use super::args;

pub fn config(pbar: ProgressBar, matches: &ArgMatches) -> TargetConfig {
    pbar.set_message("Parsing the target config...");
    match matches.value_of(args::calling::CONFIG) {
        None => {
            pbar.finish_with_message("No target config; the pileup window is treated as a single unnamed ORF");
            TargetConfig::default()
        }
        Some(path) => {
            let config = TargetConfig::load(path).unwrap_or_else(|error| panic!("{}", error));
            let drugs: usize = config.genes().iter().map(|x| x.drms().len()).sum();
            let reference = if config.has_reference() { "with" } else { "without" };
            pbar.finish_with_message(format!(
                "Target config: {} gene(s), {} drug(s) in the DRM catalog, {} a reference sequence",
                config.genes().len(),
                drugs,
                reference
            ));
            config
        }
    }
}

pub fn rates(pbar: ProgressBar, matches: &ArgMatches, reads: &[BamRead]) -> ErrorRates {
    pbar.set_message("Parsing error rates...");

    if let Some(substitution) = matches.value_of(args::calling::SUB_RATE) {
        let substitution: f64 = substitution.parse().unwrap();
        let deletion: f64 = matches.value_of(args::calling::DEL_RATE).unwrap().parse().unwrap();
        let result = ErrorRates::from_rates(substitution, deletion);
        pbar.finish_with_message(format!(
            "Explicit error rates: substitution {:.3e}, deletion {:.3e}",
            substitution, deletion
        ));
        return result;
    }

    let chemistry = match matches.value_of(args::calling::CHEMISTRY) {
        Some(chemistry) => Some(chemistry.to_string()),
        None => {
            let detected: Vec<&String> = reads.iter().filter_map(|x| x.chemistry().as_ref()).unique().collect();
            assert!(
                detected.len() <= 1,
                "Input mixes several sequencing chemistries: {}",
                detected.iter().join(", ")
            );
            detected.first().map(|x| x.to_string())
        }
    };

    match chemistry {
        None => {
            pbar.finish_with_message("Default error rates (no chemistry information)");
            ErrorRates::default()
        }
        Some(chemistry) => {
            if !ErrorRates::is_profiled(&chemistry) {
                pbar.println(format!(
                    "Chemistry {} has no error profile; falling back to the default rates",
                    chemistry
                ));
            }
            let result = ErrorRates::from_chemistry(&chemistry);
            pbar.finish_with_message(format!("Error rates for chemistry {}", chemistry));
            result
        }
    }
}

pub fn options(pbar: ProgressBar, matches: &ArgMatches) -> CallerOptions {
    pbar.set_message("Parsing reporting options...");
    let (debug, drm_only) = (matches.is_present(args::calling::DEBUG), matches.is_present(args::calling::DRM_ONLY));
    let (minimal, maximal) = (
        matches.value_of(args::calling::MIN_PERC).unwrap().parse().unwrap(),
        matches.value_of(args::calling::MAX_PERC).unwrap().parse().unwrap(),
    );
    let result = CallerOptions::new(debug, drm_only, minimal, maximal);

    let mut msg = format!("Reporting variants with frequency inside [{}%, {}%]", minimal, maximal);
    if drm_only {
        msg += "; restricted to known DRM positions";
    }
    if debug {
        msg += "; debug output (all candidate codons)";
    }
    pbar.finish_with_message(msg);
    result
}

pub fn saveto(pbar: ProgressBar, matches: &ArgMatches, input: &Path) -> PathBuf {
    pbar.set_message("Parsing output path...");
    let result = match matches.value_of(args::output::SAVETO) {
        Some(x) => PathBuf::from(x),
        None => report::default_output(input),
    };
    pbar.finish_with_message(format!("Report will be saved to {}", result.display()));
    result
}

pub fn msa(pbar: ProgressBar, matches: &ArgMatches) -> Option<PathBuf> {
    pbar.set_message("Parsing MSA output path...");
    let result = matches.value_of(args::output::MSA).map(PathBuf::from);
    match &result {
        Some(path) => pbar.finish_with_message(format!("MSA counts will be saved to {}", path.display())),
        None => pbar.finish_with_message("MSA counts won't be saved"),
    }
    result
}

pub fn performance(pbar: ProgressBar, matches: &ArgMatches) -> Option<PathBuf> {
    pbar.set_message("Parsing performance output path...");
    let result = matches.value_of(args::output::PERFORMANCE).map(PathBuf::from);
    match &result {
        Some(path) => pbar.finish_with_message(format!("Performance summary will be saved to {}", path.display())),
        None => pbar.finish_with_message("Performance summary won't be saved"),
    }
    result
}
