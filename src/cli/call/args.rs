use std::path::PathBuf;

use clap::{Arg, ArgMatches};
use indicatif::ProgressBar;

use crate::cli::shared::args::{defaults, CoreArgs};
use crate::cli::shared::validate;
use crate::core::calling::{CallerOptions, ErrorRates};
use crate::core::targets::TargetConfig;

use super::parse;

pub mod calling {
    use super::*;

    pub const CONFIG: &str = "config";
    pub const SUB_RATE: &str = "sub-rate";
    pub const DEL_RATE: &str = "del-rate";
    pub const CHEMISTRY: &str = "chemistry";
    pub const MIN_PERC: &str = "min-perc";
    pub const MAX_PERC: &str = "max-perc";
    pub const DRM_ONLY: &str = "drm-only";
    pub const DEBUG: &str = "debug";

    pub const SECTION_NAME: &str = "Calling";

    pub fn args<'a>() -> Vec<Arg<'a>> {
        let args = vec![
            Arg::new(CONFIG)
                .short('c')
                .long(CONFIG)
                .settings(&defaults())
                .validator(validate::path)
                .long_about(
                    "Path to the target config JSON describing gene regions, the DRM catalog, \
                    expected minor variants and an optional reference sequence. \
                    Without a config the whole pileup window is treated as a single unnamed ORF.",
                ),
            Arg::new(SUB_RATE)
                .long(SUB_RATE)
                .settings(&defaults())
                .requires(DEL_RATE)
                .validator(validate::numeric(0f64, 1f64))
                .long_about(
                    "Per-base substitution rate of the sequencing chemistry. \
                    Overrides --chemistry; requires --del-rate.",
                ),
            Arg::new(DEL_RATE)
                .long(DEL_RATE)
                .settings(&defaults())
                .requires(SUB_RATE)
                .validator(validate::numeric(0f64, 1f64))
                .long_about(
                    "Per-base deletion rate of the sequencing chemistry. \
                    Overrides --chemistry; requires --sub-rate.",
                ),
            Arg::new(CHEMISTRY)
                .long(CHEMISTRY)
                .settings(&defaults())
                .conflicts_with_all(&[SUB_RATE, DEL_RATE])
                .long_about(
                    "Sequencing chemistry to look up error rates for (e.g. S/P1-C1.2). \
                    By default the chemistry is taken from the input reads when they carry one.",
                ),
            Arg::new(MIN_PERC)
                .long(MIN_PERC)
                .settings(&defaults())
                .validator(validate::numeric(0f64, 100f64))
                .default_value("0")
                .long_about("Report only variant codons with frequency ≥ the threshold (in percent)."),
            Arg::new(MAX_PERC)
                .long(MAX_PERC)
                .settings(&defaults())
                .validator(validate::numeric(0f64, 100f64))
                .default_value("100")
                .long_about(
                    "Report only variant codons with frequency ≤ the threshold (in percent). \
                    A codon above it is assumed to be the actual reference of the sample.",
                ),
            Arg::new(DRM_ONLY)
                .long(DRM_ONLY)
                .settings(&defaults())
                .takes_value(false)
                .long_about("Report only variants at positions listed in the DRM catalog of the target config."),
            Arg::new(DEBUG)
                .long(DEBUG)
                .settings(&defaults())
                .takes_value(false)
                .long_about("Report every candidate codon regardless of significance and frequency thresholds."),
        ];
        args.into_iter().map(|x| x.help_heading(Some(SECTION_NAME))).collect()
    }
}

pub mod output {
    use super::*;

    pub const SAVETO: &str = "saveto";
    pub const MSA: &str = "msa";
    pub const PERFORMANCE: &str = "performance";

    pub const SECTION_NAME: &str = "Output";

    pub fn args<'a>() -> Vec<Arg<'a>> {
        let args = vec![
            Arg::new(SAVETO)
                .short('o')
                .long(SAVETO)
                .settings(&defaults())
                .validator(validate::writable)
                .long_about(
                    "Path to the output JSON report. \
                    Defaults to the input path with its extension swapped for json.",
                ),
            Arg::new(MSA)
                .long(MSA)
                .settings(&defaults())
                .validator(validate::writable)
                .long_about("File for saving per-column nucleotide counts of the pileup as a tab-separated table."),
            Arg::new(PERFORMANCE)
                .long(PERFORMANCE)
                .settings(&defaults())
                .validator(validate::writable)
                .long_about(
                    "File for saving the calling performance summary measured against \
                    the expected minor variants of the target config.",
                ),
        ];
        args.into_iter().map(|x| x.help_heading(Some(SECTION_NAME))).collect()
    }
}

pub fn all<'a>() -> Vec<Arg<'a>> {
    crate::cli::shared::args::all().into_iter().chain(calling::args()).chain(output::args()).collect()
}

pub struct CallArgs {
    pub config: TargetConfig,
    pub rates: ErrorRates,
    pub options: CallerOptions,
    pub saveto: PathBuf,
    pub msa: Option<PathBuf>,
    pub performance: Option<PathBuf>,
}

impl CallArgs {
    pub fn new(core: &CoreArgs, args: &ArgMatches, factory: &impl Fn() -> ProgressBar) -> Self {
        Self {
            config: parse::config(factory(), args),
            rates: parse::rates(factory(), args, &core.reads),
            options: parse::options(factory(), args),
            saveto: parse::saveto(factory(), args, &core.input),
            msa: parse::msa(factory(), args),
            performance: parse::performance(factory(), args),
        }
    }
}
