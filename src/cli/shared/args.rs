use std::ops::Range;
use std::path::PathBuf;

use bio_types::genome::Position;
use clap::{Arg, ArgMatches, ArgSettings};
use indicatif::ProgressBar;

use crate::core::io::BamRead;
use crate::core::read::QvThresholds;

use super::{parse, validate};

pub fn reqdefaults() -> Vec<ArgSettings> {
    vec![ArgSettings::Required, ArgSettings::TakesValue]
}

pub fn defaults() -> Vec<ArgSettings> {
    vec![ArgSettings::TakesValue]
}

pub mod core {
    use super::*;
    pub const INPUT: &str = "input";
    pub const REGION: &str = "region";
    pub const THREADS: &str = "threads";

    pub const SECTION_NAME: &str = "Core";

    pub fn args<'a>() -> Vec<Arg<'a>> {
        let args = vec![
            Arg::new(INPUT)
                .short('i')
                .long(INPUT)
                .settings(&reqdefaults())
                .validator(validate::path)
                .long_about(
                    "Path to the input BAM file with reads aligned against the amplicon reference. \
                    Unmapped, secondary and supplementary records are skipped.",
                ),
            Arg::new(REGION)
                .short('r')
                .long(REGION)
                .settings(&defaults())
                .validator(validate::region)
                .long_about(
                    "Restrict the analysis to a reference window, formatted as start-end \
                    (0-based, end-exclusive). Reads are clipped to the window; \
                    by default the whole pileup is processed.",
                ),
            Arg::new(THREADS)
                .short('t')
                .long(THREADS)
                .settings(&defaults())
                .validator(validate::numeric(1, usize::MAX))
                .default_value("1")
                .long_about("Maximum number of threads to spawn at once."),
        ];
        args.into_iter().map(|x| x.help_heading(Some(SECTION_NAME))).collect()
    }
}

pub mod quality {
    use super::*;
    pub const MIN_QUAL: &str = "min-qual";
    pub const MIN_SUB_QV: &str = "min-sub-qv";
    pub const MIN_DEL_QV: &str = "min-del-qv";
    pub const MIN_INS_QV: &str = "min-ins-qv";

    pub const SECTION_NAME: &str = "Quality filtering";

    pub fn args<'a>() -> Vec<Arg<'a>> {
        let args = vec![
            Arg::new(MIN_QUAL)
                .long(MIN_QUAL)
                .settings(&defaults())
                .validator(validate::numeric(0u8, 93u8))
                .long_about(
                    "Mask bases with base quality < threshold as N. \
                    Bases lacking the channel always pass; disabled unless set.",
                ),
            Arg::new(MIN_SUB_QV)
                .long(MIN_SUB_QV)
                .settings(&defaults())
                .validator(validate::numeric(0u8, 93u8))
                .long_about("Mask bases with substitution QV (sq tag) < threshold as N. Disabled unless set."),
            Arg::new(MIN_DEL_QV)
                .long(MIN_DEL_QV)
                .settings(&defaults())
                .validator(validate::numeric(0u8, 93u8))
                .long_about("Mask bases with deletion QV (dq tag) < threshold as N. Disabled unless set."),
            Arg::new(MIN_INS_QV)
                .long(MIN_INS_QV)
                .settings(&defaults())
                .validator(validate::numeric(0u8, 93u8))
                .long_about("Mask bases with insertion QV (iq tag) < threshold as N. Disabled unless set."),
        ];
        args.into_iter().map(|x| x.help_heading(Some(SECTION_NAME))).collect()
    }
}

pub fn all<'a>() -> Vec<Arg<'a>> {
    core::args().into_iter().chain(quality::args()).collect()
}

pub struct CoreArgs {
    pub threads: usize,
    pub input: PathBuf,
    pub region: Option<Range<Position>>,
    pub thresholds: QvThresholds,
    pub reads: Vec<BamRead>,
}

impl CoreArgs {
    pub fn new(args: &ArgMatches, factory: impl Fn() -> ProgressBar) -> Self {
        let threads = parse::threads(factory(), args);
        let input = parse::input(factory(), args);
        let region = parse::region(factory(), args);
        let thresholds = parse::thresholds(factory(), args);
        let reads = parse::reads(factory(), &input, &region);
        Self { threads, input, region, thresholds, reads }
    }
}
