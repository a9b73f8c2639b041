use std::fs::File;
use std::io::BufWriter;

use clap::ArgMatches;
use indicatif::ProgressBar;

use crate::cli::call::args::CallArgs;
use crate::cli::shared;
use crate::cli::shared::args::CoreArgs;
use crate::core::calling::VariantCaller;
use crate::core::io;
use crate::core::phasing::HaplotypePhaser;
use crate::core::pileup::{ColumnPileup, RowPileup};
use crate::core::report;

const REPORT_IO_ERROR: &str = "Failed to write the output JSON report.";
const MSA_IO_ERROR: &str = "Failed to write the MSA counts table.";
const PERFORMANCE_IO_ERROR: &str = "Failed to write the performance summary.";

pub fn run(args: &ArgMatches, core: CoreArgs, factory: impl Fn() -> ProgressBar) {
    execute(args, core, false, factory)
}

pub(crate) fn execute(args: &ArgMatches, core: CoreArgs, phase: bool, factory: impl Fn() -> ProgressBar) {
    let args = CallArgs::new(&core, args, &factory);

    let pbar = factory();
    pbar.set_style(shared::style::run::running());
    pbar.set_length(if phase { 4 } else { 3 });

    pbar.set_message("Piling up reads...");
    let rows = RowPileup::new(&core.reads, core.thresholds).unwrap_or_else(|error| panic!("{}", error));
    let columns = ColumnPileup::build(&rows);
    pbar.inc(1);

    pbar.set_message("Calling variants...");
    let caller = VariantCaller::new(args.config, args.rates, args.options);
    let mut outcome = caller.call(&rows, &columns);
    pbar.inc(1);

    let phasing = if phase {
        pbar.set_message("Phasing haplotypes...");
        let phasing = HaplotypePhaser::default().phase(&rows, outcome.genes_mut());
        pbar.inc(1);
        Some(phasing)
    } else {
        None
    };

    pbar.set_message("Saving results...");
    report::save_json(&outcome, phasing.as_ref(), &args.saveto).expect(REPORT_IO_ERROR);
    if let Some(msa) = &args.msa {
        let saveto = BufWriter::new(File::create(msa).expect(MSA_IO_ERROR));
        io::write_counts(&columns, saveto).expect(MSA_IO_ERROR);
    }
    if let Some(performance) = &args.performance {
        report::save_performance(outcome.metrics(), performance).expect(PERFORMANCE_IO_ERROR);
    }
    pbar.inc(1);

    pbar.set_style(shared::style::run::finished());
    let variants =
        outcome.genes().iter().flat_map(|x| x.positions().values()).filter(|x| x.is_variant()).count();
    match &phasing {
        None => pbar.finish_with_message(format!(
            "Finished: {} variant codon position(s). Report saved to {}",
            variants,
            args.saveto.display()
        )),
        Some(phasing) => pbar.finish_with_message(format!(
            "Finished: {} variant codon position(s), {} haplotype(s). Report saved to {}",
            variants,
            phasing.haplotypes().len(),
            args.saveto.display()
        )),
    }
}
