use clap::ArgMatches;
use indicatif::ProgressBar;

use crate::cli::rates::args::RatesArgs;
use crate::cli::shared;
use crate::cli::shared::args::CoreArgs;
use crate::core::calling::ErrorRates;
use crate::core::pileup::{ColumnPileup, RowPileup};

const OUTPUT_IO_ERROR: &str = "Failed to write the estimated rates.";

pub fn run(args: &ArgMatches, core: CoreArgs, factory: impl Fn() -> ProgressBar) {
    let args = RatesArgs::new(args, &factory);

    let pbar = factory();
    pbar.set_style(shared::style::run::running());
    pbar.set_length(2);

    pbar.set_message("Piling up reads...");
    let rows = RowPileup::new(&core.reads, core.thresholds).unwrap_or_else(|error| panic!("{}", error));
    let columns = ColumnPileup::build(&rows);
    pbar.inc(1);

    pbar.set_message("Estimating error rates...");
    let estimate = ErrorRates::estimate(&columns, args.min_coverage);
    if let Some((substitution, deletion)) = estimate {
        let mut saveto =
            csv::WriterBuilder::new().delimiter(b'\t').from_path(&args.saveto).expect(OUTPUT_IO_ERROR);
        saveto.write_record(["substitution", "deletion"]).expect(OUTPUT_IO_ERROR);
        saveto.write_record([substitution.to_string(), deletion.to_string()]).expect(OUTPUT_IO_ERROR);
        saveto.flush().expect(OUTPUT_IO_ERROR);
    }
    pbar.inc(1);

    pbar.set_style(shared::style::run::finished());
    match estimate {
        Some((substitution, deletion)) => pbar.finish_with_message(format!(
            "Estimated rates: substitution {:.3e}, deletion {:.3e}. Saved to {}",
            substitution,
            deletion,
            args.saveto.display()
        )),
        None => pbar.finish_with_message(format!(
            "No pileup column exceeds the {}x coverage cutoff; nothing to estimate",
            args.min_coverage
        )),
    }
}
