use clap::{crate_authors, crate_name, crate_version, App, AppSettings};
use indicatif::{MultiProgress, ProgressBar};
use rayon::ThreadPoolBuilder;

use mvat::cli;
use mvat::cli::shared::args::CoreArgs;
use mvat::cli::shared::style;

const THREAD_POOL_ERROR: &str = "Failed to initialize global thread pool";
const PROGRESS_BAR_ERROR: &str = "Failed to render progress bar";

fn main() {
    let matches = App::new(crate_name!())
        .author(crate_authors!("\n"))
        .version(crate_version!())
        .max_term_width(120)
        .setting(AppSettings::DeriveDisplayOrder)
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            App::new("call")
                .about("Call codon-level minority variants in an amplicon pileup")
                .args(cli::call::args()),
        )
        .subcommand(
            App::new("phase")
                .about("Call codon-level minority variants and phase them into haplotypes")
                .args(cli::phase::args()),
        )
        .subcommand(
            App::new("rates")
                .about("Estimate sequencing error rates from a pileup of aligned reads")
                .args(cli::rates::args()),
        )
        .get_matches();
    let (subcommand, matches) = matches.subcommand().expect("Subcommand is required");

    let mbar = MultiProgress::new();
    let style = style::parse::with_progress();
    let factory = || mbar.add(ProgressBar::new_spinner().with_style(style.clone()));

    let core = CoreArgs::new(matches, factory);
    let threads = core.threads;
    ThreadPoolBuilder::new().num_threads(threads).build_global().expect(THREAD_POOL_ERROR);

    rayon::scope(|s| {
        s.spawn(|_| match subcommand {
            "call" => cli::call::run(matches, core, factory),
            "phase" => cli::phase::run(matches, core, factory),
            "rates" => cli::rates::run(matches, core, factory),
            _ => unreachable!(),
        });
        if threads > 1 {
            mbar.join().expect(PROGRESS_BAR_ERROR);
        }
    });
    if threads == 1 {
        mbar.join().expect(PROGRESS_BAR_ERROR);
    }
}
