pub use caller::{CallOutcome, CallerOptions, VariantCaller, ALPHA};
pub use errors::ErrorRates;
pub use performance::PerformanceMetrics;

mod caller;
mod errors;
mod performance;
