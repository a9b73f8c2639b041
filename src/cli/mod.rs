pub mod call;
pub mod phase;
pub mod rates;
pub mod shared;
