pub mod args;
pub mod parse;
pub mod style;
pub mod validate;
