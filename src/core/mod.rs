pub mod constants;
pub mod runner;

pub use runner::*;
