pub mod config;
pub mod interpreter;
pub mod process;
pub mod remote;

pub use config::*;
pub use interpreter::*;
pub use process::*;
