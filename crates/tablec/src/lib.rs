#![forbid(unsafe_code)]

pub mod accuracy;
pub mod cli;
pub mod compare;
pub mod config;
pub mod confusion;
pub mod error;
pub mod input;
pub mod strategy;
pub mod util;

pub use cli::run_from_env;
pub use error::{Result, TablecError};
