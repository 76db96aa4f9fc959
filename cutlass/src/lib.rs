#![doc = include_str!("../README.md")]

mod build_config;
mod build_result;
mod docker;
mod error;
mod log_output;
mod macros;
mod pack;
mod runner_config;
mod test_runner;
mod util;
mod workspace;

pub use crate::build_config::*;
pub use crate::build_result::*;
pub use crate::error::*;
pub use crate::log_output::*;
pub use crate::pack::PullPolicy;
pub use crate::runner_config::*;
pub use crate::test_runner::*;
pub use crate::workspace::*;

// Suppress warnings due to the `unused_crate_dependencies` lint not handling integration tests well.
#[cfg(test)]
use indoc as _;
