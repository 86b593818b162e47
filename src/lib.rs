pub mod analyzer;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod hosting;
pub mod logging;
pub mod release;
pub mod ui;

pub use error::{ReleaseError, Result};
