// Library surface shared by the binary and the integration tests.
pub mod advisor;
pub mod app_dirs;
pub mod command;
pub mod config;
pub mod document;
pub mod error;
pub mod kv;
pub mod logging;
pub mod report;
pub mod runtime;
pub mod segment;
pub mod session;
pub mod store;
pub mod trainer;
pub mod util;

pub use error::{Error, Result};
