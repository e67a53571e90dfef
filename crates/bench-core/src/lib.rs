pub mod bench;
pub mod config;
pub mod error;
pub mod index;
pub mod io;
pub mod paths;
pub mod records;
pub mod scaffold;
pub mod store;
pub mod template;

pub use error::{BenchError, Result};
