//! Linux `/proc` support: text parsers and the operating-system probe.

pub mod parser;
mod probe;

pub use parser::ParseError;
pub use probe::{ProcfsMetrics, ProcfsProbe};
