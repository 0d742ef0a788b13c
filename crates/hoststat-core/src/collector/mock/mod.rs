//! In-memory filesystem and canned host states for tests.

mod filesystem;
pub mod scenarios;
#[cfg(test)]
pub mod ticking;

pub use filesystem::MockFs;
#[cfg(test)]
pub use ticking::TickingFs;
