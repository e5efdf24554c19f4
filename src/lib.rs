pub mod delivery;
pub mod error;
pub mod queue;
pub mod sim;
pub mod trace;
pub mod weather;

pub use error::{HubSimError, Result};

#[cfg(test)]
mod test;
