mod chain;
mod types;

pub use chain::*;
pub use types::*;
