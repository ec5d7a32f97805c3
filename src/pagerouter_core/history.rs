mod memory;
mod mode;

pub use memory::*;
pub use mode::*;
