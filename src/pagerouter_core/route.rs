mod component;
mod meta;
mod pattern;
mod resolved;
mod store;
mod table;

pub use component::*;
pub use meta::*;
pub use pattern::*;
pub use resolved::*;
pub use store::*;
pub use table::*;
