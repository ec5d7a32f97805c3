mod error;
mod guard;
mod history;
mod location;
mod route;
mod router;
mod state;
mod types;

pub mod config;
pub mod logging;

pub use error::*;
pub use guard::*;
pub use history::*;
pub use location::*;
pub use route::*;
pub use router::*;
pub use state::*;
pub use types::*;
