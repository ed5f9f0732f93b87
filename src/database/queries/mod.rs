mod assets;
mod orders;
mod stats;
mod types;

pub use assets::*;
pub use orders::*;
pub use stats::*;
pub use types::*;
