mod prepare;
mod snapshot;
mod utils;

pub use prepare::*;
pub use snapshot::*;
pub use utils::*;
