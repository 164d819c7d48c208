pub mod db;
pub mod narrative;
pub mod routes;
mod startup;
mod utils;

pub use db::*;
pub use narrative::*;
pub use routes::*;
pub use startup::*;
pub use utils::*;
