pub mod cities;
pub mod historical_chart;
pub mod predict;
pub mod request;

pub use cities::*;
pub use historical_chart::*;
pub use predict::*;
pub use request::*;
