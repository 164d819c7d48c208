pub mod climatology;
pub mod weather_data;

pub use climatology::*;
pub use weather_data::*;
