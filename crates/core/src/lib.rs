#![forbid(unsafe_code)]

pub mod bank;
pub mod error;
pub mod model;
pub mod time;
pub mod weakness;

pub use error::Error;
pub use time::Clock;
pub use weakness::WeaknessAnalyzer;
