pub mod address;
pub mod units;

pub use address::*;
pub use units::*;
