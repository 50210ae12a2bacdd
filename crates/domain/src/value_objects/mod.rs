pub mod address;
pub mod percentage;
pub mod units;
