//! Core domain types and math for the Woosh AMM client.
//!
//! Everything in this crate is pure: value objects, constant-product
//! quoting, liquidity math. No I/O, no async, no chain access. All
//! amounts that can end up in a transaction are `U256` base units;
//! `rust_decimal` appears only on display-oriented paths.

pub mod errors;
pub mod math;
pub mod pool;
pub mod position;
pub mod registry;
pub mod token;
pub mod value_objects;

pub use errors::DomainError;
pub use token::{Token, TokenAmount};
pub use value_objects::address::Address;
pub use value_objects::percentage::BasisPoints;
