//! Chain access layer for the Woosh AMM client.
//!
//! Owns the boundary to the external wallet/RPC collaborator:
//! - the [`ChainClient`] trait (reads, writes, receipt waits),
//! - contract addresses and exact function signatures,
//! - the pair/reserve reader and the factory pool directory,
//! - an in-memory mock chain for tests and offline demos.
//!
//! ABI byte-encoding, signing and broadcasting happen on the other side
//! of [`ChainClient`]; nothing in this crate touches wire formats.

pub mod client;
pub mod contracts;
pub mod directory;
pub mod error;
pub mod mock;
pub mod reader;

pub use client::{CallValue, ChainClient, Receipt, TxHandle};
pub use contracts::DexContracts;
pub use error::ChainError;
pub use reader::PairReader;
