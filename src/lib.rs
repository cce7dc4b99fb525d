//! Shared messages and domain types for the cookstove savings lending
//! contracts: the collateral registry, the savings oracle and the loan ledger.
//!
//! Contracts talk to each other only through the message types defined here,
//! so none of them depends on another contract's crate.

pub mod error;
pub mod ledger;
pub mod oracle;
pub mod registry;
pub mod types;

pub use error::{ErrorKind, ReasonCode};
