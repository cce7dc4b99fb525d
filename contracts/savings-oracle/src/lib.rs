pub mod contract;
pub mod error;
pub mod query;
pub mod state;

pub use crate::error::ContractError;
