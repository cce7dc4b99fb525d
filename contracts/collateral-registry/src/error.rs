use cosmwasm_std::{OverflowError, StdError, Uint128};
use stove_lending::{ErrorKind, ReasonCode};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Overflow(#[from] OverflowError),

    #[error("unauthorized")]
    Unauthorized {},

    #[error("rate out of range (got {rate})")]
    InvalidRate { rate: u64 },

    #[error("daily usage estimate must be positive")]
    InvalidUsage {},

    #[error("fuel cost per unit must be positive")]
    InvalidFuelCost {},

    #[error("stove model {model} already registered")]
    StoveExists { model: String },

    #[error("stove model {model} not found")]
    StoveNotFound { model: String },

    #[error("stove model id must be 1 to {max} characters")]
    InvalidModel { max: usize },

    #[error("projection for loan {loan_id} already stored")]
    ProjectionExists { loan_id: u64 },

    #[error("insufficient collateral: projected {projected}, required {required}")]
    InsufficientCollateral {
        projected: Uint128,
        required: Uint128,
    },
}

impl ReasonCode for ContractError {
    fn code(&self) -> u32 {
        match self {
            ContractError::Unauthorized {} => 200,
            ContractError::Std(_) => 201,
            ContractError::InvalidRate { .. } => 202,
            ContractError::InvalidUsage {} => 203,
            ContractError::InvalidFuelCost {} => 204,
            ContractError::StoveExists { .. } => 206,
            ContractError::StoveNotFound { .. } => 207,
            ContractError::InvalidModel { .. } => 208,
            ContractError::ProjectionExists { .. } => 209,
            ContractError::InsufficientCollateral { .. } => 210,
            ContractError::Overflow(_) => 211,
        }
    }

    fn kind(&self) -> ErrorKind {
        match self {
            ContractError::Unauthorized {} => ErrorKind::Unauthorized,
            ContractError::Std(_)
            | ContractError::Overflow(_)
            | ContractError::InvalidRate { .. }
            | ContractError::InvalidUsage {}
            | ContractError::InvalidFuelCost {}
            | ContractError::InvalidModel { .. } => ErrorKind::InvalidParameter,
            ContractError::StoveNotFound { .. } => ErrorKind::NotFound,
            ContractError::StoveExists { .. } | ContractError::ProjectionExists { .. } => {
                ErrorKind::Duplicate
            }
            ContractError::InsufficientCollateral { .. } => ErrorKind::InsufficientCollateral,
        }
    }
}

pub type ContractResult<T> = Result<T, ContractError>;
