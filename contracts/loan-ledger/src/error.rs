use cosmwasm_std::{OverflowError, StdError, Uint128};
use cw_utils::PaymentError;
use stove_lending::types::LoanStatus;
use stove_lending::{ErrorKind, ReasonCode};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Overflow(#[from] OverflowError),

    #[error("{0}")]
    Payment(#[from] PaymentError),

    #[error("invalid amount")]
    InvalidAmount {},

    #[error("insufficient funds in pool (available {available}, needed {needed})")]
    InsufficientFunds { available: Uint128, needed: Uint128 },

    #[error("unauthorized")]
    Unauthorized {},

    #[error("loan {loan_id} not found")]
    LoanNotFound { loan_id: u64 },

    #[error("loan {loan_id} is {status}, expected {expected}")]
    InvalidLoanState {
        loan_id: u64,
        status: LoanStatus,
        expected: LoanStatus,
    },

    #[error("insufficient collateral: projected savings {projected}, required {required}")]
    InsufficientCollateral {
        projected: Uint128,
        required: Uint128,
    },

    #[error("borrower already holds the maximum of {max} loans")]
    TooManyLoans { max: usize },

    #[error("loan {loan_id} not fully repaid ({remaining} outstanding)")]
    NotRepaid { loan_id: u64, remaining: Uint128 },

    #[error("only the borrower may act on loan {loan_id}")]
    NotBorrower { loan_id: u64 },

    #[error("oracle not configured")]
    OracleNotSet {},

    #[error("interest rate {rate} exceeds {max}%")]
    InvalidRate { rate: u64, max: u64 },

    #[error("term must be 1 to {max} blocks (got {term})")]
    InvalidTerm { term: u64, max: u64 },

    #[error("stove model reference must be 1 to {max} characters")]
    InvalidStoveModel { max: usize },
}

impl ReasonCode for ContractError {
    fn code(&self) -> u32 {
        match self {
            ContractError::InvalidAmount {} => 100,
            ContractError::InsufficientFunds { .. } => 101,
            ContractError::Unauthorized {} => 102,
            ContractError::LoanNotFound { .. } => 103,
            ContractError::InvalidLoanState { .. } => 104,
            ContractError::InsufficientCollateral { .. } => 105,
            ContractError::TooManyLoans { .. } => 106,
            ContractError::NotRepaid { .. } => 107,
            ContractError::NotBorrower { .. } => 108,
            ContractError::OracleNotSet {} => 109,
            ContractError::Payment(_) => 110,
            ContractError::Std(_) => 111,
            ContractError::InvalidRate { .. } => 113,
            ContractError::InvalidTerm { .. } => 114,
            ContractError::InvalidStoveModel { .. } => 115,
            ContractError::Overflow(_) => 116,
        }
    }

    fn kind(&self) -> ErrorKind {
        match self {
            ContractError::Unauthorized {}
            | ContractError::NotBorrower { .. }
            | ContractError::OracleNotSet {} => ErrorKind::Unauthorized,
            ContractError::Std(_)
            | ContractError::Overflow(_)
            | ContractError::Payment(_)
            | ContractError::InvalidAmount {}
            | ContractError::InvalidRate { .. }
            | ContractError::InvalidTerm { .. }
            | ContractError::InvalidStoveModel { .. } => ErrorKind::InvalidParameter,
            ContractError::LoanNotFound { .. } => ErrorKind::NotFound,
            ContractError::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            ContractError::InsufficientCollateral { .. } => ErrorKind::InsufficientCollateral,
            ContractError::InvalidLoanState { .. }
            | ContractError::TooManyLoans { .. }
            | ContractError::NotRepaid { .. } => ErrorKind::InvalidState,
        }
    }
}

pub type ContractResult<T> = Result<T, ContractError>;
