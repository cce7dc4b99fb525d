use cosmwasm_std::{OverflowError, StdError};
use stove_lending::types::LoanStatus;
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

    #[error("loan {loan_id} not found on the ledger")]
    LoanNotFound { loan_id: u64 },

    #[error("loan {loan_id} is {status}, not active")]
    LoanNotActive { loan_id: u64, status: LoanStatus },

    #[error("reported amount must be positive")]
    InvalidAmount {},

    #[error("savings for loan {loan_id} already reported in period {period}")]
    AlreadyReported { loan_id: u64, period: u64 },

    #[error("reporting period must be {min} to {max} blocks (got {length})")]
    InvalidPeriod { length: u64, min: u64, max: u64 },

    #[error("reporting window already open")]
    WindowAlreadyOpen {},

    #[error("reporting window is not open")]
    WindowNotOpen {},

    #[error("sender is not the verifier")]
    NotVerifier {},
}

impl ReasonCode for ContractError {
    fn code(&self) -> u32 {
        match self {
            ContractError::Unauthorized {} => 300,
            ContractError::LoanNotFound { .. } => 301,
            ContractError::LoanNotActive { .. } => 302,
            ContractError::InvalidAmount {} => 303,
            ContractError::AlreadyReported { .. } => 304,
            ContractError::InvalidPeriod { .. } => 305,
            ContractError::WindowAlreadyOpen {} | ContractError::WindowNotOpen {} => 306,
            ContractError::NotVerifier {} => 307,
            ContractError::Overflow(_) => 308,
            ContractError::Std(_) => 309,
        }
    }

    fn kind(&self) -> ErrorKind {
        match self {
            ContractError::Unauthorized {} | ContractError::NotVerifier {} => {
                ErrorKind::Unauthorized
            }
            ContractError::Std(_)
            | ContractError::Overflow(_)
            | ContractError::InvalidAmount {}
            | ContractError::InvalidPeriod { .. } => ErrorKind::InvalidParameter,
            ContractError::LoanNotFound { .. } => ErrorKind::NotFound,
            ContractError::AlreadyReported { .. } => ErrorKind::Duplicate,
            ContractError::LoanNotActive { .. }
            | ContractError::WindowAlreadyOpen {}
            | ContractError::WindowNotOpen {} => ErrorKind::InvalidState,
        }
    }
}

pub type ContractResult<T> = Result<T, ContractError>;
