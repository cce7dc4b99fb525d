use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Fixed failure taxonomy shared by all three contracts.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Unauthorized,
    InvalidParameter,
    NotFound,
    Duplicate,
    InsufficientFunds,
    InsufficientCollateral,
    InvalidState,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::InvalidParameter => "invalid_parameter",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Duplicate => "duplicate",
            ErrorKind::InsufficientFunds => "insufficient_funds",
            ErrorKind::InsufficientCollateral => "insufficient_collateral",
            ErrorKind::InvalidState => "invalid_state",
        }
    }
}

/// Implemented by every contract error so callers can branch on a stable
/// numeric reason instead of a message string.
pub trait ReasonCode {
    fn code(&self) -> u32;

    fn kind(&self) -> ErrorKind;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_match_serialized_form() {
        for kind in [
            ErrorKind::Unauthorized,
            ErrorKind::InsufficientCollateral,
            ErrorKind::InvalidState,
        ] {
            let json = cosmwasm_std::to_vec(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()).into_bytes());
        }
    }
}
