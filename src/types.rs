use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use cosmwasm_std::{Addr, OverflowError, Uint128};

/// Longest stove model identifier accepted anywhere in the protocol.
pub const MAX_MODEL_LEN: usize = 64;

/// An approved cookstove model. Only registered models can back a projection.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
pub struct StoveModel {
    /// Fuel efficiency in percent, within (0, 95].
    pub efficiency_rate: u64,
    pub daily_usage_estimate: Uint128,
    pub verified: bool,
}

/// Collateral projection computed once for a prospective loan.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
pub struct Projection {
    pub projected_annual: Uint128,
    pub calculated_at: u64,
    pub model_used: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
pub struct SavingsReport {
    pub reported_savings: Uint128,
    pub reported_at: u64,
    pub verifier: Addr,
    pub verified: bool,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    Pending,
    Active,
    Closed,
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = match self {
            LoanStatus::Pending => "pending",
            LoanStatus::Active => "active",
            LoanStatus::Closed => "closed",
        };
        f.write_str(status)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
pub struct Loan {
    pub borrower: Addr,
    pub vendor: Addr,
    pub stove_model: String,
    pub loan_amount: Uint128,
    /// Flat interest in percent of the principal, 0..=20.
    pub interest_rate: u64,
    pub term_blocks: u64,
    pub status: LoanStatus,
    pub created_at: u64,
    pub activated_at: Option<u64>,
    pub projected_savings: Uint128,
    /// Verified savings not yet converted into repayment.
    pub verified_savings: Uint128,
    pub repaid_amount: Uint128,
}

impl Loan {
    /// principal + principal * rate / 100, truncating.
    pub fn total_due(&self) -> Result<Uint128, OverflowError> {
        let interest = self
            .loan_amount
            .checked_mul(Uint128::from(self.interest_rate))?
            / Uint128::new(100);
        self.loan_amount.checked_add(interest)
    }

    pub fn remaining_due(&self) -> Result<Uint128, OverflowError> {
        self.total_due()?.checked_sub(self.repaid_amount)
    }

    pub fn is_fully_repaid(&self) -> Result<bool, OverflowError> {
        Ok(self.repaid_amount >= self.total_due()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loan(amount: u128, rate: u64) -> Loan {
        Loan {
            borrower: Addr::unchecked("borrower"),
            vendor: Addr::unchecked("vendor"),
            stove_model: "EcoStove".to_string(),
            loan_amount: Uint128::new(amount),
            interest_rate: rate,
            term_blocks: 3650,
            status: LoanStatus::Active,
            created_at: 100,
            activated_at: Some(101),
            projected_savings: Uint128::new(amount * 12),
            verified_savings: Uint128::zero(),
            repaid_amount: Uint128::zero(),
        }
    }

    #[test]
    fn total_due_adds_flat_interest() {
        assert_eq!(loan(1_000_000, 10).total_due().unwrap(), Uint128::new(1_100_000));
        assert_eq!(loan(1_000_000, 0).total_due().unwrap(), Uint128::new(1_000_000));
    }

    #[test]
    fn total_due_truncates_interest() {
        // 999 * 15 / 100 = 149.85
        assert_eq!(loan(999, 15).total_due().unwrap(), Uint128::new(1_148));
    }

    #[test]
    fn remaining_due_tracks_repayment() {
        let mut loan = loan(1_000, 20);
        loan.repaid_amount = Uint128::new(700);
        assert_eq!(loan.remaining_due().unwrap(), Uint128::new(500));
        assert!(!loan.is_fully_repaid().unwrap());

        loan.repaid_amount = Uint128::new(1_200);
        assert_eq!(loan.remaining_due().unwrap(), Uint128::zero());
        assert!(loan.is_fully_repaid().unwrap());
    }

    #[test]
    fn status_displays_lowercase() {
        assert_eq!(LoanStatus::Pending.to_string(), "pending");
        assert_eq!(LoanStatus::Closed.to_string(), "closed");
    }
}
