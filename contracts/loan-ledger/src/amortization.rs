use std::cmp::min;

use cosmwasm_std::{OverflowError, Uint128};

use stove_lending::types::Loan;

/// Result of converting a loan's banked verified savings into repayment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Repayment {
    /// Amount moved from verified savings into repaid principal+interest.
    pub repaid: Uint128,
    pub remaining_due: Uint128,
    /// Verified savings left on the loan after this step.
    pub banked: Uint128,
}

/// Banks newly verified savings on the loan and runs one amortization step.
pub fn apply_verified_savings(loan: &mut Loan, verified: Uint128) -> Result<Repayment, OverflowError> {
    loan.verified_savings = loan.verified_savings.checked_add(verified)?;
    amortize(loan)
}

/// Moves min(verified_savings, remaining_due) from verified savings to the
/// repaid amount. The surplus beyond what is owed stays on the loan.
pub fn amortize(loan: &mut Loan) -> Result<Repayment, OverflowError> {
    let remaining_due = loan.remaining_due()?;
    let repay_now = min(loan.verified_savings, remaining_due);

    if !repay_now.is_zero() {
        loan.repaid_amount = loan.repaid_amount.checked_add(repay_now)?;
        loan.verified_savings = loan.verified_savings.checked_sub(repay_now)?;
    }

    Ok(Repayment {
        repaid: repay_now,
        remaining_due: remaining_due.checked_sub(repay_now)?,
        banked: loan.verified_savings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::Addr;
    use stove_lending::types::LoanStatus;

    fn active_loan(amount: u128, rate: u64) -> Loan {
        Loan {
            borrower: Addr::unchecked("borrower"),
            vendor: Addr::unchecked("vendor"),
            stove_model: "EcoStove".to_string(),
            loan_amount: Uint128::new(amount),
            interest_rate: rate,
            term_blocks: 3650,
            status: LoanStatus::Active,
            created_at: 100,
            activated_at: Some(110),
            projected_savings: Uint128::new(amount * 20),
            verified_savings: Uint128::zero(),
            repaid_amount: Uint128::zero(),
        }
    }

    #[test]
    fn surplus_is_banked() {
        let mut loan = active_loan(1_000_000, 10);
        let step = apply_verified_savings(&mut loan, Uint128::new(1_500_000)).unwrap();

        assert_eq!(step.repaid, Uint128::new(1_100_000));
        assert_eq!(step.remaining_due, Uint128::zero());
        assert_eq!(step.banked, Uint128::new(400_000));
        assert_eq!(loan.repaid_amount, Uint128::new(1_100_000));
        assert_eq!(loan.verified_savings, Uint128::new(400_000));
    }

    #[test]
    fn partial_reports_accumulate() {
        let mut loan = active_loan(1_000, 20);

        let step = apply_verified_savings(&mut loan, Uint128::new(500)).unwrap();
        assert_eq!(step.repaid, Uint128::new(500));
        assert_eq!(step.remaining_due, Uint128::new(700));

        let step = apply_verified_savings(&mut loan, Uint128::new(500)).unwrap();
        assert_eq!(step.remaining_due, Uint128::new(200));

        let step = apply_verified_savings(&mut loan, Uint128::new(500)).unwrap();
        assert_eq!(step.repaid, Uint128::new(200));
        assert_eq!(step.banked, Uint128::new(300));
        assert_eq!(loan.repaid_amount, Uint128::new(1_200));
    }

    #[test]
    fn fully_repaid_loan_only_banks() {
        let mut loan = active_loan(1_000, 0);
        apply_verified_savings(&mut loan, Uint128::new(1_000)).unwrap();

        let step = apply_verified_savings(&mut loan, Uint128::new(250)).unwrap();
        assert_eq!(step.repaid, Uint128::zero());
        assert_eq!(step.banked, Uint128::new(250));
        assert_eq!(loan.repaid_amount, Uint128::new(1_000));
    }

    #[test]
    fn repayment_is_capped_and_conserved() {
        let sequences: [&[u128]; 5] = [
            &[1, 1, 1, 1],
            &[333_333, 333_333, 333_334, 500_000],
            &[2_000_000],
            &[1_099_999, 1, 1],
            &[50_000; 30],
        ];

        for reports in sequences {
            let mut loan = active_loan(1_000_000, 10);
            let total_due = loan.total_due().unwrap();

            for &amount in reports {
                let before = loan.repaid_amount + loan.verified_savings;
                apply_verified_savings(&mut loan, Uint128::new(amount)).unwrap();

                assert!(loan.repaid_amount <= total_due);
                assert_eq!(
                    loan.repaid_amount + loan.verified_savings,
                    before + Uint128::new(amount)
                );
                // savings are only banked once the debt is cleared
                if loan.repaid_amount < total_due {
                    assert!(loan.verified_savings.is_zero());
                }
            }
        }
    }
}
