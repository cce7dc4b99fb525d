use cosmwasm_schema::QueryResponses;
use cosmwasm_std::{Addr, Uint128};
use cw_controllers::AdminResponse;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::types::{Loan, LoanStatus};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct InstantiateMsg {
    pub owner: Option<String>,
    /// Native denom the pool is funded and disbursed in.
    pub denom: String,
    pub oracle: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExecuteMsg {
    SetOracle {
        oracle: String,
    },
    /// Credits the pool with the attached coins of the pool denom.
    FundPool {},
    ApplyForLoan {
        vendor: String,
        stove_model: String,
        loan_amount: Uint128,
        interest_rate: u64,
        term_blocks: u64,
        projected_savings: Uint128,
    },
    ApproveLoan {
        loan_id: u64,
    },
    /// Oracle only.
    ReportSavings {
        loan_id: u64,
        verified_savings: Uint128,
    },
    CloseLoan {
        loan_id: u64,
    },
    CancelLoan {
        loan_id: u64,
    },
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema, QueryResponses)]
#[serde(rename_all = "snake_case")]
pub enum QueryMsg {
    #[returns(ConfigResponse)]
    Config {},
    #[returns(AdminResponse)]
    Owner {},
    #[returns(Loan)]
    Loan { loan_id: u64 },
    #[returns(LoanStatusResponse)]
    LoanStatus { loan_id: u64 },
    #[returns(PoolBalanceResponse)]
    PoolBalance {},
    #[returns(BorrowerLoansResponse)]
    BorrowerLoans { borrower: String },
    #[returns(NextLoanIdResponse)]
    NextLoanId {},
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct ConfigResponse {
    pub denom: String,
    pub oracle: Option<Addr>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct LoanStatusResponse {
    /// `None` when no loan exists under the id.
    pub status: Option<LoanStatus>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct PoolBalanceResponse {
    pub balance: Uint128,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct BorrowerLoansResponse {
    pub loan_ids: Vec<u64>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct NextLoanIdResponse {
    pub next_loan_id: u64,
}
