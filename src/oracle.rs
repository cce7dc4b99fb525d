use cosmwasm_schema::QueryResponses;
use cosmwasm_std::{Addr, Uint128};
use cw_controllers::AdminResponse;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::types::SavingsReport;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct InstantiateMsg {
    pub owner: Option<String>,
    pub verifier: String,
    pub loan_ledger: String,
    /// Blocks per reporting period, 7..=90. Defaults to 30.
    pub reporting_period: Option<u64>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExecuteMsg {
    SetVerifier { verifier: String },
    SetReportingPeriod { reporting_period: u64 },
    SetLoanLedger { loan_ledger: String },
    StartNewPeriod {},
    EndCurrentPeriod {},
    ReportSavings { loan_id: u64, amount: Uint128 },
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema, QueryResponses)]
#[serde(rename_all = "snake_case")]
pub enum QueryMsg {
    #[returns(ConfigResponse)]
    Config {},
    #[returns(AdminResponse)]
    Owner {},
    #[returns(WindowResponse)]
    Window {},
    #[returns(CurrentPeriodResponse)]
    CurrentPeriod {},
    #[returns(ReportResponse)]
    Report { loan_id: u64, period: u64 },
    #[returns(VerifiedSavingsResponse)]
    VerifiedSavings { loan_id: u64 },
    #[returns(LastReportedPeriodResponse)]
    LastReportedPeriod { loan_id: u64 },
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct ConfigResponse {
    pub verifier: Addr,
    pub loan_ledger: Addr,
    pub reporting_period: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct WindowResponse {
    pub is_open: bool,
    pub period_start_block: u64,
    pub current_period: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct CurrentPeriodResponse {
    pub period: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct ReportResponse {
    pub report: Option<SavingsReport>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct VerifiedSavingsResponse {
    pub loan_id: u64,
    pub verified_savings: Uint128,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct LastReportedPeriodResponse {
    pub period: Option<u64>,
}
