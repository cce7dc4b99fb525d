use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use cosmwasm_std::Addr;
use cw_controllers::Admin;
use cw_storage_plus::{Item, Map};

use stove_lending::types::SavingsReport;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct OracleConfig {
    /// The only principal allowed to submit savings reports.
    pub verifier: Addr,
    pub loan_ledger: Addr,
    /// Blocks per reporting period, 7..=90.
    pub reporting_period: u64,
}

pub const OWNER: Admin = Admin::new("owner");
pub const CONFIG: Item<OracleConfig> = Item::new("oracle_config");

// set while a reporting window is open
pub const WINDOW_OPEN: Item<bool> = Item::new("window_open");
// height the last window opened at, 0 if none ever opened
pub const PERIOD_START_BLOCK: Item<u64> = Item::new("period_start_block");

// (loan id, period) -> report
pub const SAVINGS_REPORTS: Map<(u64, u64), SavingsReport> = Map::new("savings_reports");
// last period each loan was reported in
pub const LOAN_ACTIVE_PERIOD: Map<u64, u64> = Map::new("loan_active_period");
