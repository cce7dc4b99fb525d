use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use cosmwasm_std::{Addr, Uint128};
use cw_controllers::Admin;
use cw_storage_plus::{Item, Map};

use stove_lending::types::Loan;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct LedgerConfig {
    pub denom: String,
    /// The only principal allowed to push verified savings.
    pub oracle: Option<Addr>,
}

pub const OWNER: Admin = Admin::new("owner");
pub const CONFIG: Item<LedgerConfig> = Item::new("ledger_config");

// balance available for disbursing approved loans
pub const LOAN_POOL_BALANCE: Item<Uint128> = Item::new("loan_pool_balance");
pub const NEXT_LOAN_ID: Item<u64> = Item::new("next_loan_id");

pub const LOANS: Map<u64, Loan> = Map::new("loans");
// loan ids per borrower, capped at MAX_LOANS_PER_BORROWER
pub const BORROWER_LOANS: Map<&Addr, Vec<u64>> = Map::new("borrower_loans");
