use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use cosmwasm_std::Uint128;
use cw_controllers::Admin;
use cw_storage_plus::{Item, Map};

use stove_lending::types::{Projection, StoveModel};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct CollateralConfig {
    pub fuel_cost_per_unit: Uint128,
    /// Percent, 100..=300.
    pub min_collateral_ratio: u64,
}

pub const OWNER: Admin = Admin::new("owner");
pub const CONFIG: Item<CollateralConfig> = Item::new("collateral_config");

// approved stove models, keyed by model id
pub const APPROVED_STOVES: Map<&str, StoveModel> = Map::new("approved_stoves");
// projections are written once per loan id
pub const LOAN_PROJECTIONS: Map<u64, Projection> = Map::new("loan_projections");
