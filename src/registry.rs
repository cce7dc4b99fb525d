use cosmwasm_schema::QueryResponses;
use cosmwasm_std::Uint128;
use cw_controllers::AdminResponse;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::types::{Projection, StoveModel};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct InstantiateMsg {
    /// Defaults to the instantiating sender.
    pub owner: Option<String>,
    pub fuel_cost_per_unit: Option<Uint128>,
    pub min_collateral_ratio: Option<u64>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExecuteMsg {
    SetFuelCost {
        fuel_cost_per_unit: Uint128,
    },
    SetMinRatio {
        min_collateral_ratio: u64,
    },
    RegisterStove {
        model: String,
        efficiency_rate: u64,
        daily_usage_estimate: Uint128,
    },
    UpdateStove {
        model: String,
        efficiency_rate: u64,
        daily_usage_estimate: Uint128,
    },
    /// Computes and stores the projection. Response data is a `CollateralResponse`.
    ProjectCollateralForLoan {
        loan_id: u64,
        loan_amount: Uint128,
        stove_model: String,
    },
    /// Returns the stored projection if present, otherwise projects and stores.
    ValidateLoanCollateral {
        loan_id: u64,
        loan_amount: Uint128,
        stove_model: String,
    },
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema, QueryResponses)]
#[serde(rename_all = "snake_case")]
pub enum QueryMsg {
    #[returns(ConfigResponse)]
    Config {},
    #[returns(AdminResponse)]
    Owner {},
    #[returns(StoveResponse)]
    Stove { model: String },
    #[returns(ProjectionResponse)]
    Projection { loan_id: u64 },
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct ConfigResponse {
    pub fuel_cost_per_unit: Uint128,
    pub min_collateral_ratio: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct StoveResponse {
    pub stove: Option<StoveModel>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct ProjectionResponse {
    pub projection: Option<Projection>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct CollateralResponse {
    pub projected_savings: Uint128,
    /// True when the value came from an earlier stored projection.
    pub cached: bool,
}
