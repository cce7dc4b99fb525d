// Collateral registry for cookstove loans.
// The owner curates the approved stove models and the pricing policy.
// Anyone may ask for a projection of a loan's collateral: the projected annual
// fuel savings of the stove, which must cover the loan times the minimum ratio.

#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    to_binary, Addr, Binary, Deps, DepsMut, Env, MessageInfo, Response, Uint128,
};
use cw2::set_contract_version;
use cw_controllers::AdminError;

use stove_lending::registry::{CollateralResponse, ExecuteMsg, InstantiateMsg, QueryMsg};
use stove_lending::types::{Projection, StoveModel, MAX_MODEL_LEN};

use crate::error::{ContractError, ContractResult};
use crate::query::query_handler;
use crate::state::{CollateralConfig, APPROVED_STOVES, CONFIG, LOAN_PROJECTIONS, OWNER};

const CONTRACT_NAME: &str = "crates.io:collateral-registry";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_FUEL_COST_PER_UNIT: u128 = 1_000;
pub const DEFAULT_MIN_COLLATERAL_RATIO: u64 = 120;

const MIN_COLLATERAL_RATIO: u64 = 100;
const MAX_COLLATERAL_RATIO: u64 = 300;
const MAX_EFFICIENCY_RATE: u64 = 95;
const DAYS_PER_YEAR: u128 = 365;
const PERCENT: u64 = 100;

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    mut deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> ContractResult<Response> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let owner = match msg.owner {
        Some(owner) => deps.api.addr_validate(&owner)?,
        None => info.sender,
    };
    let config = CollateralConfig {
        fuel_cost_per_unit: msg
            .fuel_cost_per_unit
            .unwrap_or_else(|| Uint128::new(DEFAULT_FUEL_COST_PER_UNIT)),
        min_collateral_ratio: msg
            .min_collateral_ratio
            .unwrap_or(DEFAULT_MIN_COLLATERAL_RATIO),
    };
    validate_fuel_cost(config.fuel_cost_per_unit)?;
    validate_ratio(config.min_collateral_ratio)?;

    OWNER.set(deps.branch(), Some(owner.clone()))?;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("owner", owner)
        .add_attribute("fuel_cost_per_unit", config.fuel_cost_per_unit)
        .add_attribute("min_collateral_ratio", config.min_collateral_ratio.to_string()))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> ContractResult<Response> {
    match msg {
        ExecuteMsg::SetFuelCost { fuel_cost_per_unit } => {
            set_fuel_cost(deps, info, fuel_cost_per_unit)
        }
        ExecuteMsg::SetMinRatio {
            min_collateral_ratio,
        } => set_min_ratio(deps, info, min_collateral_ratio),
        ExecuteMsg::RegisterStove {
            model,
            efficiency_rate,
            daily_usage_estimate,
        } => register_stove(deps, info, model, efficiency_rate, daily_usage_estimate),
        ExecuteMsg::UpdateStove {
            model,
            efficiency_rate,
            daily_usage_estimate,
        } => update_stove(deps, info, model, efficiency_rate, daily_usage_estimate),
        ExecuteMsg::ProjectCollateralForLoan {
            loan_id,
            loan_amount,
            stove_model,
        } => project_collateral_for_loan(deps, env, loan_id, loan_amount, stove_model),
        ExecuteMsg::ValidateLoanCollateral {
            loan_id,
            loan_amount,
            stove_model,
        } => validate_loan_collateral(deps, env, loan_id, loan_amount, stove_model),
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> ContractResult<Binary> {
    query_handler(deps, env, msg)
}

fn assert_owner(deps: Deps, sender: &Addr) -> ContractResult<()> {
    match OWNER.assert_admin(deps, sender) {
        Ok(()) => Ok(()),
        Err(AdminError::NotAdmin {}) => Err(ContractError::Unauthorized {}),
        Err(AdminError::Std(err)) => Err(err.into()),
    }
}

fn validate_fuel_cost(fuel_cost_per_unit: Uint128) -> ContractResult<()> {
    if fuel_cost_per_unit.is_zero() {
        return Err(ContractError::InvalidFuelCost {});
    }
    Ok(())
}

fn validate_ratio(ratio: u64) -> ContractResult<()> {
    if !(MIN_COLLATERAL_RATIO..=MAX_COLLATERAL_RATIO).contains(&ratio) {
        return Err(ContractError::InvalidRate { rate: ratio });
    }
    Ok(())
}

fn validate_stove(model: &str, efficiency_rate: u64, daily_usage: Uint128) -> ContractResult<()> {
    if model.is_empty() || model.len() > MAX_MODEL_LEN {
        return Err(ContractError::InvalidModel { max: MAX_MODEL_LEN });
    }
    if efficiency_rate == 0 || efficiency_rate > MAX_EFFICIENCY_RATE {
        return Err(ContractError::InvalidRate {
            rate: efficiency_rate,
        });
    }
    if daily_usage.is_zero() {
        return Err(ContractError::InvalidUsage {});
    }
    Ok(())
}

fn set_fuel_cost(
    deps: DepsMut,
    info: MessageInfo,
    fuel_cost_per_unit: Uint128,
) -> ContractResult<Response> {
    assert_owner(deps.as_ref(), &info.sender)?;
    validate_fuel_cost(fuel_cost_per_unit)?;

    CONFIG.update(deps.storage, |mut config| -> ContractResult<_> {
        config.fuel_cost_per_unit = fuel_cost_per_unit;
        Ok(config)
    })?;

    Ok(Response::new()
        .add_attribute("method", "set_fuel_cost")
        .add_attribute("fuel_cost_per_unit", fuel_cost_per_unit))
}

fn set_min_ratio(
    deps: DepsMut,
    info: MessageInfo,
    min_collateral_ratio: u64,
) -> ContractResult<Response> {
    assert_owner(deps.as_ref(), &info.sender)?;
    validate_ratio(min_collateral_ratio)?;

    CONFIG.update(deps.storage, |mut config| -> ContractResult<_> {
        config.min_collateral_ratio = min_collateral_ratio;
        Ok(config)
    })?;

    Ok(Response::new()
        .add_attribute("method", "set_min_ratio")
        .add_attribute("min_collateral_ratio", min_collateral_ratio.to_string()))
}

fn register_stove(
    deps: DepsMut,
    info: MessageInfo,
    model: String,
    efficiency_rate: u64,
    daily_usage_estimate: Uint128,
) -> ContractResult<Response> {
    assert_owner(deps.as_ref(), &info.sender)?;
    validate_stove(&model, efficiency_rate, daily_usage_estimate)?;

    if APPROVED_STOVES.has(deps.storage, &model) {
        return Err(ContractError::StoveExists { model });
    }

    let stove = StoveModel {
        efficiency_rate,
        daily_usage_estimate,
        verified: true,
    };
    APPROVED_STOVES.save(deps.storage, &model, &stove)?;

    Ok(Response::new()
        .add_attribute("method", "register_stove")
        .add_attribute("model", model)
        .add_attribute("efficiency_rate", efficiency_rate.to_string())
        .add_attribute("daily_usage_estimate", daily_usage_estimate))
}

fn update_stove(
    deps: DepsMut,
    info: MessageInfo,
    model: String,
    efficiency_rate: u64,
    daily_usage_estimate: Uint128,
) -> ContractResult<Response> {
    assert_owner(deps.as_ref(), &info.sender)?;
    validate_stove(&model, efficiency_rate, daily_usage_estimate)?;

    let mut stove = APPROVED_STOVES
        .may_load(deps.storage, &model)?
        .ok_or_else(|| ContractError::StoveNotFound {
            model: model.clone(),
        })?;
    stove.efficiency_rate = efficiency_rate;
    stove.daily_usage_estimate = daily_usage_estimate;
    APPROVED_STOVES.save(deps.storage, &model, &stove)?;

    Ok(Response::new()
        .add_attribute("method", "update_stove")
        .add_attribute("model", model)
        .add_attribute("efficiency_rate", efficiency_rate.to_string())
        .add_attribute("daily_usage_estimate", daily_usage_estimate))
}

/// Annual fuel savings of one stove, scaled by 100 so it compares directly
/// against `loan_amount * ratio_percent`:
/// (100 - efficiency) * daily_usage * fuel_cost * 365 * 100.
pub fn projected_annual_savings(
    stove: &StoveModel,
    fuel_cost_per_unit: Uint128,
) -> ContractResult<Uint128> {
    let saved_share = Uint128::from(PERCENT.saturating_sub(stove.efficiency_rate));
    let daily_saved_value = saved_share
        .checked_mul(stove.daily_usage_estimate)?
        .checked_mul(fuel_cost_per_unit)?;
    let annual_savings = daily_saved_value.checked_mul(Uint128::new(DAYS_PER_YEAR))?;
    Ok(annual_savings.checked_mul(Uint128::from(PERCENT))?)
}

pub fn required_collateral(loan_amount: Uint128, min_collateral_ratio: u64) -> ContractResult<Uint128> {
    Ok(loan_amount.checked_mul(Uint128::from(min_collateral_ratio))?)
}

fn project_and_store(
    deps: DepsMut,
    env: &Env,
    loan_id: u64,
    loan_amount: Uint128,
    stove_model: String,
) -> ContractResult<Uint128> {
    let stove = APPROVED_STOVES
        .may_load(deps.storage, &stove_model)?
        .ok_or_else(|| ContractError::StoveNotFound {
            model: stove_model.clone(),
        })?;
    let config = CONFIG.load(deps.storage)?;

    let projected = projected_annual_savings(&stove, config.fuel_cost_per_unit)?;
    let required = required_collateral(loan_amount, config.min_collateral_ratio)?;
    if projected < required {
        return Err(ContractError::InsufficientCollateral {
            projected,
            required,
        });
    }

    let projection = Projection {
        projected_annual: projected,
        calculated_at: env.block.height,
        model_used: stove_model,
    };
    LOAN_PROJECTIONS.save(deps.storage, loan_id, &projection)?;
    Ok(projected)
}

fn collateral_response(
    method: &str,
    loan_id: u64,
    projected_savings: Uint128,
    cached: bool,
) -> ContractResult<Response> {
    let data = CollateralResponse {
        projected_savings,
        cached,
    };
    Ok(Response::new()
        .set_data(to_binary(&data)?)
        .add_attribute("method", method)
        .add_attribute("loan_id", loan_id.to_string())
        .add_attribute("projected_savings", projected_savings)
        .add_attribute("cached", cached.to_string()))
}

fn project_collateral_for_loan(
    deps: DepsMut,
    env: Env,
    loan_id: u64,
    loan_amount: Uint128,
    stove_model: String,
) -> ContractResult<Response> {
    if LOAN_PROJECTIONS.has(deps.storage, loan_id) {
        return Err(ContractError::ProjectionExists { loan_id });
    }
    let projected = project_and_store(deps, &env, loan_id, loan_amount, stove_model)?;
    collateral_response("project_collateral_for_loan", loan_id, projected, false)
}

fn validate_loan_collateral(
    deps: DepsMut,
    env: Env,
    loan_id: u64,
    loan_amount: Uint128,
    stove_model: String,
) -> ContractResult<Response> {
    if let Some(existing) = LOAN_PROJECTIONS.may_load(deps.storage, loan_id)? {
        return collateral_response(
            "validate_loan_collateral",
            loan_id,
            existing.projected_annual,
            true,
        );
    }
    let projected = project_and_store(deps, &env, loan_id, loan_amount, stove_model)?;
    collateral_response("validate_loan_collateral", loan_id, projected, false)
}
