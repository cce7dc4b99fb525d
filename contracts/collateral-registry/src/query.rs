use cosmwasm_std::{to_binary, Binary, Deps, Env};

use stove_lending::registry::{ConfigResponse, ProjectionResponse, QueryMsg, StoveResponse};

use crate::error::ContractResult;
use crate::state::{APPROVED_STOVES, CONFIG, LOAN_PROJECTIONS, OWNER};

pub fn query_handler(deps: Deps, _env: Env, msg: QueryMsg) -> ContractResult<Binary> {
    let bin = match msg {
        QueryMsg::Config {} => {
            let config = CONFIG.load(deps.storage)?;
            to_binary(&ConfigResponse {
                fuel_cost_per_unit: config.fuel_cost_per_unit,
                min_collateral_ratio: config.min_collateral_ratio,
            })?
        }
        QueryMsg::Owner {} => to_binary(&OWNER.query_admin(deps)?)?,
        QueryMsg::Stove { model } => to_binary(&StoveResponse {
            stove: APPROVED_STOVES.may_load(deps.storage, &model)?,
        })?,
        QueryMsg::Projection { loan_id } => to_binary(&ProjectionResponse {
            projection: LOAN_PROJECTIONS.may_load(deps.storage, loan_id)?,
        })?,
    };
    Ok(bin)
}
