use cosmwasm_std::{to_binary, Binary, Deps, Env};

use stove_lending::oracle::{
    ConfigResponse, CurrentPeriodResponse, LastReportedPeriodResponse, QueryMsg, ReportResponse,
    VerifiedSavingsResponse, WindowResponse,
};

use crate::contract::{current_period, verified_savings_for_loan};
use crate::error::ContractResult;
use crate::state::{CONFIG, LOAN_ACTIVE_PERIOD, OWNER, PERIOD_START_BLOCK, SAVINGS_REPORTS, WINDOW_OPEN};

pub fn query_handler(deps: Deps, env: Env, msg: QueryMsg) -> ContractResult<Binary> {
    let bin = match msg {
        QueryMsg::Config {} => {
            let config = CONFIG.load(deps.storage)?;
            to_binary(&ConfigResponse {
                verifier: config.verifier,
                loan_ledger: config.loan_ledger,
                reporting_period: config.reporting_period,
            })?
        }
        QueryMsg::Owner {} => to_binary(&OWNER.query_admin(deps)?)?,
        QueryMsg::Window {} => to_binary(&WindowResponse {
            is_open: WINDOW_OPEN.load(deps.storage)?,
            period_start_block: PERIOD_START_BLOCK.load(deps.storage)?,
            current_period: current_period(deps.storage, &env)?,
        })?,
        QueryMsg::CurrentPeriod {} => to_binary(&CurrentPeriodResponse {
            period: current_period(deps.storage, &env)?,
        })?,
        QueryMsg::Report { loan_id, period } => to_binary(&ReportResponse {
            report: SAVINGS_REPORTS.may_load(deps.storage, (loan_id, period))?,
        })?,
        QueryMsg::VerifiedSavings { loan_id } => to_binary(&VerifiedSavingsResponse {
            loan_id,
            verified_savings: verified_savings_for_loan(deps.storage, loan_id)?,
        })?,
        QueryMsg::LastReportedPeriod { loan_id } => to_binary(&LastReportedPeriodResponse {
            period: LOAN_ACTIVE_PERIOD.may_load(deps.storage, loan_id)?,
        })?,
    };
    Ok(bin)
}
