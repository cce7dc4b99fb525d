// Savings oracle for cookstove loans.
// The owner opens and closes reporting windows. While a window is open the
// verifier may report each active loan's fuel savings once per period; every
// accepted report is forwarded to the loan ledger, which turns it into repayment.

#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    to_binary, Addr, Binary, Deps, DepsMut, Env, MessageInfo, OverflowError,
    OverflowOperation, QueryRequest, Response, Storage, Uint128, WasmMsg, WasmQuery,
};
use cw2::set_contract_version;
use cw_controllers::AdminError;

use stove_lending::ledger::{
    ExecuteMsg as LedgerExecuteMsg, LoanStatusResponse, QueryMsg as LedgerQueryMsg,
};
use stove_lending::oracle::{ExecuteMsg, InstantiateMsg, QueryMsg};
use stove_lending::types::{LoanStatus, SavingsReport};

use crate::error::{ContractError, ContractResult};
use crate::query::query_handler;
use crate::state::{
    OracleConfig, CONFIG, LOAN_ACTIVE_PERIOD, OWNER, PERIOD_START_BLOCK, SAVINGS_REPORTS,
    WINDOW_OPEN,
};

const CONTRACT_NAME: &str = "crates.io:savings-oracle";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_REPORTING_PERIOD: u64 = 30;
pub const MIN_REPORTING_PERIOD: u64 = 7;
pub const MAX_REPORTING_PERIOD: u64 = 90;

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
    let reporting_period = msg.reporting_period.unwrap_or(DEFAULT_REPORTING_PERIOD);
    validate_reporting_period(reporting_period)?;

    let config = OracleConfig {
        verifier: deps.api.addr_validate(&msg.verifier)?,
        loan_ledger: deps.api.addr_validate(&msg.loan_ledger)?,
        reporting_period,
    };

    OWNER.set(deps.branch(), Some(owner.clone()))?;
    CONFIG.save(deps.storage, &config)?;
    WINDOW_OPEN.save(deps.storage, &false)?;
    PERIOD_START_BLOCK.save(deps.storage, &0)?;

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("owner", owner)
        .add_attribute("verifier", config.verifier)
        .add_attribute("loan_ledger", config.loan_ledger)
        .add_attribute("reporting_period", reporting_period.to_string()))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> ContractResult<Response> {
    match msg {
        ExecuteMsg::SetVerifier { verifier } => set_verifier(deps, info, verifier),
        ExecuteMsg::SetReportingPeriod { reporting_period } => {
            set_reporting_period(deps, info, reporting_period)
        }
        ExecuteMsg::SetLoanLedger { loan_ledger } => set_loan_ledger(deps, info, loan_ledger),
        ExecuteMsg::StartNewPeriod {} => start_new_period(deps, env, info),
        ExecuteMsg::EndCurrentPeriod {} => end_current_period(deps, env, info),
        ExecuteMsg::ReportSavings { loan_id, amount } => {
            report_savings(deps, env, info, loan_id, amount)
        }
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

fn validate_reporting_period(length: u64) -> ContractResult<()> {
    if !(MIN_REPORTING_PERIOD..=MAX_REPORTING_PERIOD).contains(&length) {
        return Err(ContractError::InvalidPeriod {
            length,
            min: MIN_REPORTING_PERIOD,
            max: MAX_REPORTING_PERIOD,
        });
    }
    Ok(())
}

/// Index of the reporting period `height` falls in, counted from the block the
/// last window opened at. Zero until a window has ever been opened.
pub fn period_index(
    period_start_block: u64,
    height: u64,
    reporting_period: u64,
) -> Result<u64, OverflowError> {
    if period_start_block == 0 {
        return Ok(0);
    }
    let elapsed = height.checked_sub(period_start_block).ok_or_else(|| {
        OverflowError::new(OverflowOperation::Sub, height, period_start_block)
    })?;
    Ok(elapsed / reporting_period)
}

pub fn current_period(storage: &dyn Storage, env: &Env) -> ContractResult<u64> {
    let config = CONFIG.load(storage)?;
    let start = PERIOD_START_BLOCK.load(storage)?;
    Ok(period_index(start, env.block.height, config.reporting_period)?)
}

fn set_verifier(deps: DepsMut, info: MessageInfo, verifier: String) -> ContractResult<Response> {
    assert_owner(deps.as_ref(), &info.sender)?;
    let verifier = deps.api.addr_validate(&verifier)?;

    CONFIG.update(deps.storage, |mut config| -> ContractResult<_> {
        config.verifier = verifier.clone();
        Ok(config)
    })?;

    Ok(Response::new()
        .add_attribute("method", "set_verifier")
        .add_attribute("verifier", verifier))
}

fn set_reporting_period(
    deps: DepsMut,
    info: MessageInfo,
    reporting_period: u64,
) -> ContractResult<Response> {
    assert_owner(deps.as_ref(), &info.sender)?;
    validate_reporting_period(reporting_period)?;

    CONFIG.update(deps.storage, |mut config| -> ContractResult<_> {
        config.reporting_period = reporting_period;
        Ok(config)
    })?;

    Ok(Response::new()
        .add_attribute("method", "set_reporting_period")
        .add_attribute("reporting_period", reporting_period.to_string()))
}

fn set_loan_ledger(
    deps: DepsMut,
    info: MessageInfo,
    loan_ledger: String,
) -> ContractResult<Response> {
    assert_owner(deps.as_ref(), &info.sender)?;
    let loan_ledger = deps.api.addr_validate(&loan_ledger)?;

    CONFIG.update(deps.storage, |mut config| -> ContractResult<_> {
        config.loan_ledger = loan_ledger.clone();
        Ok(config)
    })?;

    Ok(Response::new()
        .add_attribute("method", "set_loan_ledger")
        .add_attribute("loan_ledger", loan_ledger))
}

fn start_new_period(deps: DepsMut, env: Env, info: MessageInfo) -> ContractResult<Response> {
    assert_owner(deps.as_ref(), &info.sender)?;
    if WINDOW_OPEN.load(deps.storage)? {
        return Err(ContractError::WindowAlreadyOpen {});
    }

    WINDOW_OPEN.save(deps.storage, &true)?;
    PERIOD_START_BLOCK.save(deps.storage, &env.block.height)?;

    Ok(Response::new()
        .add_attribute("method", "start_new_period")
        .add_attribute("period_start_block", env.block.height.to_string()))
}

fn end_current_period(deps: DepsMut, env: Env, info: MessageInfo) -> ContractResult<Response> {
    assert_owner(deps.as_ref(), &info.sender)?;
    if !WINDOW_OPEN.load(deps.storage)? {
        return Err(ContractError::WindowNotOpen {});
    }

    let period = current_period(deps.storage, &env)?;
    WINDOW_OPEN.save(deps.storage, &false)?;

    Ok(Response::new()
        .add_attribute("method", "end_current_period")
        .add_attribute("period", period.to_string()))
}

fn report_savings(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    loan_id: u64,
    amount: Uint128,
) -> ContractResult<Response> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.verifier {
        return Err(ContractError::NotVerifier {});
    }
    if !WINDOW_OPEN.load(deps.storage)? {
        return Err(ContractError::WindowNotOpen {});
    }
    if amount.is_zero() {
        return Err(ContractError::InvalidAmount {});
    }

    let period = current_period(deps.storage, &env)?;
    if SAVINGS_REPORTS.has(deps.storage, (loan_id, period)) {
        return Err(ContractError::AlreadyReported { loan_id, period });
    }

    let status: LoanStatusResponse = deps.querier.query(&QueryRequest::Wasm(WasmQuery::Smart {
        contract_addr: config.loan_ledger.to_string(),
        msg: to_binary(&LedgerQueryMsg::LoanStatus { loan_id })?,
    }))?;
    match status.status {
        None => return Err(ContractError::LoanNotFound { loan_id }),
        Some(LoanStatus::Active) => {}
        Some(status) => return Err(ContractError::LoanNotActive { loan_id, status }),
    }

    let report = SavingsReport {
        reported_savings: amount,
        reported_at: env.block.height,
        verifier: info.sender,
        verified: true,
    };
    SAVINGS_REPORTS.save(deps.storage, (loan_id, period), &report)?;
    LOAN_ACTIVE_PERIOD.save(deps.storage, loan_id, &period)?;

    // runs in the same transaction; a ledger failure reverts this report
    let forward = WasmMsg::Execute {
        contract_addr: config.loan_ledger.to_string(),
        msg: to_binary(&LedgerExecuteMsg::ReportSavings {
            loan_id,
            verified_savings: amount,
        })?,
        funds: vec![],
    };

    Ok(Response::new()
        .add_message(forward)
        .add_attribute("method", "report_savings")
        .add_attribute("loan_id", loan_id.to_string())
        .add_attribute("period", period.to_string())
        .add_attribute("amount", amount)
        .add_attribute("verifier", report.verifier))
}

/// Amount reported for the loan in its most recent reported period, zero if
/// the loan was never reported.
pub fn verified_savings_for_loan(storage: &dyn Storage, loan_id: u64) -> ContractResult<Uint128> {
    let period = match LOAN_ACTIVE_PERIOD.may_load(storage, loan_id)? {
        Some(period) => period,
        None => return Ok(Uint128::zero()),
    };
    Ok(SAVINGS_REPORTS
        .may_load(storage, (loan_id, period))?
        .map(|report| report.reported_savings)
        .unwrap_or_default())
}
