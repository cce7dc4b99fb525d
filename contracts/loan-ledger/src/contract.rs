// Loan ledger for cookstove loans.
// Lenders fund a shared pool, borrowers apply with a collateral projection,
// the owner approves and disburses from the pool, and the savings oracle pushes
// verified fuel savings that are converted into repayment automatically.

#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    coins, to_binary, Addr, BankMsg, Binary, Deps, DepsMut, Env, Event, MessageInfo,
    OverflowError, OverflowOperation, Response, StdError, Uint128,
};
use cw2::set_contract_version;
use cw_controllers::AdminError;
use cw_utils::{must_pay, nonpayable, PaymentError};

use stove_lending::ledger::{ExecuteMsg, InstantiateMsg, QueryMsg};
use stove_lending::types::{Loan, LoanStatus, MAX_MODEL_LEN};

use crate::amortization::apply_verified_savings;
use crate::error::{ContractError, ContractResult};
use crate::query::query_handler;
use crate::state::{
    LedgerConfig, BORROWER_LOANS, CONFIG, LOANS, LOAN_POOL_BALANCE, NEXT_LOAN_ID, OWNER,
};

const CONTRACT_NAME: &str = "crates.io:loan-ledger";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const MAX_LOAN_AMOUNT: u128 = 100_000_000;
pub const MAX_INTEREST_RATE: u64 = 20;
pub const MAX_TERM_BLOCKS: u64 = 52_560;
/// Projected savings must be at least this multiple of the principal.
pub const MIN_COLLATERAL_MULTIPLE: u128 = 12;
pub const MAX_LOANS_PER_BORROWER: usize = 200;

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    mut deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> ContractResult<Response> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    if msg.denom.trim().is_empty() {
        return Err(StdError::generic_err("denom must not be empty").into());
    }
    let owner = match msg.owner {
        Some(owner) => deps.api.addr_validate(&owner)?,
        None => info.sender,
    };
    let oracle = msg
        .oracle
        .map(|oracle| deps.api.addr_validate(&oracle))
        .transpose()?;

    OWNER.set(deps.branch(), Some(owner.clone()))?;
    CONFIG.save(
        deps.storage,
        &LedgerConfig {
            denom: msg.denom.clone(),
            oracle,
        },
    )?;
    LOAN_POOL_BALANCE.save(deps.storage, &Uint128::zero())?;
    NEXT_LOAN_ID.save(deps.storage, &0)?;

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("owner", owner)
        .add_attribute("denom", msg.denom))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> ContractResult<Response> {
    if !matches!(msg, ExecuteMsg::FundPool {}) {
        nonpayable(&info)?;
    }

    match msg {
        ExecuteMsg::SetOracle { oracle } => set_oracle(deps, info, oracle),
        ExecuteMsg::FundPool {} => fund_pool(deps, env, info),
        ExecuteMsg::ApplyForLoan {
            vendor,
            stove_model,
            loan_amount,
            interest_rate,
            term_blocks,
            projected_savings,
        } => apply_for_loan(
            deps,
            env,
            info,
            LoanApplication {
                vendor,
                stove_model,
                loan_amount,
                interest_rate,
                term_blocks,
                projected_savings,
            },
        ),
        ExecuteMsg::ApproveLoan { loan_id } => approve_loan(deps, env, info, loan_id),
        ExecuteMsg::ReportSavings {
            loan_id,
            verified_savings,
        } => report_savings(deps, info, loan_id, verified_savings),
        ExecuteMsg::CloseLoan { loan_id } => close_loan(deps, info, loan_id),
        ExecuteMsg::CancelLoan { loan_id } => cancel_loan(deps, info, loan_id),
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> ContractResult<Binary> {
    query_handler(deps, env, msg)
}

struct LoanApplication {
    vendor: String,
    stove_model: String,
    loan_amount: Uint128,
    interest_rate: u64,
    term_blocks: u64,
    projected_savings: Uint128,
}

fn assert_owner(deps: Deps, sender: &Addr) -> ContractResult<()> {
    match OWNER.assert_admin(deps, sender) {
        Ok(()) => Ok(()),
        Err(AdminError::NotAdmin {}) => Err(ContractError::Unauthorized {}),
        Err(AdminError::Std(err)) => Err(err.into()),
    }
}

fn load_loan(deps: Deps, loan_id: u64) -> ContractResult<Loan> {
    LOANS
        .may_load(deps.storage, loan_id)?
        .ok_or(ContractError::LoanNotFound { loan_id })
}

fn ensure_status(loan_id: u64, loan: &Loan, expected: LoanStatus) -> ContractResult<()> {
    if loan.status != expected {
        return Err(ContractError::InvalidLoanState {
            loan_id,
            status: loan.status,
            expected,
        });
    }
    Ok(())
}

fn set_oracle(deps: DepsMut, info: MessageInfo, oracle: String) -> ContractResult<Response> {
    assert_owner(deps.as_ref(), &info.sender)?;
    let oracle = deps.api.addr_validate(&oracle)?;

    CONFIG.update(deps.storage, |mut config| -> ContractResult<_> {
        config.oracle = Some(oracle.clone());
        Ok(config)
    })?;

    Ok(Response::new()
        .add_attribute("method", "set_oracle")
        .add_attribute("oracle", oracle))
}

fn fund_pool(deps: DepsMut, env: Env, info: MessageInfo) -> ContractResult<Response> {
    let config = CONFIG.load(deps.storage)?;
    let amount = match must_pay(&info, &config.denom) {
        Ok(amount) => amount,
        Err(PaymentError::NoFunds {}) => return Err(ContractError::InvalidAmount {}),
        Err(err) => return Err(err.into()),
    };
    if amount.is_zero() {
        return Err(ContractError::InvalidAmount {});
    }

    let balance = LOAN_POOL_BALANCE.load(deps.storage)?.checked_add(amount)?;
    LOAN_POOL_BALANCE.save(deps.storage, &balance)?;

    Ok(Response::new()
        .set_data(to_binary(&amount)?)
        .add_attribute("method", "fund_pool")
        .add_attribute("from", info.sender)
        .add_attribute("to", env.contract.address)
        .add_attribute("amount", amount)
        .add_attribute("pool_balance", balance))
}

fn apply_for_loan(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    application: LoanApplication,
) -> ContractResult<Response> {
    let LoanApplication {
        vendor,
        stove_model,
        loan_amount,
        interest_rate,
        term_blocks,
        projected_savings,
    } = application;

    if loan_amount.is_zero() || loan_amount > Uint128::new(MAX_LOAN_AMOUNT) {
        return Err(ContractError::InvalidAmount {});
    }
    if interest_rate > MAX_INTEREST_RATE {
        return Err(ContractError::InvalidRate {
            rate: interest_rate,
            max: MAX_INTEREST_RATE,
        });
    }
    if term_blocks == 0 || term_blocks > MAX_TERM_BLOCKS {
        return Err(ContractError::InvalidTerm {
            term: term_blocks,
            max: MAX_TERM_BLOCKS,
        });
    }
    let required = loan_amount.checked_mul(Uint128::new(MIN_COLLATERAL_MULTIPLE))?;
    if projected_savings < required {
        return Err(ContractError::InsufficientCollateral {
            projected: projected_savings,
            required,
        });
    }
    if stove_model.is_empty() || stove_model.len() > MAX_MODEL_LEN {
        return Err(ContractError::InvalidStoveModel { max: MAX_MODEL_LEN });
    }
    let vendor = deps.api.addr_validate(&vendor)?;

    // the borrower index is checked before anything is written
    let borrower = info.sender;
    let mut borrower_loans = BORROWER_LOANS
        .may_load(deps.storage, &borrower)?
        .unwrap_or_default();
    if borrower_loans.len() >= MAX_LOANS_PER_BORROWER {
        return Err(ContractError::TooManyLoans {
            max: MAX_LOANS_PER_BORROWER,
        });
    }

    let loan_id = NEXT_LOAN_ID.load(deps.storage)?;
    let next_loan_id = loan_id
        .checked_add(1)
        .ok_or_else(|| OverflowError::new(OverflowOperation::Add, loan_id, 1))?;

    let loan = Loan {
        borrower: borrower.clone(),
        vendor,
        stove_model,
        loan_amount,
        interest_rate,
        term_blocks,
        status: LoanStatus::Pending,
        created_at: env.block.height,
        activated_at: None,
        projected_savings,
        verified_savings: Uint128::zero(),
        repaid_amount: Uint128::zero(),
    };
    LOANS.save(deps.storage, loan_id, &loan)?;
    borrower_loans.push(loan_id);
    BORROWER_LOANS.save(deps.storage, &borrower, &borrower_loans)?;
    NEXT_LOAN_ID.save(deps.storage, &next_loan_id)?;

    Ok(Response::new()
        .set_data(to_binary(&loan_id)?)
        .add_attribute("method", "apply_for_loan")
        .add_attribute("loan_id", loan_id.to_string())
        .add_attribute("borrower", borrower)
        .add_attribute("loan_amount", loan_amount)
        .add_attribute("interest_rate", interest_rate.to_string())
        .add_attribute("term_blocks", term_blocks.to_string()))
}

fn approve_loan(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    loan_id: u64,
) -> ContractResult<Response> {
    assert_owner(deps.as_ref(), &info.sender)?;

    let mut loan = load_loan(deps.as_ref(), loan_id)?;
    ensure_status(loan_id, &loan, LoanStatus::Pending)?;

    let balance = LOAN_POOL_BALANCE.load(deps.storage)?;
    if balance < loan.loan_amount {
        return Err(ContractError::InsufficientFunds {
            available: balance,
            needed: loan.loan_amount,
        });
    }
    // repayments are credited to the pool without coins arriving, so the
    // custody balance can be lower than the pool figure
    let config = CONFIG.load(deps.storage)?;
    let custody = deps
        .querier
        .query_balance(&env.contract.address, &config.denom)?
        .amount;
    if custody < loan.loan_amount {
        return Err(ContractError::InsufficientFunds {
            available: custody,
            needed: loan.loan_amount,
        });
    }
    let balance = balance.checked_sub(loan.loan_amount)?;

    loan.status = LoanStatus::Active;
    loan.activated_at = Some(env.block.height);
    LOANS.save(deps.storage, loan_id, &loan)?;
    LOAN_POOL_BALANCE.save(deps.storage, &balance)?;

    let disburse = BankMsg::Send {
        to_address: loan.borrower.to_string(),
        amount: coins(loan.loan_amount.u128(), config.denom),
    };

    Ok(Response::new()
        .add_message(disburse)
        .add_attribute("method", "approve_loan")
        .add_attribute("loan_id", loan_id.to_string())
        .add_attribute("borrower", loan.borrower)
        .add_attribute("amount", loan.loan_amount)
        .add_attribute("pool_balance", balance))
}

fn report_savings(
    deps: DepsMut,
    info: MessageInfo,
    loan_id: u64,
    verified_savings: Uint128,
) -> ContractResult<Response> {
    let config = CONFIG.load(deps.storage)?;
    let oracle = config.oracle.ok_or(ContractError::OracleNotSet {})?;
    if info.sender != oracle {
        return Err(ContractError::Unauthorized {});
    }
    if verified_savings.is_zero() {
        return Err(ContractError::InvalidAmount {});
    }

    let mut loan = load_loan(deps.as_ref(), loan_id)?;
    ensure_status(loan_id, &loan, LoanStatus::Active)?;

    let repayment = apply_verified_savings(&mut loan, verified_savings)?;
    LOANS.save(deps.storage, loan_id, &loan)?;

    let balance = LOAN_POOL_BALANCE.update(deps.storage, |balance| -> ContractResult<_> {
        Ok(balance.checked_add(repayment.repaid)?)
    })?;

    let event = Event::new("repayment")
        .add_attribute("loan_id", loan_id.to_string())
        .add_attribute("repaid", repayment.repaid)
        .add_attribute("total_repaid", loan.repaid_amount)
        .add_attribute("remaining_due", repayment.remaining_due)
        .add_attribute("banked_savings", repayment.banked);

    Ok(Response::new()
        .add_event(event)
        .add_attribute("method", "report_savings")
        .add_attribute("loan_id", loan_id.to_string())
        .add_attribute("verified_savings", verified_savings)
        .add_attribute("pool_balance", balance))
}

fn close_loan(deps: DepsMut, info: MessageInfo, loan_id: u64) -> ContractResult<Response> {
    let mut loan = load_loan(deps.as_ref(), loan_id)?;
    if loan.borrower != info.sender {
        return Err(ContractError::NotBorrower { loan_id });
    }
    ensure_status(loan_id, &loan, LoanStatus::Active)?;

    let remaining = loan.remaining_due()?;
    if !remaining.is_zero() {
        return Err(ContractError::NotRepaid { loan_id, remaining });
    }

    loan.status = LoanStatus::Closed;
    LOANS.save(deps.storage, loan_id, &loan)?;

    Ok(Response::new()
        .add_attribute("method", "close_loan")
        .add_attribute("loan_id", loan_id.to_string())
        .add_attribute("banked_savings", loan.verified_savings))
}

/// Cancellation deletes the loan record outright; no cancelled status is kept.
fn cancel_loan(deps: DepsMut, info: MessageInfo, loan_id: u64) -> ContractResult<Response> {
    let loan = load_loan(deps.as_ref(), loan_id)?;
    if loan.borrower != info.sender {
        return Err(ContractError::NotBorrower { loan_id });
    }
    ensure_status(loan_id, &loan, LoanStatus::Pending)?;

    LOANS.remove(deps.storage, loan_id);
    BORROWER_LOANS.update(deps.storage, &loan.borrower, |ids| -> ContractResult<_> {
        let mut ids = ids.unwrap_or_default();
        ids.retain(|id| *id != loan_id);
        Ok(ids)
    })?;

    Ok(Response::new()
        .add_attribute("method", "cancel_loan")
        .add_attribute("loan_id", loan_id.to_string()))
}
