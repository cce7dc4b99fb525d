use cosmwasm_std::{to_binary, Binary, Deps, Env};

use stove_lending::ledger::{
    BorrowerLoansResponse, ConfigResponse, LoanStatusResponse, NextLoanIdResponse,
    PoolBalanceResponse, QueryMsg,
};

use crate::error::{ContractError, ContractResult};
use crate::state::{BORROWER_LOANS, CONFIG, LOANS, LOAN_POOL_BALANCE, NEXT_LOAN_ID, OWNER};

pub fn query_handler(deps: Deps, _env: Env, msg: QueryMsg) -> ContractResult<Binary> {
    let bin = match msg {
        QueryMsg::Config {} => {
            let config = CONFIG.load(deps.storage)?;
            to_binary(&ConfigResponse {
                denom: config.denom,
                oracle: config.oracle,
            })?
        }
        QueryMsg::Owner {} => to_binary(&OWNER.query_admin(deps)?)?,
        QueryMsg::Loan { loan_id } => {
            let loan = LOANS
                .may_load(deps.storage, loan_id)?
                .ok_or(ContractError::LoanNotFound { loan_id })?;
            to_binary(&loan)?
        }
        QueryMsg::LoanStatus { loan_id } => to_binary(&LoanStatusResponse {
            status: LOANS.may_load(deps.storage, loan_id)?.map(|loan| loan.status),
        })?,
        QueryMsg::PoolBalance {} => to_binary(&PoolBalanceResponse {
            balance: LOAN_POOL_BALANCE.load(deps.storage)?,
        })?,
        QueryMsg::BorrowerLoans { borrower } => {
            let borrower = deps.api.addr_validate(&borrower)?;
            to_binary(&BorrowerLoansResponse {
                loan_ids: BORROWER_LOANS
                    .may_load(deps.storage, &borrower)?
                    .unwrap_or_default(),
            })?
        }
        QueryMsg::NextLoanId {} => to_binary(&NextLoanIdResponse {
            next_loan_id: NEXT_LOAN_ID.load(deps.storage)?,
        })?,
    };
    Ok(bin)
}
