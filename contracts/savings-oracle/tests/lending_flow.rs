use cosmwasm_std::{coins, Addr, Empty, Uint128};
use cw_multi_test::{App, AppResponse, Contract, ContractWrapper, Executor};

use stove_lending::ledger::{
    ExecuteMsg as LedgerExecuteMsg, InstantiateMsg as LedgerInstantiateMsg,
    PoolBalanceResponse, QueryMsg as LedgerQueryMsg,
};
use stove_lending::oracle::{
    ExecuteMsg as OracleExecuteMsg, InstantiateMsg as OracleInstantiateMsg,
    QueryMsg as OracleQueryMsg, ReportResponse, VerifiedSavingsResponse,
};
use stove_lending::registry::{
    ExecuteMsg as RegistryExecuteMsg, InstantiateMsg as RegistryInstantiateMsg,
    ProjectionResponse, QueryMsg as RegistryQueryMsg,
};
use stove_lending::types::{Loan, LoanStatus};
use stove_lending::ReasonCode;

const OWNER: &str = "owner";
const VERIFIER: &str = "verifier";
const LENDER: &str = "lender";
const BORROWER: &str = "borrower";
const VENDOR: &str = "vendor";
const DENOM: &str = "ustove";

fn registry_contract() -> Box<dyn Contract<Empty>> {
    Box::new(ContractWrapper::new(
        collateral_registry::contract::execute,
        collateral_registry::contract::instantiate,
        collateral_registry::contract::query,
    ))
}

fn ledger_contract() -> Box<dyn Contract<Empty>> {
    Box::new(ContractWrapper::new(
        loan_ledger::contract::execute,
        loan_ledger::contract::instantiate,
        loan_ledger::contract::query,
    ))
}

fn oracle_contract() -> Box<dyn Contract<Empty>> {
    Box::new(ContractWrapper::new(
        savings_oracle::contract::execute,
        savings_oracle::contract::instantiate,
        savings_oracle::contract::query,
    ))
}

struct Protocol {
    app: App,
    registry: Addr,
    ledger: Addr,
    oracle: Addr,
}

impl Protocol {
    /// Deploys all three contracts. The ledger only trusts the oracle when
    /// `wire_oracle` is set.
    fn deploy(wire_oracle: bool) -> Self {
        let mut app = App::new(|router, _, storage| {
            router
                .bank
                .init_balance(storage, &Addr::unchecked(LENDER), coins(50_000_000, DENOM))
                .unwrap();
        });
        let owner = Addr::unchecked(OWNER);

        let registry_id = app.store_code(registry_contract());
        let ledger_id = app.store_code(ledger_contract());
        let oracle_id = app.store_code(oracle_contract());

        let registry = app
            .instantiate_contract(
                registry_id,
                owner.clone(),
                &RegistryInstantiateMsg {
                    owner: None,
                    fuel_cost_per_unit: None,
                    min_collateral_ratio: None,
                },
                &[],
                "collateral-registry",
                None,
            )
            .unwrap();
        let ledger = app
            .instantiate_contract(
                ledger_id,
                owner.clone(),
                &LedgerInstantiateMsg {
                    owner: None,
                    denom: DENOM.to_string(),
                    oracle: None,
                },
                &[],
                "loan-ledger",
                None,
            )
            .unwrap();
        let oracle = app
            .instantiate_contract(
                oracle_id,
                owner.clone(),
                &OracleInstantiateMsg {
                    owner: None,
                    verifier: VERIFIER.to_string(),
                    loan_ledger: ledger.to_string(),
                    reporting_period: None,
                },
                &[],
                "savings-oracle",
                None,
            )
            .unwrap();

        if wire_oracle {
            app.execute_contract(
                owner,
                ledger.clone(),
                &LedgerExecuteMsg::SetOracle {
                    oracle: oracle.to_string(),
                },
                &[],
            )
            .unwrap();
        }

        Protocol {
            app,
            registry,
            ledger,
            oracle,
        }
    }

    fn registry_exec(&mut self, msg: RegistryExecuteMsg) -> anyhow::Result<AppResponse> {
        self.app
            .execute_contract(Addr::unchecked(OWNER), self.registry.clone(), &msg, &[])
    }

    fn ledger_exec(&mut self, sender: &str, msg: LedgerExecuteMsg) -> anyhow::Result<AppResponse> {
        self.app
            .execute_contract(Addr::unchecked(sender), self.ledger.clone(), &msg, &[])
    }

    fn oracle_exec(&mut self, sender: &str, msg: OracleExecuteMsg) -> anyhow::Result<AppResponse> {
        self.app
            .execute_contract(Addr::unchecked(sender), self.oracle.clone(), &msg, &[])
    }

    fn report(&mut self, loan_id: u64, amount: u128) -> anyhow::Result<AppResponse> {
        self.oracle_exec(
            VERIFIER,
            OracleExecuteMsg::ReportSavings {
                loan_id,
                amount: Uint128::new(amount),
            },
        )
    }

    fn advance_blocks(&mut self, blocks: u64) {
        self.app.update_block(|block| block.height += blocks);
    }

    fn loan(&self, loan_id: u64) -> Loan {
        self.app
            .wrap()
            .query_wasm_smart(&self.ledger, &LedgerQueryMsg::Loan { loan_id })
            .unwrap()
    }

    fn pool_balance(&self) -> Uint128 {
        let res: PoolBalanceResponse = self
            .app
            .wrap()
            .query_wasm_smart(&self.ledger, &LedgerQueryMsg::PoolBalance {})
            .unwrap();
        res.balance
    }

    fn oracle_report(&self, loan_id: u64, period: u64) -> ReportResponse {
        self.app
            .wrap()
            .query_wasm_smart(&self.oracle, &OracleQueryMsg::Report { loan_id, period })
            .unwrap()
    }

    /// Registers a stove, projects collateral for loan 0, funds the pool with
    /// 10_000_000 and takes a 1_000_000 loan at 10% through approval.
    fn originate_loan(&mut self) -> u64 {
        self.registry_exec(RegistryExecuteMsg::RegisterStove {
            model: "EcoStove".to_string(),
            efficiency_rate: 50,
            daily_usage_estimate: Uint128::new(10),
        })
        .unwrap();
        self.registry_exec(RegistryExecuteMsg::ProjectCollateralForLoan {
            loan_id: 0,
            loan_amount: Uint128::new(1_000_000),
            stove_model: "EcoStove".to_string(),
        })
        .unwrap();
        let projection: ProjectionResponse = self
            .app
            .wrap()
            .query_wasm_smart(&self.registry, &RegistryQueryMsg::Projection { loan_id: 0 })
            .unwrap();
        let projected = projection.projection.unwrap().projected_annual;
        // (100 - 50) * 10 * 1000 * 365 * 100
        assert_eq!(projected, Uint128::new(18_250_000_000));

        self.app
            .execute_contract(
                Addr::unchecked(LENDER),
                self.ledger.clone(),
                &LedgerExecuteMsg::FundPool {},
                &coins(10_000_000, DENOM),
            )
            .unwrap();

        self.ledger_exec(
            BORROWER,
            LedgerExecuteMsg::ApplyForLoan {
                vendor: VENDOR.to_string(),
                stove_model: "EcoStove".to_string(),
                loan_amount: Uint128::new(1_000_000),
                interest_rate: 10,
                term_blocks: 3650,
                projected_savings: projected,
            },
        )
        .unwrap();
        self.ledger_exec(OWNER, LedgerExecuteMsg::ApproveLoan { loan_id: 0 })
            .unwrap();
        0
    }
}

fn oracle_error(err: &anyhow::Error) -> Option<&savings_oracle::ContractError> {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<savings_oracle::ContractError>())
}

fn ledger_error(err: &anyhow::Error) -> Option<&loan_ledger::ContractError> {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<loan_ledger::ContractError>())
}

#[test]
fn savings_repay_loan_end_to_end() {
    let mut protocol = Protocol::deploy(true);
    let loan_id = protocol.originate_loan();

    // disbursed from pool custody
    let borrower_balance = protocol
        .app
        .wrap()
        .query_balance(BORROWER, DENOM)
        .unwrap();
    assert_eq!(borrower_balance.amount, Uint128::new(1_000_000));
    let ledger_balance = protocol
        .app
        .wrap()
        .query_balance(protocol.ledger.clone(), DENOM)
        .unwrap();
    assert_eq!(ledger_balance.amount, Uint128::new(9_000_000));
    assert_eq!(protocol.pool_balance(), Uint128::new(9_000_000));
    assert_eq!(protocol.loan(loan_id).status, LoanStatus::Active);

    protocol
        .oracle_exec(OWNER, OracleExecuteMsg::StartNewPeriod {})
        .unwrap();
    let res = protocol.report(loan_id, 600_000).unwrap();
    assert!(res.events.iter().any(|event| event.ty == "wasm-repayment"));

    let loan = protocol.loan(loan_id);
    assert_eq!(loan.repaid_amount, Uint128::new(600_000));
    assert_eq!(loan.verified_savings, Uint128::zero());
    assert_eq!(protocol.pool_balance(), Uint128::new(9_600_000));

    // a second report in the same period is refused and changes nothing
    let err = protocol.report(loan_id, 600_000).unwrap_err();
    assert_eq!(
        oracle_error(&err),
        Some(&savings_oracle::ContractError::AlreadyReported { loan_id, period: 0 })
    );
    assert_eq!(protocol.loan(loan_id).repaid_amount, Uint128::new(600_000));

    // closing early is refused while anything is owed
    let err = protocol
        .ledger_exec(BORROWER, LedgerExecuteMsg::CloseLoan { loan_id })
        .unwrap_err();
    assert_eq!(ledger_error(&err).map(|e| e.code()), Some(107));

    protocol.advance_blocks(30);
    protocol.report(loan_id, 900_000).unwrap();

    let loan = protocol.loan(loan_id);
    assert_eq!(loan.repaid_amount, Uint128::new(1_100_000));
    assert_eq!(loan.verified_savings, Uint128::new(400_000));
    assert_eq!(protocol.pool_balance(), Uint128::new(10_100_000));

    let savings: VerifiedSavingsResponse = protocol
        .app
        .wrap()
        .query_wasm_smart(&protocol.oracle, &OracleQueryMsg::VerifiedSavings { loan_id })
        .unwrap();
    assert_eq!(savings.verified_savings, Uint128::new(900_000));

    protocol
        .ledger_exec(BORROWER, LedgerExecuteMsg::CloseLoan { loan_id })
        .unwrap();
    assert_eq!(protocol.loan(loan_id).status, LoanStatus::Closed);

    // closed loans are no longer reportable
    protocol.advance_blocks(30);
    let err = protocol.report(loan_id, 1_000).unwrap_err();
    assert_eq!(
        oracle_error(&err),
        Some(&savings_oracle::ContractError::LoanNotActive {
            loan_id,
            status: LoanStatus::Closed,
        })
    );
    assert_eq!(protocol.oracle_report(loan_id, 2).report, None);
}

#[test]
fn pending_loan_cannot_be_reported() {
    let mut protocol = Protocol::deploy(true);
    protocol
        .ledger_exec(
            BORROWER,
            LedgerExecuteMsg::ApplyForLoan {
                vendor: VENDOR.to_string(),
                stove_model: "EcoStove".to_string(),
                loan_amount: Uint128::new(1_000),
                interest_rate: 5,
                term_blocks: 100,
                projected_savings: Uint128::new(12_000),
            },
        )
        .unwrap();
    protocol
        .oracle_exec(OWNER, OracleExecuteMsg::StartNewPeriod {})
        .unwrap();

    let err = protocol.report(0, 500).unwrap_err();
    assert_eq!(oracle_error(&err).map(|e| e.code()), Some(302));

    let err = protocol.report(7, 500).unwrap_err();
    assert_eq!(
        oracle_error(&err),
        Some(&savings_oracle::ContractError::LoanNotFound { loan_id: 7 })
    );
}

#[test]
fn ledger_failure_reverts_report() {
    let mut protocol = Protocol::deploy(false);
    let loan_id = protocol.originate_loan();
    protocol
        .oracle_exec(OWNER, OracleExecuteMsg::StartNewPeriod {})
        .unwrap();

    // the ledger does not trust the oracle yet
    let err = protocol.report(loan_id, 500_000).unwrap_err();
    assert_eq!(
        ledger_error(&err),
        Some(&loan_ledger::ContractError::OracleNotSet {})
    );
    assert_eq!(protocol.oracle_report(loan_id, 0).report, None);
    assert_eq!(protocol.loan(loan_id).repaid_amount, Uint128::zero());

    let oracle = protocol.oracle.to_string();
    protocol
        .ledger_exec(OWNER, LedgerExecuteMsg::SetOracle { oracle })
        .unwrap();

    // the reverted attempt did not consume the period
    protocol.report(loan_id, 500_000).unwrap();
    assert!(protocol.oracle_report(loan_id, 0).report.is_some());
    assert_eq!(protocol.loan(loan_id).repaid_amount, Uint128::new(500_000));
}

#[test]
fn only_verifier_reports_through_oracle() {
    let mut protocol = Protocol::deploy(true);
    let loan_id = protocol.originate_loan();
    protocol
        .oracle_exec(OWNER, OracleExecuteMsg::StartNewPeriod {})
        .unwrap();

    let err = protocol
        .oracle_exec(
            BORROWER,
            OracleExecuteMsg::ReportSavings {
                loan_id,
                amount: Uint128::new(1_000_000),
            },
        )
        .unwrap_err();
    assert_eq!(
        oracle_error(&err),
        Some(&savings_oracle::ContractError::NotVerifier {})
    );

    // nor can anyone bypass the oracle and report to the ledger directly
    let err = protocol
        .ledger_exec(
            VERIFIER,
            LedgerExecuteMsg::ReportSavings {
                loan_id,
                verified_savings: Uint128::new(1_000_000),
            },
        )
        .unwrap_err();
    assert_eq!(
        ledger_error(&err),
        Some(&loan_ledger::ContractError::Unauthorized {})
    );
    assert_eq!(protocol.loan(loan_id).repaid_amount, Uint128::zero());
}

#[test]
fn approval_limited_by_coins_held() {
    let mut protocol = Protocol::deploy(true);
    let loan_id = protocol.originate_loan();
    protocol
        .oracle_exec(OWNER, OracleExecuteMsg::StartNewPeriod {})
        .unwrap();
    protocol.report(loan_id, 1_500_000).unwrap();

    // repayments are credited without coins arriving
    assert_eq!(protocol.pool_balance(), Uint128::new(10_100_000));
    let held = protocol
        .app
        .wrap()
        .query_balance(protocol.ledger.clone(), DENOM)
        .unwrap();
    assert_eq!(held.amount, Uint128::new(9_000_000));

    protocol
        .ledger_exec(
            BORROWER,
            LedgerExecuteMsg::ApplyForLoan {
                vendor: VENDOR.to_string(),
                stove_model: "EcoStove".to_string(),
                loan_amount: Uint128::new(9_500_000),
                interest_rate: 10,
                term_blocks: 3650,
                projected_savings: Uint128::new(114_000_000),
            },
        )
        .unwrap();
    let err = protocol
        .ledger_exec(OWNER, LedgerExecuteMsg::ApproveLoan { loan_id: 1 })
        .unwrap_err();
    assert_eq!(
        ledger_error(&err),
        Some(&loan_ledger::ContractError::InsufficientFunds {
            available: Uint128::new(9_000_000),
            needed: Uint128::new(9_500_000),
        })
    );
    assert_eq!(protocol.loan(1).status, LoanStatus::Pending);
    assert_eq!(protocol.pool_balance(), Uint128::new(10_100_000));
}
