//! End-to-end fund lifecycle tests: deposit, propose, vote, execute, and the
//! height boundaries between those phases.

use std::collections::HashMap;

use poolfund_engine::prelude::*;
use poolfund_types::Address;

/// Base-asset ledger double: tracks external balances so payouts and custody
/// movements can be asserted end to end.
#[derive(Debug, Default)]
struct BaseAssetLedger {
    balances: HashMap<Address, u128>,
    fail_next: bool,
}

impl BaseAssetLedger {
    fn fund_account(&mut self, account: Address, amount: u128) {
        *self.balances.entry(account).or_insert(0) += amount;
    }

    fn balance(&self, account: &Address) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }
}

impl ValueTransfer for BaseAssetLedger {
    fn transfer(
        &mut self,
        amount: u128,
        from: Address,
        to: Address,
    ) -> Result<(), TransferFailure> {
        if self.fail_next {
            self.fail_next = false;
            return Err(TransferFailure::new(amount, "simulated outage"));
        }
        let from_balance = self.balance(&from);
        if from_balance < amount {
            return Err(TransferFailure::new(amount, "insufficient base asset"));
        }
        self.balances.insert(from, from_balance - amount);
        *self.balances.entry(to).or_insert(0) += amount;
        Ok(())
    }
}

fn addr(byte: u8) -> Address {
    Address::from_bytes([byte; 20])
}

const OWNER: u8 = 0xf0;
const CUSTODY: u8 = 0xf1;

fn new_fund() -> PoolFund<BaseAssetLedger> {
    let mut assets = BaseAssetLedger::default();
    assets.fund_account(addr(1), 2_000_000);
    assets.fund_account(addr(2), 2_000_000);

    let mut fund = PoolFund::new(addr(OWNER), addr(CUSTODY), assets);
    fund.initialize(addr(OWNER), 1_000, 30).unwrap();
    fund
}

#[test]
fn single_depositor_passes_and_executes_a_payout() {
    let mut fund = new_fund();

    fund.deposit(addr(1), 1_000_000, 0).unwrap();
    assert_eq!(fund.balance_of(&addr(1)), 1_000_000);
    assert_eq!(fund.total_supply(), 1_000_000);

    let id = fund
        .create_proposal(addr(1), "infrastructure grant".into(), 500_000, addr(7), 100, 0)
        .unwrap();
    assert_eq!(id, 1);

    fund.vote(addr(1), id, VoteChoice::Yes, 50).unwrap();
    assert_eq!(fund.proposal(id).unwrap().yes_votes, 1_000_000);

    // Advance the clock to expiry and execute.
    fund.execute_proposal(addr(2), id, 100).unwrap();
    let proposal = fund.proposal(id).unwrap();
    assert!(proposal.executed);
    assert_eq!(fund.transfer_primitive().balance(&addr(7)), 500_000);
    assert_eq!(fund.transfer_primitive().balance(&addr(CUSTODY)), 500_000);

    // A second execution of the same proposal is refused.
    assert_eq!(
        fund.execute_proposal(addr(2), id, 101),
        Err(FundError::Unauthorized)
    );
    assert_eq!(fund.transfer_primitive().balance(&addr(7)), 500_000);
}

#[test]
fn tied_tally_never_pays_out() {
    let mut fund = new_fund();

    fund.deposit(addr(1), 1_000_000, 0).unwrap();
    fund.deposit(addr(2), 1_000_000, 0).unwrap();

    let id = fund
        .create_proposal(addr(1), "contested payout".into(), 250_000, addr(7), 100, 0)
        .unwrap();
    fund.vote(addr(1), id, VoteChoice::Yes, 10).unwrap();
    fund.vote(addr(2), id, VoteChoice::No, 11).unwrap();

    let proposal = fund.proposal(id).unwrap();
    assert_eq!(proposal.yes_votes, 1_000_000);
    assert_eq!(proposal.no_votes, 1_000_000);

    assert_eq!(
        fund.execute_proposal(addr(1), id, 100),
        Err(FundError::Unauthorized)
    );
    assert!(!fund.proposal(id).unwrap().executed);
    assert_eq!(fund.transfer_primitive().balance(&addr(7)), 0);
    assert_eq!(fund.transfer_primitive().balance(&addr(CUSTODY)), 2_000_000);
}

#[test]
fn lock_and_expiry_boundaries() {
    let mut fund = new_fund();
    fund.deposit(addr(1), 1_000_000, 10).unwrap();

    // Lock period 30: withdrawal opens exactly at height 40.
    assert_eq!(
        fund.withdraw(addr(1), 100_000, 39),
        Err(FundError::LockedPeriod)
    );
    fund.withdraw(addr(1), 100_000, 40).unwrap();

    let id = fund
        .create_proposal(addr(1), "boundary check".into(), 1, addr(7), 60, 40)
        .unwrap();

    // Voting closes strictly at expiry (height 100); execution opens there.
    assert_eq!(
        fund.execute_proposal(addr(1), id, 99),
        Err(FundError::ProposalExpired)
    );
    fund.vote(addr(1), id, VoteChoice::Yes, 99).unwrap();
    assert_eq!(
        fund.vote(addr(1), id, VoteChoice::Yes, 100),
        Err(FundError::ProposalExpired)
    );
    fund.execute_proposal(addr(1), id, 100).unwrap();
}

#[test]
fn full_round_trip_restores_pre_deposit_state() {
    let mut fund = new_fund();
    let before_depositor = fund.transfer_primitive().balance(&addr(1));

    fund.deposit(addr(1), 1_000_000, 0).unwrap();
    fund.withdraw(addr(1), 1_000_000, 30).unwrap();

    assert_eq!(fund.balance_of(&addr(1)), 0);
    assert_eq!(fund.total_supply(), 0);
    assert_eq!(fund.transfer_primitive().balance(&addr(1)), before_depositor);
    assert_eq!(fund.transfer_primitive().balance(&addr(CUSTODY)), 0);
}

#[test]
fn failed_payout_keeps_proposal_alive() {
    let mut fund = new_fund();
    fund.deposit(addr(1), 1_000_000, 0).unwrap();
    let id = fund
        .create_proposal(addr(1), "retryable payout".into(), 250_000, addr(7), 100, 0)
        .unwrap();
    fund.vote(addr(1), id, VoteChoice::Yes, 1).unwrap();

    fund.transfer_primitive_mut().fail_next = true;
    assert_eq!(
        fund.execute_proposal(addr(1), id, 100),
        Err(FundError::TransferFailed)
    );
    assert!(!fund.proposal(id).unwrap().executed);
    assert_eq!(fund.transfer_primitive().balance(&addr(7)), 0);

    fund.execute_proposal(addr(1), id, 110).unwrap();
    assert!(fund.proposal(id).unwrap().executed);
    assert_eq!(fund.transfer_primitive().balance(&addr(7)), 250_000);
}
