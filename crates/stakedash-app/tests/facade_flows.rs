//! End-to-end flows through the facade, including post-write reconciliation.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{ACCOUNT, MockLedger, MockSigner};
use pretty_assertions::assert_eq;
use stakedash::{ReconcilePolicy, StakingFacade, StoreConfig, StoreEvent, TxOutcome};
use stakedash_chain::StakingCall;
use stakedash_core::{AppConfig, TransactionStatus};
use tokio::sync::mpsc::UnboundedReceiver;

fn new_facade(
    ledger: MockLedger,
    policy: ReconcilePolicy,
) -> (
    StakingFacade<MockLedger>,
    Arc<MockLedger>,
    UnboundedReceiver<StoreEvent>,
) {
    let ledger = Arc::new(ledger);
    let (facade, events) = StakingFacade::new(Arc::clone(&ledger), StoreConfig::default(), policy);
    (facade, ledger, events)
}

/// Bonded 1500 in bag 1000, nominating `v01`.
fn bonded_ledger() -> MockLedger {
    MockLedger::new(100, 3)
        .with_ledger(ACCOUNT, 1500)
        .with_list_node(ACCOUNT, 1000)
        .with_nominations(ACCOUNT, &["v01"])
        .with_free_balance(ACCOUNT, 5000)
}

#[test]
fn reconcile_policy_from_config() {
    let mut config = AppConfig::default();
    assert_eq!(
        ReconcilePolicy::from_config(&config),
        ReconcilePolicy::OnFinalized
    );
    config.reconcile_delay_secs = Some(12);
    assert_eq!(
        ReconcilePolicy::from_config(&config),
        ReconcilePolicy::FixedDelay(Duration::from_secs(12))
    );
}

#[tokio::test]
async fn initialize_loads_era_and_account() {
    let (facade, _ledger, _events) = new_facade(bonded_ledger(), ReconcilePolicy::default());

    facade.initialize(Some(ACCOUNT)).await.unwrap();

    let state = facade.store().snapshot();
    assert_eq!(state.current_era, Some(100));
    assert_eq!(state.validators.len(), 3);
    let status = state.nominator_status.unwrap();
    assert!(status.is_nominating);
    assert_eq!(status.is_earning_rewards, Some(true));
    assert_eq!(state.can_nominate, Some(true));
    let bags = state.bag_list_info.unwrap();
    assert_eq!(bags.current_bag, Some(1000));
    assert_eq!(bags.is_misplaced, Some(false));
}

#[tokio::test]
async fn initialize_without_account_skips_account_reads() {
    let (facade, _ledger, _events) = new_facade(bonded_ledger(), ReconcilePolicy::default());

    facade.initialize(None).await.unwrap();

    let state = facade.store().snapshot();
    assert_eq!(state.nominator_status, None);
    assert_eq!(state.bag_list_info, None);
    assert_eq!(state.can_nominate, None);
}

#[tokio::test]
async fn bond_more_reconciles_nominator_and_bags() {
    let (facade, _ledger, _events) = new_facade(bonded_ledger(), ReconcilePolicy::OnFinalized);
    facade.initialize(Some(ACCOUNT)).await.unwrap();

    let outcome = facade
        .bond_more(Some(&MockSigner::account()), 1000)
        .await
        .unwrap();
    assert_eq!(
        outcome.status(),
        Some(&TransactionStatus::Finalized("0xfinal".to_string()))
    );
    outcome.reconciled().await;

    let state = facade.store().snapshot();
    assert_eq!(
        state.nominator_status.unwrap().bonded_amount,
        Some(2500)
    );
    let bags = state.bag_list_info.unwrap();
    assert_eq!(bags.correct_bag, Some(2000));
    assert_eq!(bags.current_bag, Some(1000));
    assert_eq!(bags.is_misplaced, Some(true));
}

#[tokio::test(start_paused = true)]
async fn fixed_delay_postpones_reconciliation() {
    let (facade, _ledger, _events) = new_facade(
        bonded_ledger(),
        ReconcilePolicy::FixedDelay(Duration::from_secs(12)),
    );
    facade.initialize(Some(ACCOUNT)).await.unwrap();
    let started = tokio::time::Instant::now();

    let outcome = facade
        .unbond(Some(&MockSigner::account()), 1000)
        .await
        .unwrap();

    tokio::time::advance(Duration::from_secs(11)).await;
    let bonded = facade
        .store()
        .snapshot()
        .nominator_status
        .and_then(|s| s.bonded_amount);
    assert_eq!(bonded, Some(1500));

    outcome.reconciled().await;
    assert!(started.elapsed() >= Duration::from_secs(12));
    let bonded = facade
        .store()
        .snapshot()
        .nominator_status
        .and_then(|s| s.bonded_amount);
    assert_eq!(bonded, Some(500));
}

#[tokio::test]
async fn failed_write_still_reconciles() {
    let mut ledger = bonded_ledger();
    ledger.fail_submit = true;
    let (facade, ledger, _events) = new_facade(ledger, ReconcilePolicy::OnFinalized);
    facade.initialize(Some(ACCOUNT)).await.unwrap();

    let reads = ledger.read_count();
    let outcome = facade
        .bond_more(Some(&MockSigner::account()), 1000)
        .await
        .unwrap();
    assert!(matches!(
        outcome.status(),
        Some(TransactionStatus::Failed(_))
    ));
    outcome.reconciled().await;

    assert!(ledger.read_count() > reads);
    let bonded = facade
        .store()
        .snapshot()
        .nominator_status
        .and_then(|s| s.bonded_amount);
    assert_eq!(bonded, Some(1500));
}

#[tokio::test]
async fn nominate_replaces_targets() {
    let (facade, ledger, _events) = new_facade(bonded_ledger(), ReconcilePolicy::OnFinalized);
    facade.initialize(Some(ACCOUNT)).await.unwrap();
    facade.store().toggle_validator_address("v00").unwrap();
    facade.store().toggle_validator_address("v02").unwrap();

    let outcome = facade.nominate(Some(&MockSigner::account())).await.unwrap();
    outcome.reconciled().await;

    assert_eq!(
        ledger.submitted(),
        vec![StakingCall::Nominate(vec![
            "v00".to_string(),
            "v02".to_string()
        ])]
    );
    let status = facade.store().snapshot().nominator_status.unwrap();
    assert_eq!(
        status.nominations,
        Some(vec!["v00".to_string(), "v02".to_string()])
    );
    assert_eq!(status.is_earning_rewards, Some(true));
}

#[tokio::test]
async fn rebag_moves_misplaced_account() {
    let ledger = MockLedger::new(100, 3)
        .with_ledger(ACCOUNT, 2500)
        .with_list_node(ACCOUNT, 3000);
    let (facade, ledger, _events) = new_facade(ledger, ReconcilePolicy::OnFinalized);
    facade.initialize(Some(ACCOUNT)).await.unwrap();
    assert_eq!(
        facade.check_bag_position(ACCOUNT).await.is_misplaced,
        Some(true)
    );

    let outcome = facade.rebag(Some(&MockSigner::account())).await.unwrap();
    outcome.reconciled().await;

    assert_eq!(
        ledger.submitted(),
        vec![StakingCall::Rebag {
            dislocated: ACCOUNT.to_string()
        }]
    );
    let bags = facade.store().snapshot().bag_list_info.unwrap();
    assert_eq!(bags.current_bag, Some(2000));
    assert_eq!(bags.is_misplaced, Some(false));
}

#[tokio::test]
async fn rebag_in_correct_bag_is_skipped() {
    let (facade, ledger, _events) = new_facade(bonded_ledger(), ReconcilePolicy::OnFinalized);
    facade.initialize(Some(ACCOUNT)).await.unwrap();

    let outcome = facade.rebag(Some(&MockSigner::account())).await.unwrap();

    match outcome {
        TxOutcome::Skipped { reason } => {
            assert_eq!(reason, "You are already in the correct bag.")
        }
        TxOutcome::Completed { .. } => panic!("rebag should not be submitted"),
    }
    assert!(ledger.submitted().is_empty());
}

#[tokio::test]
async fn rebag_without_bag_check_reports_unknown_position() {
    let (facade, ledger, _events) = new_facade(bonded_ledger(), ReconcilePolicy::OnFinalized);
    facade.initialize(None).await.unwrap();

    let outcome = facade.rebag(Some(&MockSigner::account())).await.unwrap();

    match outcome {
        TxOutcome::Skipped { reason } => assert_eq!(
            reason,
            "Bag position unknown. Check your bag list position first."
        ),
        TxOutcome::Completed { .. } => panic!("rebag should not be submitted"),
    }
    assert!(ledger.submitted().is_empty());
}

#[tokio::test]
async fn refresh_era_rereads_cached_era() {
    let (facade, ledger, _events) = new_facade(bonded_ledger(), ReconcilePolicy::OnFinalized);
    facade.initialize(None).await.unwrap();

    let reads = ledger.read_count();
    facade.load_validators_for_era(100).await.unwrap();
    assert_eq!(ledger.read_count(), reads);

    facade.refresh_era(100).await.unwrap();
    assert!(ledger.read_count() > reads);
}

#[tokio::test]
async fn refresh_account_picks_up_chain_changes() {
    let (facade, ledger, _events) = new_facade(bonded_ledger(), ReconcilePolicy::OnFinalized);
    let before = facade.load_account_data(ACCOUNT).await;
    assert_eq!(before.nominator_status.bonded_amount, Some(1500));

    ledger
        .ledgers
        .lock()
        .unwrap()
        .get_mut(ACCOUNT)
        .unwrap()
        .active = 2200;
    let after = facade.refresh_account(ACCOUNT).await;

    assert_eq!(after.nominator_status.bonded_amount, Some(2200));
    assert_eq!(after.bag_list_info.correct_bag, Some(2000));
    assert!(after.can_nominate);
}
