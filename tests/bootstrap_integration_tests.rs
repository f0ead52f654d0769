//! Integration tests for the EIP-7702 bootstrap using fake implementations

use alloy_primitives::{address, Address, U256};
use alloy_sol_types::SolCall;
use std::time::Duration;
use unified_relayer::bootstrap::{Bootstrap, BootstrapStep, ConfirmationPolling, SettlePolicy};
use unified_relayer::testing::{FakeClock, FakeDelegatedExecutor};
use unified_relayer::traits::DelegatedExecutor;
use unified_relayer::{RelayerError, UnifiedDeposit, SEPOLIA_CHAIN_ID};

const CONTRACT: Address = address!("00000000000000000000000000000000000000aa");
const RECIPIENT: Address = address!("00000000000000000000000000000000000000bb");

/// Helper function to create a bootstrap with fake executor and clock
fn create_bootstrap(
    executor: &FakeDelegatedExecutor,
    clock: &FakeClock,
    settle: SettlePolicy,
) -> Bootstrap<FakeDelegatedExecutor, FakeClock> {
    Bootstrap::builder()
        .executor(executor.clone())
        .clock(clock.clone())
        .contract(CONTRACT)
        .recipient(RECIPIENT)
        .settle(settle)
        .build()
}

#[tokio::test]
async fn test_owner_mismatch_sends_nothing() {
    let executor = FakeDelegatedExecutor::new();
    let owner = address!("00000000000000000000000000000000000000cc");
    executor.set_owner(owner);
    let clock = FakeClock::new();

    let result = create_bootstrap(&executor, &clock, SettlePolicy::default())
        .run()
        .await;

    match result {
        Err(RelayerError::NotOwner {
            signer,
            owner: reported,
        }) => {
            assert_eq!(signer, executor.signer_address());
            assert_eq!(reported, owner);
        }
        other => panic!("Expected NotOwner error, got {other:?}"),
    }
    assert!(executor.sent().is_empty(), "No transaction may be sent");
    assert_eq!(executor.authorization_count(), 0);
}

#[tokio::test]
async fn test_three_steps_in_order_with_fresh_authorizations() {
    let executor = FakeDelegatedExecutor::new();
    let clock = FakeClock::new();

    let report = create_bootstrap(&executor, &clock, SettlePolicy::default())
        .run()
        .await
        .unwrap();

    let sent = executor.sent();
    assert_eq!(sent.len(), 3);
    assert_eq!(executor.authorization_count(), 3);

    let set_recipient =
        UnifiedDeposit::setRecipientCall::abi_decode(&sent[0].0).unwrap();
    assert_eq!(set_recipient.newRecipient, RECIPIENT);

    let set_relayer = UnifiedDeposit::setRelayerCall::abi_decode(&sent[1].0).unwrap();
    assert_eq!(set_relayer.relayer, executor.signer_address());
    assert!(set_relayer.status);

    assert_eq!(&sent[2].0[..], &UnifiedDeposit::relayETHCall::SELECTOR[..]);

    for (index, (_, authorization)) in sent.iter().enumerate() {
        assert_eq!(authorization.address, CONTRACT);
        assert_eq!(authorization.chain_id, U256::from(SEPOLIA_CHAIN_ID));
        assert_eq!(authorization.nonce, index as u64 + 1);
    }

    let steps: Vec<&str> = report.steps.iter().map(|outcome| outcome.step.name()).collect();
    assert_eq!(steps, vec!["setRecipient", "setRelayer", "relayETH"]);
    assert_eq!(report.tx_hashes().len(), 3);
    assert!(matches!(
        report.steps[0].step,
        BootstrapStep::SetRecipient(recipient) if recipient == RECIPIENT
    ));
}

#[tokio::test]
async fn test_fixed_delay_sleeps_between_steps_only() {
    let executor = FakeDelegatedExecutor::new();
    let clock = FakeClock::new();

    let report = create_bootstrap(&executor, &clock, SettlePolicy::fixed_delay())
        .run()
        .await
        .unwrap();

    assert_eq!(
        clock.sleeps(),
        vec![Duration::from_secs(15); 2],
        "Should sleep 15s after the first two steps only"
    );
    assert_eq!(executor.receipt_poll_count(), 0);
    assert!(report.steps.iter().all(|outcome| outcome.receipt.is_none()));
}

#[tokio::test]
async fn test_default_settle_sends_every_step_despite_reverts() {
    let executor = FakeDelegatedExecutor::new();
    executor.revert_transactions();
    let clock = FakeClock::new();

    let report = Bootstrap::builder()
        .executor(executor.clone())
        .clock(clock.clone())
        .contract(CONTRACT)
        .recipient(RECIPIENT)
        .build()
        .run()
        .await
        .unwrap();

    assert_eq!(executor.sent().len(), 3);
    assert_eq!(report.tx_hashes().len(), 3);
    assert_eq!(clock.sleeps(), vec![Duration::from_secs(15); 2]);
    assert_eq!(executor.receipt_poll_count(), 0);
}

#[tokio::test]
async fn test_confirmation_timeout() {
    let executor = FakeDelegatedExecutor::new();
    executor.never_mine();
    let clock = FakeClock::new();

    let polling = ConfirmationPolling::default()
        .with_max_attempts(5)
        .with_poll_interval_secs(3);
    let result = create_bootstrap(&executor, &clock, SettlePolicy::Confirmation(polling))
        .run()
        .await;

    match result {
        Err(RelayerError::ConfirmationTimeout { attempts, .. }) => assert_eq!(attempts, 5),
        other => panic!("Expected ConfirmationTimeout error, got {other:?}"),
    }

    assert_eq!(executor.sent().len(), 1, "Later steps must not be sent");
    assert_eq!(executor.receipt_poll_count(), 5);
    assert_eq!(
        clock.total_sleep_time(),
        Duration::from_secs(12),
        "Should sleep between attempts, not after the last one"
    );
}

#[tokio::test]
async fn test_confirmation_gives_up_after_two_minutes() {
    let executor = FakeDelegatedExecutor::new();
    executor.never_mine();
    let clock = FakeClock::new();

    let result = create_bootstrap(&executor, &clock, SettlePolicy::confirmation())
        .run()
        .await;

    assert!(matches!(
        result,
        Err(RelayerError::ConfirmationTimeout { attempts: 40, .. })
    ));
    assert_eq!(executor.receipt_poll_count(), 40);
    assert_eq!(clock.sleep_count(), 39);
}
