use rfx_ledger::{ExclusionError, LedgerConfig, ReflectionLedger, TransferError};
use rfx_types::{Address, MicroRfx};

const SUPPLY: MicroRfx = 1_000_000;

fn addr(tag: u8) -> Address {
    Address::new([tag; 32])
}

fn owner() -> Address {
    addr(1)
}

fn alice() -> Address {
    addr(2)
}

fn bob() -> Address {
    addr(3)
}

fn new_ledger() -> ReflectionLedger {
    ReflectionLedger::initialize(LedgerConfig {
        token_supply: SUPPLY,
        fee_rate_bps: 200,
        initial_holder: owner(),
    })
    .unwrap()
}

fn balance_sum(ledger: &ReflectionLedger, parties: &[Address]) -> MicroRfx {
    parties.iter().map(|a| ledger.balance_of(a)).sum()
}

#[test]
fn test_baseline_fee_collection() {
    let mut ledger = new_ledger();
    ledger.transfer(owner(), alice(), 100_000).unwrap();

    assert_eq!(ledger.total_fees_collected(), 2_000);

    // Alice receives the 98_000 net plus her pro-rata share of the fee that
    // was redistributed in the same operation.
    let alice_balance = ledger.balance_of(&alice());
    assert!(
        (98_000..=98_197).contains(&alice_balance),
        "alice = {}",
        alice_balance
    );

    let owner_balance = ledger.balance_of(&owner());
    assert!(
        (900_000..=901_804).contains(&owner_balance),
        "owner = {}",
        owner_balance
    );

    let sum = balance_sum(&ledger, &[owner(), alice()]);
    assert!(sum.abs_diff(SUPPLY) <= 3, "sum = {}", sum);
    assert!(ledger.audit().is_healthy);
}

#[test]
fn test_passive_gain_for_bystander() {
    let mut ledger = new_ledger();
    ledger.transfer(owner(), bob(), 50_000).unwrap();
    let bob_before = ledger.balance_of(&bob());

    ledger.transfer(owner(), alice(), 100_000).unwrap();

    // Bob did not take part in the transfer but gains from the fee.
    assert!(ledger.balance_of(&bob()) > bob_before);

    let sum = balance_sum(&ledger, &[owner(), alice(), bob()]);
    assert!(sum.abs_diff(SUPPLY) <= 5, "sum = {}", sum);
}

#[test]
fn test_exclusion_neutralises_passive_gain() {
    let mut ledger = new_ledger();
    ledger.transfer(owner(), bob(), 50_000).unwrap();

    ledger.exclude_from_reward(bob()).unwrap();
    let bob_frozen = ledger.balance_of(&bob());

    ledger.transfer(owner(), alice(), 100_000).unwrap();

    // Excluded accounts see no passive gain at all.
    assert_eq!(ledger.balance_of(&bob()), bob_frozen);

    let sum = balance_sum(&ledger, &[owner(), alice(), bob()]);
    assert!(sum.abs_diff(SUPPLY) <= 5, "sum = {}", sum);
    assert!(ledger.audit().is_healthy);
}

#[test]
fn test_exclusion_round_trip_preserves_balance() {
    let mut ledger = new_ledger();
    ledger.transfer(owner(), alice(), 300_000).unwrap();
    ledger.transfer(owner(), bob(), 100_000).unwrap();

    let before = ledger.balance_of(&alice());
    ledger.exclude_from_reward(alice()).unwrap();
    ledger.include_in_reward(alice()).unwrap();
    let after = ledger.balance_of(&alice());

    assert!(before.abs_diff(after) <= 1, "before {} after {}", before, after);
}

#[test]
fn test_full_balance_transfer_and_overdraft() {
    let mut ledger = new_ledger();

    // Spending the entire balance is allowed and empties the account.
    ledger.transfer(owner(), alice(), SUPPLY).unwrap();
    assert_eq!(ledger.balance_of(&owner()), 0);

    // One unit beyond the balance is rejected.
    let alice_balance = ledger.balance_of(&alice());
    assert_eq!(
        ledger.transfer(alice(), bob(), alice_balance + 1),
        Err(TransferError::InsufficientBalance {
            available: alice_balance,
            requested: alice_balance + 1,
        })
    );

    // The failed transfer changed nothing.
    assert_eq!(ledger.balance_of(&alice()), alice_balance);
    assert_eq!(ledger.balance_of(&bob()), 0);
}

#[test]
fn test_excluded_pair_transfers_are_fee_free() {
    let mut ledger = new_ledger();
    ledger.transfer(owner(), alice(), 200_000).unwrap();
    ledger.transfer(owner(), bob(), 200_000).unwrap();

    ledger.exclude_from_reward(alice()).unwrap();
    ledger.exclude_from_reward(bob()).unwrap();

    let fees_before = ledger.total_fees_collected();
    let alice_before = ledger.balance_of(&alice());
    let bob_before = ledger.balance_of(&bob());
    let owner_before = ledger.balance_of(&owner());

    ledger.transfer(alice(), bob(), 50_000).unwrap();

    // No fee is levied and the amount moves exactly.
    assert_eq!(ledger.total_fees_collected(), fees_before);
    assert_eq!(ledger.balance_of(&alice()), alice_before - 50_000);
    assert_eq!(ledger.balance_of(&bob()), bob_before + 50_000);

    // Included bystanders are untouched.
    assert_eq!(ledger.balance_of(&owner()), owner_before);
}

#[test]
fn test_rate_drops_with_every_fee() {
    let mut ledger = new_ledger();
    let mut previous = ledger.current_rate().unwrap();

    for _ in 0..5 {
        ledger.transfer(owner(), alice(), 10_000).unwrap();
        let current = ledger.current_rate().unwrap();
        assert!(current < previous);
        previous = current;
    }
}

#[test]
fn test_exclusion_state_machine_errors() {
    let mut ledger = new_ledger();

    ledger.exclude_from_reward(alice()).unwrap();
    assert_eq!(
        ledger.exclude_from_reward(alice()),
        Err(ExclusionError::AlreadyExcluded)
    );

    ledger.include_in_reward(alice()).unwrap();
    assert_eq!(
        ledger.include_in_reward(alice()),
        Err(ExclusionError::NotExcluded)
    );
}

#[test]
fn test_snapshot_round_trip() {
    let mut ledger = new_ledger();
    ledger.transfer(owner(), alice(), 100_000).unwrap();
    ledger.exclude_from_reward(bob()).unwrap();

    let json = serde_json::to_string(&ledger).unwrap();
    let restored: ReflectionLedger = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, ledger);
    assert_eq!(restored.balance_of(&alice()), ledger.balance_of(&alice()));
    assert_eq!(restored.total_fees_collected(), 2_000);
    assert!(restored.is_excluded(&bob()));
}

#[test]
fn test_audit_reports_mixed_operations_healthy() {
    let mut ledger = new_ledger();
    ledger.transfer(owner(), alice(), 250_000).unwrap();
    ledger.transfer(alice(), bob(), 100_000).unwrap();
    ledger.exclude_from_reward(bob()).unwrap();
    ledger.transfer(owner(), bob(), 50_000).unwrap();
    ledger.transfer(bob(), alice(), 25_000).unwrap();
    ledger.include_in_reward(bob()).unwrap();

    let audit = ledger.audit();
    assert!(audit.is_healthy, "issues: {:?}", audit.issues);
    assert_eq!(audit.token_supply, SUPPLY);
    assert!(audit.drift <= audit.tolerance);
}
