use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rfx_ledger::{LedgerConfig, ReflectionLedger};
use rfx_types::Address;

fn bench_transfers(c: &mut Criterion) {
    let owner = Address::new([1u8; 32]);
    let counterparty = Address::new([2u8; 32]);

    c.bench_function("transfer_included_pair", |b| {
        let mut ledger = ReflectionLedger::initialize(LedgerConfig {
            token_supply: 1_000_000_000,
            fee_rate_bps: 200,
            initial_holder: owner,
        })
        .unwrap();
        ledger.transfer(owner, counterparty, 500_000_000).unwrap();

        b.iter(|| {
            ledger
                .transfer(black_box(owner), black_box(counterparty), 1_000)
                .unwrap();
            ledger
                .transfer(black_box(counterparty), black_box(owner), 1_000)
                .unwrap();
        });
    });

    c.bench_function("balance_of_included", |b| {
        let ledger = ReflectionLedger::initialize(LedgerConfig {
            token_supply: 1_000_000_000,
            fee_rate_bps: 200,
            initial_holder: owner,
        })
        .unwrap();

        b.iter(|| ledger.balance_of(black_box(&owner)));
    });
}

criterion_group!(benches, bench_transfers);
criterion_main!(benches);
