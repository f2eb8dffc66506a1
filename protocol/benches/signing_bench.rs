// Signing & verification benchmarks for legacy transactions.
//
// Covers keypair generation, signing-hash computation in both forms,
// transaction signing, cold sender recovery, and decode+verify throughput
// over batches of serialized transactions.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use ethtx_protocol::chain::Chain;
use ethtx_protocol::crypto::EthKeypair;
use ethtx_protocol::transaction::{Transaction, TxData, TxOptions};

fn transfer(nonce: u64) -> TxData {
    TxData::new()
        .with_nonce(nonce)
        .with_gas_price(20_000_000_000u64)
        .with_gas_limit(21_000u64)
        .with_to([0x35u8; 20])
        .with_value(1_000_000_000_000_000_000u64)
}

fn mainnet() -> TxOptions {
    TxOptions::new().with_chain(Chain::Mainnet)
}

fn bench_keypair_generation(c: &mut Criterion) {
    c.bench_function("secp256k1/keypair_generate", |b| {
        b.iter(EthKeypair::generate);
    });
}

fn bench_signing_hash(c: &mut Criterion) {
    let legacy = Transaction::from_data(transfer(9), TxOptions::default()).unwrap();
    let eip155 = Transaction::from_data(transfer(9), mainnet()).unwrap();

    c.bench_function("tx/signing_hash_legacy", |b| {
        b.iter(|| legacy.hash(false));
    });
    c.bench_function("tx/signing_hash_eip155", |b| {
        b.iter(|| eip155.hash(false));
    });
}

fn bench_sign_transaction(c: &mut Criterion) {
    let keypair = EthKeypair::generate();

    c.bench_function("tx/sign", |b| {
        b.iter(|| {
            let mut tx = Transaction::from_data(transfer(42), mainnet()).unwrap();
            tx.sign(&keypair).unwrap();
        });
    });
}

fn bench_recover_sender(c: &mut Criterion) {
    let keypair = EthKeypair::generate();
    let mut tx = Transaction::from_data(transfer(42), mainnet()).unwrap();
    tx.sign(&keypair).unwrap();
    let wire = tx.serialize();

    // Decode each iteration so the sender cache starts cold.
    c.bench_function("tx/decode_and_recover_sender", |b| {
        b.iter(|| {
            let tx = Transaction::from_rlp(&wire, TxOptions::default()).unwrap();
            tx.sender_address().unwrap()
        });
    });
}

fn bench_batch_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("tx/batch_validate");

    for size in [10, 50, 100, 500] {
        let keypair = EthKeypair::generate();
        let batch: Vec<Vec<u8>> = (0..size)
            .map(|nonce| {
                let mut tx = Transaction::from_data(transfer(nonce), mainnet()).unwrap();
                tx.sign(&keypair).unwrap();
                tx.serialize()
            })
            .collect();

        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &batch, |b, batch| {
            b.iter(|| {
                batch
                    .iter()
                    .map(|wire| Transaction::from_rlp(wire, TxOptions::default()).unwrap())
                    .all(|tx| tx.validate())
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_keypair_generation,
    bench_signing_hash,
    bench_sign_transaction,
    bench_recover_sender,
    bench_batch_validate,
);
criterion_main!(benches);
