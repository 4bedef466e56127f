//! Checkout operation benchmarks
//!
//! These benchmarks measure the operations run on every keystroke or
//! submission of a card form.
//!
//! Run with: `cargo bench --bench checkout_benchmarks`

use cardkit_lib::encryption::CustomerInputEncryptor;
use cardkit_lib::formatter::Mask;
use cardkit_lib::meta::ClientMetaInfo;
use cardkit_lib::prepare::PaymentRequestPreparer;
use cardkit_lib::request::PaymentRequest;
use cardkit_lib::test_utils::{fixtures, TestKeyPair};
use cardkit_lib::validation::luhn_checksum_valid;
use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

/// Benchmark applying and stripping a card number mask
fn bench_masking(c: &mut Criterion) {
    let mask = Mask::parse(fixtures::CARD_NUMBER_MASK);

    c.bench_function("mask_apply", |b| {
        b.iter(|| black_box(mask.apply(black_box(fixtures::VISA_CARD_NUMBER))))
    });
    c.bench_function("mask_remove", |b| {
        b.iter(|| black_box(mask.remove(black_box("4567 3500 0042 7977"))))
    });
}

/// Benchmark the Luhn check
fn bench_luhn(c: &mut Criterion) {
    c.bench_function("luhn_16_digits", |b| {
        b.iter(|| black_box(luhn_checksum_valid(black_box(fixtures::VISA_CARD_NUMBER))))
    });
}

/// Benchmark full request validation
fn bench_validation(c: &mut Criterion) {
    let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
    let mut request = PaymentRequest::new(fixtures::visa_product());
    request.set_value("cardNumber", "4567 3500 0042 7977").unwrap();
    request.set_value("expiryDate", "12/30").unwrap();
    request.set_value("cvv", "123").unwrap();

    c.bench_function("validate_card_request", |b| {
        b.iter(|| black_box(request.validate_at(today)))
    });
}

/// Benchmark envelope encryption at various payload sizes
fn bench_envelope_encryption(c: &mut Criterion) {
    let keys = TestKeyPair::generate("bench");
    let encryptor = CustomerInputEncryptor::new(keys.public_key()).unwrap();

    let mut group = c.benchmark_group("envelope_encrypt");
    for size in [256usize, 1024, 4096] {
        let payload = vec![0x42u8; size];
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_function(format!("{size}b"), |b| {
            b.iter(|| black_box(encryptor.encrypt(black_box(&payload)).unwrap()))
        });
    }
    group.finish();
}

/// Benchmark preparing a validated request end to end
fn bench_prepare(c: &mut Criterion) {
    let keys = TestKeyPair::generate("bench");
    let preparer =
        PaymentRequestPreparer::new("session", ClientMetaInfo::default(), keys.public_key())
            .unwrap();
    let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
    let mut request = PaymentRequest::new(fixtures::visa_product());
    request.set_value("cardNumber", fixtures::VISA_CARD_NUMBER).unwrap();
    request.set_value("expiryDate", "1230").unwrap();
    request.set_value("cvv", "123").unwrap();

    c.bench_function("prepare_payment_request", |b| {
        b.iter(|| black_box(preparer.prepare_at(&request, today).unwrap()))
    });
}

criterion_group!(
    checkout_benches,
    bench_masking,
    bench_luhn,
    bench_validation,
    bench_envelope_encryption,
    bench_prepare,
);

criterion_main!(checkout_benches);
