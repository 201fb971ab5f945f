// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for signing and decoding in the shorthand-sign crate.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use serde_json::json;

use shorthand_core::{Algorithm, SignedDataBase};
use shorthand_sign::{DecodeOptions, Decoder, SaltStore, create_signed_json};

fn store() -> SaltStore {
    [("client", "bench-client-secret"), ("service", "bench-service-secret")]
        .into_iter()
        .collect()
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Full decode of a typical session payload for each keyed-hash algorithm.
fn bench_decode_session(c: &mut Criterion) {
    let store = store();
    let payload = json!({"uid": 42, "cid": 7, "ttl": 9_999_999_999i64, "roles": ["admin", "billing"]});
    let options = DecodeOptions::default().allow(["client"]);
    let decoder = Decoder::new(&store);

    let mut group = c.benchmark_group("decode_session");
    for algo in [Algorithm::Md5, Algorithm::Sha256] {
        let raw = create_signed_json(&payload, "client", &store, algo, true).expect("sign failed");
        group.bench_function(algo.tag(), |b| {
            b.iter(|| {
                let data: SignedDataBase = decoder
                    .decode(black_box(&raw), &options)
                    .expect("decode failed");
                black_box(data);
            });
        });
    }
    group.finish();
}

/// Direct-trust service calls skip hashing entirely.
fn bench_decode_direct(c: &mut Criterion) {
    let store = store();
    let raw = r#"service.direct.bench-service-secret.{"uid":42,"cid":7}"#;
    let options = DecodeOptions::default();
    let decoder = Decoder::new(&store);

    c.bench_function("decode_direct", |b| {
        b.iter(|| {
            let data: SignedDataBase = decoder
                .decode(black_box(raw), &options)
                .expect("decode failed");
            black_box(data);
        });
    });
}

/// Signing a 1 KiB payload.
fn bench_create_signed(c: &mut Criterion) {
    let store = store();
    let payload = json!({"blob": "x".repeat(1024)});

    c.bench_function("create_signed_json (1 KiB)", |b| {
        b.iter(|| {
            let raw = create_signed_json(black_box(&payload), "client", &store, Algorithm::Md5, true)
                .expect("sign failed");
            black_box(raw);
        });
    });
}

criterion_group!(
    benches,
    bench_decode_session,
    bench_decode_direct,
    bench_create_signed,
);
criterion_main!(benches);
