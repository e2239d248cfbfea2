//! Cost of the gate's operations at production settings.

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use lumora_auth::{PasswordHasher, Role, SigningKey, SigningKeys, TokenService};
use lumora_core::AccountId;

fn bench_password(c: &mut Criterion) {
    let hasher = PasswordHasher::new();
    let hash = hasher.hash("secret123").unwrap();

    let mut group = c.benchmark_group("password");
    group.sample_size(10);
    group.bench_function("hash_default_cost", |b| {
        b.iter(|| hasher.hash(black_box("secret123")).unwrap())
    });
    group.bench_function("verify_default_cost", |b| {
        b.iter(|| hasher.verify(black_box("secret123"), &hash))
    });
    group.finish();
}

fn bench_tokens(c: &mut Criterion) {
    let keys = SigningKeys::new(
        SigningKey::new("primary", b"bench-secret-bench-secret-bench-secret".to_vec()).unwrap(),
    );
    let svc = TokenService::new(keys);
    let now = Utc::now();
    let issued = svc.issue(AccountId::new(), Role::Parent, now).unwrap();

    c.bench_function("token_issue", |b| {
        b.iter(|| svc.issue(black_box(AccountId::new()), Role::Parent, now).unwrap())
    });
    c.bench_function("token_verify", |b| {
        b.iter(|| svc.verify(black_box(&issued.token), now).unwrap())
    });
}

criterion_group!(benches, bench_password, bench_tokens);
criterion_main!(benches);
