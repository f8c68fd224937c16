use criterion::{criterion_group, criterion_main, Criterion};
use edurec_core::normalize::normalize;

fn bench_normalize(c: &mut Criterion) {
    let text = "Design a week-long unit where fifth graders compare fractions \
                and decimals using number lines, then explain how plants use \
                photosynthesis to convert light into chemical energy, citing \
                at least two of the provided reference resources."
        .repeat(16);
    c.bench_function("normalize_assignment", |b| b.iter(|| normalize(&text)));
}

criterion_group!(benches, bench_normalize);
criterion_main!(benches);
