use criterion::{criterion_group, criterion_main, Criterion};
use topcodes::Scanner;

fn scan(path: &str) {
    let mut scanner = Scanner::new();
    let codes = scanner.scan_by_filename(path).unwrap();
    assert_eq!(3, codes.len());
}

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("Scanner (photo)", |b| b.iter(|| scan("assets/photo.png")));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
