use criterion::{Criterion, criterion_group, criterion_main};

pub fn criterion_benchmark(c: &mut Criterion) {
    use bibscript::parse::{parse_record, split_chunks};
    use bibscript::{Bibliography, Config};

    let input = std::fs::read_to_string("assets/sample.bib").unwrap();

    c.bench_function("sample split", |b| b.iter(|| split_chunks(&input)));

    c.bench_function("sample records", |b| {
        b.iter(|| {
            split_chunks(&input)
                .into_iter()
                .map(parse_record)
                .collect::<Vec<_>>()
        })
    });

    c.bench_function("sample load", |b| b.iter(|| Bibliography::parse(&input)));

    let unchecked = Config {
        check_keys: false,
        ..Config::default()
    };
    c.bench_function("sample load unchecked", |b| {
        b.iter(|| Bibliography::parse_with(&input, &unchecked))
    });

    let bib = Bibliography::parse(&input).unwrap();
    c.bench_function("sample serialize", |b| b.iter(|| bib.serialize()));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
