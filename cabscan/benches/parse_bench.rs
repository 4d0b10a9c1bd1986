use criterion::{black_box, criterion_group, criterion_main, Criterion};
use cabscan::CabScanCore;

const CAB_FIXTURE: &str = include_str!("../tests/fixtures/valid_kitchen.cab");
const MARKUP_FIXTURE: &str = include_str!("../tests/fixtures/broken_design.xml");

fn bench_parse_cab(c: &mut Criterion) {
    c.bench_function("parse_cab", |b| {
        b.iter(|| {
            CabScanCore::parse(
                black_box(CAB_FIXTURE.as_bytes()),
                black_box("valid_kitchen.cab"),
            )
        });
    });
}

fn bench_parse_markup(c: &mut Criterion) {
    c.bench_function("parse_markup", |b| {
        b.iter(|| {
            CabScanCore::parse(
                black_box(MARKUP_FIXTURE.as_bytes()),
                black_box("broken_design.xml"),
            )
        });
    });
}

fn bench_parse_large_line_file(c: &mut Criterion) {
    let mut input = String::new();
    for i in 0..200 {
        input.push_str(&format!(
            "CAB_PART part_{i}\nwidth = {i} mm\nheight = 720 mm\nCAB_RULE r_{i} width > 0\n"
        ));
    }
    c.bench_function("parse_large_line_file", |b| {
        b.iter(|| CabScanCore::parse(black_box(input.as_bytes()), black_box("large.cab")));
    });
}

criterion_group!(
    benches,
    bench_parse_cab,
    bench_parse_markup,
    bench_parse_large_line_file
);
criterion_main!(benches);
