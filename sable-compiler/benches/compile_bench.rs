use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use sable_compiler::{Compiler, CompilerOptions};

fn build_listing_template(rows: usize) -> String {
    let mut out = String::from("<ul>\n");
    for i in 0..rows {
        out.push_str(&format!(
            "  <li s-if=\"$visible{i}\" s-bind:class=\"['row' => true]\">{{{{ $label{i} }}}}</li>\n"
        ));
    }
    out.push_str("</ul>\n");
    out
}

fn bench_compile_listing(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile_listing");
    group.sample_size(20);
    let compiler = Compiler::new(CompilerOptions::default());
    for &rows in &[10usize, 100usize, 500usize] {
        let template = build_listing_template(rows);
        group.bench_with_input(BenchmarkId::from_parameter(rows), &template, |b, t| {
            b.iter(|| compiler.compile_str(t, "bench").expect("compile"));
        });
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default().without_plots();
    targets = bench_compile_listing
}
criterion_main!(benches);
