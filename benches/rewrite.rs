//! Benchmarks for the identifier rewrite scan.
//!
//! Run with: `cargo bench`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use docstream::rewrite_identifiers;

/// Build a synthetic document containing `uuid_count` embedded identifiers
/// spread through filler text.
fn synthetic_doc(uuid_count: usize) -> String {
    let mut doc = String::from(r#"{"resourceType":"Document","entries":["#);

    for i in 0..uuid_count {
        if i > 0 {
            doc.push(',');
        }
        doc.push_str(&format!(
            r#"{{"id":"{:08x}-{:04x}-4{:03x}-8{:03x}-{:012x}","note":"entry number {} with some plain filler text around it"}}"#,
            rand::random::<u32>(),
            rand::random::<u16>(),
            rand::random::<u16>() & 0xfff,
            rand::random::<u16>() & 0xfff,
            rand::random::<u64>() & 0xffff_ffff_ffff,
            i
        ));
    }

    doc.push_str("]}");
    doc
}

fn bench_rewrite(c: &mut Criterion) {
    let mut group = c.benchmark_group("rewrite_identifiers");

    for &count in &[1usize, 16, 256] {
        let doc = synthetic_doc(count);
        group.throughput(Throughput::Bytes(doc.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &doc, |b, doc| {
            b.iter(|| rewrite_identifiers(doc, "p2-o1"));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_rewrite);
criterion_main!(benches);
