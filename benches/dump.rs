use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use regdump::{dump, DumpOptions, Hive, TimeBasis, TimestampMode};

#[path = "../tests/common/mod.rs"]
mod common;

use common::{utf16z, HiveBuilder};

/// `fanout` keys under the root, each with a string, a DWORD, a binary
/// FILETIME and a `Properties` child.
fn build_hive(fanout: usize) -> Hive {
    let mut b = HiveBuilder::new();
    let mut children = Vec::with_capacity(fanout);

    for i in 0..fanout {
        let prop = b.value("DeviceDesc", 0xFFFF0012, &utf16z("Generic device"));
        let properties = b.key("Properties", &[prop], &[]);

        let name = b.value("Name", 1, &utf16z(&format!("Item {}", i)));
        let count = b.value("Count", 4, &(i as u32).to_le_bytes());
        let stamp = b.value("Installed", 3, &132_036_932_961_234_567u64.to_le_bytes());
        children.push(b.key(&format!("Key{:05}", i), &[name, count, stamp], &[properties]));
    }

    let root = b.key("ROOT", &[], &children);
    b.hive(root)
}

fn bench_dump(c: &mut Criterion) {
    let mut group = c.benchmark_group("dump");

    for fanout in [100usize, 1000] {
        let hive = build_hive(fanout);
        group.throughput(Throughput::Bytes(hive.as_bytes().len() as u64));

        let plain = DumpOptions::default().with_time_basis(TimeBasis::Utc);
        group.bench_with_input(BenchmarkId::new("plain", fanout), &hive, |b, hive| {
            b.iter(|| dump(black_box(hive), &plain, std::io::sink()))
        });

        let stamped = plain
            .clone()
            .with_hex_type(true)
            .with_timestamps(TimestampMode::Full);
        group.bench_with_input(BenchmarkId::new("hex_timestamps", fanout), &hive, |b, hive| {
            b.iter(|| dump(black_box(hive), &stamped, std::io::sink()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_dump);
criterion_main!(benches);
