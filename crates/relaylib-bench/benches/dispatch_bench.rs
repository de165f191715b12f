//! Jump-table dispatch overhead on the hot slots.
//!
//! The first measured call routes through the bootstrap stub and installs
//! the table; everything after that is steady-state slot dispatch.

use std::ffi::CString;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use relaylib_abi::stubs;

fn bench_strlen_dispatch(c: &mut Criterion) {
    let sizes: &[usize] = &[16, 64, 256, 1024, 4096];
    let mut group = c.benchmark_group("strlen");

    for &size in sizes {
        let text = CString::new(vec![b'A'; size]).unwrap();
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(BenchmarkId::new("table", size), &size, |b, _| {
            b.iter(|| {
                let len = unsafe { stubs::rl_strlen(black_box(text.as_ptr())) };
                black_box(len);
            });
        });
    }
    group.finish();
}

fn bench_memcmp_dispatch(c: &mut Criterion) {
    let sizes: &[usize] = &[64, 1024, 65536];
    let mut group = c.benchmark_group("memcmp");

    for &size in sizes {
        let lhs = vec![0xABu8; size];
        let rhs = vec![0xABu8; size];
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(BenchmarkId::new("table", size), &size, |b, &sz| {
            b.iter(|| {
                let rc = unsafe {
                    stubs::rl_memcmp(
                        black_box(lhs.as_ptr().cast()),
                        black_box(rhs.as_ptr().cast()),
                        sz,
                    )
                };
                black_box(rc);
            });
        });
    }
    group.finish();
}

// Engine-direct next to the table path puts a number on the slot
// indirection plus the C-string crossing.
fn bench_atoi_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("atoi");

    group.bench_function("table", |b| {
        b.iter(|| {
            let v = unsafe { stubs::rl_atoi(black_box(c"-123456789".as_ptr())) };
            black_box(v);
        });
    });

    group.bench_function("engine_direct", |b| {
        b.iter(|| {
            let v = relaylib_core::convert::atoi(black_box(b"-123456789"));
            black_box(v);
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_strlen_dispatch,
    bench_memcmp_dispatch,
    bench_atoi_dispatch
);
criterion_main!(benches);
