//! Benchmarks for the simulator shot loop
//!
//! Run with: cargo bench -p qrelay-adapter-sim

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use qrelay_adapter_sim::SimulatorBackend;
use qrelay_hal::Backend;
use qrelay_ir::Circuit;
use std::f64::consts::PI;

/// Rx-prepared source relayed onto a target through an ancilla.
fn relayed_rx() -> Circuit {
    let mut circuit = Circuit::new("relayed_rx");
    let q = circuit.add_qreg("q", 3).unwrap();
    let c = circuit.add_creg("c", 3).unwrap();
    let (src, anc, tgt) = (q[0], q[1], q[2]);

    circuit
        .rx(PI / 4.0, src)
        .unwrap()
        .h(anc)
        .unwrap()
        .cx(anc, tgt)
        .unwrap()
        .cx(src, anc)
        .unwrap()
        .h(src)
        .unwrap()
        .measure(src, c[0])
        .unwrap()
        .measure(anc, c[1])
        .unwrap()
        .x_if(tgt, c[1])
        .unwrap()
        .z_if(tgt, c[0])
        .unwrap()
        .measure(tgt, c[2])
        .unwrap();
    circuit
}

fn bench_shots(c: &mut Criterion) {
    let mut group = c.benchmark_group("shot_loop");
    let backend = SimulatorBackend::new().with_seed(0);
    let circuit = relayed_rx();

    for shots in &[256u32, 1024, 4096] {
        group.throughput(Throughput::Elements(u64::from(*shots)));
        group.bench_with_input(BenchmarkId::new("relayed_rx", shots), shots, |b, &s| {
            b.iter(|| black_box(backend.run(&circuit, s).unwrap()));
        });
    }

    group.finish();
}

fn bench_width(c: &mut Criterion) {
    let mut group = c.benchmark_group("ghz_width");
    let backend = SimulatorBackend::new().with_seed(0);

    for n in &[4u32, 8, 12] {
        let circuit = Circuit::ghz(*n).unwrap();
        group.bench_with_input(BenchmarkId::new("1024_shots", n), &circuit, |b, circuit| {
            b.iter(|| black_box(backend.run(circuit, 1024).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_shots, bench_width);
criterion_main!(benches);
