//! 命令实例布局与构造性能基准测试
//!
//! 测试布局计算、实例分配/构造/析构以及完整的命令行匹配

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use game_bridge::command::{
    compute_layout, CommandBridge, CommandRequest, Overload, ParameterDescriptor,
};
use game_bridge::host::local::{LocalHost, LocalOrigin};
use game_bridge::host::PermissionLevel;

fn descriptors(count: usize) -> Vec<ParameterDescriptor> {
    (0..count)
        .map(|i| match i % 4 {
            0 => ParameterDescriptor::int(format!("n{}", i)),
            1 => ParameterDescriptor::text(format!("t{}", i)),
            2 => ParameterDescriptor::boolean(format!("b{}", i)),
            _ => ParameterDescriptor::vec3(format!("v{}", i)),
        })
        .collect()
}

fn bench_compute_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_layout");

    for count in [0usize, 4, 16, 64] {
        let params = descriptors(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &params, |b, params| {
            b.iter(|| black_box(compute_layout(black_box(params))));
        });
    }

    group.finish();
}

fn bench_record_lifecycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_lifecycle");

    for count in [1usize, 8, 32] {
        let mut host = LocalHost::new();
        let mut bridge = CommandBridge::default();
        let request = CommandRequest::new("bench", "", PermissionLevel::Any)
            .with_overload(Overload::new(descriptors(count), |_, _, _| {}));
        bridge
            .register(&mut host, request)
            .expect("benchmark command registers");
        let binding = host.bindings("bench")[0].clone();

        group.bench_with_input(BenchmarkId::from_parameter(count), &binding, |b, binding| {
            b.iter(|| black_box(binding.instantiate()));
        });
    }

    group.finish();
}

fn bench_execute_line(c: &mut Criterion) {
    let mut host = LocalHost::new();
    let mut bridge = CommandBridge::default();
    let request = CommandRequest::new("tp", "", PermissionLevel::Any)
        .with_overload(Overload::new(
            vec![ParameterDescriptor::text("target")],
            |_, _, out| out.success(),
        ))
        .with_overload(Overload::new(
            vec![
                ParameterDescriptor::text("target"),
                ParameterDescriptor::vec3("to"),
                ParameterDescriptor::message("note"),
            ],
            |record, origin, out| {
                black_box(record.fetch(origin));
                out.success();
            },
        ));
    bridge
        .register(&mut host, request)
        .expect("benchmark command registers");
    let origin = LocalOrigin::console();

    c.bench_function("execute_second_overload", |b| {
        b.iter(|| black_box(host.execute("tp steve ~ ~10 ~ going up", &origin)));
    });
}

criterion_group!(
    benches,
    bench_compute_layout,
    bench_record_lifecycle,
    bench_execute_line
);
criterion_main!(benches);
