//! Codec microbenchmarks: argument pushing and strict read-back

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lunet_sdk::{call, OutSlot, ReadMode, ScriptValue, StackReader, Table};
use lunet_vm::Vm;

fn echo_vm() -> Vm {
    let mut vm = Vm::new();
    vm.register_global("echo", |_, args| Ok(args.to_vec()));
    vm
}

fn bench_scalar_round_trip(c: &mut Criterion) {
    c.bench_function("call_echo_scalar_args", |b| {
        let mut vm = echo_vm();
        let args: Vec<ScriptValue> = vec![1i64.into(), "Two".into(), 3.14f64.into()];
        b.iter(|| {
            let base = vm.depth();
            let results = call(&mut vm, "echo", black_box(&args)).unwrap();

            let mut i = 0i64;
            let mut s = String::new();
            let mut f = 0.0f64;
            let mut reader = StackReader::new(&vm, base, ReadMode::Strict);
            reader
                .read_into(&mut [
                    OutSlot::Int(&mut i),
                    OutSlot::Str {
                        dest: &mut s,
                        max_len: Some(256),
                    },
                    OutSlot::Float(&mut f),
                ])
                .unwrap();
            vm.truncate(base);
            black_box((results, i, s, f));
        });
    });
}

fn bench_nested_table_push(c: &mut Criterion) {
    c.bench_function("push_nested_table", |b| {
        let mut vm = echo_vm();
        let mut inner = Table::new();
        inner.set("Nine", 10i64);
        let mut table = Table::new();
        table.set("Six", 7i64);
        table.set("Name", "EEEEEEEEEEEEEEEE");
        table.set_table("Eight", inner);

        b.iter(|| {
            table.push(&mut vm).unwrap();
            vm.truncate(0);
        });
    });
}

criterion_group!(benches, bench_scalar_round_trip, bench_nested_table_push);
criterion_main!(benches);
