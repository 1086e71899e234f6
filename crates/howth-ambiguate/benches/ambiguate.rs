//! Property ambiguation benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use howth_ambiguate::{ambiguate, Inheritance, Program, TypeRegistry};

/// Build `classes` classes in chains of four, each declaring `props`
/// prototype properties, plus one read per property through an instance.
fn synthetic_program(classes: usize, props: usize) -> (Program, TypeRegistry) {
    let mut types = TypeRegistry::new();
    let mut program = Program::new();
    let mut parent = None;

    for c in 0..classes {
        let name = format!("Class{c}");
        let class = match parent {
            Some(parent) if c % 4 != 0 => types.declare_subclass(&name, &parent, Inheritance::Es6),
            _ => types.declare_class(&name),
        };
        parent = Some(class);

        for p in 0..props {
            let prop = format!("property{c}_{p}");

            let ctor = program.ident(&name);
            let ctor = types.typed(ctor, class.constructor);
            let proto = program.member(ctor, "prototype");
            let proto = types.typed(proto, class.prototype);
            let access = program.member(proto, &prop);
            let zero = program.number(0.0);
            let assign = program.assign(access, zero);
            let stmt = program.expr_stmt(assign);
            program.push(stmt);

            let instance = program.ident("obj");
            let instance = types.typed(instance, class.instance);
            let read = program.member(instance, &prop);
            let stmt = program.expr_stmt(read);
            program.push(stmt);
        }
    }

    (program, types)
}

fn bench_ambiguate(c: &mut Criterion) {
    let mut group = c.benchmark_group("ambiguate");

    for classes in [16, 64, 256] {
        let (program, types) = synthetic_program(classes, 8);
        group.throughput(Throughput::Elements(program.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(classes), &classes, |b, _| {
            b.iter(|| {
                let mut program = program.clone();
                let outcome = ambiguate(black_box(&mut program), &types).unwrap();
                black_box(outcome.stats)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_ambiguate);
criterion_main!(benches);
