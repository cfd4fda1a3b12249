use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sqltmpl::{MysqlEscaper, QueryBuilder, Value, skip};

/// Template with `n` optional int conditions:
/// SELECT * FROM t WHERE 1=1{ AND c0 = ?d}{ AND c1 = ?d} ...
fn build_template(n: usize) -> String {
    let mut t = String::from("SELECT * FROM t WHERE 1=1");
    for i in 0..n {
        t.push_str(&format!("{{ AND c{i} = ?d}}"));
    }
    t
}

fn bench_all_kept(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_query/all_kept");
    let builder = QueryBuilder::new(MysqlEscaper);

    for n in [1, 5, 10, 50, 100] {
        let template = build_template(n);
        let args: Vec<Value> = (0..n as i64).map(Value::Int).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| black_box(builder.build_query(&template, &args)));
        });
    }

    group.finish();
}

fn bench_half_skipped(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_query/half_skipped");
    let builder = QueryBuilder::new(MysqlEscaper);

    for n in [1, 5, 10, 50, 100] {
        let template = build_template(n);
        let args: Vec<Value> = (0..n as i64)
            .map(|i| if i % 2 == 0 { skip() } else { Value::Int(i) })
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| black_box(builder.build_query(&template, &args)));
        });
    }

    group.finish();
}

fn bench_string_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_query/string_list");
    let builder = QueryBuilder::new(MysqlEscaper);

    for n in [5, 20, 100, 500] {
        let list = Value::List((0..n).map(|i| Value::Str(format!("it's #{i}"))).collect());
        let args = vec![list];
        group.bench_with_input(BenchmarkId::from_parameter(n), &args, |b, args| {
            b.iter(|| black_box(builder.build_query("SELECT * FROM t WHERE name IN (?a)", args)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_all_kept, bench_half_skipped, bench_string_list);
criterion_main!(benches);
