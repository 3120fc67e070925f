use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use zero_cql::ResultSet;
use zero_cql::protocol::ResultResponse;

fn push_int(buf: &mut Vec<u8>, value: i32) {
    buf.extend_from_slice(&value.to_be_bytes());
}

fn push_short(buf: &mut Vec<u8>, value: u16) {
    buf.extend_from_slice(&value.to_be_bytes());
}

fn push_string(buf: &mut Vec<u8>, value: &str) {
    push_short(buf, u16::try_from(value.len()).unwrap());
    buf.extend_from_slice(value.as_bytes());
}

fn push_cell(buf: &mut Vec<u8>, value: &[u8]) {
    push_int(buf, i32::try_from(value.len()).unwrap());
    buf.extend_from_slice(value);
}

/// A Rows body with three columns: id int, name text, score double.
fn rows_body(rows: usize) -> Vec<u8> {
    let mut body = Vec::new();
    push_int(&mut body, 0x0002); // kind: Rows
    push_int(&mut body, 0x0001); // global tables spec
    push_int(&mut body, 3);
    push_string(&mut body, "ks");
    push_string(&mut body, "users");
    push_string(&mut body, "id");
    push_short(&mut body, 0x0009); // int
    push_string(&mut body, "name");
    push_short(&mut body, 0x000a); // text
    push_string(&mut body, "score");
    push_short(&mut body, 0x0007); // double
    push_int(&mut body, i32::try_from(rows).unwrap());
    for i in 0..rows {
        push_cell(&mut body, &i32::try_from(i).unwrap().to_be_bytes());
        push_cell(&mut body, format!("user_{i}").as_bytes());
        push_cell(&mut body, &(i as f64 * 0.5).to_be_bytes());
    }
    body
}

fn bench_decode_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_rows");

    for size in [10, 100, 1000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let body = rows_body(size);
            b.iter(|| ResultResponse::decode(&body).unwrap())
        });
    }
    group.finish();
}

fn bench_drain_typed(c: &mut Criterion) {
    let mut group = c.benchmark_group("drain_typed");

    for size in [10, 100, 1000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let body = rows_body(size);
            b.iter(|| {
                let response = ResultResponse::decode(&body).unwrap();
                let batch = ResultSet::from_response(response).unwrap();
                let mut ids = 0i64;
                let mut name_bytes = 0usize;
                for row in batch {
                    ids += i64::from(row.get::<i32>(0).unwrap());
                    name_bytes += row.get::<&str>(1).unwrap().len();
                }
                (ids, name_bytes)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_decode_rows, bench_drain_typed);
criterion_main!(benches);
