// Copyright 2022 houseme
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use flakeid::{Format, Id, Snowflake, base62};

fn bench_new(c: &mut Criterion) {
    c.bench_function("bench_new", |b| {
        b.iter(Snowflake::new);
    });
}

fn bench_generate(c: &mut Criterion) {
    let sf = Snowflake::new().expect("Could not create Snowflake");
    c.bench_function("bench_generate", |b| {
        b.iter(|| sf.generate());
    });
    c.bench_function("bench_generate_b62", |b| {
        b.iter(|| sf.generate_as(Format::B62));
    });
}

fn bench_codec(c: &mut Criterion) {
    let sf = Snowflake::new().expect("Could not create Snowflake");
    let id = Id::new(306_675_022_123, 42, 1);
    c.bench_function("bench_encode_bin", |b| {
        b.iter(|| sf.encode(Format::Bin, black_box(&id)));
    });
    c.bench_function("bench_base62_encode", |b| {
        b.iter(|| base62::encode(black_box(1_286_288_271_990_759_425)));
    });
    c.bench_function("bench_base62_decode", |b| {
        b.iter(|| base62::decode(black_box("1X1DGM2oOsz")));
    });
}

criterion_group!(snowflake_perf, bench_new, bench_generate, bench_codec);
criterion_main!(snowflake_perf);
