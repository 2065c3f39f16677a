//! Benchmarks for quickcsv.
//!
//! Run with:
//!     cargo bench

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};

use quickcsv::{
    CsvParser, DecodeError, FieldSubset, HeaderSource, NumberParsing, ParserConfig, Record,
};

/// Deterministic city table: text, quoted text, integers and floats.
fn cities(rows: usize) -> Vec<u8> {
    let mut out = String::from("Country,City,AccentCity,Region,Population,Latitude,Longitude\n");
    for i in 0..rows {
        let population = if i % 4 == 0 { String::new() } else { (i * 131 % 900_000).to_string() };
        out.push_str(&format!(
            "c{},\"city {}\",City {},{:02},{},{}.{:04},-{}.{:04}\n",
            i % 200,
            i,
            i,
            i % 60,
            population,
            i % 90,
            i * 7 % 10_000,
            i % 180,
            i * 13 % 10_000
        ));
    }
    out.into_bytes()
}

fn coordinates(r: &mut Record<'_>) -> Result<(f64, f64), DecodeError> {
    r.skip_fields(5);
    let lat = r.next_field().map_or(Ok(0.0), |f| f.as_f64())?;
    let lon = r.next_field().map_or(Ok(0.0), |f| f.as_f64())?;
    Ok((lat, lon))
}

fn bench_sequential(c: &mut Criterion) {
    let mut group = c.benchmark_group("sequential");

    for rows in [10_000, 100_000] {
        let data = cities(rows);
        group.throughput(Throughput::Bytes(data.len() as u64));

        group.bench_with_input(format!("count_{rows}"), &data, |b, data| {
            let parser = CsvParser::default();
            b.iter(|| {
                let records = parser
                    .parse_reader(black_box(&data[..]), |_: &mut Record<'_>| {
                        Ok::<_, DecodeError>(())
                    })
                    .unwrap();
                black_box(records.count())
            });
        });

        group.bench_with_input(format!("coordinates_{rows}"), &data, |b, data| {
            let parser = CsvParser::default();
            b.iter(|| {
                let sum: f64 = parser
                    .parse_reader(black_box(&data[..]), coordinates)
                    .unwrap()
                    .map(|r| r.map_or(0.0, |(lat, lon)| lat + lon))
                    .sum();
                black_box(sum)
            });
        });
    }

    group.finish();
}

fn bench_projection(c: &mut Criterion) {
    let mut group = c.benchmark_group("projection");
    let data = cities(100_000);
    group.throughput(Throughput::Bytes(data.len() as u64));

    group.bench_function("population_and_city", |b| {
        let subset = FieldSubset::new(["Population", "City"], HeaderSource::from_source());
        let parser = CsvParser::new(ParserConfig::default().with_field_subset(subset));
        b.iter(|| {
            let total: i64 = parser
                .parse_reader(black_box(&data[..]), |r: &mut Record<'_>| {
                    r.get(0).map_or(Ok(None), |f| f.opt_i64())
                })
                .unwrap()
                .filter_map(|r| r.ok().flatten())
                .sum();
            black_box(total)
        });
    });

    group.finish();
}

fn bench_numbers(c: &mut Criterion) {
    let mut group = c.benchmark_group("numbers");
    let data = cities(100_000);
    group.throughput(Throughput::Bytes(data.len() as u64));

    for (name, numbers) in [("fast", NumberParsing::Fast), ("precise", NumberParsing::Precise)] {
        group.bench_function(name, |b| {
            let parser = CsvParser::new(ParserConfig::default().with_number_parsing(numbers));
            b.iter(|| {
                let n = parser
                    .parse_reader(black_box(&data[..]), coordinates)
                    .unwrap()
                    .count();
                black_box(n)
            });
        });
    }

    group.finish();
}

#[cfg(feature = "parallel")]
fn bench_parallel(c: &mut Criterion) {
    use rayon::prelude::*;

    let mut group = c.benchmark_group("parallel");
    let data = cities(500_000);
    group.throughput(Throughput::Bytes(data.len() as u64));

    // Smaller buffers give rayon more units to spread.
    for buffer_size in [64 * 1024, 512 * 1024] {
        group.bench_function(format!("coordinates_{}k", buffer_size / 1024), |b| {
            let parser = CsvParser::new(ParserConfig::default().with_buffer_size(buffer_size));
            b.iter(|| {
                let source = parser.source(black_box(&data[..]));
                let values: Vec<_> = parser
                    .par_parse(source, coordinates)
                    .unwrap()
                    .collect::<Result<_, _>>()
                    .unwrap();
                black_box(values.len())
            });
        });
    }

    group.bench_function("sequential_baseline", |b| {
        let parser = CsvParser::default();
        b.iter(|| {
            let n = parser
                .parse_reader(black_box(&data[..]), coordinates)
                .unwrap()
                .count();
            black_box(n)
        });
    });

    group.finish();
}

#[cfg(not(feature = "parallel"))]
fn bench_parallel(_: &mut Criterion) {}

criterion_group!(
    benches,
    bench_sequential,
    bench_projection,
    bench_numbers,
    bench_parallel
);
criterion_main!(benches);
