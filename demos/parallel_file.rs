//! Ordered parallel parsing of a file.
//!
//! Run with:
//!     cargo run --release --example parallel_file -- /path/to/cities.csv

use std::env;
use std::fs::File;
use std::time::Instant;

use quickcsv::{CsvParser, DecodeError, ParserConfig, Record};
use rayon::prelude::*;

/// Sums the numeric columns of a record; non-numeric fields count as zero.
fn numeric_sum(r: &mut Record<'_>) -> Result<f64, DecodeError> {
    let mut sum = 0.0;
    while let Some(field) = r.next_field() {
        sum += field.as_f64().unwrap_or(0.0);
    }
    Ok(sum)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "Cargo.toml".to_string());

    println!("Parsing file: {}\n", path);

    let config = ParserConfig::default().with_buffer_size(256 * 1024);
    let parser = CsvParser::new(config);

    let start = Instant::now();
    let source = parser.source(File::open(&path)?);
    let parallel: Vec<f64> = parser
        .par_parse(source, numeric_sum)?
        .collect::<Result<_, _>>()?;
    let par_time = start.elapsed();

    let start = Instant::now();
    let sequential: Vec<f64> = parser
        .parse_reader(File::open(&path)?, numeric_sum)?
        .collect::<Result<_, _>>()?;
    let seq_time = start.elapsed();

    assert_eq!(parallel.len(), sequential.len());
    let same_order = parallel
        .iter()
        .zip(&sequential)
        .all(|(a, b)| a.to_bits() == b.to_bits());

    println!("Records:    {}", parallel.len());
    println!("Parallel:   {:?}", par_time);
    println!("Sequential: {:?}", seq_time);
    println!("Same order: {}", same_order);
    println!("Buffers:    {} created", parser.pool().created());

    Ok(())
}
