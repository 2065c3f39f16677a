//! File parsing with a field subset.
//!
//! Run with:
//!     cargo run --example sync_file -- /path/to/cities.csv [Column ...]

use std::env;
use std::fs::File;

use quickcsv::{CsvParser, FieldSubset, HeaderSource, LogAndSkip, ParserConfig, to_string_vec};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: sync_file <file.csv> [column ...]");
        return Ok(());
    };
    let mut columns: Vec<String> = args.collect();
    if columns.is_empty() {
        columns = vec!["City".to_string(), "Population".to_string()];
    }

    println!("Parsing file: {}", path);
    println!("Columns: {:?}\n", columns);

    let file = File::open(&path)?;
    let metadata = file.metadata()?;
    println!("File size: {} bytes\n", metadata.len());

    let config = ParserConfig::default()
        .with_field_subset(FieldSubset::new(columns, HeaderSource::from_source()))
        .with_mapping_handler(LogAndSkip);
    let parser = CsvParser::new(config);

    let mut total = 0usize;
    for row in parser.parse_reader(file, to_string_vec)? {
        let row = row?;
        total += 1;
        if total <= 10 {
            println!("{:>6}: {}", total, row.join(" | "));
        }
    }

    println!("\nTotal: {} records", total);
    Ok(())
}
