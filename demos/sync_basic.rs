//! Basic sequential parsing with a typed mapper.
//!
//! Run with:
//!     cargo run --example sync_basic

use quickcsv::{CsvParser, DecodeError, ParserConfig, Record};

#[derive(Debug)]
struct City {
    country: String,
    name: String,
    population: Option<i64>,
    latitude: f64,
    longitude: f64,
}

fn parse_city(r: &mut Record<'_>) -> Result<City, DecodeError> {
    let country = r.next_field().map(|f| f.as_str().into_owned()).unwrap_or_default();
    r.skip_field();
    let name = r.next_field().map(|f| f.as_str().into_owned()).unwrap_or_default();
    r.skip_field();
    let population = r.next_field().map_or(Ok(None), |f| f.opt_i64())?;
    let latitude = r.next_field().map_or(Ok(0.0), |f| f.as_f64())?;
    let longitude = r.next_field().map_or(Ok(0.0), |f| f.as_f64())?;
    Ok(City {
        country,
        name,
        population,
        latitude,
        longitude,
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let data = "\
Country,City,AccentCity,Region,Population,Latitude,Longitude
de,berlin,Berlin,16,3398362,52.516667,13.4
fr,paris,Paris,A8,2110694,48.866667,2.333333
ch,zurich,\"Z\u{fc}rich\",25,,47.366667,8.55
";

    // Tiny buffers force lines across chunk boundaries
    let config = ParserConfig::default().with_skip_records(1).with_buffer_size(16);
    let parser = CsvParser::new(config);

    println!("Parsing {} bytes...\n", data.len());

    let mut total = 0;
    for city in parser.parse_reader(data.as_bytes(), parse_city)? {
        let city = city?;
        total += 1;
        println!(
            "{:<3} {:<10} pop={:>8} at ({:.3}, {:.3})",
            city.country,
            city.name,
            city.population.map_or_else(|| "-".to_string(), |p| p.to_string()),
            city.latitude,
            city.longitude
        );
    }

    println!("\nTotal: {} records", total);
    println!(
        "Buffers: {} created, {} pooled",
        parser.pool().created(),
        parser.pool().available()
    );

    Ok(())
}
